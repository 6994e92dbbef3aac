// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The contract with the content generator.
//!
//! Prompt construction and response validation live here so that every
//! generator backend asks for, and accepts, exactly the same thing.

use serde_json::Value;
use serde_json::json;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::LearningContent;
use crate::types::settings::AdvancedSettings;

pub const DEFAULT_DOCUMENT_MIME_TYPE: &str = "application/pdf";

const DEFAULT_FORMAT: &str = "Standard flashcard format (Term on front, Definition on back)";

/// Produces a deck from a request.
#[allow(async_fn_in_trait)]
pub trait ContentGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Fallible<LearningContent>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    /// Generate from what a video with this title likely covers.
    VideoTitle(String),
    /// Generate from an attached document.
    Document {
        /// Base64-encoded bytes.
        data: String,
        mime_type: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub source: Source,
    pub settings: AdvancedSettings,
}

impl GenerationRequest {
    pub fn new(source: Source, settings: AdvancedSettings) -> Self {
        Self { source, settings }
    }

    /// `"text"` for prompt-only requests, `"document"` when bytes are attached.
    pub fn source_kind(&self) -> &'static str {
        match self.source {
            Source::VideoTitle(_) => "text",
            Source::Document { .. } => "document",
        }
    }

    /// The mime type of the attached document, if any.
    pub fn mime_type(&self) -> Option<&str> {
        match &self.source {
            Source::VideoTitle(_) => None,
            Source::Document { mime_type, .. } => {
                Some(mime_type.as_deref().unwrap_or(DEFAULT_DOCUMENT_MIME_TYPE))
            }
        }
    }

    /// Difficulty, quantity and formatting instructions shared by all prompts.
    pub fn context_instruction(&self) -> String {
        let AdvancedSettings {
            card_count,
            difficulty,
            custom_instructions,
        } = &self.settings;
        let instructions = if custom_instructions.trim().is_empty() {
            DEFAULT_FORMAT
        } else {
            custom_instructions.trim()
        };
        format!(
            "Difficulty Level: {difficulty}.\n\
             Quantity: Generate exactly {card_count} flashcards.\n\
             Custom Formatting Instructions: {instructions}.\n\
             \n\
             IMPORTANT: Follow the \"Custom Formatting Instructions\" strictly.\n\
             If the user asks for \"equations only\", ensure the front is the equation \
             name/problem and back is the formula/solution.\n\
             If the user asks for \"single word terms\", ensure the front is only one word."
        )
    }

    /// The text part of the request.
    pub fn prompt(&self) -> String {
        let context = self.context_instruction();
        match &self.source {
            Source::VideoTitle(title) => format!(
                "I have a YouTube video titled: \"{title}\".\n\
                 \n\
                 Please generate a comprehensive set of flashcards based on what would \
                 likely be covered in a video with this specific title.\n\
                 Focus on extracting key terms, definitions, and core concepts.\n\
                 \n\
                 {context}"
            ),
            Source::Document { .. } => format!(
                "Analyze this document and generate a comprehensive set of flashcards \
                 covering the most important concepts, terms, and definitions found \
                 within it.\n\
                 \n\
                 {context}"
            ),
        }
    }
}

/// The JSON schema the generator's structured output must follow.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "A title for the flashcard deck",
            },
            "summary": {
                "type": "STRING",
                "description": "A brief 1-2 sentence description of the content covered.",
            },
            "flashcards": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "front": {
                            "type": "STRING",
                            "description": "The term, concept, or question. Keep it concise.",
                        },
                        "back": {
                            "type": "STRING",
                            "description": "The definition, explanation, or answer.",
                        },
                    },
                    "required": ["front", "back"],
                },
                "description": "A comprehensive set of flashcards covering the key concepts.",
            },
        },
        "required": ["title", "summary", "flashcards"],
    })
}

/// Parse the generator's text output into a deck.
pub fn parse_generated(text: &str) -> Fallible<LearningContent> {
    let text = text.trim();
    if text.is_empty() {
        return fail("No content generated");
    }
    serde_json::from_str(text)
        .map_err(|e| ErrorReport::new(format!("Malformed response from generator: {e}")))
}
