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

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;

/// A single flashcard. Cards are immutable once generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    front: String,
    back: String,
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    /// The term, concept, or question.
    pub fn front(&self) -> &str {
        &self.front
    }

    /// The definition, explanation, or answer.
    pub fn back(&self) -> &str {
        &self.back
    }
}

/// A generated deck: what the content generator returns, and what
/// `cardsmith` reads and writes as a deck file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearningContent {
    pub title: String,
    pub summary: String,
    pub flashcards: Vec<Card>,
}

impl LearningContent {
    pub fn from_json(text: &str) -> Fallible<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Fallible<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The title, or `None` when it is blank.
    pub fn title(&self) -> Option<&str> {
        let title = self.title.trim();
        if title.is_empty() { None } else { Some(title) }
    }
}
