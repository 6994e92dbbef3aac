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

//! WASM bindings for cardsmith: study a deck and print it from the browser.

use wasm_bindgen::prelude::*;
use web_sys::console;

use cardsmith_core::Date;
use cardsmith_core::LearningContent;
use cardsmith_core::StudySession;
use cardsmith_core::export_file_name;
use cardsmith_core::export_pdf;
use cardsmith_core::markdown::markdown_to_html;
use cardsmith_core::rng::TinyRng;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console::log_1(&"cardsmith WASM initialized".into());
}

/// The main application state managed from JavaScript.
#[wasm_bindgen]
pub struct CardsmithApp {
    /// The loaded deck, in generated order.
    content: Option<LearningContent>,
    /// Practice mode state
    session: StudySession,
}

#[wasm_bindgen]
impl CardsmithApp {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            content: None,
            session: StudySession::new(Vec::new()),
        }
    }

    /// Load a deck from the generator's JSON. Returns the number of cards.
    #[wasm_bindgen]
    pub fn load_deck(&mut self, deck_json: &str) -> Result<usize, JsValue> {
        let content = LearningContent::from_json(deck_json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse deck: {}", e)))?;
        self.session = StudySession::new(content.flashcards.clone());
        let count = content.flashcards.len();
        self.content = Some(content);
        Ok(count)
    }

    #[wasm_bindgen]
    pub fn title(&self) -> Option<String> {
        self.content.as_ref().and_then(|c| c.title()).map(str::to_string)
    }

    #[wasm_bindgen]
    pub fn summary(&self) -> Option<String> {
        self.content.as_ref().map(|c| c.summary.clone())
    }

    #[wasm_bindgen]
    pub fn total_cards(&self) -> usize {
        self.session.len()
    }

    /// Zero-based index of the current card.
    #[wasm_bindgen]
    pub fn current_index(&self) -> usize {
        self.session.index()
    }

    #[wasm_bindgen]
    pub fn is_flipped(&self) -> bool {
        self.session.is_flipped()
    }

    #[wasm_bindgen]
    pub fn flip(&mut self) {
        self.session.flip();
    }

    #[wasm_bindgen]
    pub fn next(&mut self) {
        self.session.next();
    }

    #[wasm_bindgen]
    pub fn prev(&mut self) {
        self.session.prev();
    }

    #[wasm_bindgen]
    pub fn shuffle(&mut self) {
        let seed = js_sys::Date::now() as u64;
        let mut rng = TinyRng::from_seed(seed);
        self.session.shuffle(&mut rng);
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Get the current card's front HTML.
    #[wasm_bindgen]
    pub fn current_front_html(&self) -> Result<String, JsValue> {
        let card = self
            .session
            .current()
            .ok_or_else(|| JsValue::from_str("No cards in session"))?;
        Ok(markdown_to_html(card.front()))
    }

    /// Get the current card's back HTML.
    #[wasm_bindgen]
    pub fn current_back_html(&self) -> Result<String, JsValue> {
        let card = self
            .session
            .current()
            .ok_or_else(|| JsValue::from_str("No cards in session"))?;
        Ok(markdown_to_html(card.back()))
    }

    /// CSS class sizing the visible side of the current card.
    #[wasm_bindgen]
    pub fn tier_class(&self, fullscreen: bool) -> Option<String> {
        self.session
            .visible_tier()
            .map(|tier| tier.practice_class(fullscreen).to_string())
    }

    /// Render the deck as a printable PDF. `today_str` is YYYY-MM-DD.
    #[wasm_bindgen]
    pub fn export_pdf(&self, today_str: &str) -> Result<Vec<u8>, JsValue> {
        let today = Date::try_from(today_str.to_string())
            .map_err(|e| JsValue::from_str(&format!("Invalid date: {}", e)))?;
        let title = self.content.as_ref().and_then(|c| c.title());
        let pdf = export_pdf(self.session.cards(), title, today)
            .map_err(|e| JsValue::from_str(e.message()))?;
        Ok(pdf.bytes)
    }

    /// The download name for [`CardsmithApp::export_pdf`].
    #[wasm_bindgen]
    pub fn export_file_name(&self) -> String {
        export_file_name(self.content.as_ref().and_then(|c| c.title()))
    }
}

impl Default for CardsmithApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Get today's date as a string (YYYY-MM-DD).
#[wasm_bindgen]
pub fn today_date() -> String {
    let date = js_sys::Date::new_0();
    let year = date.get_full_year();
    let month = date.get_month() + 1;
    let day = date.get_date();
    format!("{:04}-{:02}-{:02}", year, month, day)
}
