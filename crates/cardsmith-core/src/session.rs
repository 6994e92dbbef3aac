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

//! Practice mode: one card at a time, flip to see the back.

use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::tier::TypeTier;
use crate::types::card::Card;

#[derive(Clone, Debug)]
pub struct StudySession {
    cards: Vec<Card>,
    index: usize,
    flipped: bool,
}

impl StudySession {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            index: 0,
            flipped: false,
        }
    }

    /// The cards in their current order. Shuffling changes this order, and
    /// exports follow it.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn current(&self) -> Option<&Card> {
        self.cards.get(self.index)
    }

    /// Zero-based index of the current card.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Text on the visible side of the current card.
    pub fn visible_text(&self) -> Option<&str> {
        self.current()
            .map(|card| if self.flipped { card.back() } else { card.front() })
    }

    /// Type tier for the visible side of the current card.
    pub fn visible_tier(&self) -> Option<TypeTier> {
        self.visible_text().map(TypeTier::for_text)
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Advance to the next card, wrapping around to the first.
    pub fn next(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.flipped = false;
        self.index = (self.index + 1) % self.cards.len();
    }

    /// Go back to the previous card, wrapping around to the last.
    pub fn prev(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.flipped = false;
        self.index = (self.index + self.cards.len() - 1) % self.cards.len();
    }

    pub fn shuffle(&mut self, rng: &mut TinyRng) {
        shuffle(&mut self.cards, rng);
        self.reset();
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.flipped = false;
    }
}
