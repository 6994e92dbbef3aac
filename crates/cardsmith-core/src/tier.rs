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

//! Type-size tiers.
//!
//! Longer text is set smaller. The tier is chosen from the text alone; what
//! size a tier maps to is up to each presentation (print, practice mode).

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeTier {
    Large,
    Medium,
    Small,
}

/// Texts longer than this many characters are at least `Medium`.
const MEDIUM_ABOVE: usize = 100;
/// Texts longer than this many characters are `Small`.
const SMALL_ABOVE: usize = 200;

impl TypeTier {
    pub fn for_text(text: &str) -> Self {
        let len = text.chars().count();
        if len > SMALL_ABOVE {
            TypeTier::Small
        } else if len > MEDIUM_ABOVE {
            TypeTier::Medium
        } else {
            TypeTier::Large
        }
    }

    /// CSS class for the on-screen practice card.
    pub fn practice_class(self, fullscreen: bool) -> &'static str {
        match (self, fullscreen) {
            (TypeTier::Large, false) => "text-large",
            (TypeTier::Medium, false) => "text-medium",
            (TypeTier::Small, false) => "text-small",
            (TypeTier::Large, true) => "text-large-fullscreen",
            (TypeTier::Medium, true) => "text-medium-fullscreen",
            (TypeTier::Small, true) => "text-small-fullscreen",
        }
    }
}
