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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl TryFrom<&str> for Difficulty {
    type Error = ErrorReport;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ErrorReport::new(format!("invalid difficulty: {value}"))),
        }
    }
}

pub const DEFAULT_CARD_COUNT: u32 = 15;

/// Knobs the user can turn before generating a deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedSettings {
    /// Exact number of cards requested. Always at least one.
    pub card_count: u32,
    pub difficulty: Difficulty,
    /// Free text that overrides the default card format.
    pub custom_instructions: String,
}

impl AdvancedSettings {
    pub fn new(card_count: u32, difficulty: Difficulty, custom_instructions: String) -> Self {
        Self {
            card_count: card_count.max(1),
            difficulty,
            custom_instructions,
        }
    }
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            card_count: DEFAULT_CARD_COUNT,
            difficulty: Difficulty::default(),
            custom_instructions: String::new(),
        }
    }
}
