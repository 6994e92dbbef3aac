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

//! Optional `cardsmith.toml` with defaults for generation.
//!
//! ```toml
//! card_count = 20
//! difficulty = "hard"
//! custom_instructions = "single word terms"
//! model = "gemini-3-pro-preview"
//! api_key_env = "API_KEY"
//! ```

use std::path::Path;
use std::path::PathBuf;

use cardsmith_core::AdvancedSettings;
use cardsmith_core::Difficulty;
use serde::Deserialize;

use crate::error::Fallible;
use crate::error::fail;

pub const CONFIG_FILE_NAME: &str = "cardsmith.toml";
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub card_count: u32,
    pub difficulty: Difficulty,
    pub custom_instructions: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for Config {
    fn default() -> Self {
        let settings = AdvancedSettings::default();
        Self {
            card_count: settings.card_count,
            difficulty: settings.difficulty,
            custom_instructions: settings.custom_instructions,
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl Config {
    /// Load the config at `path`, which must exist. Without a path,
    /// `cardsmith.toml` in the working directory is used if present.
    pub fn load(path: Option<&str>) -> Fallible<Self> {
        let path: PathBuf = match path {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return fail(format!("config file {} does not exist.", path.display()));
                }
                path
            }
            None => {
                let path = PathBuf::from(CONFIG_FILE_NAME);
                if !path.exists() {
                    log::debug!("No {CONFIG_FILE_NAME} found, using defaults");
                    return Ok(Config::default());
                }
                path
            }
        };
        Self::read(&path)
    }

    fn read(path: &Path) -> Fallible<Self> {
        log::debug!("Reading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)?;
        if config.card_count == 0 {
            return fail("card_count must be at least 1.");
        }
        Ok(config)
    }

    /// Settings for one request: flags win over the config file.
    pub fn settings(
        &self,
        card_count: Option<u32>,
        difficulty: Option<Difficulty>,
        custom_instructions: Option<String>,
    ) -> AdvancedSettings {
        AdvancedSettings::new(
            card_count.unwrap_or(self.card_count),
            difficulty.unwrap_or(self.difficulty),
            custom_instructions.unwrap_or_else(|| self.custom_instructions.clone()),
        )
    }
}

/// Read an API key from the environment variable `var`.
pub fn api_key_from_env(var: &str) -> Fallible<String> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => fail(format!("{var} is missing from environment variables.")),
    }
}
