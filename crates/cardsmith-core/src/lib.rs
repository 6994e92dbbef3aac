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

//! cardsmith-core: Core library for the cardsmith flashcard generator.
//!
//! This library is WASM-compatible and provides:
//! - Card and deck types, and the generation request/response contract
//! - The double-sided print layout engine and its PDF renderer
//! - Study session and UI shell state records
//! - Markdown to HTML rendering for card text

pub mod error;
pub mod filename;
pub mod generate;
pub mod layout;
pub mod markdown;
pub mod pdf;
pub mod rng;
pub mod session;
pub mod shell;
pub mod tier;
pub mod types;
pub mod video;

// Re-exports for convenience
pub use error::{ErrorReport, Fallible, fail};
pub use filename::export_file_name;
pub use generate::{ContentGenerator, GenerationRequest, Source};
pub use layout::{PrintLayout, layout_deck};
pub use pdf::{ExportedPdf, export_pdf};
pub use session::StudySession;
pub use shell::ShellState;
pub use tier::TypeTier;
pub use types::card::{Card, LearningContent};
pub use types::date::Date;
pub use types::settings::{AdvancedSettings, Difficulty};
pub use video::TitleResolver;
