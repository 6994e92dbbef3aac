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

use std::fs::remove_file;
use std::fs::rename;
use std::fs::write;
use std::path::Path;
use std::path::PathBuf;

use cardsmith_core::Date;
use cardsmith_core::LearningContent;
use cardsmith_core::export_pdf;
use cardsmith_core::pdf::EXPORT_FAILED;

use crate::error::Fallible;
use crate::error::fail;

pub fn read_deck(path: &str) -> Fallible<LearningContent> {
    let path = Path::new(path);
    if !path.exists() {
        return fail(format!("deck file {} does not exist.", path.display()));
    }
    let text = std::fs::read_to_string(path)?;
    Ok(LearningContent::from_json(&text)?)
}

/// Export the deck at `deck_path` to a PDF. Without `output`, the file is
/// named after the deck title and written to the working directory.
pub fn export_deck(deck_path: String, output: Option<String>) -> Fallible<()> {
    let deck = read_deck(&deck_path)?;
    let path = export_content(&deck, output.map(PathBuf::from), Date::today())?;
    println!(
        "Exported {} cards to {}",
        deck.flashcards.len(),
        path.display()
    );
    Ok(())
}

/// Render and save a deck, returning where it was written.
pub fn export_content(
    deck: &LearningContent,
    output: Option<PathBuf>,
    today: Date,
) -> Fallible<PathBuf> {
    let pdf = export_pdf(&deck.flashcards, deck.title(), today)?;
    let path = output.unwrap_or_else(|| PathBuf::from(&pdf.file_name));
    write_pdf(&path, &pdf.bytes)?;
    Ok(path)
}

/// Write to a sibling temporary file first, so that a failed write never
/// leaves a truncated PDF at `path`.
fn write_pdf(path: &Path, bytes: &[u8]) -> Fallible<()> {
    let partial = path.with_extension("pdf.part");
    let result = write(&partial, bytes).and_then(|_| rename(&partial, path));
    if let Err(e) = result {
        log::error!("Failed to write {}: {e}", path.display());
        let _ = remove_file(&partial);
        return fail(EXPORT_FAILED);
    }
    Ok(())
}
