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

/// Used when a deck has no usable title.
pub const DEFAULT_FILE_STEM: &str = "flashcards";

const MAX_STEM_LEN: usize = 30;

/// Strip everything but ASCII letters and digits from a title, and cap it
/// at 30 characters. Returns `None` when nothing is left.
pub fn sanitize_title(title: &str) -> Option<String> {
    let stem: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_STEM_LEN)
        .collect();
    if stem.is_empty() { None } else { Some(stem) }
}

/// The name of the exported PDF for a deck with the given title.
pub fn export_file_name(title: Option<&str>) -> String {
    let stem = title
        .and_then(sanitize_title)
        .unwrap_or_else(|| DEFAULT_FILE_STEM.to_string());
    format!("{stem}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_non_alphanumeric() {
        assert_eq!(
            sanitize_title("Cell Biology: Part #2!"),
            Some("CellBiologyPart2".to_string())
        );
    }

    #[test]
    fn test_truncates_to_thirty() {
        let title = "The Complete Introduction to Organic Chemistry Reactions";
        let stem = sanitize_title(title).unwrap();
        assert_eq!(stem.len(), 30);
        assert_eq!(stem, "TheCompleteIntroductiontoOrgan");
        assert!(stem.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_deterministic() {
        let title = "Déjà vu & the Über-Brain (2024)";
        assert_eq!(sanitize_title(title), sanitize_title(title));
        assert_eq!(sanitize_title(title), Some("DjvutheberBrain2024".to_string()));
    }

    #[test]
    fn test_default_name() {
        assert_eq!(export_file_name(None), "flashcards.pdf");
        assert_eq!(export_file_name(Some("???")), "flashcards.pdf");
        assert_eq!(export_file_name(Some("Photosynthesis")), "Photosynthesis.pdf");
    }
}
