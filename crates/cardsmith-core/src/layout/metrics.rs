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

//! Helvetica advance widths and line wrapping.
//!
//! Widths are in thousandths of an em, from the standard Helvetica AFM.
//! Lengths returned by this module are in millimetres.

/// Millimetres per PostScript point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Advance widths for the printable ASCII range `' '..='~'`.
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const DEFAULT_WIDTH: u16 = 556;

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => ASCII_WIDTHS[c as usize - ' ' as usize],
        '\u{2018}' | '\u{2019}' => 222,
        '\u{201C}' | '\u{201D}' => 333,
        '\u{2022}' => 350,
        '\u{2013}' => 556,
        '\u{2014}' | '\u{2026}' => 1000,
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `text` set in Helvetica at `font_size` points, in points.
pub fn text_width_pt(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c) as u32).sum();
    units as f32 / 1000.0 * font_size
}

/// Width of `text` set in Helvetica at `font_size` points, in millimetres.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text_width_pt(text, font_size) * MM_PER_PT
}

/// Break `text` into lines no wider than `max_width` millimetres.
///
/// Explicit newlines are kept. Words are separated by single spaces; a word
/// that does not fit on a line by itself is broken between characters.
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = place_word(word, font_size, max_width, &mut lines);
                continue;
            }
            let candidate = format!("{current} {word}");
            if text_width(&candidate, font_size) <= max_width {
                current = candidate;
            } else {
                lines.push(current);
                current = place_word(word, font_size, max_width, &mut lines);
            }
        }
        lines.push(current);
    }
    lines
}

/// Start a new line with `word`. Any full-width pieces of an overlong word
/// are pushed onto `lines`; the remainder is returned as the open line.
fn place_word(word: &str, font_size: f32, max_width: f32, lines: &mut Vec<String>) -> String {
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if text_width(&current, font_size) > max_width && current.chars().count() > 1 {
            current.pop();
            lines.push(current);
            current = c.to_string();
        }
    }
    current
}
