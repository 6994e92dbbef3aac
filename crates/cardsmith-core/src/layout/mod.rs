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

//! Double-sided print layout.
//!
//! A deck is split into chunks of up to eight cards. Each chunk becomes a
//! front page followed by a back page. On the back page every card's column
//! is mirrored, so that after duplex printing (flipping on the long edge)
//! each definition lands directly behind its term.
//!
//! All positions are in millimetres from the top-left corner of the page.

pub mod metrics;

use crate::filename::export_file_name;
use crate::layout::metrics::wrap_text;
use crate::tier::TypeTier;
use crate::types::card::Card;
use crate::types::date::Date;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 12.0;
pub const COLUMNS: usize = 2;
pub const ROWS: usize = 4;
pub const CARDS_PER_PAGE: usize = COLUMNS * ROWS;

pub const CELL_WIDTH: f32 = (PAGE_WIDTH - 2.0 * MARGIN) / COLUMNS as f32;
pub const CELL_HEIGHT: f32 = (PAGE_HEIGHT - 2.0 * MARGIN) / ROWS as f32;

/// Horizontal room lost to padding inside a cell.
const CELL_PADDING: f32 = 10.0;
/// Distance from the top of a cell to the label baseline.
const LABEL_OFFSET: f32 = 8.0;
/// The text block sits slightly below the true centre of the cell.
const BASELINE_NUDGE: f32 = 2.0;
/// Distance of the header line above the top margin.
const HEADER_OFFSET: f32 = 4.0;
/// Width reserved for the name field at the right of the header.
const NAME_FIELD_WIDTH: f32 = 50.0;

pub const LABEL_FONT_SIZE: f32 = 7.0;
pub const HEADER_FONT_SIZE: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Front => "TERM",
            Side::Back => "DEFINITION",
        }
    }

    /// Font size in points and line height in millimetres for a tier.
    pub fn type_size(self, tier: TypeTier) -> (f32, f32) {
        match (self, tier) {
            (Side::Front, TypeTier::Large) => (12.0, 5.0),
            (Side::Front, TypeTier::Medium) => (11.0, 4.6),
            (Side::Front, TypeTier::Small) => (9.0, 3.8),
            (Side::Back, TypeTier::Large) => (10.0, 4.0),
            (Side::Back, TypeTier::Medium) => (9.0, 3.6),
            (Side::Back, TypeTier::Small) => (8.0, 3.2),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    /// Where the card at `index` within its chunk goes on the front page.
    pub fn front(index: usize) -> Self {
        Self {
            row: index / COLUMNS,
            col: index % COLUMNS,
        }
    }

    /// Where the card at `index` within its chunk goes on the back page.
    pub fn back(index: usize) -> Self {
        let front = Self::front(index);
        Self {
            row: front.row,
            col: COLUMNS - 1 - front.col,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    fn cell(position: GridPosition) -> Self {
        Self {
            x: MARGIN + position.col as f32 * CELL_WIDTH,
            y: MARGIN + position.row as f32 * CELL_HEIGHT,
            width: CELL_WIDTH,
            height: CELL_HEIGHT,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Wrapped card text, centred horizontally on `center_x`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub tier: TypeTier,
    pub font_size: f32,
    pub line_height: f32,
    pub center_x: f32,
    /// Baseline of the first line.
    pub first_baseline: f32,
}

impl TextBlock {
    fn new(text: &str, side: Side, rect: &Rect) -> Self {
        let tier = TypeTier::for_text(text);
        let (font_size, line_height) = side.type_size(tier);
        let lines = wrap_text(text, font_size, rect.width - CELL_PADDING);
        let block_height = lines.len() as f32 * line_height;
        Self {
            lines,
            tier,
            font_size,
            line_height,
            center_x: rect.center_x(),
            first_baseline: rect.y + rect.height / 2.0 - block_height / 2.0 + BASELINE_NUDGE,
        }
    }

    pub fn baselines(&self) -> impl Iterator<Item = (f32, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| (self.first_baseline + i as f32 * self.line_height, line.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CellLayout {
    /// Index of the card in the whole deck.
    pub card_index: usize,
    pub position: GridPosition,
    pub rect: Rect,
    pub label: &'static str,
    pub label_baseline: f32,
    pub text: TextBlock,
}

/// A left-aligned line of small print.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderText {
    pub text: String,
    pub x: f32,
    pub baseline: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    pub side: Side,
    /// Index of the chunk this page belongs to.
    pub chunk: usize,
    /// Only the first front page carries a header.
    pub header: Vec<HeaderText>,
    pub cells: Vec<CellLayout>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PrintLayout {
    pub pages: Vec<PageLayout>,
    pub file_name: String,
}

impl PrintLayout {
    /// Number of front/back page pairs.
    pub fn chunk_count(&self) -> usize {
        self.pages.len() / 2
    }
}

/// Lay out a deck for double-sided printing.
///
/// An empty deck yields a layout with no pages.
pub fn layout_deck(cards: &[Card], title: Option<&str>, created_on: Date) -> PrintLayout {
    let mut pages = Vec::with_capacity(cards.len().div_ceil(CARDS_PER_PAGE) * 2);
    for (chunk_index, chunk) in cards.chunks(CARDS_PER_PAGE).enumerate() {
        let offset = chunk_index * CARDS_PER_PAGE;
        let header = if chunk_index == 0 {
            header_lines(created_on)
        } else {
            Vec::new()
        };
        pages.push(PageLayout {
            side: Side::Front,
            chunk: chunk_index,
            header,
            cells: layout_side(chunk, offset, Side::Front),
        });
        pages.push(PageLayout {
            side: Side::Back,
            chunk: chunk_index,
            header: Vec::new(),
            cells: layout_side(chunk, offset, Side::Back),
        });
    }
    log::debug!(
        "Laid out {} cards on {} pages",
        cards.len(),
        pages.len()
    );
    PrintLayout {
        pages,
        file_name: export_file_name(title),
    }
}

fn layout_side(chunk: &[Card], offset: usize, side: Side) -> Vec<CellLayout> {
    chunk
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let position = match side {
                Side::Front => GridPosition::front(i),
                Side::Back => GridPosition::back(i),
            };
            let text = match side {
                Side::Front => card.front(),
                Side::Back => card.back(),
            };
            let rect = Rect::cell(position);
            CellLayout {
                card_index: offset + i,
                position,
                label: side.label(),
                label_baseline: rect.y + LABEL_OFFSET,
                text: TextBlock::new(text, side, &rect),
                rect,
            }
        })
        .collect()
}

fn header_lines(created_on: Date) -> Vec<HeaderText> {
    let baseline = MARGIN - HEADER_OFFSET;
    vec![
        HeaderText {
            text: format!("Created: {created_on}"),
            x: MARGIN,
            baseline,
        },
        HeaderText {
            text: "Name: __________________________".to_string(),
            x: PAGE_WIDTH - MARGIN - NAME_FIELD_WIDTH,
            baseline,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;
    use crate::layout::metrics::text_width;

    fn deck(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card::new(format!("Term {i}"), format!("Definition {i}")))
            .collect()
    }

    fn date() -> Date {
        Date::from_ymd(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_cell_size() {
        assert!((CELL_WIDTH - 93.0).abs() < 1e-4);
        assert!((CELL_HEIGHT - 68.25).abs() < 1e-4);
    }

    #[test]
    fn test_page_pairs() {
        for n in 0..=25 {
            let layout = layout_deck(&deck(n), None, date());
            assert_eq!(layout.chunk_count(), n.div_ceil(8), "deck of {n}");
            assert_eq!(layout.pages.len(), 2 * n.div_ceil(8));
            for (i, pair) in layout.pages.chunks(2).enumerate() {
                assert_eq!(pair[0].side, Side::Front);
                assert_eq!(pair[1].side, Side::Back);
                assert_eq!(pair[0].chunk, i);
                assert_eq!(pair[1].chunk, i);
                assert_eq!(pair[0].cells.len(), pair[1].cells.len());
            }
        }
    }

    #[test]
    fn test_empty_deck_has_no_pages() {
        let layout = layout_deck(&[], Some("Nothing"), date());
        assert!(layout.pages.is_empty());
        assert_eq!(layout.file_name, "Nothing.pdf");
    }

    #[test]
    fn test_back_column_is_mirrored() {
        let layout = layout_deck(&deck(8), None, date());
        let (front, back) = (&layout.pages[0], &layout.pages[1]);
        for i in 0..8 {
            let f = &front.cells[i];
            let b = &back.cells[i];
            assert_eq!(f.card_index, b.card_index);
            assert_eq!(f.position, GridPosition { row: i / 2, col: i % 2 });
            assert_eq!(b.position, GridPosition { row: i / 2, col: 1 - i % 2 });
            assert_eq!(f.rect.y, b.rect.y);
        }
    }

    #[test]
    fn test_mirrored_cells_line_up_when_flipped() {
        // Flipping a sheet on its long edge maps x to PAGE_WIDTH - x.
        let layout = layout_deck(&deck(8), None, date());
        for (f, b) in layout.pages[0].cells.iter().zip(&layout.pages[1].cells) {
            let flipped_x = PAGE_WIDTH - (b.rect.x + b.rect.width);
            assert!((flipped_x - f.rect.x).abs() < 1e-3);
        }
    }

    #[test]
    fn test_single_card() -> Fallible<()> {
        let cards = vec![Card::new(
            "Mitochondria",
            "The organelle responsible for producing ATP through respiration.",
        )];
        let layout = layout_deck(&cards, Some("Cell Biology"), Date::from_ymd(2025, 1, 5)?);
        assert_eq!(layout.pages.len(), 2);
        let front = &layout.pages[0].cells[0];
        let back = &layout.pages[1].cells[0];
        assert_eq!(front.position, GridPosition { row: 0, col: 0 });
        assert_eq!(back.position, GridPosition { row: 0, col: 1 });
        assert_eq!(front.label, "TERM");
        assert_eq!(back.label, "DEFINITION");
        assert_eq!(front.text.lines, vec!["Mitochondria"]);
        assert_eq!(layout.file_name, "CellBiology.pdf");
        Ok(())
    }

    #[test]
    fn test_nine_cards() {
        let layout = layout_deck(&deck(9), None, date());
        assert_eq!(layout.pages.len(), 4);
        let front = &layout.pages[2];
        let back = &layout.pages[3];
        assert_eq!(front.cells.len(), 1);
        assert_eq!(back.cells.len(), 1);
        assert_eq!(front.cells[0].card_index, 8);
        assert_eq!(front.cells[0].position, GridPosition { row: 0, col: 0 });
        assert_eq!(back.cells[0].position, GridPosition { row: 0, col: 1 });
        assert_eq!(layout.file_name, "flashcards.pdf");
    }

    #[test]
    fn test_header_on_first_front_page_only() {
        let layout = layout_deck(&deck(17), None, date());
        assert_eq!(layout.pages[0].header.len(), 2);
        assert_eq!(layout.pages[0].header[0].text, "Created: 2025-03-14");
        assert!(layout.pages[0].header[1].text.starts_with("Name: "));
        assert!((layout.pages[0].header[1].x - 148.0).abs() < 1e-4);
        for page in &layout.pages[1..] {
            assert!(page.header.is_empty());
        }
    }

    #[test]
    fn test_long_definition_uses_smallest_tier() {
        let back = "x".repeat(250);
        let layout = layout_deck(&[Card::new("Term", back)], None, date());
        let cell = &layout.pages[1].cells[0];
        assert_eq!(cell.text.tier, TypeTier::Small);
        assert_eq!(cell.text.font_size, 8.0);
        let front = &layout.pages[0].cells[0];
        assert_eq!(front.text.tier, TypeTier::Large);
    }

    #[test]
    fn test_text_is_wrapped_to_cell() {
        let back = "Photosynthesis converts light energy into chemical energy stored in \
                    glucose, releasing oxygen as a by-product of splitting water.";
        let layout = layout_deck(&[Card::new("Photosynthesis", back)], None, date());
        let text = &layout.pages[1].cells[0].text;
        assert!(text.lines.len() > 1);
        for line in &text.lines {
            assert!(text_width(line, text.font_size) <= CELL_WIDTH - 10.0);
        }
    }

    #[test]
    fn test_text_is_vertically_centred() {
        let layout = layout_deck(&deck(1), None, date());
        let cell = &layout.pages[0].cells[0];
        // One 5 mm line in a 68.25 mm cell starting at the margin.
        let expected = MARGIN + CELL_HEIGHT / 2.0 - 2.5 + 2.0;
        assert!((cell.text.first_baseline - expected).abs() < 1e-4);
        assert!((cell.label_baseline - (MARGIN + 8.0)).abs() < 1e-4);
        assert!((cell.text.center_x - (MARGIN + CELL_WIDTH / 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_blank_card_still_gets_a_cell() {
        let layout = layout_deck(&[Card::new("", "")], None, date());
        assert_eq!(layout.pages[0].cells.len(), 1);
        assert_eq!(layout.pages[1].cells[0].text.lines, vec![""]);
    }

    #[test]
    fn test_idempotent() {
        let cards = deck(11);
        assert_eq!(
            layout_deck(&cards, Some("Same"), date()),
            layout_deck(&cards, Some("Same"), date())
        );
    }
}
