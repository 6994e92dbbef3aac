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

//! Render a [`PrintLayout`] to PDF with `lopdf`.

use lopdf::Document;
use lopdf::Object;
use lopdf::ObjectId;
use lopdf::Stream;
use lopdf::StringFormat;
use lopdf::content::Content;
use lopdf::content::Operation;
use lopdf::dictionary;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::layout::HEADER_FONT_SIZE;
use crate::layout::LABEL_FONT_SIZE;
use crate::layout::PAGE_HEIGHT;
use crate::layout::PAGE_WIDTH;
use crate::layout::PageLayout;
use crate::layout::PrintLayout;
use crate::layout::layout_deck;
use crate::layout::metrics::MM_PER_PT;
use crate::layout::metrics::text_width_pt;
use crate::types::card::Card;
use crate::types::date::Date;

/// The only message an export failure ever carries.
pub const EXPORT_FAILED: &str = "Export Failed";

const FONT_NAME: &str = "F1";
const BORDER_WIDTH: f32 = 0.1;
const BORDER_GRAY: f32 = 200.0 / 255.0;
const LABEL_GRAY: f32 = 150.0 / 255.0;

/// A finished PDF and the name it should be saved under.
#[derive(Debug)]
pub struct ExportedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Lay out and render a deck in one step.
pub fn export_pdf(
    cards: &[Card],
    title: Option<&str>,
    created_on: Date,
) -> Fallible<ExportedPdf> {
    if cards.is_empty() {
        log::warn!("Exporting an empty deck; the PDF will have no pages");
    }
    let layout = layout_deck(cards, title, created_on);
    let bytes = render_pdf(&layout)?;
    Ok(ExportedPdf {
        file_name: layout.file_name,
        bytes,
    })
}

/// Render a layout. Any failure is reported as [`EXPORT_FAILED`].
pub fn render_pdf(layout: &PrintLayout) -> Fallible<Vec<u8>> {
    build_document(layout).map_err(|e| {
        log::error!("PDF generation failed: {e}");
        ErrorReport::new(EXPORT_FAILED)
    })
}

fn build_document(layout: &PrintLayout) -> Fallible<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_NAME => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = Content {
            operations: page_operations(page),
        };
        let encoded = content
            .encode()
            .map_err(|e| ErrorReport::new(format!("failed to encode page content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            real(mm_to_pt(PAGE_WIDTH)),
            real(mm_to_pt(PAGE_HEIGHT)),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id: ObjectId = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ErrorReport::new(format!("failed to write PDF: {e}")))?;
    Ok(bytes)
}

fn page_operations(page: &PageLayout) -> Vec<Operation> {
    let mut ops = Vec::new();

    for line in &page.header {
        push_text(
            &mut ops,
            &line.text,
            HEADER_FONT_SIZE,
            LABEL_GRAY,
            (line.x, line.baseline),
            Align::Left,
        );
    }

    ops.push(Operation::new("w", vec![real(mm_to_pt(BORDER_WIDTH))]));
    ops.push(Operation::new("G", vec![real(BORDER_GRAY)]));
    for cell in &page.cells {
        let r = &cell.rect;
        ops.push(Operation::new(
            "re",
            vec![
                real(mm_to_pt(r.x)),
                real(y_to_pt(r.y + r.height)),
                real(mm_to_pt(r.width)),
                real(mm_to_pt(r.height)),
            ],
        ));
        ops.push(Operation::new("S", vec![]));
    }

    for cell in &page.cells {
        let center = cell.rect.center_x();
        push_text(
            &mut ops,
            cell.label,
            LABEL_FONT_SIZE,
            LABEL_GRAY,
            (center, cell.label_baseline),
            Align::Center,
        );
        for (baseline, line) in cell.text.baselines() {
            if line.is_empty() {
                continue;
            }
            push_text(
                &mut ops,
                line,
                cell.text.font_size,
                0.0,
                (cell.text.center_x, baseline),
                Align::Center,
            );
        }
    }

    ops
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
}

/// Set one line of text with its baseline at `(x, baseline)` in layout
/// coordinates.
fn push_text(
    ops: &mut Vec<Operation>,
    text: &str,
    size: f32,
    gray: f32,
    (x, baseline): (f32, f32),
    align: Align,
) {
    let x_pt = match align {
        Align::Left => mm_to_pt(x),
        Align::Center => mm_to_pt(x) - text_width_pt(text, size) / 2.0,
    };
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(FONT_NAME.as_bytes().to_vec()), real(size)],
    ));
    ops.push(Operation::new("g", vec![real(gray)]));
    ops.push(Operation::new(
        "Td",
        vec![real(x_pt), real(y_to_pt(baseline))],
    ));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

/// Layout y grows downwards from the top; PDF y grows upwards from the bottom.
fn y_to_pt(y: f32) -> f32 {
    mm_to_pt(PAGE_HEIGHT - y)
}

/// Encode text for the standard fonts' WinAnsi encoding. Characters it
/// cannot represent become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' => b' ',
            c if (c as u32) < 0x80 || ((c as u32) >= 0xA0 && (c as u32) <= 0xFF) => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> Date {
        Date::from_ymd(2025, 6, 1).unwrap()
    }

    fn page_count(bytes: &[u8]) -> usize {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages().len()
    }

    #[test]
    fn test_single_card_pdf() -> Fallible<()> {
        let cards = vec![Card::new(
            "Mitochondria",
            "The organelle responsible for producing ATP through respiration.",
        )];
        let pdf = export_pdf(&cards, Some("Cell Biology"), date())?;
        assert!(pdf.bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(page_count(&pdf.bytes), 2);
        assert_eq!(pdf.file_name, "CellBiology.pdf");
        Ok(())
    }

    #[test]
    fn test_nine_cards_pdf() -> Fallible<()> {
        let cards: Vec<Card> = (0..9)
            .map(|i| Card::new(format!("T{i}"), format!("D{i}")))
            .collect();
        let pdf = export_pdf(&cards, None, date())?;
        assert_eq!(page_count(&pdf.bytes), 4);
        assert_eq!(pdf.file_name, "flashcards.pdf");
        Ok(())
    }

    #[test]
    fn test_empty_deck_pdf_has_no_pages() -> Fallible<()> {
        let pdf = export_pdf(&[], None, date())?;
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert_eq!(page_count(&pdf.bytes), 0);
        Ok(())
    }

    #[test]
    fn test_page_operations() {
        let layout = layout_deck(&[Card::new("Osmosis", "Diffusion of water.")], None, date());
        let front = page_operations(&layout.pages[0]);
        let strings: Vec<Vec<u8>> = front
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match &op.operands[0] {
                Object::String(bytes, _) => Some(bytes.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            strings,
            vec![
                b"Created: 2025-06-01".to_vec(),
                b"Name: __________________________".to_vec(),
                b"TERM".to_vec(),
                b"Osmosis".to_vec(),
            ]
        );
        let rects = front.iter().filter(|op| op.operator == "re").count();
        assert_eq!(rects, 1);

        let back = page_operations(&layout.pages[1]);
        assert!(back.iter().any(|op| op.operator == "Tj"
            && matches!(&op.operands[0], Object::String(bytes, _) if bytes == b"DEFINITION")));
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi("café"), b"caf\xe9".to_vec());
        assert_eq!(win_ansi("\u{2019}ok\u{2014}"), b"\x92ok\x97".to_vec());
        assert_eq!(win_ansi("\u{03c0}"), b"?".to_vec());
    }

    #[test]
    fn test_unit_conversion() {
        assert!((mm_to_pt(210.0) - 595.2756).abs() < 1e-2);
        assert!((y_to_pt(0.0) - 841.8898).abs() < 1e-2);
    }
}
