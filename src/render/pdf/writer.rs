//! Serializes a [`PdfPlan`] into PDF bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as PdfDocument, Object, Stream};

use super::layout::PdfPlan;
use crate::error::{DocError, Result};

const POINTS_PER_MM: f32 = 72.0 / 25.4;
const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Write `plan` as a PDF using the base-14 Helvetica fonts.
pub fn write(plan: &PdfPlan) -> Result<Vec<u8>> {
    let g = plan.geometry;
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(plan.pages.len());
    for page in &plan.pages {
        let mut operations = Vec::with_capacity(page.lines.len() * 5);
        for line in &page.lines {
            let font = if line.bold { BOLD_FONT } else { REGULAR_FONT };
            // PDF origin is bottom-left; the plan measures from the top
            let x = line.x * POINTS_PER_MM;
            let y = (g.height - line.y) * POINTS_PER_MM;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), real(line.font_size)]));
            operations.push(Operation::new("Td", vec![real(x), real(y)]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(win_ansi(&line.text))],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations }
            .encode()
            .map_err(|e| DocError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                real(0.0),
                real(0.0),
                real(g.width * POINTS_PER_MM),
                real(g.height * POINTS_PER_MM),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(win_ansi(&plan.title)),
        "Producer" => Object::string_literal("docwizard"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| DocError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Encode text for the WinAnsi font encoding. Characters it cannot
/// represent become `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '\t' => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '•' => 0x95,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_maps_latin1_and_punctuation() {
        assert_eq!(win_ansi("Café – “ok”"), b"Caf\xe9 \x96 \x93ok\x94".to_vec());
        assert_eq!(win_ansi("🎯 Goals"), b"? Goals".to_vec());
    }
}
