use bs_core::{Error, Prescription, Result};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::layout::{self, Block, COLUMN_OFFSETS, TABLE_COLUMNS};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

const LINE_STEP: f32 = 6.0;
const HEADING_STEP: f32 = 9.0;
const SPACER_STEP: f32 = 4.0;

struct Cursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Cursor {
    /// Start a fresh page when the next block would cross the bottom margin.
    fn advance(&mut self, step: f32) {
        if self.y - step < MARGIN {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= step;
    }

    fn text(&mut self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn rule(&mut self, x1: f32, x2: f32) {
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(self.y)), false),
                (Point::new(Mm(x2), Mm(self.y)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
    }
}

/// Render a validated prescription into PDF bytes. The layout is a fixed
/// constant; only the input data varies.
pub fn render(prescription: &Prescription) -> Result<Vec<u8>> {
    let blocks = layout::layout(prescription);

    let (doc, page, layer) =
        PdfDocument::new("Medical Prescription", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "content");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(document_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(document_error)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut cursor = Cursor {
        doc,
        layer,
        regular,
        bold,
        y: PAGE_HEIGHT - MARGIN,
    };

    for block in &blocks {
        draw(&mut cursor, block);
    }

    cursor.doc.save_to_bytes().map_err(document_error)
}

fn draw(cursor: &mut Cursor, block: &Block) {
    match block {
        Block::Title(title) => {
            cursor.advance(HEADING_STEP + 3.0);
            cursor.text(title, TITLE_SIZE, MARGIN, true);
        }
        Block::Heading(heading) => {
            cursor.advance(HEADING_STEP);
            cursor.text(heading, HEADING_SIZE, MARGIN, true);
        }
        Block::Text(text) => {
            cursor.advance(LINE_STEP);
            cursor.text(text, BODY_SIZE, MARGIN, false);
        }
        Block::TableHeader => {
            cursor.advance(LINE_STEP);
            for (label, offset) in TABLE_COLUMNS.into_iter().zip(COLUMN_OFFSETS) {
                cursor.text(label, BODY_SIZE, MARGIN + offset, true);
            }
            cursor.advance(2.0);
            cursor.rule(MARGIN, PAGE_WIDTH - MARGIN);
        }
        Block::TableRow(cells) => {
            cursor.advance(LINE_STEP);
            for (cell, offset) in cells.iter().zip(COLUMN_OFFSETS) {
                cursor.text(cell, BODY_SIZE, MARGIN + offset, false);
            }
        }
        Block::Separator => {
            cursor.advance(SPACER_STEP);
            cursor.rule(MARGIN, PAGE_WIDTH - MARGIN);
        }
        Block::SignatureLine => {
            cursor.advance(HEADING_STEP + 6.0);
            cursor.rule(MARGIN, MARGIN + 70.0);
            cursor.advance(LINE_STEP);
            cursor.text("Physician's signature", BODY_SIZE, MARGIN, false);
        }
        Block::Spacer => {
            cursor.advance(SPACER_STEP);
        }
    }
}

fn document_error(e: printpdf::Error) -> Error {
    Error::Document(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bs_core::{MedicationEntry, PatientRecord, PhysicianRecord};
    use chrono::{TimeZone, Utc};

    fn sample() -> Prescription {
        Prescription {
            id: "RX-20260828120000".to_string(),
            issued_at: Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap(),
            patient: PatientRecord {
                name: "Jane Roe".to_string(),
                age: "42".to_string(),
                gender: "Female".to_string(),
                id: "P-1024".to_string(),
                allergies: "None".to_string(),
            },
            diagnosis: "Hairline fracture of the distal radius".to_string(),
            medications: vec![MedicationEntry {
                name: "Ibuprofen".to_string(),
                dosage: "400mg".to_string(),
                frequency: "Twice daily".to_string(),
                duration: "7 days".to_string(),
                instructions: "After meals".to_string(),
            }],
            instructions: "Keep the cast dry.".to_string(),
            physician: PhysicianRecord {
                name: "Dr. A. Mensah".to_string(),
                specialty: "Orthopedics".to_string(),
                license: "MD-88321".to_string(),
                contact: "+31 20 000 0000".to_string(),
            },
        }
    }

    #[test]
    fn render_emits_a_pdf_byte_stream() {
        let bytes = render(&sample()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn more_medications_produce_a_larger_document() {
        let one = render(&sample()).unwrap();
        let mut p = sample();
        p.medications.push(MedicationEntry {
            name: "Paracetamol".to_string(),
            dosage: "500mg".to_string(),
            ..Default::default()
        });
        let two = render(&p).unwrap();
        assert!(two.len() > one.len());
    }
}
