pub mod image;
pub mod ocr;
pub mod office;
pub mod pdf;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF text extraction failed: {0}")]
    PdfText(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("image error: {0}")]
    Image(#[from] ::image::ImageError),

    #[error("document archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Invalid(String),
}

/// US letter in PDF points.
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN_LEFT: f32 = 50.0;
const MARGIN_BOTTOM: f32 = 50.0;
const MAX_LINE_CHARS: usize = 100;

/// Line placement for the plain-text PDF writer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextLayout {
    pub font_size: i64,
    pub leading: f32,
    pub top_y: f32,
}

impl TextLayout {
    /// One paragraph per line, document-style spacing.
    pub(crate) fn document() -> Self {
        Self {
            font_size: 12,
            leading: 20.0,
            top_y: PAGE_HEIGHT - 50.0,
        }
    }

    /// Denser rows for spreadsheet dumps.
    pub(crate) fn spreadsheet() -> Self {
        Self {
            font_size: 12,
            leading: 15.0,
            top_y: 750.0,
        }
    }
}

/// Render lines of text into a paginated Helvetica PDF. Lines are clipped
/// to 100 characters; a new page starts when the cursor passes the bottom
/// margin. An input with no lines still yields a single blank page.
pub(crate) fn write_text_pdf<I>(lines: I, layout: TextLayout, output: &Path) -> Result<(), ConvertError>
where
    I: IntoIterator<Item = String>,
{
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    let mut ops: Vec<Operation> = Vec::new();
    let mut y = layout.top_y;

    let flush_page =
        |doc: &mut Document, ops: &mut Vec<Operation>, kids: &mut Vec<Object>| -> Result<(), ConvertError> {
            let content = Content {
                operations: std::mem::take(ops),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
            Ok(())
        };

    for line in lines {
        let text: String = line.chars().take(MAX_LINE_CHARS).collect();
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), layout.font_size.into()]));
        ops.push(Operation::new(
            "Td",
            vec![MARGIN_LEFT.into(), y.into()],
        ));
        ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        ops.push(Operation::new("ET", vec![]));

        y -= layout.leading;
        if y < MARGIN_BOTTOM {
            flush_page(&mut doc, &mut ops, &mut kids)?;
            y = layout.top_y;
        }
    }
    if !ops.is_empty() || kids.is_empty() {
        flush_page(&mut doc, &mut ops, &mut kids)?;
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_pdf_parses_and_paginates() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");

        // 40 lines at 20pt leading from y=742 crosses the bottom margin once.
        let lines = (0..40).map(|i| format!("line number {i}"));
        write_text_pdf(lines, TextLayout::document(), &out).unwrap();

        let doc = Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_empty_input_yields_blank_page() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("blank.pdf");
        write_text_pdf(std::iter::empty(), TextLayout::document(), &out).unwrap();

        let doc = Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_long_lines_are_clipped() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("clip.pdf");
        let long = "x".repeat(500);
        write_text_pdf(std::iter::once(long), TextLayout::spreadsheet(), &out).unwrap();
        assert!(out.exists());
    }
}
