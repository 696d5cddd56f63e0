use super::{ConvertError, TextLayout, write_text_pdf};
use calamine::{Reader, open_workbook_auto};
use quick_xml::events::Event;
use quick_xml::reader::Reader as XmlReader;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Render the paragraph text of a DOCX as a plain-text PDF.
pub fn docx_to_pdf(input: &Path, output: &Path) -> Result<(), ConvertError> {
    let paragraphs = docx_paragraphs(input)?;
    write_text_pdf(
        paragraphs
            .into_iter()
            .filter(|p| !p.trim().is_empty()),
        TextLayout::document(),
        output,
    )
}

/// Render the first worksheet of an Excel workbook as a plain-text PDF,
/// one row per line with cells joined by " | ".
pub fn xlsx_to_pdf(input: &Path, output: &Path) -> Result<(), ConvertError> {
    let mut workbook =
        open_workbook_auto(input).map_err(|e| ConvertError::Spreadsheet(e.to_string()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ConvertError::Invalid("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ConvertError::Spreadsheet(e.to_string()))?;

    let lines: Vec<String> = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| cell.to_string())
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect();

    write_text_pdf(lines, TextLayout::spreadsheet(), output)
}

/// Paragraph text from a DOCX main document part. DOCX is a ZIP archive;
/// the text lives in `word/document.xml` as `w:t` runs grouped under
/// `w:p` paragraphs (docx-rs is writer-only, so this reads the XML
/// directly).
pub(crate) fn docx_paragraphs(input: &Path) -> Result<Vec<String>, ConvertError> {
    let file = std::fs::File::open(input)?;
    let mut archive = ZipArchive::new(file)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ConvertError::Docx(e.to_string()))?
        .read_to_string(&mut xml)?;

    let mut reader = XmlReader::from_str(&xml);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => current.clear(),
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                current.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ConvertError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use lopdf::Document;

    fn sample_docx(dir: &Path, paragraphs: &[&str]) -> std::path::PathBuf {
        let path = dir.join("sample.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        docx.build().pack(file).unwrap();
        path
    }

    #[test]
    fn test_docx_paragraph_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_docx(dir.path(), &["First paragraph", "Second paragraph"]);

        let paragraphs = docx_paragraphs(&path).unwrap();
        assert!(paragraphs.contains(&"First paragraph".to_string()));
        assert!(paragraphs.contains(&"Second paragraph".to_string()));
    }

    #[test]
    fn test_docx_to_pdf_produces_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_docx(dir.path(), &["Hello", "", "World"]);
        let out = dir.path().join("out.pdf");

        docx_to_pdf(&path, &out).unwrap();

        let doc = Document::load(&out).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_non_docx_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a.docx");
        std::fs::write(&path, b"plain bytes, not a zip").unwrap();
        assert!(docx_paragraphs(&path).is_err());
    }

    #[test]
    fn test_xlsx_missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        assert!(xlsx_to_pdf(&dir.path().join("absent.xlsx"), &out).is_err());
    }
}
