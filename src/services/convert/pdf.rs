use super::ConvertError;
use docx_rs::{Docx, Paragraph, Run};
use lopdf::{Document, Object, ObjectId, dictionary};
use pdfium_render::prelude::*;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Combine PDFs into one document, pages in input order. The standard
/// lopdf merge: renumber every source document into a shared id space,
/// collect pages, then rebuild a single catalog and page tree.
pub fn merge_pdfs(inputs: &[std::path::PathBuf], output: &Path) -> Result<(), ConvertError> {
    let mut max_id = 1;
    let mut documents_pages: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut documents_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for path in inputs {
        let mut doc = Document::load(path)?;
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for (_, object_id) in doc.get_pages() {
            let page = doc.get_object(object_id)?.to_owned();
            documents_pages.insert(object_id, page);
        }
        documents_objects.extend(doc.objects);
    }

    let mut document = Document::with_version("1.5");
    let mut catalog_object: Option<(ObjectId, Object)> = None;
    let mut pages_object: Option<(ObjectId, Object)> = None;

    for (object_id, object) in documents_objects {
        match object.type_name().unwrap_or(b"") {
            b"Catalog" => {
                let id = catalog_object.map(|(id, _)| id).unwrap_or(object_id);
                catalog_object = Some((id, object));
            }
            b"Pages" => {
                // Fold every source page tree into one dictionary.
                if let Ok(dict) = object.as_dict() {
                    let mut dict = dict.clone();
                    if let Some((_, ref existing)) = pages_object {
                        if let Ok(old) = existing.as_dict() {
                            dict.extend(old);
                        }
                    }
                    let id = pages_object.map(|(id, _)| id).unwrap_or(object_id);
                    pages_object = Some((id, Object::Dictionary(dict)));
                }
            }
            // Pages are re-inserted below with a fixed parent; outlines are dropped.
            b"Page" | b"Outlines" | b"Outline" => {}
            _ => {
                document.objects.insert(object_id, object);
            }
        }
    }

    let (pages_id, pages) =
        pages_object.ok_or_else(|| ConvertError::Invalid("no page tree found in inputs".to_string()))?;
    let (catalog_id, catalog) =
        catalog_object.ok_or_else(|| ConvertError::Invalid("no catalog found in inputs".to_string()))?;

    for (object_id, object) in &documents_pages {
        if let Ok(dict) = object.as_dict() {
            let mut dict = dict.clone();
            dict.set("Parent", pages_id);
            document.objects.insert(*object_id, Object::Dictionary(dict));
        }
    }

    let mut pages_dict = pages.as_dict()?.clone();
    pages_dict.set("Count", documents_pages.len() as i64);
    pages_dict.set(
        "Kids",
        documents_pages
            .keys()
            .map(|id| Object::Reference(*id))
            .collect::<Vec<Object>>(),
    );
    document.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let mut catalog_dict = catalog.as_dict()?.clone();
    catalog_dict.set("Pages", pages_id);
    catalog_dict.remove(b"Outlines");
    document.objects.insert(catalog_id, Object::Dictionary(catalog_dict));

    document.trailer.set("Root", catalog_id);
    document.max_id = document.objects.len() as u32;
    document.renumber_objects();
    document.compress();
    document.save(output)?;
    Ok(())
}

/// Write each selected page (1-based; `None` selects all) as its own
/// single-page PDF inside a ZIP archive at `output`.
pub fn split_pdf(input: &Path, pages: Option<&[u32]>, output: &Path) -> Result<(), ConvertError> {
    let doc = Document::load(input)?;
    let total = doc.get_pages().len() as u32;
    if total == 0 {
        return Err(ConvertError::Invalid("document has no pages".to_string()));
    }

    let wanted: Vec<u32> = match pages {
        Some(selected) => selected
            .iter()
            .copied()
            .filter(|n| (1..=total).contains(n))
            .collect(),
        None => (1..=total).collect(),
    };
    if wanted.is_empty() {
        return Err(ConvertError::Invalid("no pages selected".to_string()));
    }

    let file = std::fs::File::create(output)?;
    let mut archive = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();

    for page in &wanted {
        let mut single = doc.clone();
        let others: Vec<u32> = (1..=total).filter(|n| n != page).collect();
        single.delete_pages(&others);
        single.prune_objects();
        single.compress();

        let mut buf = Vec::new();
        single.save_to(&mut buf)?;

        archive.start_file(format!("page_{page}.pdf"), options)?;
        archive.write_all(&buf)?;
    }
    archive.finish()?;
    Ok(())
}

/// Re-save with lopdf stream compression applied.
pub fn compress_pdf(input: &Path, output: &Path) -> Result<(), ConvertError> {
    let mut doc = Document::load(input)?;
    doc.compress();
    doc.save(output)?;
    Ok(())
}

/// Add `rotation` degrees to every page's /Rotate entry.
pub fn rotate_pdf(input: &Path, output: &Path, rotation: i32) -> Result<(), ConvertError> {
    let mut doc = Document::load(input)?;
    for (_, page_id) in doc.get_pages() {
        let current = doc
            .get_dictionary(page_id)
            .ok()
            .and_then(|dict| dict.get(b"Rotate").and_then(Object::as_i64).ok())
            .unwrap_or(0);
        let page = doc.get_dictionary_mut(page_id)?;
        page.set("Rotate", (current + rotation as i64).rem_euclid(360));
    }
    doc.save(output)?;
    Ok(())
}

/// Rasterize the first page at 2x scale and save it as a JPEG.
pub fn pdf_to_image(
    input: &Path,
    output: &Path,
    library_path: Option<&Path>,
) -> Result<(), ConvertError> {
    let bindings = match library_path {
        Some(path) => Pdfium::bind_to_library(path),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| ConvertError::Render(e.to_string()))?;
    let pdfium = Pdfium::new(bindings);

    let doc = pdfium
        .load_pdf_from_file(input, None)
        .map_err(|e| ConvertError::Render(e.to_string()))?;
    let page = doc
        .pages()
        .get(0)
        .map_err(|e| ConvertError::Render(e.to_string()))?;

    let target_width = (page.width().value * 2.0).round().max(256.0) as i32;
    let render_config = PdfRenderConfig::new().set_target_width(target_width);

    let image = page
        .render_with_config(&render_config)
        .map_err(|e| ConvertError::Render(e.to_string()))?
        .as_image()
        .into_rgb8();
    image.save(output)?;
    Ok(())
}

/// Extract text and write it as a DOCX, one paragraph per line.
pub fn pdf_to_docx(input: &Path, output: &Path) -> Result<(), ConvertError> {
    let text =
        pdf_extract::extract_text(input).map_err(|e| ConvertError::PdfText(e.to_string()))?;

    let file = std::fs::File::create(output)?;
    let mut docx = Docx::new();
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }
    docx.build()
        .pack(file)
        .map_err(|e| ConvertError::Docx(e.to_string()))?;
    Ok(())
}
