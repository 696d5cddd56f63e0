use crate::AppState;
use crate::api::error::AppError;
use crate::services::convert::{self, ConvertError};
use axum::{
    Json,
    body::Body,
    extract::{Multipart, State},
    http::header,
    response::Response,
};
use bytes::Bytes;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio_util::io::ReaderStream;
use utoipa::ToSchema;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const ZIP_MIME: &str = "application/zip";

pub struct UploadedFile {
    pub bytes: Bytes,
    pub filename: String,
}

#[derive(Default)]
pub struct ConvertForm {
    pub files: Vec<UploadedFile>,
    pub fields: HashMap<String, String>,
}

/// Collect every part of a conversion request: one or more `file`/`files`
/// parts plus any extra text fields (rotation, output_format, pages).
async fn read_form(mut multipart: Multipart) -> Result<ConvertForm, AppError> {
    let mut form = ConvertForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" || name == "files" {
            let filename = field.file_name().unwrap_or("unnamed").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.files.push(UploadedFile { bytes, filename });
        } else {
            let text = field.text().await.unwrap_or_default();
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

fn single_file(form: ConvertForm) -> Result<(UploadedFile, HashMap<String, String>), AppError> {
    let mut files = form.files;
    let file = if files.is_empty() {
        return Err(AppError::BadRequest("No file provided".to_string()));
    } else {
        files.remove(0)
    };
    Ok((file, form.fields))
}

fn stem_of(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "converted".to_string())
}

/// Stream a conversion output back to the client. The file stays on disk
/// until its scheduled deletion fires, so the stream can outlive this
/// handler safely.
async fn file_response(
    path: &Path,
    content_type: &str,
    download_name: &str,
) -> Result<Response, AppError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| AppError::Internal(format!("cannot open conversion output: {e}")))?;
    let encoded = utf8_percent_encode(download_name, NON_ALPHANUMERIC).to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{encoded}\""),
        )
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Converters are synchronous library calls; keep them off the async
/// worker threads.
async fn run_blocking<F>(convert: F) -> Result<(), AppError>
where
    F: FnOnce() -> Result<(), ConvertError> + Send + 'static,
{
    tokio::task::spawn_blocking(convert)
        .await
        .map_err(|e| AppError::Internal(format!("conversion task failed: {e}")))?
        .map_err(AppError::from)
}

#[utoipa::path(
    post,
    path = "/api/convert/pdf-to-word",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "DOCX stream", content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        (status = 400, description = "No file provided"),
        (status = 500, description = "Conversion failed")
    )
)]
pub async fn pdf_to_word(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (upload, _) = single_file(read_form(multipart).await?)?;
    let input = state.store.store(&upload.bytes, &upload.filename).await?;
    let output = input.with_extension("docx");

    let (in_path, out_path) = (input.path.clone(), output.clone());
    run_blocking(move || convert::pdf::pdf_to_docx(&in_path, &out_path)).await?;

    let response = file_response(
        &output,
        DOCX_MIME,
        &format!("{}.docx", stem_of(&upload.filename)),
    )
    .await?;
    state.tracker.schedule_removal(vec![input.path, output]);
    Ok(response)
}

#[utoipa::path(
    post,
    path = "/api/convert/word-to-pdf",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "PDF stream", content_type = "application/pdf"),
        (status = 400, description = "No file provided"),
        (status = 500, description = "Conversion failed")
    )
)]
pub async fn word_to_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (upload, _) = single_file(read_form(multipart).await?)?;
    let input = state.store.store(&upload.bytes, &upload.filename).await?;
    let output = input.with_extension("pdf");

    let (in_path, out_path) = (input.path.clone(), output.clone());
    run_blocking(move || convert::office::docx_to_pdf(&in_path, &out_path)).await?;

    let response = file_response(
        &output,
        mime::APPLICATION_PDF.as_ref(),
        &format!("{}.pdf", stem_of(&upload.filename)),
    )
    .await?;
    state.tracker.schedule_removal(vec![input.path, output]);
    Ok(response)
}

#[utoipa::path(
    post,
    path = "/api/convert/image-to-pdf",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "PDF stream", content_type = "application/pdf"),
        (status = 400, description = "No file provided"),
        (status = 500, description = "Conversion failed")
    )
)]
pub async fn image_to_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (upload, _) = single_file(read_form(multipart).await?)?;
    let input = state.store.store(&upload.bytes, &upload.filename).await?;
    let output = input.with_extension("pdf");

    let (in_path, out_path) = (input.path.clone(), output.clone());
    run_blocking(move || convert::image::image_to_pdf(&in_path, &out_path)).await?;

    let response = file_response(
        &output,
        mime::APPLICATION_PDF.as_ref(),
        &format!("{}.pdf", stem_of(&upload.filename)),
    )
    .await?;
    state.tracker.schedule_removal(vec![input.path, output]);
    Ok(response)
}

#[utoipa::path(
    post,
    path = "/api/convert/pdf-to-image",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "JPEG of the first page", content_type = "image/jpeg"),
        (status = 400, description = "No file provided"),
        (status = 500, description = "Conversion failed")
    )
)]
pub async fn pdf_to_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (upload, _) = single_file(read_form(multipart).await?)?;
    let input = state.store.store(&upload.bytes, &upload.filename).await?;
    let output = input.with_extension("jpg");

    let (in_path, out_path) = (input.path.clone(), output.clone());
    let library_path = state.config.pdfium_library_path.clone();
    run_blocking(move || {
        convert::pdf::pdf_to_image(&in_path, &out_path, library_path.as_deref())
    })
    .await?;

    let response = file_response(
        &output,
        mime::IMAGE_JPEG.as_ref(),
        &format!("{}.jpg", stem_of(&upload.filename)),
    )
    .await?;
    state.tracker.schedule_removal(vec![input.path, output]);
    Ok(response)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OcrResponse {
    pub text: String,
    pub success: bool,
}

#[utoipa::path(
    post,
    path = "/api/convert/image-to-text",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extracted text", body = OcrResponse),
        (status = 400, description = "No file provided"),
        (status = 500, description = "OCR failed")
    )
)]
pub async fn image_to_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OcrResponse>, AppError> {
    let (upload, _) = single_file(read_form(multipart).await?)?;
    let input = state.store.store(&upload.bytes, &upload.filename).await?;
    let work = state.store.allocate(".png");

    let (in_path, work_path) = (input.path.clone(), work.path.clone());
    let tessdata = state.config.tessdata_dir.clone();
    let text = tokio::task::spawn_blocking(move || {
        convert::ocr::image_to_text(&in_path, &work_path, tessdata.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(format!("conversion task failed: {e}")))?;

    // The grayscale intermediate exists even when recognition fails.
    state.tracker.schedule_removal(vec![input.path, work.path]);
    let text = text?;
    Ok(Json(OcrResponse {
        text,
        success: true,
    }))
}

#[utoipa::path(
    post,
    path = "/api/convert/merge-pdf",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Merged PDF stream", content_type = "application/pdf"),
        (status = 400, description = "No files provided"),
        (status = 500, description = "Merge failed")
    )
)]
pub async fn merge_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_form(multipart).await?;
    if form.files.is_empty() {
        return Err(AppError::BadRequest("No files provided".to_string()));
    }

    let mut inputs = Vec::with_capacity(form.files.len());
    for upload in &form.files {
        inputs.push(state.store.store(&upload.bytes, &upload.filename).await?);
    }
    let output = state.store.allocate("_merged.pdf");

    let in_paths: Vec<PathBuf> = inputs.iter().map(|f| f.path.clone()).collect();
    let out_path = output.path.clone();
    run_blocking(move || convert::pdf::merge_pdfs(&in_paths, &out_path)).await?;

    let response = file_response(&output.path, mime::APPLICATION_PDF.as_ref(), "merged.pdf").await?;
    let mut cleanup: Vec<PathBuf> = inputs.into_iter().map(|f| f.path).collect();
    cleanup.push(output.path);
    state.tracker.schedule_removal(cleanup);
    Ok(response)
}

#[utoipa::path(
    post,
    path = "/api/convert/split-pdf",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "ZIP of single-page PDFs", content_type = "application/zip"),
        (status = 400, description = "No file provided or invalid page list"),
        (status = 500, description = "Split failed")
    )
)]
pub async fn split_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (upload, fields) = single_file(read_form(multipart).await?)?;
    let pages = parse_page_list(fields.get("pages").map(String::as_str))?;

    let input = state.store.store(&upload.bytes, &upload.filename).await?;
    let output = input.with_extension("zip");

    let (in_path, out_path) = (input.path.clone(), output.clone());
    run_blocking(move || convert::pdf::split_pdf(&in_path, pages.as_deref(), &out_path)).await?;

    let response = file_response(
        &output,
        ZIP_MIME,
        &format!("{}_pages.zip", stem_of(&upload.filename)),
    )
    .await?;
    state.tracker.schedule_removal(vec![input.path, output]);
    Ok(response)
}

fn parse_page_list(raw: Option<&str>) -> Result<Option<Vec<u32>>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| AppError::BadRequest(format!("invalid page number: {part}")))
        })
        .collect::<Result<Vec<u32>, _>>()
        .map(Some)
}

#[utoipa::path(
    post,
    path = "/api/convert/compress-pdf",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Compressed PDF stream", content_type = "application/pdf"),
        (status = 400, description = "No file provided"),
        (status = 500, description = "Compression failed")
    )
)]
pub async fn compress_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (upload, _) = single_file(read_form(multipart).await?)?;
    let input = state.store.store(&upload.bytes, &upload.filename).await?;
    let output = input.with_suffix("_compressed.pdf");

    let (in_path, out_path) = (input.path.clone(), output.clone());
    run_blocking(move || convert::pdf::compress_pdf(&in_path, &out_path)).await?;

    let response = file_response(
        &output,
        mime::APPLICATION_PDF.as_ref(),
        &format!("{}_compressed.pdf", stem_of(&upload.filename)),
    )
    .await?;
    state.tracker.schedule_removal(vec![input.path, output]);
    Ok(response)
}

#[utoipa::path(
    post,
    path = "/api/convert/rotate-pdf",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Rotated PDF stream", content_type = "application/pdf"),
        (status = 400, description = "No file provided or invalid rotation"),
        (status = 500, description = "Rotation failed")
    )
)]
pub async fn rotate_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (upload, fields) = single_file(read_form(multipart).await?)?;
    let rotation: i32 = match fields.get("rotation") {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid rotation: {raw}")))?,
        None => 90,
    };
    // PDF viewers only honor quarter turns.
    if rotation % 90 != 0 {
        return Err(AppError::BadRequest(
            "rotation must be a multiple of 90".to_string(),
        ));
    }

    let input = state.store.store(&upload.bytes, &upload.filename).await?;
    let output = input.with_suffix("_rotated.pdf");

    let (in_path, out_path) = (input.path.clone(), output.clone());
    run_blocking(move || convert::pdf::rotate_pdf(&in_path, &out_path, rotation)).await?;

    let response = file_response(
        &output,
        mime::APPLICATION_PDF.as_ref(),
        &format!("{}_rotated.pdf", stem_of(&upload.filename)),
    )
    .await?;
    state.tracker.schedule_removal(vec![input.path, output]);
    Ok(response)
}

#[utoipa::path(
    post,
    path = "/api/convert/excel-to-pdf",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "PDF stream", content_type = "application/pdf"),
        (status = 400, description = "No file provided"),
        (status = 500, description = "Conversion failed")
    )
)]
pub async fn excel_to_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (upload, _) = single_file(read_form(multipart).await?)?;
    let input = state.store.store(&upload.bytes, &upload.filename).await?;
    let output = input.with_extension("pdf");

    let (in_path, out_path) = (input.path.clone(), output.clone());
    run_blocking(move || convert::office::xlsx_to_pdf(&in_path, &out_path)).await?;

    let response = file_response(
        &output,
        mime::APPLICATION_PDF.as_ref(),
        &format!("{}.pdf", stem_of(&upload.filename)),
    )
    .await?;
    state.tracker.schedule_removal(vec![input.path, output]);
    Ok(response)
}

#[utoipa::path(
    post,
    path = "/api/convert/image-format",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Converted image stream"),
        (status = 400, description = "No file or unsupported output_format"),
        (status = 500, description = "Conversion failed")
    )
)]
pub async fn image_format(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (upload, fields) = single_file(read_form(multipart).await?)?;
    let output_format = fields
        .get("output_format")
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("output_format is required".to_string()))?;
    convert::image::image_format(&output_format).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let input = state.store.store(&upload.bytes, &upload.filename).await?;
    let output = input.with_extension(&output_format);

    let (in_path, out_path) = (input.path.clone(), output.clone());
    let format = output_format.clone();
    run_blocking(move || convert::image::convert_image(&in_path, &out_path, &format)).await?;

    let response = file_response(
        &output,
        convert::image::media_type(&output_format),
        &format!("{}.{}", stem_of(&upload.filename), output_format),
    )
    .await?;
    state.tracker.schedule_removal(vec![input.path, output]);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_of() {
        assert_eq!(stem_of("report.pdf"), "report");
        assert_eq!(stem_of("archive.tar.gz"), "archive.tar");
        assert_eq!(stem_of(""), "converted");
    }

    #[test]
    fn test_parse_page_list() {
        assert_eq!(parse_page_list(None).unwrap(), None);
        assert_eq!(parse_page_list(Some("")).unwrap(), None);
        assert_eq!(
            parse_page_list(Some("1, 3,5")).unwrap(),
            Some(vec![1, 3, 5])
        );
        assert!(parse_page_list(Some("1,two")).is_err());
    }
}
