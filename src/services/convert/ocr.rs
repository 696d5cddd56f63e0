use super::ConvertError;
use image::ImageFormat;
use leptess::LepTess;
use std::path::Path;

/// Extract text from an image with Tesseract. The source is converted to
/// grayscale first (written to `work`, which the caller owns and cleans
/// up), since recognition on photos degrades badly on raw color input.
pub fn image_to_text(
    input: &Path,
    work: &Path,
    tessdata_dir: Option<&Path>,
) -> Result<String, ConvertError> {
    prepare_grayscale(input, work)?;

    let datapath = tessdata_dir.map(|p| p.to_string_lossy().into_owned());
    let mut tess = LepTess::new(datapath.as_deref(), "eng")
        .map_err(|e| ConvertError::Ocr(e.to_string()))?;
    tess.set_image(work)
        .map_err(|e| ConvertError::Ocr(e.to_string()))?;
    tess.get_utf8_text()
        .map_err(|e| ConvertError::Ocr(e.to_string()))
}

fn prepare_grayscale(input: &Path, work: &Path) -> Result<(), ConvertError> {
    let gray = image::open(input)?.to_luma8();
    gray.save_with_format(work, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_preprocessing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("color.png");
        let work = dir.path().join("gray.png");

        let img = image::RgbImage::from_fn(16, 16, |x, _| image::Rgb([(x * 16) as u8, 0, 255]));
        img.save(&input).unwrap();

        prepare_grayscale(&input, &work).unwrap();

        let gray = image::open(&work).unwrap();
        assert!(matches!(gray.color(), image::ColorType::L8));
        assert_eq!(gray.width(), 16);
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = prepare_grayscale(&dir.path().join("absent.png"), &dir.path().join("g.png"));
        assert!(result.is_err());
    }
}
