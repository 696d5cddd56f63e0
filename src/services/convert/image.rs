use super::ConvertError;
use image::{DynamicImage, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::io::Cursor;
use std::path::Path;

/// Placement resolution for embedded images, pixels per inch.
const IMAGE_DPI: f32 = 100.0;

/// Embed an image as a single-page PDF. The picture is flattened to RGB,
/// re-encoded as JPEG and stored as a DCTDecode XObject on a page sized
/// to the image.
pub fn image_to_pdf(input: &Path, output: &Path) -> Result<(), ConvertError> {
    let rgb = image::open(input)?.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));
    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! { "Im0" => image_id },
    });

    let page_width = width as f32 * 72.0 / IMAGE_DPI;
    let page_height = height as f32 * 72.0 / IMAGE_DPI;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page_width.into(),
                    0_i64.into(),
                    0_i64.into(),
                    page_height.into(),
                    0_i64.into(),
                    0_i64.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0_i64.into(), 0_i64.into(), page_width.into(), page_height.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(output)?;
    Ok(())
}

/// Re-encode an image into the requested format. RGBA sources are
/// flattened to RGB for JPEG, which has no alpha channel.
pub fn convert_image(input: &Path, output: &Path, output_format: &str) -> Result<(), ConvertError> {
    let target = image_format(output_format)?;
    let img = image::open(input)?;
    let img = match target {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };
    img.save_with_format(output, target)?;
    Ok(())
}

pub fn image_format(name: &str) -> Result<ImageFormat, ConvertError> {
    match name.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "png" => Ok(ImageFormat::Png),
        "webp" => Ok(ImageFormat::WebP),
        "bmp" => Ok(ImageFormat::Bmp),
        other => Err(ConvertError::UnsupportedFormat(other.to_string())),
    }
}

pub fn media_type(output_format: &str) -> &'static str {
    match output_format.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "image/jpeg",
    }
}
