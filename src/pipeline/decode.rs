//! Ingestion: raw bytes + declared MIME type → ordered page images.
//!
//! The MIME type is declared by the uploader, not sniffed. PDFs still get a
//! magic-byte check (`%PDF`) before the bytes ever reach pdfium, so a
//! mislabelled upload produces a meaningful [`DecodeError`] instead of a
//! backend crash. Still images decode to a single-element sequence; the
//! one-image-per-page invariant starts here.

use crate::config::ExtractionConfig;
use crate::error::DecodeError;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

/// MIME type of a PDF document.
pub const MIME_PDF: &str = "application/pdf";

/// Image MIME types the pipeline accepts, with their decode formats.
const IMAGE_FORMATS: &[(&str, ImageFormat)] = &[
    ("image/png", ImageFormat::Png),
    ("image/jpeg", ImageFormat::Jpeg),
    ("image/jpg", ImageFormat::Jpeg),
    ("image/tiff", ImageFormat::Tiff),
    ("image/bmp", ImageFormat::Bmp),
];

/// Decode an uploaded document into an ordered sequence of page images.
///
/// PDFs are rasterised one image per page (page order preserved); any other
/// supported MIME type decodes as a single still image.
pub async fn decode_document(
    bytes: Vec<u8>,
    mime: &str,
    config: &ExtractionConfig,
) -> Result<Vec<DynamicImage>, DecodeError> {
    if mime.eq_ignore_ascii_case(MIME_PDF) {
        check_pdf_magic(&bytes)?;
        return super::render::render_pdf(bytes, config).await;
    }

    let format = image_format_for(mime).ok_or_else(|| DecodeError::UnsupportedMime {
        mime: mime.to_string(),
    })?;

    let image = image::load_from_memory_with_format(&bytes, format)?;
    debug!(
        "Decoded {} image → {}x{} px",
        mime,
        image.width(),
        image.height()
    );
    Ok(vec![image])
}

/// Map a declared image MIME type to its decode format.
pub fn image_format_for(mime: &str) -> Option<ImageFormat> {
    IMAGE_FORMATS
        .iter()
        .find(|(m, _)| mime.eq_ignore_ascii_case(m))
        .map(|(_, f)| *f)
}

/// Infer a MIME type from a file extension (CLI front door).
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some(MIME_PDF),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "tif" | "tiff" => Some("image/tiff"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Reject bytes that do not start with the `%PDF` magic.
fn check_pdf_magic(bytes: &[u8]) -> Result<(), DecodeError> {
    let mut magic = [0u8; 4];
    let head = bytes.get(..4).ok_or(DecodeError::NotAPdf { magic })?;
    magic.copy_from_slice(head);
    if &magic != b"%PDF" {
        return Err(DecodeError::NotAPdf { magic });
    }
    Ok(())
}
