//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread designed for blocking operations, preventing the Tokio worker
//! threads from stalling during CPU-heavy rendering.
//!
//! ## DPI to pixels
//!
//! PDF page geometry is in points (1/72 inch). The target pixel width for a
//! page is `width_pts × dpi / 72`, capped at `max_rendered_pixels` so an A0
//! poster cannot exhaust memory regardless of the configured DPI.

use crate::config::ExtractionConfig;
use crate::error::DecodeError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// Rasterise every page of a PDF into images, in page order.
///
/// This runs inside `spawn_blocking` since pdfium operations are CPU-bound.
pub async fn render_pdf(
    bytes: Vec<u8>,
    config: &ExtractionConfig,
) -> Result<Vec<DynamicImage>, DecodeError> {
    let dpi = config.dpi;
    let max_pixels = config.max_rendered_pixels;
    let password = config.password.clone();

    tokio::task::spawn_blocking(move || {
        render_pdf_blocking(&bytes, dpi, max_pixels, password.as_deref())
    })
    .await
    .map_err(|e| DecodeError::CorruptPdf {
        detail: format!("render task panicked: {e}"),
    })?
}

/// Bind to a pdfium library: an explicit `PDFIUM_DYNAMIC_LIB_PATH` wins,
/// then a copy next to the working directory, then the system installation.
fn bind_pdfium() -> Result<Pdfium, DecodeError> {
    let bindings = match std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        Ok(path) if !path.is_empty() => Pdfium::bind_to_library(&path),
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    };
    bindings
        .map(Pdfium::new)
        .map_err(|e| DecodeError::PdfiumBindingFailed(format!("{:?}", e)))
}

/// Blocking implementation of page rendering.
fn render_pdf_blocking(
    bytes: &[u8],
    dpi: u32,
    max_pixels: u32,
    password: Option<&str>,
) -> Result<Vec<DynamicImage>, DecodeError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, password)
        .map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    DecodeError::WrongPassword
                } else {
                    DecodeError::PasswordRequired
                }
            } else {
                DecodeError::CorruptPdf { detail: err_str }
            }
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    if total_pages == 0 {
        return Err(DecodeError::EmptyDocument);
    }
    info!("PDF loaded: {} pages", total_pages);

    let mut results = Vec::with_capacity(total_pages);

    for (idx, page) in pages.iter().enumerate() {
        // Points → pixels at the requested DPI, longest-edge capped.
        let target_width = ((page.width().value * dpi as f32) / 72.0) as i32;
        let target_width = target_width.clamp(1, max_pixels as i32);

        let render_config = PdfRenderConfig::new()
            .set_target_width(target_width)
            .set_maximum_height(max_pixels as i32);

        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| DecodeError::RasterisationFailed {
                    page: idx + 1,
                    detail: format!("{:?}", e),
                })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        results.push(image);
    }

    Ok(results)
}
