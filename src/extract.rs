//! One-shot extraction entry points.
//!
//! Control flow is linear: ingest once, recognise once per page, flatten
//! once, return. There is no partial-failure handling — any decode or model
//! error aborts the run and nothing already extracted is salvaged.

use crate::config::ExtractionConfig;
use crate::error::{DecodeError, ExtractError};
use crate::model;
use crate::output::{Extraction, ExtractionStats, PageText};
use crate::pipeline::{decode, flatten, recognize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Extract text from an uploaded document.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `bytes`  — Raw document bytes (one PDF or one still image)
/// * `mime`   — Declared MIME type (`application/pdf`, `image/png`, …)
/// * `config` — Extraction configuration
///
/// # Errors
/// * [`DecodeError`] (via [`ExtractError::Decode`]) for bad or unsupported
///   input bytes
/// * [`ProcessingError`](crate::error::ProcessingError) (via
///   [`ExtractError::Processing`]) when the OCR model fails
pub async fn extract(
    bytes: Vec<u8>,
    mime: &str,
    config: &ExtractionConfig,
) -> Result<Extraction, ExtractError> {
    let total_start = Instant::now();
    info!("Starting extraction: {} ({} bytes)", mime, bytes.len());

    // ── Step 1: Ingest bytes into page images ────────────────────────────
    let decode_start = Instant::now();
    let images = decode::decode_document(bytes, mime, config).await?;
    let decode_duration_ms = decode_start.elapsed().as_millis() as u64;
    let page_count = images.len();
    info!("Ingested {} page image(s) in {}ms", page_count, decode_duration_ms);

    // ── Step 2: Resolve the OCR model ────────────────────────────────────
    let ocr_model = model::resolve_model(config)?;
    debug!("Using OCR model '{}'", ocr_model.name());

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(page_count);
    }

    // ── Step 3: Recognise every page, in order ───────────────────────────
    let ocr_start = Instant::now();
    let recognized = recognize::recognize_pages(ocr_model, images, config).await?;
    let ocr_duration_ms = ocr_start.elapsed().as_millis() as u64;

    // One page image in, one page result out.
    debug_assert_eq!(recognized.len(), page_count);

    // ── Step 4: Flatten hierarchies into per-page text ───────────────────
    let pages: Vec<PageText> = recognized
        .iter()
        .enumerate()
        .map(|(idx, page)| PageText {
            page_num: idx + 1,
            text: flatten::flatten_page(&page.layout),
            word_count: page.layout.word_count(),
            mean_confidence: page.layout.mean_confidence(),
            duration_ms: page.duration_ms,
        })
        .collect();

    // ── Step 5: Assemble the document string ─────────────────────────────
    let page_texts: Vec<String> = pages.iter().map(|p| p.text.clone()).collect();
    let text = flatten::join_pages(&page_texts);

    let word_count = pages.iter().map(|p| p.word_count).sum();
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(page_count, word_count);
    }

    let stats = ExtractionStats {
        page_count,
        word_count,
        decode_duration_ms,
        ocr_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {} pages, {} words, {}ms total",
        page_count, word_count, stats.total_duration_ms
    );

    Ok(Extraction { text, pages, stats })
}

/// Extract text from a document on disk, inferring the MIME type from the
/// file extension.
pub async fn extract_file(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<Extraction, ExtractError> {
    let path = path.as_ref();

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mime = decode::mime_for_extension(ext).ok_or_else(|| DecodeError::UnknownExtension {
        path: path.to_path_buf(),
    })?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|_| ExtractError::FileNotFound {
            path: path.to_path_buf(),
        })?;

    extract(bytes, mime, config).await
}

/// Extract text and write it directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn extract_to_file(
    bytes: Vec<u8>,
    mime: &str,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, ExtractError> {
    let output = extract(bytes, mime, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ExtractError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, &output.text)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| ExtractError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    bytes: Vec<u8>,
    mime: &str,
    config: &ExtractionConfig,
) -> Result<Extraction, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(extract(bytes, mime, config))
}
