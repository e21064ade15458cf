//! Output types for a completed extraction run.

use serde::{Deserialize, Serialize};

/// Default file name for the extracted text.
pub const DEFAULT_OUTPUT_FILENAME: &str = "texto_extraido.txt";

/// The complete result of one extraction run.
///
/// `text` is the final artifact: page texts joined with a blank line. The
/// per-page entries are kept alongside for callers that want page-level
/// statistics or their own assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// The whole document as one newline-joined string.
    pub text: String,
    /// Per-page results, in page order. Always one entry per ingested page
    /// image.
    pub pages: Vec<PageText>,
    /// Run-level statistics.
    pub stats: ExtractionStats,
}

/// Extracted text and statistics for a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Flattened page text; empty for a page with no recognised words.
    pub text: String,
    /// Number of recognised words on the page.
    pub word_count: usize,
    /// Mean word confidence in `[0.0, 1.0]`, `None` for an empty page.
    pub mean_confidence: Option<f32>,
    /// Wall-clock model time for this page.
    pub duration_ms: u64,
}

/// Aggregate statistics for an extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of page images ingested (and of entries in `pages`).
    pub page_count: usize,
    /// Total recognised words across the document.
    pub word_count: usize,
    /// Time spent decoding/rasterising the input.
    pub decode_duration_ms: u64,
    /// Time spent inside the OCR model.
    pub ocr_duration_ms: u64,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}
