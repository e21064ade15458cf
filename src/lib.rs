//! # doc2text
//!
//! Extract plain text from PDF documents and still images using a pretrained
//! OCR model.
//!
//! ## What this crate does (and doesn't)
//!
//! There is no OCR engine here. Detection and recognition are delegated to
//! an external pretrained model behind the [`OcrModel`] trait — the tesseract
//! backend by default, or anything the caller injects. The crate's own job is
//! the glue around that model: turning uploaded bytes into page images,
//! driving one inference call per page, and flattening the model's
//! hierarchical result (page → block → line → word) into a single string.
//!
//! ## Pipeline Overview
//!
//! ```text
//! bytes + MIME
//!  │
//!  ├─ 1. Decode     PDF → rasterise each page via pdfium (CPU-bound,
//!  │                spawn_blocking); image → decode directly
//!  ├─ 2. Recognise  one OCR call per page image, in order, abort on error
//!  ├─ 3. Flatten    blocks → lines → words joined into per-page text
//!  └─ 4. Output     pages joined with a blank line + per-page stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2text::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("scan.pdf")?;
//!     let config = ExtractionConfig::default();
//!     let output = extract(bytes, "application/pdf", &config).await?;
//!     println!("{}", output.text);
//!     eprintln!("{} pages, {} words", output.stats.page_count, output.stats.word_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature     | Default | Description |
//! |-------------|---------|-------------|
//! | `cli`       | on      | Enables the `doc2text` binary (clap + anyhow + tracing-subscriber) |
//! | `tesseract` | on      | Built-in OCR backend via the tesseract engine |
//!
//! Disable both when embedding the pipeline with your own model:
//! ```toml
//! doc2text = { version = "0.3", default-features = false }
//! ```
//!
//! ## Error model
//!
//! Every failure aborts the run: bad input bytes surface as
//! [`DecodeError`], model failures as [`ProcessingError`], both wrapped in
//! [`ExtractError`]. Nothing is retried and nothing partially extracted is
//! returned.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod layout;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, ModelVariant};
pub use error::{DecodeError, ExtractError, ProcessingError};
pub use extract::{extract, extract_file, extract_sync, extract_to_file};
pub use layout::{PageLayout, TextBlock, TextLine, Word};
pub use model::{ModelOptions, OcrModel};
pub use output::{Extraction, ExtractionStats, PageText, DEFAULT_OUTPUT_FILENAME};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
