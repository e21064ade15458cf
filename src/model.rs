//! The seam between the pipeline and the external pretrained OCR model.
//!
//! Detection and recognition are not implemented here — the pipeline only
//! marshals page images into an [`OcrModel`] and walks the hierarchical
//! result it returns. The model is constructed once (by the caller or by
//! [`resolve_model`]), is stateless across calls, and is shared as an
//! `Arc<dyn OcrModel>` so sequential page invocations reuse the same loaded
//! weights.
//!
//! ## Resolution order
//!
//! 1. **Injected model** (`config.model`) — the caller constructed and owns
//!    the model entirely. Useful in tests or when the host application has
//!    already loaded one.
//! 2. **Built-in backend** — with the `tesseract` feature (default), a
//!    [`tesseract::TesseractModel`] is loaded from the config's variant,
//!    language, and model-data directory.
//!
//! Without the feature and without an injected model, resolution fails with
//! [`ProcessingError::NoModelAvailable`].

use crate::config::ExtractionConfig;
use crate::error::ProcessingError;
use crate::layout::PageLayout;
use image::DynamicImage;
use std::sync::Arc;

#[cfg(feature = "tesseract")]
pub mod tesseract;

/// Per-call options forwarded to the model unmodified.
///
/// These mirror the threshold and rotation fields of
/// [`ExtractionConfig`]; the pipeline applies no logic of its own to them.
#[derive(Debug, Clone, Copy)]
pub struct ModelOptions {
    /// Detection confidence threshold in `[0.1, 1.0]`.
    pub det_threshold: f32,
    /// Recognition confidence threshold in `[0.1, 1.0]`.
    pub rec_threshold: f32,
    /// Attempt page-orientation correction before recognition.
    pub rotate_pages: bool,
}

impl ModelOptions {
    pub(crate) fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            det_threshold: config.det_threshold,
            rec_threshold: config.rec_threshold,
            rotate_pages: config.rotate_pages,
        }
    }
}

/// A pretrained OCR model: one page image in, one [`PageLayout`] out.
///
/// Implementations must be `Send + Sync` (calls happen on a blocking worker
/// thread) and stateless across calls, so a single instance can serve
/// sequential invocations for every page of a document.
pub trait OcrModel: Send + Sync {
    /// Short identifier for logs and `Debug` output (e.g. `"tesseract"`).
    fn name(&self) -> &'static str;

    /// Run detection + recognition on one page image.
    ///
    /// Blocks the calling thread until the model returns. Any failure is
    /// terminal for the whole extraction run.
    fn analyze(
        &self,
        image: &DynamicImage,
        options: &ModelOptions,
    ) -> Result<PageLayout, ProcessingError>;
}

/// Resolve the OCR model for a run, from most-specific to least-specific.
pub fn resolve_model(config: &ExtractionConfig) -> Result<Arc<dyn OcrModel>, ProcessingError> {
    if let Some(ref model) = config.model {
        return Ok(Arc::clone(model));
    }

    #[cfg(feature = "tesseract")]
    {
        let model = tesseract::TesseractModel::load(
            config.variant,
            config.language.as_deref(),
            config.model_data_dir.as_deref(),
        )?;
        return Ok(Arc::new(model));
    }

    #[cfg(not(feature = "tesseract"))]
    Err(ProcessingError::NoModelAvailable)
}
