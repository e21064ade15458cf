//! Configuration types for OCR text extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! Threshold fields are validated at `build()` time: an out-of-range value is
//! rejected with [`ExtractError::InvalidConfig`] instead of surfacing later as
//! a confusing model error.

use crate::error::ExtractError;
use crate::model::OcrModel;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Which pretrained detection + recognition architectures the backend loads.
///
/// `Accurate` trades speed for quality; `Fast` is the lighter pair for bulk
/// jobs where throughput matters more than the last percent of accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelVariant {
    /// Highest-quality architectures. (default)
    #[default]
    Accurate,
    /// Lightweight architectures, roughly 3–4× faster on CPU.
    Fast,
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelVariant::Accurate => write!(f, "accurate"),
            ModelVariant::Fast => write!(f, "fast"),
        }
    }
}

/// Configuration for a text-extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use doc2text::{ExtractionConfig, ModelVariant};
///
/// let config = ExtractionConfig::builder()
///     .variant(ModelVariant::Fast)
///     .det_threshold(0.6)
///     .rec_threshold(0.3)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Model variant the backend loads. Default: [`ModelVariant::Accurate`].
    pub variant: ModelVariant,

    /// Detection confidence threshold in `[0.1, 1.0]`. Default: 0.5.
    ///
    /// Text regions the detector scores below this value are discarded by the
    /// model. Raising it suppresses noise (specks, rulings) at the cost of
    /// dropping faint print.
    pub det_threshold: f32,

    /// Recognition confidence threshold in `[0.1, 1.0]`. Default: 0.3.
    ///
    /// Words the recogniser scores below this value are discarded by the
    /// model. The default is deliberately permissive: low-confidence words in
    /// scanned documents are more often smudged-but-real than hallucinated.
    pub rec_threshold: f32,

    /// Attempt to correct page orientation before recognition. Default: true.
    ///
    /// Scanned documents are frequently rotated by 90° increments; with this
    /// off, a sideways page recognises as garbage rather than failing.
    pub rotate_pages: bool,

    /// Rasterisation DPI for PDF pages. Range: 72–600. Default: 300.
    ///
    /// 300 DPI is the classic OCR sweet spot: glyph strokes stay several
    /// pixels wide so the recogniser sees clean shapes. Dropping to 150
    /// roughly halves memory and runtime but measurably hurts small print.
    pub dpi: u32,

    /// Maximum rendered page dimension (width or height) in pixels. Default: 5000.
    ///
    /// A safety cap independent of DPI. A 300-DPI render of an A0 poster
    /// would produce a 10 000 × 14 000 px image and exhaust memory; this
    /// field caps the longest edge, scaling the other proportionally.
    pub max_rendered_pixels: u32,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Recognition language passed to the backend. Default: backend's own
    /// default (`eng` for the tesseract backend).
    pub language: Option<String>,

    /// Directory holding the backend's pretrained model data.
    /// If `None`, the backend falls back to its environment defaults
    /// (`TESSDATA_PREFIX` for the tesseract backend).
    pub model_data_dir: Option<PathBuf>,

    /// Pre-constructed OCR model. Takes precedence over the built-in backend.
    ///
    /// The model is externally owned and injected here; the pipeline never
    /// constructs or caches one behind the caller's back.
    pub model: Option<Arc<dyn OcrModel>>,

    /// Optional progress callback fired as pages are processed.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            variant: ModelVariant::default(),
            det_threshold: 0.5,
            rec_threshold: 0.3,
            rotate_pages: true,
            dpi: 300,
            max_rendered_pixels: 5000,
            password: None,
            language: None,
            model_data_dir: None,
            model: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("variant", &self.variant)
            .field("det_threshold", &self.det_threshold)
            .field("rec_threshold", &self.rec_threshold)
            .field("rotate_pages", &self.rotate_pages)
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("language", &self.language)
            .field("model_data_dir", &self.model_data_dir)
            .field("model", &self.model.as_ref().map(|m| m.name()))
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn variant(mut self, variant: ModelVariant) -> Self {
        self.config.variant = variant;
        self
    }

    pub fn det_threshold(mut self, t: f32) -> Self {
        self.config.det_threshold = t;
        self
    }

    pub fn rec_threshold(mut self, t: f32) -> Self {
        self.config.rec_threshold = t;
        self
    }

    pub fn rotate_pages(mut self, v: bool) -> Self {
        self.config.rotate_pages = v;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = Some(lang.into());
        self
    }

    pub fn model_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.model_data_dir = Some(dir.into());
        self
    }

    pub fn model(mut self, model: Arc<dyn OcrModel>) -> Self {
        self.config.model = Some(model);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if !(0.1..=1.0).contains(&c.det_threshold) {
            return Err(ExtractError::InvalidConfig(format!(
                "Detection threshold must be 0.1–1.0, got {}",
                c.det_threshold
            )));
        }
        if !(0.1..=1.0).contains(&c.rec_threshold) {
            return Err(ExtractError::InvalidConfig(format!(
                "Recognition threshold must be 0.1–1.0, got {}",
                c.rec_threshold
            )));
        }
        if c.dpi < 72 || c.dpi > 600 {
            return Err(ExtractError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ExtractionConfig::default();
        assert_eq!(c.variant, ModelVariant::Accurate);
        assert_eq!(c.det_threshold, 0.5);
        assert_eq!(c.rec_threshold, 0.3);
        assert!(c.rotate_pages);
        assert_eq!(c.dpi, 300);
    }

    #[test]
    fn builder_accepts_in_range_thresholds() {
        let c = ExtractionConfig::builder()
            .det_threshold(0.1)
            .rec_threshold(1.0)
            .build()
            .unwrap();
        assert_eq!(c.det_threshold, 0.1);
        assert_eq!(c.rec_threshold, 1.0);
    }

    #[test]
    fn builder_rejects_out_of_range_det_threshold() {
        let err = ExtractionConfig::builder()
            .det_threshold(0.05)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Detection threshold"));
    }

    #[test]
    fn builder_rejects_out_of_range_rec_threshold() {
        let err = ExtractionConfig::builder()
            .rec_threshold(1.5)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Recognition threshold"));
    }

    #[test]
    fn builder_rejects_out_of_range_dpi() {
        let err = ExtractionConfig::builder().dpi(50).build().unwrap_err();
        assert!(err.to_string().contains("DPI"));
    }

    #[test]
    fn variant_display_matches_cli_names() {
        assert_eq!(ModelVariant::Accurate.to_string(), "accurate");
        assert_eq!(ModelVariant::Fast.to_string(), "fast");
    }
}
