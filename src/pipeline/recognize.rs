//! Recognition driving: one model invocation per page image, in order.
//!
//! The model is invoked exactly once per page, strictly sequentially, and
//! the first failure aborts the whole run — there are no retries and nothing
//! already recognised is salvaged. Recognition is CPU-bound, so the entire
//! loop runs inside one `spawn_blocking` call rather than hopping between
//! the async executor and the blocking pool per page.

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, ProcessingError};
use crate::layout::PageLayout;
use crate::model::{ModelOptions, OcrModel};
use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// One recognised page: its layout plus the model wall-clock time.
#[derive(Debug)]
pub struct RecognizedPage {
    pub layout: PageLayout,
    pub duration_ms: u64,
}

/// Run the OCR model over every page image, preserving page order.
///
/// Returns exactly one [`RecognizedPage`] per input image, or the first
/// error encountered.
pub async fn recognize_pages(
    model: Arc<dyn OcrModel>,
    images: Vec<DynamicImage>,
    config: &ExtractionConfig,
) -> Result<Vec<RecognizedPage>, ExtractError> {
    let options = ModelOptions::from_config(config);
    let callback = config.progress_callback.clone();

    tokio::task::spawn_blocking(move || {
        let total = images.len();
        let mut results = Vec::with_capacity(total);

        for (idx, image) in images.iter().enumerate() {
            let page_num = idx + 1;
            if let Some(ref cb) = callback {
                cb.on_page_start(page_num, total);
            }

            let start = Instant::now();
            let layout = model.analyze(image, &options).map_err(|e| match e {
                ProcessingError::Backend(detail) => ProcessingError::Inference {
                    page: page_num,
                    detail,
                },
                other => other,
            })?;
            let duration_ms = start.elapsed().as_millis() as u64;

            debug!(
                "Page {}/{}: {} words in {}ms",
                page_num,
                total,
                layout.word_count(),
                duration_ms
            );
            if let Some(ref cb) = callback {
                cb.on_page_complete(page_num, total, layout.word_count());
            }

            results.push(RecognizedPage {
                layout,
                duration_ms,
            });
        }

        Ok(results)
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("recognition task panicked: {e}")))?
    .map_err(ExtractError::Processing)
}
