//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the pipeline processes each page. Callers can forward events to
//! a channel, a WebSocket, or a terminal progress bar without the library
//! knowing anything about how the host application communicates.
//!
//! There is no page-error event: a failed model invocation aborts the run
//! and surfaces as the `Err` of the `extract*` call itself.

use std::sync::Arc;

/// Called by the extraction pipeline as it processes each page.
///
/// Implementations must be `Send + Sync`: recognition runs on a blocking
/// worker thread. Pages are processed strictly in order, so events for page
/// N+1 never arrive before page N has completed. All methods have default
/// no-op implementations so callers only override what they care about.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after ingestion, before any page is recognised.
    ///
    /// # Arguments
    /// * `total_pages` — number of page images that will be processed
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before the model is invoked for a page.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page has been recognised and flattened.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages
    /// * `word_count`  — number of words recognised on the page
    fn on_page_complete(&self, page_num: usize, total_pages: usize, word_count: usize) {
        let _ = (page_num, total_pages, word_count);
    }

    /// Called once after the last page, before the result is assembled.
    ///
    /// # Arguments
    /// * `total_pages` — total pages processed
    /// * `word_count`  — total words recognised across the document
    fn on_extraction_complete(&self, total_pages: usize, word_count: usize) {
        let _ = (total_pages, word_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
