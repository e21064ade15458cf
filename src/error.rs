//! Error types for the doc2text library.
//!
//! Two distinct error kinds reflect the two ways a run can go wrong:
//!
//! * [`DecodeError`] — the uploaded bytes could not be turned into page
//!   images (bad MIME type, corrupt PDF, undecodable image data).
//!
//! * [`ProcessingError`] — the OCR model itself failed (could not load, or
//!   an inference call on a page returned an error).
//!
//! Both are fatal: a failure aborts the whole run and nothing already
//! extracted is salvaged. [`ExtractError`] is the sum type carried by the
//! public `extract*` functions so callers handle both outcomes explicitly.

use std::path::PathBuf;
use thiserror::Error;

/// The uploaded bytes could not be decoded into page images.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The declared MIME type is not one the pipeline accepts.
    #[error("Unsupported MIME type '{mime}'\nSupported: application/pdf, image/png, image/jpeg, image/tiff, image/bmp")]
    UnsupportedMime { mime: String },

    /// The declared type was PDF but the bytes do not start with `%PDF`.
    #[error("Input is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired,

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF")]
    WrongPassword,

    /// The document parsed but contains no pages.
    #[error("PDF document has no pages")]
    EmptyDocument,

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// The declared type was an image but the bytes could not be decoded.
    #[error("Image decoding failed: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The file extension maps to no supported MIME type.
    #[error("Cannot infer a supported document type from '{path}'\nSupported extensions: pdf, png, jpg, jpeg, tif, tiff, bmp")]
    UnknownExtension { path: PathBuf },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Install pdfium or set PDFIUM_DYNAMIC_LIB_PATH to an existing copy."
    )]
    PdfiumBindingFailed(String),
}

/// The OCR model failed while processing an otherwise valid document.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The backend model could not be initialised (missing model data etc.).
    #[error("OCR model failed to load: {detail}\n{hint}")]
    ModelLoad { detail: String, hint: String },

    /// No backend is compiled in and the caller injected no model.
    #[error(
        "No OCR model available.\n\
Enable the `tesseract` feature or inject a model via ExtractionConfig::builder().model(...)."
    )]
    NoModelAvailable,

    /// The backend failed internally (engine error, resource exhaustion).
    ///
    /// Model implementations return this; the pipeline rewraps it as
    /// [`ProcessingError::Inference`] with the page number attached.
    #[error("OCR backend error: {0}")]
    Backend(String),

    /// A single inference call failed. The whole run is aborted.
    #[error("OCR inference failed on page {page}: {detail}")]
    Inference { page: usize, detail: String },
}

/// All errors returned by the doc2text public API.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Bad or unsupported input bytes.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Model invocation failure.
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not create or write the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
