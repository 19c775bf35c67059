//! Error types for the cafe-import library.
//!
//! Only the document boundary can fail. Once a sequence of lines exists,
//! every parser in [`crate::parsers`] and the [`crate::matcher`] produce a
//! result for any input: ambiguity is settled by rule order and the worst
//! case is a low-fidelity record (quantity 0, no section, no allergens).
//!
//! [`ImportError`] therefore covers the fatal cases only: the input file is
//! missing or unreadable, the PDF cannot be opened, pdfium cannot be bound,
//! the configuration is invalid, or output cannot be written.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the cafe-import library.
#[derive(Debug, Error)]
pub enum ImportError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// A text input could not be read (I/O failure or invalid UTF-8).
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The input is a PDF but this build cannot read PDFs.
    #[error("'{path}' is a PDF but PDF support is disabled.\nRebuild with `--features pdf`.")]
    PdfSupportDisabled { path: PathBuf },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Selected page numbers fall outside the document.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium could not hand back the text layer of a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium where the system loader can find it, or set\n\
PDFIUM_LIB_PATH=/path/to/libpdfium to use a specific copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
