//! PDF text extraction: read the text layer of selected pages via pdfium.
//!
//! Nothing is rendered. Each page's text segments (runs of characters that
//! share a font and baseline) come back in content-stream order together with
//! their bounding box; the box's bottom edge is used as the fragment's `y`.
//! [`super::lines`] then turns the fragments into lines.

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::pipeline::lines::{lines_from_pages, TextFragment};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Text fragments of the selected pages, in page order.
#[derive(Debug, Clone, Default)]
pub struct ExtractedPages {
    /// One entry per selected page.
    pub pages: Vec<Vec<TextFragment>>,
    /// Page count of the whole document.
    pub total_pages: usize,
}

/// Bind to pdfium: `PDFIUM_LIB_PATH` if set, otherwise the system library.
pub fn bind_pdfium() -> Result<Pdfium, ImportError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) => {
            let path = PathBuf::from(path);
            debug!("Binding pdfium from PDFIUM_LIB_PATH: {}", path.display());
            Pdfium::bind_to_library(&path).map_err(|e| {
                ImportError::PdfiumBindingFailed(format!("{}: {}", path.display(), e))
            })?
        }
        Err(_) => Pdfium::bind_to_system_library()
            .map_err(|e| ImportError::PdfiumBindingFailed(e.to_string()))?,
    };
    Ok(Pdfium::new(bindings))
}

/// Read the text fragments of the pages selected in `config`.
pub fn extract_fragments(
    pdf_path: &Path,
    config: &ImportConfig,
) -> Result<ExtractedPages, ImportError> {
    let pdfium = bind_pdfium()?;
    let password = config.password.as_deref();

    let document = pdfium
        .load_pdf_from_file(pdf_path, password)
        .map_err(|e| load_error(pdf_path, password.is_some(), e))?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    if let Some(page) = config.pages.first_missing(total_pages) {
        return Err(ImportError::PageOutOfRange {
            page,
            total: total_pages,
        });
    }

    let indices = config.pages.to_indices(total_pages);
    let mut out = Vec::with_capacity(indices.len());

    for idx in indices {
        let page = pages
            .get(idx as u16)
            .map_err(|e| ImportError::TextExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;
        let text = page.text().map_err(|e| ImportError::TextExtractionFailed {
            page: idx + 1,
            detail: format!("{:?}", e),
        })?;

        let fragments: Vec<TextFragment> = text
            .segments()
            .iter()
            .map(|segment| TextFragment::new(segment.text(), segment.bounds().bottom().value))
            .collect();
        debug!("Page {}: {} text segments", idx + 1, fragments.len());
        out.push(fragments);
    }

    Ok(ExtractedPages {
        pages: out,
        total_pages,
    })
}

/// Extract the selected pages and group them into cleaned lines.
///
/// Returns the lines and the number of pages read.
pub fn extract_lines(
    pdf_path: &Path,
    config: &ImportConfig,
) -> Result<(Vec<String>, usize), ImportError> {
    let extracted = extract_fragments(pdf_path, config)?;
    let pages_read = extracted.pages.len();
    let lines = lines_from_pages(&extracted.pages, config.line_tolerance);
    debug!("Grouped {} pages into {} lines", pages_read, lines.len());
    Ok((lines, pages_read))
}

fn load_error(path: &Path, had_password: bool, e: PdfiumError) -> ImportError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if had_password {
            ImportError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            ImportError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        ImportError::CorruptPdf {
            path: path.to_path_buf(),
            detail: err_str,
        }
    }
}
