//! Input resolution: validate a local path and decide how to read it.
//!
//! A sheet arrives either as a PDF or as text someone already copied out of
//! one (a `.txt` dump, or an allergen `.csv`). The file extension is not
//! trusted: the first four bytes decide. `%PDF` goes to pdfium, anything else
//! is read as UTF-8 text, one line per text line.

use crate::error::ImportError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How a resolved input will be turned into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Pdf,
    Text,
}

/// A local input file that exists, is readable and has a known format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub path: PathBuf,
    pub format: InputFormat,
}

/// Validate `path` and sniff its format from the magic bytes.
pub fn resolve_input(path: impl AsRef<Path>) -> Result<ResolvedInput, ImportError> {
    let path = path.as_ref().to_path_buf();

    if !path.exists() {
        return Err(ImportError::FileNotFound { path });
    }

    let format = match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic == b"%PDF" {
                InputFormat::Pdf
            } else {
                InputFormat::Text
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ImportError::PermissionDenied { path });
        }
        Err(e) => {
            return Err(ImportError::ReadFailed { path, source: e });
        }
    };

    debug!("Resolved {:?} input: {}", format, path.display());
    Ok(ResolvedInput { path, format })
}

/// Read a text input as lines (`\n` or `\r\n`), blanks included.
pub fn read_text_lines(path: &Path) -> Result<Vec<String>, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file() {
        let err = resolve_input("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound { .. }));
    }

    #[test]
    fn pdf_magic_wins_over_extension() {
        let mut f = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        f.write_all(b"%PDF-1.7\n...").unwrap();
        assert_eq!(resolve_input(f.path()).unwrap().format, InputFormat::Pdf);
    }

    #[test]
    fn text_and_tiny_files_are_text() {
        let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        f.write_all(b"12 x Milk").unwrap();
        assert_eq!(resolve_input(f.path()).unwrap().format, InputFormat::Text);

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(resolve_input(empty.path()).unwrap().format, InputFormat::Text);
    }

    #[test]
    fn text_lines_handle_crlf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"Pesto,Milk\r\n\r\nHummus,Sesame").unwrap();
        let lines = read_text_lines(f.path()).unwrap();
        assert_eq!(lines, vec!["Pesto,Milk", "", "Hummus,Sesame"]);
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&[0xff, 0xfe, 0x00, 0x41]).unwrap();
        let err = read_text_lines(f.path()).unwrap_err();
        assert!(matches!(err, ImportError::ReadFailed { .. }));
    }
}
