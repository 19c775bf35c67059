//! Import entry points: file or lines in, parsed records out.
//!
//! [`import_lines`] is the pure half: it never fails, because the parsers
//! never fail. [`import_file`] adds the document boundary in front of it
//! (path checks, PDF text extraction or plain-text reading), which is the
//! only place an [`ImportError`] can come from.

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::output::{AllergenMap, ImportOutput, ImportStats, ParsedDocument};
use crate::parsers::{parse_checklist_lines, parse_stock_lines, AllergenParser};
use crate::pipeline::input::{self, InputFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info};

/// Which parser a document goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Stock,
    Checklist,
    Allergens,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Stock,
        DocumentKind::Checklist,
        DocumentKind::Allergens,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Stock => "stock",
            DocumentKind::Checklist => "checklist",
            DocumentKind::Allergens => "allergens",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" => Ok(DocumentKind::Stock),
            "checklist" => Ok(DocumentKind::Checklist),
            "allergens" | "allergen" => Ok(DocumentKind::Allergens),
            other => Err(format!(
                "unknown document kind '{}': expected stock, checklist or allergens",
                other
            )),
        }
    }
}

/// Run `lines` through the parser for `kind`.
pub fn parse_lines<I, S>(lines: I, kind: DocumentKind, config: &ImportConfig) -> ParsedDocument
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match kind {
        DocumentKind::Stock => ParsedDocument::Stock(parse_stock_lines(lines)),
        DocumentKind::Checklist => ParsedDocument::Checklist(parse_checklist_lines(lines)),
        DocumentKind::Allergens => {
            ParsedDocument::Allergens(AllergenParser::new(config.allergen_layout).parse_lines(lines))
        }
    }
}

/// Parse already-extracted lines.
///
/// `stats.pages` is 0; use [`import_file`] to get page counts.
pub fn import_lines<S: AsRef<str>>(
    lines: &[S],
    kind: DocumentKind,
    config: &ImportConfig,
) -> ImportOutput {
    let start = Instant::now();
    let document = parse_lines(lines, kind, config);
    let stats = build_stats(lines, &document, 0, start);
    info!(
        "Parsed {} {} records from {} lines",
        stats.records, kind, stats.source_lines
    );
    ImportOutput { document, stats }
}

/// Import a PDF or text file.
///
/// # Errors
/// Fatal boundary failures only: the file is missing or unreadable, it is
/// a PDF and PDF support is off or the PDF cannot be opened, or a selected
/// page does not exist.
pub fn import_file(
    path: impl AsRef<Path>,
    kind: DocumentKind,
    config: &ImportConfig,
) -> Result<ImportOutput, ImportError> {
    let start = Instant::now();
    let path = path.as_ref();
    info!("Starting {} import: {}", kind, path.display());

    let (lines, pages) = read_lines(path, config)?;
    debug!("Read {} lines from {} pages", lines.len(), pages);

    let document = parse_lines(&lines, kind, config);
    let stats = build_stats(&lines, &document, pages, start);
    info!(
        "Import complete: {} records, {} lines skipped, {}ms",
        stats.records,
        stats.skipped_lines(),
        stats.duration_ms
    );

    Ok(ImportOutput { document, stats })
}

/// Parse a CSV-style allergen text block (`Ingredient,Allergen,...` per line).
pub fn import_allergen_csv(text: &str, config: &ImportConfig) -> AllergenMap {
    AllergenParser::new(config.allergen_layout).parse_csv(text)
}

/// Extract the lines of a file without parsing them.
///
/// Returns the lines and the number of PDF pages read (0 for text input).
/// PDF lines come back grouped and cleaned; text lines are returned as-is,
/// blanks included.
pub fn read_lines(
    path: &Path,
    config: &ImportConfig,
) -> Result<(Vec<String>, usize), ImportError> {
    let resolved = input::resolve_input(path)?;
    match resolved.format {
        InputFormat::Text => Ok((input::read_text_lines(&resolved.path)?, 0)),
        InputFormat::Pdf => read_pdf_lines(&resolved.path, config),
    }
}

#[cfg(feature = "pdf")]
fn read_pdf_lines(
    path: &Path,
    config: &ImportConfig,
) -> Result<(Vec<String>, usize), ImportError> {
    crate::pipeline::extract::extract_lines(path, config)
}

#[cfg(not(feature = "pdf"))]
fn read_pdf_lines(
    path: &Path,
    _config: &ImportConfig,
) -> Result<(Vec<String>, usize), ImportError> {
    Err(ImportError::PdfSupportDisabled {
        path: path.to_path_buf(),
    })
}

/// Write `contents` to `path` atomically (temp file + rename).
pub fn write_atomic(path: impl AsRef<Path>, contents: &str) -> Result<(), ImportError> {
    let path = path.as_ref();
    let write_err = |source| ImportError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, contents).map_err(write_err)?;
    std::fs::rename(&tmp_path, path).map_err(write_err)?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn build_stats<S: AsRef<str>>(
    lines: &[S],
    document: &ParsedDocument,
    pages: usize,
    start: Instant,
) -> ImportStats {
    ImportStats {
        source_lines: lines.len(),
        non_blank_lines: lines.iter().filter(|l| !l.as_ref().trim().is_empty()).count(),
        records: document.len(),
        pages,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AllergenLayout;
    use crate::output::{ParsedChecklistTask, ParsedStockItem};
    use std::io::Write;

    #[test]
    fn kind_from_str() {
        assert_eq!("Stock".parse::<DocumentKind>(), Ok(DocumentKind::Stock));
        assert_eq!("allergen".parse::<DocumentKind>(), Ok(DocumentKind::Allergens));
        assert!("menu".parse::<DocumentKind>().is_err());
        for kind in DocumentKind::ALL {
            assert_eq!(kind.to_string().parse::<DocumentKind>(), Ok(kind));
        }
    }

    #[test]
    fn stock_lines_with_stats() {
        let lines = ["STOCK TAKE", "", "12 x Whole Milk", "Oat Milk 6 bottles"];
        let out = import_lines(&lines, DocumentKind::Stock, &ImportConfig::default());
        assert_eq!(
            out.document,
            ParsedDocument::Stock(vec![
                ParsedStockItem::new("Whole Milk", 12),
                ParsedStockItem::new("Oat Milk", 6).with_unit("bottles"),
            ])
        );
        assert_eq!(out.stats.source_lines, 4);
        assert_eq!(out.stats.non_blank_lines, 3);
        assert_eq!(out.stats.records, 2);
        assert_eq!(out.stats.skipped_lines(), 1);
        assert_eq!(out.stats.pages, 0);
    }

    #[test]
    fn allergen_layout_is_honoured() {
        let lines = ["Milk, Soy - Pesto"];
        let config = ImportConfig::builder()
            .allergen_layout(AllergenLayout::AllergensFirst)
            .build()
            .unwrap();
        let out = import_lines(&lines, DocumentKind::Allergens, &config);
        match out.document {
            ParsedDocument::Allergens(map) => {
                assert_eq!(map.get("Pesto"), Some(&vec!["Milk".to_string(), "Soy".to_string()]));
            }
            other => panic!("unexpected document: {:?}", other),
        }
    }

    #[test]
    fn text_file_import() {
        let mut f = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(f, "OPENING:").unwrap();
        writeln!(f, "Unlock doors").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "Page 1").unwrap();

        let out = import_file(f.path(), DocumentKind::Checklist, &ImportConfig::default()).unwrap();
        assert_eq!(
            out.document,
            ParsedDocument::Checklist(vec![ParsedChecklistTask {
                section: Some("Opening".into()),
                text: "Unlock doors".into(),
            }])
        );
        assert_eq!(out.stats.source_lines, 4);
        assert_eq!(out.stats.non_blank_lines, 3);
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = import_file("/no/such/sheet.pdf", DocumentKind::Stock, &ImportConfig::default())
            .unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound { .. }));
    }

    #[test]
    fn csv_entry_point() {
        let map = import_allergen_csv("Pesto,Milk,Nuts\r\n\r\nHummus,Sesame\n", &ImportConfig::default());
        assert_eq!(map.len(), 2);
        assert_eq!(map["Hummus"], vec!["Sesame".to_string()]);
    }

    #[test]
    fn atomic_write_creates_parents_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out").join("stock.json");
        write_atomic(&target, "{}").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{}");
        assert!(!dir.path().join("out").join("stock.json.tmp").exists());
    }

    #[test]
    fn json_shape_is_tagged() {
        let out = import_lines(&["5 x Cups"], DocumentKind::Stock, &ImportConfig::default());
        let v = serde_json::to_value(&out.document).unwrap();
        assert_eq!(v["kind"], "stock");
        assert_eq!(v["records"][0]["name"], "Cups");
        assert_eq!(v["records"][0]["qty"], 5);
    }
}
