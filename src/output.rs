//! Record types produced by the parsers, and the envelope returned by the
//! top-level import functions.
//!
//! Every value here is owned by the caller. Parsers build fresh records on
//! each call, so a caller may edit, reorder or drop them (see
//! [`crate::preview`]) without any effect on later parses.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of a stock sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStockItem {
    /// Item name, trimmed and non-empty.
    pub name: String,
    /// Counted quantity; 0 when the line carries no usable number.
    pub qty: u32,
    /// Unit token as written on the sheet (`kg`, `pcs`, `L`, …).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ParsedStockItem {
    pub fn new(name: impl Into<String>, qty: u32) -> Self {
        Self {
            name: name.into(),
            qty,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        let unit = unit.into();
        self.unit = (!unit.is_empty()).then_some(unit);
        self
    }
}

/// One task of a checklist, tagged with the section it was listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedChecklistTask {
    /// Title-cased header text of the nearest preceding section header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// The task line, trimmed.
    pub text: String,
}

/// Ingredient name → allergen labels, as written on the reference sheet.
///
/// Labels are kept in sheet order and are not deduplicated. A repeated
/// ingredient replaces its earlier entry.
pub type AllergenMap = BTreeMap<String, Vec<String>>;

/// Output of any of the three line parsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "records", rename_all = "lowercase")]
pub enum ParsedDocument {
    Stock(Vec<ParsedStockItem>),
    Checklist(Vec<ParsedChecklistTask>),
    Allergens(AllergenMap),
}

impl ParsedDocument {
    /// Number of records (stock rows, tasks, or ingredients).
    pub fn len(&self) -> usize {
        match self {
            ParsedDocument::Stock(items) => items.len(),
            ParsedDocument::Checklist(tasks) => tasks.len(),
            ParsedDocument::Allergens(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counters describing one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    /// Lines handed to the parser, blanks included.
    pub source_lines: usize,
    /// Lines left after blank lines are ignored.
    pub non_blank_lines: usize,
    /// Records produced.
    pub records: usize,
    /// PDF pages read; 0 for text input.
    pub pages: usize,
    /// Wall-clock time for extraction and parsing.
    pub duration_ms: u64,
}

impl ImportStats {
    /// Non-blank lines that produced no record (headers, noise, unparseable
    /// allergen rows, or repeated ingredients).
    pub fn skipped_lines(&self) -> usize {
        self.non_blank_lines.saturating_sub(self.records)
    }
}

/// Result of importing a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutput {
    pub document: ParsedDocument,
    pub stats: ImportStats,
}
