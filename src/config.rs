//! Configuration types for document import.
//!
//! The parsers themselves take no options: their behaviour is fixed by rule
//! order. What varies between documents is how lines are recovered from a PDF
//! (grouping tolerance, password, page selection) and which way round an
//! allergen sheet is written. All of that lives in [`ImportConfig`], built via
//! [`ImportConfigBuilder`].

use crate::error::ImportError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default vertical distance (PDF points) under which two text fragments are
/// considered part of the same line.
pub const DEFAULT_LINE_TOLERANCE: f32 = 5.0;

/// Configuration for an import.
///
/// # Example
/// ```rust
/// use cafe_import::{AllergenLayout, ImportConfig, PageSelection};
///
/// let config = ImportConfig::builder()
///     .line_tolerance(3.0)
///     .pages(PageSelection::Range(1, 2))
///     .allergen_layout(AllergenLayout::AllergensFirst)
///     .build()
///     .unwrap();
/// assert_eq!(config.line_tolerance, 3.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Maximum vertical gap between fragments on the same line. Range: 0.5–50. Default: 5.0.
    ///
    /// Fragments of one visual line rarely sit on exactly the same baseline
    /// (superscripts, mixed fonts). Too small a value splits a stock row into
    /// a name line and a quantity line; too large merges adjacent rows.
    pub line_tolerance: f32,

    /// PDF user password for encrypted documents.
    #[serde(skip_serializing)]
    pub password: Option<String>,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// How dash-separated allergen lines are read. Default: ingredient first.
    pub allergen_layout: AllergenLayout,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            line_tolerance: DEFAULT_LINE_TOLERANCE,
            password: None,
            pages: PageSelection::default(),
            allergen_layout: AllergenLayout::default(),
        }
    }
}

impl ImportConfig {
    /// Create a new builder for `ImportConfig`.
    pub fn builder() -> ImportConfigBuilder {
        ImportConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ImportConfig`].
#[derive(Debug)]
pub struct ImportConfigBuilder {
    config: ImportConfig,
}

impl ImportConfigBuilder {
    pub fn line_tolerance(mut self, points: f32) -> Self {
        self.config.line_tolerance = points.clamp(0.5, 50.0);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn allergen_layout(mut self, layout: AllergenLayout) -> Self {
        self.config.allergen_layout = layout;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ImportConfig, ImportError> {
        let c = &self.config;
        if !c.line_tolerance.is_finite() || c.line_tolerance <= 0.0 {
            return Err(ImportError::InvalidConfig(format!(
                "line tolerance must be a positive number of points, got {}",
                c.line_tolerance
            )));
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start == 0 || start > end {
                return Err(ImportError::InvalidConfig(format!(
                    "invalid page range {start}-{end}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which side of a dash holds the ingredient on an allergen sheet.
///
/// Sheets are written either as `Pesto - Milk, Nuts` or as
/// `Milk, Nuts - Pesto`. Nothing on the line says which, so the reading
/// order is a per-document choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllergenLayout {
    /// `Ingredient: allergens` and `Ingredient - allergens`. (default)
    #[default]
    IngredientFirst,
    /// `allergens - Ingredient` for dash lines; colon lines still read
    /// ingredient first.
    AllergensFirst,
}

/// Specifies which pages of the PDF to read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Read all pages (default).
    #[default]
    All,
    /// Read a single page (1-indexed).
    Single(usize),
    /// Read a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Read specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed
    /// page numbers. Pages past the end of the document are left out.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let exists = |p: &usize| (1..=total_pages).contains(p);
        let pages: BTreeSet<usize> = match self {
            PageSelection::All => (1..=total_pages).collect(),
            PageSelection::Single(p) => Some(*p).filter(exists).into_iter().collect(),
            PageSelection::Range(start, end) => ((*start).max(1)..=(*end).min(total_pages)).collect(),
            PageSelection::Set(pages) => pages.iter().copied().filter(exists).collect(),
        };
        pages.into_iter().map(|p| p - 1).collect()
    }

    /// The first requested page that does not exist, if any (1-indexed).
    ///
    /// For a range running past the end this is the first page after the
    /// last one, so `Range(2, 9)` on a 3-page document reports page 4.
    pub fn first_missing(&self, total_pages: usize) -> Option<usize> {
        let missing = |p: usize| p == 0 || p > total_pages;
        match self {
            PageSelection::All => None,
            PageSelection::Single(p) => Some(*p).filter(|&p| missing(p)),
            PageSelection::Range(start, end) => {
                if missing(*start) {
                    Some(*start)
                } else if missing(*end) {
                    Some(total_pages + 1)
                } else {
                    None
                }
            }
            PageSelection::Set(pages) => pages.iter().copied().find(|&p| missing(p)),
        }
    }
}
