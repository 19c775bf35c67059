//! # cafe-import
//!
//! Turn printed cafe paperwork into structured records: stock counts,
//! opening/closing checklists and allergen reference sheets.
//!
//! ## Why this crate?
//!
//! The sheets staff already have are PDFs or text dumps written by hand in
//! a dozen slightly different layouts (`12 x Milk`, `Milk ..... 12`,
//! `Milk 12 bottles`). Rather than asking for a fixed template, each parser
//! runs a line through an ordered chain of forgiving rules and keeps the
//! first one that fits. Parsers never fail; at worst a row comes back with
//! quantity 0 or no section, and the [`ImportPreview`] lets a person fix it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF / .txt / .csv
//!  │
//!  ├─ 1. Input    check the path, sniff %PDF vs. text
//!  ├─ 2. Extract  pdfium text segments per page (feature `pdf`)
//!  ├─ 3. Lines    group segments by baseline, drop blanks
//!  ├─ 4. Parse    stock / checklist / allergen rule chains
//!  └─ 5. Output   ParsedDocument + ImportStats
//! ```
//!
//! The allergen map from step 4 feeds [`match_allergens`], which attributes
//! allergens to free-text dish names.
//!
//! ## Quick Start
//!
//! ```rust
//! use cafe_import::{import_lines, match_allergens, parse_allergen_csv, DocumentKind,
//!     ImportConfig, ParsedDocument};
//!
//! let out = import_lines(&["12 x Whole Milk", "Oat Milk 6 bottles"],
//!     DocumentKind::Stock, &ImportConfig::default());
//! if let ParsedDocument::Stock(items) = &out.document {
//!     assert_eq!(items[0].qty, 12);
//! }
//!
//! let map = parse_allergen_csv("Cheddar,Milk\nPesto,Milk,Nuts\n");
//! let found = match_allergens("Ham & Cheddar Toastie", &map);
//! assert!(found.contains("Milk"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `pdf`   | on      | PDF text extraction through pdfium (`pdfium-render`) |
//! | `cli`   | on      | Enables the `cafe-import` binary (clap + anyhow + tracing-subscriber) |
//!
//! Without `pdf`, text inputs still work and PDF inputs fail with
//! [`ImportError::PdfSupportDisabled`]:
//! ```toml
//! cafe-import = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod allergens;
pub mod config;
pub mod error;
pub mod import;
pub mod matcher;
pub mod output;
pub mod parsers;
pub mod pipeline;
pub mod preview;
pub mod text;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use allergens::{canonicalize, Allergen, UnknownAllergen};
pub use config::{AllergenLayout, ImportConfig, ImportConfigBuilder, PageSelection};
pub use error::ImportError;
pub use import::{
    import_allergen_csv, import_file, import_lines, parse_lines, read_lines, write_atomic,
    DocumentKind,
};
pub use matcher::{match_allergens, AllergenMatcher};
pub use output::{
    AllergenMap, ImportOutput, ImportStats, ParsedChecklistTask, ParsedDocument, ParsedStockItem,
};
pub use parsers::{
    parse_allergen_csv, parse_allergen_lines, parse_checklist_lines, parse_stock_lines,
    AllergenParser,
};
pub use pipeline::lines::TextFragment;
pub use preview::ImportPreview;
