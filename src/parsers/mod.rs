//! Line parsers: one per document kind.
//!
//! Each parser takes the ordered lines of one document and returns owned
//! records. None of them can fail: every rule chain ends in a fallback, and
//! lines that carry nothing (blank lines, page footers, headers) are simply
//! consumed.
//!
//! ```text
//! lines ──▶ stock      ──▶ Vec<ParsedStockItem>
//!       ──▶ checklist  ──▶ Vec<ParsedChecklistTask>
//!       ──▶ allergen   ──▶ AllergenMap ──▶ matcher
//! ```
//!
//! Each classifier is exposed next to its parser (`classify_*_line`, and
//! `apply` on every rule) so a single rule can be exercised on its own.

pub mod allergen;
pub mod checklist;
pub mod stock;

pub use allergen::{parse_allergen_csv, parse_allergen_lines, AllergenParser};
pub use checklist::parse_checklist_lines;
pub use stock::parse_stock_lines;
