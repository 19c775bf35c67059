//! Pipeline stages that turn an input file into text lines.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ lines ──▶ parsers
//! (path)    (pdfium)    (group)   (stock / checklist / allergens)
//! ```
//!
//! 1. [`input`]: check the path and sniff PDF vs. text
//! 2. `extract`: read positioned text segments from the selected pages;
//!    only built with the `pdf` feature
//! 3. [`lines`]: group fragments by baseline and drop blank lines
//!
//! Text inputs skip `extract` and `lines` and are read line by line.

#[cfg(feature = "pdf")]
pub mod extract;
pub mod input;
pub mod lines;
