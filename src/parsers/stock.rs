//! Stock sheet parser: one `(name, qty, unit?)` row per line.
//!
//! Exported stock sheets come in several shapes, often mixed within one file:
//!
//! ```text
//! 12 x Whole Milk (1L)        quantity first
//! Espresso Beans - 5 kg       quantity last, optional unit
//! Oat Milk 6bottles spare     number glued to a unit mid-line
//! Syrup (vanilla) 3 left      some number somewhere
//! Napkins                     no number at all
//! ```
//!
//! Each line is tried against [`StockRule::CHAIN`] and the first rule that
//! accepts it decides the record. Nothing is dropped except recognised
//! header/footer noise: a line no rule understands still becomes an item
//! named after the whole line with quantity 0.

use crate::output::ParsedStockItem;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

static RE_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:page|stock|item|qty|quantity)\b").unwrap());

static RE_QTY_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([0-9]{1,4})\s*[xX*\-]?\s*(.+)$").unwrap());

static RE_QTY_LAST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s+[-–:]?\s*([0-9]{1,4})\s*(pcs|bottles|bags|kg|g|L|ml)?\s*$").unwrap()
});

static RE_INLINE_UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]{1,4})\s*(pcs|bottles|bags|kg|g|L|ml)\b").unwrap());

static RE_ANY_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{1,4}").unwrap());

/// Classification of a single stock line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockLine {
    /// Header or footer (`Page 2`, `Item  Qty`); produces no record.
    Noise,
    Item(ParsedStockItem),
}

/// One step of the stock line classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockRule {
    /// Lines starting with `page`, `stock`, `item`, `qty` or `quantity`.
    HeaderNoise,
    /// `12 x Whole Milk`, `3* Lids`, `40 - Straws`.
    QuantityFirst,
    /// `Paper Cups - 240`, `Espresso Beans: 5 kg`.
    QuantityLast,
    /// `Oat Milk 6bottles spare`: the number+unit is cut out of the name.
    InlineUnit,
    /// First number anywhere on the line.
    AnyNumber,
    /// No digits; the whole line is the name.
    NameOnly,
}

impl StockRule {
    /// Rules in priority order. The first to return `Some` wins.
    pub const CHAIN: [StockRule; 6] = [
        StockRule::HeaderNoise,
        StockRule::QuantityFirst,
        StockRule::QuantityLast,
        StockRule::InlineUnit,
        StockRule::AnyNumber,
        StockRule::NameOnly,
    ];

    /// Apply this rule alone to a trimmed, non-blank line.
    pub fn apply(self, line: &str) -> Option<StockLine> {
        match self {
            StockRule::HeaderNoise => RE_NOISE.is_match(line).then_some(StockLine::Noise),
            StockRule::QuantityFirst => RE_QTY_FIRST.captures(line).map(|caps| {
                StockLine::Item(ParsedStockItem::new(caps[2].trim(), parse_qty(&caps[1])))
            }),
            StockRule::QuantityLast => RE_QTY_LAST.captures(line).map(|caps| {
                let unit = caps.get(3).map_or("", |m| m.as_str().trim());
                StockLine::Item(
                    ParsedStockItem::new(caps[1].trim(), parse_qty(&caps[2])).with_unit(unit),
                )
            }),
            StockRule::InlineUnit => RE_INLINE_UNIT.captures(line).map(|caps| {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                let name = excise(line, whole);
                StockLine::Item(
                    ParsedStockItem::new(name_or_line(name.trim(), line), parse_qty(&caps[1]))
                        .with_unit(caps[2].trim()),
                )
            }),
            StockRule::AnyNumber => RE_ANY_NUMBER.find(line).map(|m| {
                let name: String = excise(line, m.range())
                    .chars()
                    .filter(|c| !matches!(c, '-' | ':' | '|'))
                    .collect();
                StockLine::Item(ParsedStockItem::new(
                    name_or_line(name.trim(), line),
                    parse_qty(m.as_str()),
                ))
            }),
            StockRule::NameOnly => Some(StockLine::Item(ParsedStockItem::new(line, 0))),
        }
    }
}

/// Run a trimmed, non-blank line through the rule chain.
///
/// Returns the rule that fired along with its classification.
pub fn classify_stock_line(line: &str) -> (StockRule, StockLine) {
    StockRule::CHAIN
        .iter()
        .find_map(|&rule| rule.apply(line).map(|out| (rule, out)))
        .unwrap_or_else(|| (StockRule::NameOnly, StockLine::Item(ParsedStockItem::new(line, 0))))
}

/// Parse the lines of a stock sheet.
///
/// Blank lines are ignored; every other line yields exactly one item unless
/// it is header/footer noise.
pub fn parse_stock_lines<I, S>(lines: I) -> Vec<ParsedStockItem>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut items = Vec::new();
    let mut noise = 0usize;

    for raw in lines {
        let line = raw.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        match classify_stock_line(line) {
            (rule, StockLine::Item(item)) => {
                trace!(?rule, line, qty = item.qty, "stock line");
                items.push(item);
            }
            (_, StockLine::Noise) => {
                trace!(line, "stock header/footer skipped");
                noise += 1;
            }
        }
    }

    debug!("Parsed {} stock items ({} noise lines)", items.len(), noise);
    items
}

fn parse_qty(digits: &str) -> u32 {
    digits.parse().unwrap_or(0)
}

fn excise(line: &str, range: std::ops::Range<usize>) -> String {
    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..range.start]);
    out.push_str(&line[range.end..]);
    out
}

fn name_or_line<'a>(name: &'a str, line: &'a str) -> &'a str {
    if name.is_empty() {
        line
    } else {
        name
    }
}
