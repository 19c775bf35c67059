//! Review step between parsing and saving.
//!
//! Heuristic parsing gets some rows wrong, so imported records are shown to
//! the user first. Every row starts out kept; the user unticks bad rows or
//! fixes them in place, then [`ImportPreview::accept`] hands back what
//! survived, in sheet order.

use serde::{Deserialize, Serialize};

/// A parsed record plus its keep flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRow<T> {
    pub item: T,
    pub keep: bool,
}

/// Editable copy of a parser's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPreview<T> {
    rows: Vec<PreviewRow<T>>,
}

impl<T> ImportPreview<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            rows: items
                .into_iter()
                .map(|item| PreviewRow { item, keep: true })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[PreviewRow<T>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn kept_count(&self) -> usize {
        self.rows.iter().filter(|r| r.keep).count()
    }

    /// Set the keep flag of row `index`. Returns `false` if there is no such row.
    pub fn set_keep(&mut self, index: usize, keep: bool) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.keep = keep;
                true
            }
            None => false,
        }
    }

    /// Flip the keep flag of row `index`, returning the new value.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let row = self.rows.get_mut(index)?;
        row.keep = !row.keep;
        Some(row.keep)
    }

    /// Mutable access to the record at `index`, for in-place edits.
    pub fn item_mut(&mut self, index: usize) -> Option<&mut T> {
        self.rows.get_mut(index).map(|r| &mut r.item)
    }

    /// Keep only rows for which `f` returns true; the rest are unticked.
    pub fn keep_where(&mut self, mut f: impl FnMut(&T) -> bool) {
        for row in &mut self.rows {
            row.keep = f(&row.item);
        }
    }

    /// The kept records, in original order.
    pub fn accept(self) -> Vec<T> {
        self.rows
            .into_iter()
            .filter(|r| r.keep)
            .map(|r| r.item)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ParsedStockItem;

    fn preview() -> ImportPreview<ParsedStockItem> {
        ImportPreview::new(vec![
            ParsedStockItem::new("Milk", 12),
            ParsedStockItem::new("Page footer", 0),
            ParsedStockItem::new("Cups", 240),
        ])
    }

    #[test]
    fn everything_kept_by_default() {
        let p = preview();
        assert_eq!(p.len(), 3);
        assert_eq!(p.kept_count(), 3);
    }

    #[test]
    fn toggled_rows_are_dropped_on_accept() {
        let mut p = preview();
        assert_eq!(p.toggle(1), Some(false));
        assert_eq!(p.toggle(9), None);
        let names: Vec<_> = p.accept().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Milk", "Cups"]);
    }

    #[test]
    fn edits_do_not_touch_the_source() {
        let parsed = vec![ParsedStockItem::new("Mlik", 12)];
        let mut p = ImportPreview::new(parsed.clone());
        if let Some(item) = p.item_mut(0) {
            item.name = "Milk".into();
            item.qty = 10;
        }
        assert_eq!(parsed[0].name, "Mlik");
        assert_eq!(p.accept(), vec![ParsedStockItem::new("Milk", 10)]);
    }

    #[test]
    fn keep_where_filters_zero_quantities() {
        let mut p = preview();
        p.keep_where(|i| i.qty > 0);
        assert_eq!(p.kept_count(), 2);
        assert!(!p.set_keep(5, true));
        assert!(p.set_keep(1, true));
        assert_eq!(p.accept().len(), 3);
    }
}
