//! Line grouping: turn positioned text fragments into text lines.
//!
//! A PDF has no notion of a line; its text layer is a list of runs, each with
//! a position. A stock sheet row like `Whole Milk ........ 12` usually comes
//! out as two or three runs sharing (almost) the same baseline. Walking the
//! runs in document order and breaking whenever the baseline jumps by at
//! least the tolerance recovers the visual rows well enough for the parsers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A run of text and the vertical position of its baseline, in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub y: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, y: f32) -> Self {
        Self {
            text: text.into(),
            y,
        }
    }
}

/// Group the fragments of one page into lines.
///
/// A fragment whose `y` is within `tolerance` of the previous fragment's
/// `y` joins the current line, separated by one space; any larger jump
/// starts a new line. Lines are trimmed. Empty lines may be returned and are
/// removed by [`clean_lines`].
pub fn group_fragments(fragments: &[TextFragment], tolerance: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut last_y: Option<f32> = None;

    for fragment in fragments {
        let same_line = last_y.is_none_or(|y| (fragment.y - y).abs() < tolerance);
        if same_line {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&fragment.text);
        } else {
            lines.push(current.trim().to_string());
            current = fragment.text.clone();
        }
        last_y = Some(fragment.y);
    }
    if !current.is_empty() {
        lines.push(current.trim().to_string());
    }

    lines
}

static RE_SPACED_NBSP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\x{00A0}\s+").unwrap());

/// Drop blank lines and collapse a non-breaking space padded by whitespace
/// to a single space.
pub fn clean_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|l| !l.as_ref().is_empty())
        .map(|l| RE_SPACED_NBSP.replace_all(l.as_ref(), " ").into_owned())
        .collect()
}

/// Group and clean every page, closing the open line at each page boundary.
pub fn lines_from_pages<P>(pages: P, tolerance: f32) -> Vec<String>
where
    P: IntoIterator,
    P::Item: AsRef<[TextFragment]>,
{
    let grouped: Vec<String> = pages
        .into_iter()
        .flat_map(|page| group_fragments(page.as_ref(), tolerance))
        .collect();
    clean_lines(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, y: f32) -> TextFragment {
        TextFragment::new(text, y)
    }

    #[test]
    fn fragments_on_one_baseline_join() {
        let lines = group_fragments(
            &[frag("Whole Milk", 700.0), frag("12", 701.5), frag("pcs", 699.0)],
            5.0,
        );
        assert_eq!(lines, vec!["Whole Milk 12 pcs"]);
    }

    #[test]
    fn jump_starts_new_line() {
        let lines = group_fragments(
            &[frag("OPENING", 700.0), frag("Unlock doors", 680.0), frag("Lights", 660.0)],
            5.0,
        );
        assert_eq!(lines, vec!["OPENING", "Unlock doors", "Lights"]);
    }

    #[test]
    fn tolerance_is_exclusive() {
        let lines = group_fragments(&[frag("a", 10.0), frag("b", 15.0)], 5.0);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn drift_is_measured_against_previous_fragment() {
        // each step is small even though first and last are far apart
        let lines = group_fragments(
            &[frag("a", 10.0), frag("b", 13.0), frag("c", 16.0), frag("d", 19.0)],
            5.0,
        );
        assert_eq!(lines, vec!["a b c d"]);
    }

    #[test]
    fn empty_fragments_leave_blank_lines_for_cleaning() {
        let lines = group_fragments(&[frag(" ", 10.0), frag("x", 40.0)], 5.0);
        assert_eq!(lines, vec!["", "x"]);
        assert_eq!(clean_lines(lines), vec!["x"]);
    }

    #[test]
    fn clean_collapses_padded_nbsp() {
        let cleaned = clean_lines(["Milk \u{00A0} 12", "Oat\u{00A0}Milk"]);
        assert_eq!(cleaned, vec!["Milk 12", "Oat\u{00A0}Milk"]);
    }

    #[test]
    fn pages_do_not_merge() {
        let pages = vec![vec![frag("end of page one", 40.0)], vec![frag("top of page two", 40.0)]];
        assert_eq!(
            lines_from_pages(&pages, 5.0),
            vec!["end of page one", "top of page two"]
        );
    }

    #[test]
    fn no_fragments_no_lines() {
        assert!(lines_from_pages(Vec::<Vec<TextFragment>>::new(), 5.0).is_empty());
    }
}
