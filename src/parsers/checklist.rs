//! Checklist parser: `(section, task)` pairs with a running section header.
//!
//! ```text
//! OPENING                      header (all caps)
//! Power on espresso machine    task, section "Opening"
//! Daily:                       header (trailing colon)
//! Wipe counters                task, section "Daily"
//! Page 2                       noise
//! ```
//!
//! The only state is the current section. It is carried in a
//! [`ChecklistState`] folded over the lines, so each call starts from an
//! empty state and two documents can be parsed on different threads without
//! sharing anything.

use crate::output::ParsedChecklistTask;
use crate::text::title_case;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

/// All-caps headers must be shorter than this many characters.
const MAX_CAPS_HEADER_CHARS: usize = 40;

static RE_CAPS_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9\s]{3,}$").unwrap());

static RE_TRAILING_COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r"[:：]\s*$").unwrap());

static RE_KEYWORD_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:opening|closing|daily|weekly|monthly)\b").unwrap());

static RE_PAGE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^page\s+[0-9]+").unwrap());

/// Classification of a single checklist line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistLine {
    /// Starts a new section. `None` when the header text is empty after
    /// stripping its colon.
    Header(Option<String>),
    /// Page number footer; discarded.
    Noise,
    Task(String),
}

/// Classify a trimmed, non-blank line.
///
/// Order matters: an all-caps line is a header even if it would also pass the
/// keyword test, and `Page 3:` is a header, not noise.
pub fn classify_checklist_line(line: &str) -> ChecklistLine {
    if RE_CAPS_HEADER.is_match(line) && line.chars().count() < MAX_CAPS_HEADER_CHARS {
        return ChecklistLine::Header(Some(title_case(line)));
    }

    if RE_TRAILING_COLON.is_match(line) || RE_KEYWORD_HEADER.is_match(line) {
        let stripped = RE_TRAILING_COLON.replace(line, "");
        let title = title_case(stripped.trim());
        return ChecklistLine::Header((!title.is_empty()).then_some(title));
    }

    if RE_PAGE_NUMBER.is_match(line) {
        return ChecklistLine::Noise;
    }

    ChecklistLine::Task(line.to_string())
}

/// Accumulator threaded through [`parse_checklist_lines`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistState {
    pub section: Option<String>,
    pub tasks: Vec<ParsedChecklistTask>,
}

impl ChecklistState {
    /// Consume one raw line and return the updated state.
    pub fn step(mut self, raw: &str) -> Self {
        let line = raw.trim();
        if line.is_empty() {
            return self;
        }
        match classify_checklist_line(line) {
            ChecklistLine::Header(section) => {
                trace!(?section, "checklist section");
                self.section = section;
            }
            ChecklistLine::Noise => trace!(line, "checklist noise skipped"),
            ChecklistLine::Task(text) => self.tasks.push(ParsedChecklistTask {
                section: self.section.clone(),
                text,
            }),
        }
        self
    }
}

/// Parse the lines of a checklist into tasks.
///
/// Each task carries the title-cased text of the nearest header above it, or
/// no section if no header has been seen yet in this call.
pub fn parse_checklist_lines<I, S>(lines: I) -> Vec<ParsedChecklistTask>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let state = lines
        .into_iter()
        .fold(ChecklistState::default(), |state, line| {
            state.step(line.as_ref())
        });
    debug!("Parsed {} checklist tasks", state.tasks.len());
    state.tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(line: &str) -> Option<String> {
        match classify_checklist_line(line) {
            ChecklistLine::Header(section) => section,
            other => panic!("{line:?} classified as {other:?}"),
        }
    }

    #[test]
    fn caps_line_is_header() {
        assert_eq!(header("OPENING").as_deref(), Some("Opening"));
        assert_eq!(header("BAR 2 CLOSE").as_deref(), Some("Bar 2 Close"));
    }

    #[test]
    fn caps_header_length_bounds() {
        // too short for the caps rule, and not a keyword
        assert_eq!(
            classify_checklist_line("AM"),
            ChecklistLine::Task("AM".into())
        );
        let long = "A".repeat(40);
        assert_eq!(classify_checklist_line(&long), ChecklistLine::Task(long));
    }

    #[test]
    fn colon_header_is_title_cased() {
        assert_eq!(header("DAILY:").as_deref(), Some("Daily"));
        assert_eq!(header("Front of house：").as_deref(), Some("Front Of House"));
        assert_eq!(header("Before service:   ").as_deref(), Some("Before Service"));
    }

    #[test]
    fn keyword_header_without_colon() {
        assert_eq!(header("closing duties").as_deref(), Some("Closing Duties"));
        assert_eq!(header("Weekly").as_deref(), Some("Weekly"));
    }

    #[test]
    fn keyword_needs_word_boundary() {
        assert_eq!(
            classify_checklist_line("Dailyish wipe"),
            ChecklistLine::Task("Dailyish wipe".into())
        );
    }

    #[test]
    fn bare_colon_clears_section() {
        assert_eq!(header(":"), None);
        let tasks = parse_checklist_lines(["OPENING", "Unlock doors", " : ", "Count float"]);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].section.as_deref(), Some("Opening"));
        assert_eq!(tasks[1].section, None);
        assert_eq!(tasks[1].text, "Count float");
    }

    #[test]
    fn page_footer_is_noise() {
        assert_eq!(classify_checklist_line("page 2 of 3"), ChecklistLine::Noise);
        // all caps wins before the noise filter
        assert_eq!(header("PAGE 2").as_deref(), Some("Page 2"));
    }

    #[test]
    fn tasks_before_any_header_have_no_section() {
        let tasks = parse_checklist_lines(["Check float", "OPENING", "Unlock"]);
        assert_eq!(tasks[0].section, None);
        assert_eq!(tasks[1].section.as_deref(), Some("Opening"));
    }

    #[test]
    fn state_step_ignores_blank_lines() {
        let state = ChecklistState::default().step("   ").step("");
        assert_eq!(state, ChecklistState::default());
    }

    #[test]
    fn separate_calls_do_not_share_section() {
        let first = parse_checklist_lines(["CLOSING", "Mop floor"]);
        let second = parse_checklist_lines(["Mop floor"]);
        assert_eq!(first[0].section.as_deref(), Some("Closing"));
        assert_eq!(second[0].section, None);
    }
}
