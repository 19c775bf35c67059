//! Allergen sheet parser: ingredient → allergen labels.
//!
//! Reference sheets list one ingredient per line in one of a few layouts:
//!
//! ```text
//! Pesto: Milk, Nuts            ingredient, colon, allergens
//! Brioche - Gluten; Eggs       ingredient, dash, allergens
//! Milk and Soy — Latte         allergens, dash, ingredient (opt-in)
//! Tahini,Sesame                plain comma row
//! ```
//!
//! A line matched by a separator rule is split into allergen labels on `;`,
//! `,`, `/` or the word `and`. The comma row is the exception: everything
//! after the first cell is taken verbatim. Lines no rule accepts are skipped.
//!
//! With the default [`AllergenLayout::IngredientFirst`] the chain is
//! ingredient-first, then allergens-first, then comma. The allergens-first
//! rule can never fire there, since every line it accepts was already taken
//! by the ingredient-first rule. Sheets written allergens-first need
//! [`AllergenLayout::AllergensFirst`], which tries the dash rule the other way
//! round before falling back.

use crate::config::AllergenLayout;
use crate::output::AllergenMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

static RE_INGREDIENT_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*[:\-–—]\s*(.+)$").unwrap());

static RE_COLON_INGREDIENT_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)\s*:\s*(.+)$").unwrap());

static RE_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+?)\s*[\-–—]\s*(.+)$").unwrap());

static RE_LETTER_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[a-z]{2,}").unwrap());

static RE_LABEL_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[;,/]| and ").unwrap());

/// One ingredient row recovered from a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllergenEntry {
    pub ingredient: String,
    pub allergens: Vec<String>,
}

/// One step of the allergen line classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllergenRule {
    /// `Ingredient : allergens` with `:`, `-`, `–` or `—`.
    IngredientThenAllergens,
    /// `Ingredient : allergens` with a colon only.
    ColonIngredientThenAllergens,
    /// `allergens - Ingredient` with `-`, `–` or `—`; the left side must
    /// contain a run of two letters.
    AllergensThenIngredient,
    /// `Ingredient, allergen, allergen`, cells kept verbatim.
    CommaRow,
}

impl AllergenRule {
    const INGREDIENT_FIRST_CHAIN: [AllergenRule; 3] = [
        AllergenRule::IngredientThenAllergens,
        AllergenRule::AllergensThenIngredient,
        AllergenRule::CommaRow,
    ];

    const ALLERGENS_FIRST_CHAIN: [AllergenRule; 4] = [
        AllergenRule::ColonIngredientThenAllergens,
        AllergenRule::AllergensThenIngredient,
        AllergenRule::IngredientThenAllergens,
        AllergenRule::CommaRow,
    ];

    /// Rules in priority order for a sheet layout.
    pub fn chain(layout: AllergenLayout) -> &'static [AllergenRule] {
        match layout {
            AllergenLayout::IngredientFirst => &Self::INGREDIENT_FIRST_CHAIN,
            AllergenLayout::AllergensFirst => &Self::ALLERGENS_FIRST_CHAIN,
        }
    }

    /// Apply this rule alone to a trimmed, non-blank line.
    pub fn apply(self, line: &str) -> Option<AllergenEntry> {
        match self {
            AllergenRule::IngredientThenAllergens => ingredient_first(&RE_INGREDIENT_FIRST, line),
            AllergenRule::ColonIngredientThenAllergens => {
                ingredient_first(&RE_COLON_INGREDIENT_FIRST, line)
            }
            AllergenRule::AllergensThenIngredient => {
                let caps = RE_DASH.captures(line)?;
                let left = caps[1].trim();
                let right = caps[2].trim();
                (RE_LETTER_RUN.is_match(left) && !right.is_empty()).then(|| AllergenEntry {
                    ingredient: right.to_string(),
                    allergens: split_labels(left),
                })
            }
            AllergenRule::CommaRow => {
                let mut parts = line.split(',').map(str::trim).filter(|p| !p.is_empty());
                let ingredient = parts.next()?;
                let allergens: Vec<String> = parts.map(str::to_string).collect();
                (!allergens.is_empty()).then(|| AllergenEntry {
                    ingredient: ingredient.to_string(),
                    allergens,
                })
            }
        }
    }
}

fn ingredient_first(re: &Regex, line: &str) -> Option<AllergenEntry> {
    let caps = re.captures(line)?;
    let ingredient = caps[1].trim();
    if ingredient.is_empty() {
        return None;
    }
    Some(AllergenEntry {
        ingredient: ingredient.to_string(),
        allergens: split_labels(caps[2].trim()),
    })
}

/// Split an allergen list on `;`, `,`, `/` and ` and `, dropping empty labels.
pub fn split_labels(list: &str) -> Vec<String> {
    RE_LABEL_SEPARATOR
        .split(list)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run a trimmed, non-blank line through the chain for `layout`.
pub fn classify_allergen_line(
    line: &str,
    layout: AllergenLayout,
) -> Option<(AllergenRule, AllergenEntry)> {
    AllergenRule::chain(layout)
        .iter()
        .find_map(|&rule| rule.apply(line).map(|entry| (rule, entry)))
}

/// Parser for allergen reference sheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllergenParser {
    pub layout: AllergenLayout,
}

impl AllergenParser {
    pub fn new(layout: AllergenLayout) -> Self {
        Self { layout }
    }

    /// Parse extracted lines. Blank and unrecognised lines are skipped.
    pub fn parse_lines<I, S>(&self, lines: I) -> AllergenMap
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = AllergenMap::new();
        let mut skipped = 0usize;

        for raw in lines {
            let line = raw.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            match classify_allergen_line(line, self.layout) {
                Some((rule, entry)) => {
                    trace!(?rule, ingredient = %entry.ingredient, "allergen line");
                    map.insert(entry.ingredient, entry.allergens);
                }
                None => {
                    trace!(line, "allergen line not recognised");
                    skipped += 1;
                }
            }
        }

        debug!(
            "Parsed {} ingredients ({} lines skipped)",
            map.len(),
            skipped
        );
        map
    }

    /// Parse a CSV-style text block: one ingredient per line, `\n` or `\r\n`
    /// endings, blank lines ignored.
    pub fn parse_csv(&self, text: &str) -> AllergenMap {
        self.parse_lines(text.lines().map(str::trim).filter(|l| !l.is_empty()))
    }
}

/// Parse allergen sheet lines with the default (ingredient-first) layout.
pub fn parse_allergen_lines<I, S>(lines: I) -> AllergenMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    AllergenParser::default().parse_lines(lines)
}

/// Parse a CSV-style allergen text block with the default layout.
pub fn parse_allergen_csv(text: &str) -> AllergenMap {
    AllergenParser::default().parse_csv(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(line: &str) -> (AllergenRule, AllergenEntry) {
        classify_allergen_line(line, AllergenLayout::IngredientFirst)
            .unwrap_or_else(|| panic!("{line:?} not recognised"))
    }

    fn labels(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn colon_line() {
        let (rule, e) = entry("Ingredient: Milk, Soy");
        assert_eq!(rule, AllergenRule::IngredientThenAllergens);
        assert_eq!(e.ingredient, "Ingredient");
        assert_eq!(e.allergens, labels(&["Milk", "Soy"]));
    }

    #[test]
    fn dash_variants_and_separators() {
        let (_, e) = entry("Brioche - Gluten; Eggs / Milk");
        assert_eq!(e.ingredient, "Brioche");
        assert_eq!(e.allergens, labels(&["Gluten", "Eggs", "Milk"]));

        let (_, e) = entry("Satay — Peanuts AND Soya");
        assert_eq!(e.ingredient, "Satay");
        assert_eq!(e.allergens, labels(&["Peanuts", "Soya"]));

        let (_, e) = entry("Mayo–Eggs");
        assert_eq!(e.allergens, labels(&["Eggs"]));
    }

    #[test]
    fn and_must_be_a_separate_word() {
        assert_eq!(split_labels("Sandalwood, Mustard"), labels(&["Sandalwood", "Mustard"]));
    }

    #[test]
    fn first_separator_splits_the_line() {
        let (_, e) = entry("Gluten-free bread: Soy");
        assert_eq!(e.ingredient, "Gluten");
        assert_eq!(e.allergens, labels(&["free bread: Soy"]));
    }

    #[test]
    fn allergens_first_rule_is_shadowed_by_default() {
        let (rule, e) = entry("Milk, Soy - Latte");
        assert_eq!(rule, AllergenRule::IngredientThenAllergens);
        assert_eq!(e.ingredient, "Milk, Soy");
        assert_eq!(e.allergens, labels(&["Latte"]));
    }

    #[test]
    fn allergens_first_rule_in_isolation() {
        let e = AllergenRule::AllergensThenIngredient
            .apply("Milk, Soy - Latte")
            .unwrap();
        assert_eq!(e.ingredient, "Latte");
        assert_eq!(e.allergens, labels(&["Milk", "Soy"]));
        // left side needs a two-letter run
        assert_eq!(AllergenRule::AllergensThenIngredient.apply("1 - Latte"), None);
        assert_eq!(AllergenRule::AllergensThenIngredient.apply("Pesto: Milk"), None);
    }

    #[test]
    fn allergens_first_layout() {
        let parser = AllergenParser::new(AllergenLayout::AllergensFirst);
        let map = parser.parse_lines(["Milk and Soy — Latte", "Pesto: Milk, Nuts"]);
        assert_eq!(map["Latte"], labels(&["Milk", "Soy"]));
        assert_eq!(map["Pesto"], labels(&["Milk", "Nuts"]));
    }

    #[test]
    fn comma_row_keeps_cells_verbatim() {
        let (rule, e) = entry("Tahini, Sesame / Seeds ,, Mustard");
        assert_eq!(rule, AllergenRule::CommaRow);
        assert_eq!(e.ingredient, "Tahini");
        assert_eq!(e.allergens, labels(&["Sesame / Seeds", "Mustard"]));
    }

    #[test]
    fn unrecognised_lines_are_skipped() {
        assert_eq!(classify_allergen_line("Allergen Matrix", AllergenLayout::IngredientFirst), None);
        assert_eq!(classify_allergen_line("Soup,", AllergenLayout::IngredientFirst), None);
        let map = parse_allergen_lines(["Allergen Matrix", "", "Pesto: Nuts"]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn empty_label_list_is_recorded() {
        let map = parse_allergen_lines(["Water: ;"]);
        assert_eq!(map["Water"], Vec::<String>::new());
    }

    #[test]
    fn duplicates_are_kept_and_later_rows_replace() {
        let map = parse_allergen_lines(["Cake: Milk, Milk", "Bread: Gluten", "Cake: Eggs"]);
        assert_eq!(map["Cake"], labels(&["Eggs"]));
        let map = parse_allergen_lines(["Cake: Milk, Milk"]);
        assert_eq!(map["Cake"], labels(&["Milk", "Milk"]));
    }

    #[test]
    fn csv_block_with_crlf() {
        let map = parse_allergen_csv("Pesto,Milk,Nuts\r\n\r\n  \r\nHummus,Sesame\n");
        assert_eq!(map.len(), 2);
        assert_eq!(map["Pesto"], labels(&["Milk", "Nuts"]));
        assert_eq!(map["Hummus"], labels(&["Sesame"]));
    }
}
