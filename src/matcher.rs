//! Allergen matcher: which allergens does a dish name imply?
//!
//! Both the dish name and each ingredient key are normalised with
//! [`crate::text::normalize`]. An ingredient applies to a dish when:
//!
//! 1. its normalised name occurs anywhere in the normalised dish name
//!    (plain substring, so `"ham"` also hits `"graham"`), or
//! 2. enough of its words appear among the dish's words: at least half of
//!    the ingredient's word count, rounded down, and never fewer than one.
//!
//! Rule 1 is checked first and always wins; rule 2 only widens the result.
//! Ingredients that normalise to nothing (`"***"`) are ignored.

use crate::output::AllergenMap;
use crate::text::normalize;
use std::collections::{BTreeSet, HashSet};
use tracing::trace;

/// An allergen map prepared for matching many dish names.
///
/// Normalising every ingredient once up front keeps repeated lookups (a
/// whole menu against one reference sheet) cheap.
#[derive(Debug, Clone)]
pub struct AllergenMatcher<'a> {
    ingredients: Vec<PreparedIngredient<'a>>,
}

#[derive(Debug, Clone)]
struct PreparedIngredient<'a> {
    name: &'a str,
    normalized: String,
    tokens: Vec<String>,
    allergens: &'a [String],
}

impl PreparedIngredient<'_> {
    fn applies_to(&self, dish: &str, dish_tokens: &HashSet<&str>) -> bool {
        if dish.contains(self.normalized.as_str()) {
            return true;
        }
        let common = self
            .tokens
            .iter()
            .filter(|t| dish_tokens.contains(t.as_str()))
            .count();
        common >= (self.tokens.len() / 2).max(1)
    }
}

impl<'a> AllergenMatcher<'a> {
    pub fn new(map: &'a AllergenMap) -> Self {
        let ingredients = map
            .iter()
            .filter_map(|(name, allergens)| {
                let normalized = normalize(name);
                if normalized.is_empty() {
                    return None;
                }
                let tokens = normalized.split(' ').map(str::to_string).collect();
                Some(PreparedIngredient {
                    name,
                    normalized,
                    tokens,
                    allergens,
                })
            })
            .collect();
        Self { ingredients }
    }

    /// Allergens attributed to `dish`, deduplicated.
    pub fn matches(&self, dish: &str) -> BTreeSet<String> {
        let dish = normalize(dish);
        let dish_tokens: HashSet<&str> = dish.split(' ').filter(|t| !t.is_empty()).collect();

        let mut found = BTreeSet::new();
        for ingredient in &self.ingredients {
            if ingredient.applies_to(&dish, &dish_tokens) {
                trace!(dish = %dish, ingredient = ingredient.name, "ingredient matched");
                found.extend(ingredient.allergens.iter().cloned());
            }
        }
        found
    }

    /// Ingredient keys (as written on the sheet) that apply to `dish`.
    pub fn matching_ingredients(&self, dish: &str) -> Vec<&'a str> {
        let dish = normalize(dish);
        let dish_tokens: HashSet<&str> = dish.split(' ').filter(|t| !t.is_empty()).collect();
        self.ingredients
            .iter()
            .filter(|i| i.applies_to(&dish, &dish_tokens))
            .map(|i| i.name)
            .collect()
    }
}

/// Allergens attributed to `dish` by `map`.
///
/// Convenience for a single lookup; build an [`AllergenMatcher`] when
/// matching several dishes against the same map.
pub fn match_allergens(dish: &str, map: &AllergenMap) -> BTreeSet<String> {
    AllergenMatcher::new(map).matches(dish)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(rows: &[(&str, &[&str])]) -> AllergenMap {
        rows.iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn substring_match() {
        let m = map(&[("Cheddar", &["Milk"])]);
        assert_eq!(match_allergens("Ham & Cheddar Toastie", &m), set(&["Milk"]));
    }

    #[test]
    fn substring_ignores_word_boundaries() {
        let m = map(&[("ham", &["Sulphites"])]);
        assert_eq!(match_allergens("Graham crackers", &m), set(&["Sulphites"]));
    }

    #[test]
    fn case_is_ignored_but_accents_are_not_stripped() {
        let m = map(&[("CRÈME fraîche", &["Milk"])]);
        assert_eq!(match_allergens("Soup with crème Fraîche", &m), set(&["Milk"]));
        assert!(match_allergens("Soup with creme fraiche", &m).is_empty());
    }

    #[test]
    fn unaccented_key_misses_accented_dish() {
        let m = map(&[("creme", &["Milk"])]);
        assert!(match_allergens("Crème caramel", &m).is_empty());
    }

    #[test]
    fn token_overlap_half_rounded_down() {
        // 3 tokens: needs 1
        let m = map(&[("smoked salmon fillet", &["Fish"])]);
        assert_eq!(match_allergens("Salmon bagel", &m), set(&["Fish"]));
        // 4 tokens: needs 2
        let m = map(&[("wholemeal seeded bread roll", &["Gluten", "Sesame"])]);
        assert!(match_allergens("Seeded bagel", &m).is_empty());
        assert_eq!(
            match_allergens("Bread roll, seeded", &m),
            set(&["Gluten", "Sesame"])
        );
    }

    #[test]
    fn single_token_needs_one() {
        let m = map(&[("pesto", &["Nuts"])]);
        assert!(match_allergens("Tomato soup", &m).is_empty());
    }

    #[test]
    fn empty_ingredient_is_skipped() {
        let m = map(&[("***", &["Celery"]), ("", &["Mustard"])]);
        assert!(match_allergens("anything at all", &m).is_empty());
        assert!(match_allergens("", &m).is_empty());
    }

    #[test]
    fn results_are_deduplicated_across_ingredients() {
        let m = map(&[("Cheddar", &["Milk"]), ("Butter", &["Milk", "Milk"])]);
        assert_eq!(match_allergens("Cheddar & butter scone", &m), set(&["Milk"]));
    }

    #[test]
    fn matcher_reports_ingredients() {
        let m = map(&[("Cheddar", &["Milk"]), ("Egg mayo", &["Eggs"]), ("Tuna", &["Fish"])]);
        let matcher = AllergenMatcher::new(&m);
        assert_eq!(matcher.matching_ingredients("Egg & cheddar muffin"), vec!["Cheddar", "Egg mayo"]);
    }
}
