//! The fourteen allergens tracked on the cafe's allergen matrix.
//!
//! Reference sheets spell allergens however their author liked (`Egg`,
//! `EGGS`, `Sulphites`). [`Allergen::from_label`] folds those spellings onto
//! the fixed set so matcher output can be ticked off against the matrix;
//! anything it does not recognise is handed back untouched by
//! [`canonicalize`].

use crate::text::normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allergen {
    Celery,
    Gluten,
    Crustaceans,
    Eggs,
    Fish,
    Lupin,
    Milk,
    Molluscs,
    Mustard,
    Nuts,
    Peanuts,
    Sesame,
    Soya,
    Sulphites,
}

impl Allergen {
    /// Matrix column order.
    pub const ALL: [Allergen; 14] = [
        Allergen::Celery,
        Allergen::Gluten,
        Allergen::Crustaceans,
        Allergen::Eggs,
        Allergen::Fish,
        Allergen::Lupin,
        Allergen::Milk,
        Allergen::Molluscs,
        Allergen::Mustard,
        Allergen::Nuts,
        Allergen::Peanuts,
        Allergen::Sesame,
        Allergen::Soya,
        Allergen::Sulphites,
    ];

    /// Lowercase storage key.
    pub fn key(self) -> &'static str {
        match self {
            Allergen::Celery => "celery",
            Allergen::Gluten => "gluten",
            Allergen::Crustaceans => "crustaceans",
            Allergen::Eggs => "eggs",
            Allergen::Fish => "fish",
            Allergen::Lupin => "lupin",
            Allergen::Milk => "milk",
            Allergen::Molluscs => "molluscs",
            Allergen::Mustard => "mustard",
            Allergen::Nuts => "nuts",
            Allergen::Peanuts => "peanuts",
            Allergen::Sesame => "sesame",
            Allergen::Soya => "soya",
            Allergen::Sulphites => "sulphites",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Allergen::Celery => "Celery",
            Allergen::Gluten => "Gluten",
            Allergen::Crustaceans => "Crustaceans",
            Allergen::Eggs => "Eggs",
            Allergen::Fish => "Fish",
            Allergen::Lupin => "Lupin",
            Allergen::Milk => "Milk",
            Allergen::Molluscs => "Molluscs",
            Allergen::Mustard => "Mustard",
            Allergen::Nuts => "Nuts",
            Allergen::Peanuts => "Peanuts",
            Allergen::Sesame => "Sesame",
            Allergen::Soya => "Soya",
            Allergen::Sulphites => "Sulphites",
        }
    }

    /// Recognise a free-text label: the key, or its singular form, compared
    /// after normalisation (`" EGG "` → `Eggs`).
    pub fn from_label(label: &str) -> Option<Allergen> {
        let n = normalize(label);
        if n.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|a| {
            let key = a.key();
            n == key || key.strip_suffix('s') == Some(n.as_str())
        })
    }
}

impl fmt::Display for Allergen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a label names none of the fourteen allergens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a recognised allergen")]
pub struct UnknownAllergen(pub String);

impl FromStr for Allergen {
    type Err = UnknownAllergen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Allergen::from_label(s).ok_or_else(|| UnknownAllergen(s.to_string()))
    }
}

/// Split free-text labels into recognised allergens and leftovers.
///
/// Leftovers keep their original spelling and order, without duplicates.
pub fn canonicalize<I, S>(labels: I) -> (BTreeSet<Allergen>, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut known = BTreeSet::new();
    let mut other: Vec<String> = Vec::new();
    for label in labels {
        let label = label.as_ref();
        match Allergen::from_label(label) {
            Some(a) => {
                known.insert(a);
            }
            None => {
                if !other.iter().any(|o| o == label) {
                    other.push(label.to_string());
                }
            }
        }
    }
    (known, other)
}
