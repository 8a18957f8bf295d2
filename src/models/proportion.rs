//! Proportional composition model
//!
//! Per-recipe ingredient fractions plus explicit flag/unknown channels.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::measure::ConvertedCell;

/// Composition of one recipe
///
/// `fractions` holds numeric cells only; flagged and unknown ingredients
/// are listed separately and never appear as 0.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProportionRecord {
    pub name: String,
    pub fractions: BTreeMap<String, f64>,
    pub flagged: BTreeSet<String>,
    pub unknown: BTreeSet<String>,
}

impl ProportionRecord {
    /// Split normalized cells into the fraction and marker channels
    pub fn from_cells(name: impl Into<String>, cells: &BTreeMap<String, ConvertedCell>) -> Self {
        let mut record = Self {
            name: name.into(),
            ..Default::default()
        };

        for (ingredient, cell) in cells {
            match cell {
                ConvertedCell::Amount(v) => {
                    record.fractions.insert(ingredient.clone(), *v);
                }
                ConvertedCell::Flag => {
                    record.flagged.insert(ingredient.clone());
                }
                ConvertedCell::Unknown => {
                    record.unknown.insert(ingredient.clone());
                }
            }
        }

        record
    }

    /// Fraction for an ingredient; absent ingredients are 0.0
    pub fn fraction(&self, ingredient: &str) -> f64 {
        self.fractions.get(ingredient).copied().unwrap_or(0.0)
    }

    /// Sum of numeric fractions (1.0 unless the recipe had no usable amounts)
    pub fn total(&self) -> f64 {
        self.fractions.values().sum()
    }

    /// Every ingredient mentioned in any channel
    pub fn ingredients(&self) -> impl Iterator<Item = &str> {
        self.fractions
            .keys()
            .chain(self.flagged.iter())
            .chain(self.unknown.iter())
            .map(String::as_str)
    }
}

/// Dense view over many recipes and the union of their ingredients
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProportionTable {
    pub ingredients: BTreeSet<String>,
    pub recipes: BTreeMap<String, ProportionRecord>,
}

impl ProportionTable {
    pub fn new(records: impl IntoIterator<Item = ProportionRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            table.insert(record);
        }
        table
    }

    /// Add or replace a recipe
    ///
    /// Ingredients only the replaced record mentioned leave the union.
    pub fn insert(&mut self, record: ProportionRecord) -> Option<ProportionRecord> {
        self.ingredients
            .extend(record.ingredients().map(String::from));
        let replaced = self.recipes.insert(record.name.clone(), record);
        if replaced.is_some() {
            self.ingredients = self
                .recipes
                .values()
                .flat_map(|r| r.ingredients().map(String::from))
                .collect();
        }
        replaced
    }

    /// Fraction of an ingredient in a recipe; None only for unknown recipes
    pub fn fraction(&self, recipe: &str, ingredient: &str) -> Option<f64> {
        self.recipes.get(recipe).map(|r| r.fraction(ingredient))
    }

    pub fn is_flagged(&self, recipe: &str, ingredient: &str) -> bool {
        self.recipes
            .get(recipe)
            .is_some_and(|r| r.flagged.contains(ingredient))
    }

    pub fn is_unknown(&self, recipe: &str, ingredient: &str) -> bool {
        self.recipes
            .get(recipe)
            .is_some_and(|r| r.unknown.contains(ingredient))
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
