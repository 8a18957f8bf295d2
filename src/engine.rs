//! Normalization engine
//!
//! Runs parse -> resolve -> convert over every cell of a recipe, then
//! turns converted recipes into proportional compositions.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::measure::{
    batch_to_ml, parse_quantity, resolve, to_ml, ConvertedCell, ParsedQuantity, ResolvedUnit,
    Vocabulary,
};
use crate::models::{ConvertedRecord, ProportionRecord, ProportionTable, RecipeRecord};

/// Full trace of one measure through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureOutcome {
    pub parsed: ParsedQuantity,
    pub resolved: Option<ResolvedUnit>,
    pub converted: ConvertedCell,
}

/// Every stage of a batch run, ordered by recipe name
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedBatch {
    pub converted: BTreeMap<String, ConvertedRecord>,
    pub proportions: ProportionTable,
    /// Unit phrases no vocabulary tier could resolve
    pub unresolved_units: BTreeSet<String>,
}

/// Measurement normalization engine over a fixed vocabulary
#[derive(Debug, Clone)]
pub struct Engine {
    vocab: Arc<Vocabulary>,
    verbose: bool,
}

impl Engine {
    pub fn new(vocab: Vocabulary) -> Self {
        Self {
            vocab: Arc::new(vocab),
            verbose: false,
        }
    }

    /// Log fuzzy unit fallbacks at info instead of trace
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Parse, resolve and convert a single raw measure
    pub fn normalize_measure(&self, raw: &str) -> MeasureOutcome {
        let parsed = parse_quantity(raw);
        let resolved = resolve(&self.vocab, &parsed.unit_phrase, self.verbose);
        let converted = to_ml(
            &self.vocab,
            parsed.value,
            resolved.as_ref().map(|r| r.unit.as_str()),
        );

        MeasureOutcome {
            parsed,
            resolved,
            converted,
        }
    }

    /// Convert a value in a canonical unit
    pub fn convert(&self, value: f64, unit: Option<&str>) -> ConvertedCell {
        to_ml(&self.vocab, value, unit)
    }

    /// Convert parallel value/unit lists
    pub fn batch_convert(&self, values: &[f64], units: &[Option<String>]) -> Vec<ConvertedCell> {
        batch_to_ml(&self.vocab, values, units)
    }

    /// Parallel value and unit-phrase lists for the populated cells of a recipe
    pub fn split_row(&self, record: &RecipeRecord) -> (Vec<f64>, Vec<String>) {
        record
            .populated()
            .map(|(_, raw)| {
                let parsed = parse_quantity(raw);
                (parsed.value, parsed.unit_phrase)
            })
            .unzip()
    }

    /// Convert every populated cell of a recipe
    pub fn normalize_row(&self, record: &RecipeRecord) -> ConvertedRecord {
        let mut converted = ConvertedRecord::new(record.name.clone());

        for (ingredient, raw) in record.populated() {
            let outcome = self.normalize_measure(raw);
            if outcome.converted.is_unknown() {
                tracing::debug!(
                    "Unresolved unit '{}' for {} in {}",
                    outcome.parsed.unit_phrase,
                    ingredient,
                    record.name
                );
                converted
                    .unresolved
                    .insert(ingredient.to_string(), outcome.parsed.unit_phrase);
            }
            converted.cells.insert(ingredient.to_string(), outcome.converted);
        }

        converted
    }

    /// Turn a converted recipe into its proportional composition
    pub fn normalize_proportions(&self, converted: &ConvertedRecord) -> ProportionRecord {
        ProportionRecord::from_cells(converted.name.clone(), &normalize_cells(&converted.cells))
    }

    /// Both stages for one recipe
    pub fn normalize_recipe(&self, record: &RecipeRecord) -> (ConvertedRecord, ProportionRecord) {
        let converted = self.normalize_row(record);
        let proportions = self.normalize_proportions(&converted);
        (converted, proportions)
    }

    /// Normalize many recipes in parallel
    ///
    /// When two records share a name the later one wins.
    pub fn normalize_batch(&self, records: &[RecipeRecord]) -> NormalizedBatch {
        let results: Vec<(ConvertedRecord, ProportionRecord)> = records
            .par_iter()
            .map(|record| self.normalize_recipe(record))
            .collect();

        let mut latest: BTreeMap<String, (ConvertedRecord, ProportionRecord)> = BTreeMap::new();
        for (converted, proportions) in results {
            let name = converted.name.clone();
            if latest
                .insert(name.clone(), (converted, proportions))
                .is_some()
            {
                tracing::warn!("Duplicate recipe '{}'; keeping the later record", name);
            }
        }

        let mut batch = NormalizedBatch::default();
        for (name, (converted, proportions)) in latest {
            batch
                .unresolved_units
                .extend(converted.unresolved.values().cloned());
            batch.converted.insert(name, converted);
            batch.proportions.insert(proportions);
        }

        tracing::info!(
            "Normalized {} recipes ({} ingredients, {} unresolved unit phrases)",
            batch.proportions.len(),
            batch.proportions.ingredients.len(),
            batch.unresolved_units.len()
        );

        batch
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Vocabulary::standard())
    }
}

/// Divide each numeric cell by the sum of numeric cells
///
/// Flags and unknowns pass through and contribute nothing to the sum.
/// A zero or non-finite sum yields 0.0 for every numeric cell, so every
/// fraction stays within [0, 1].
pub fn normalize_cells(cells: &BTreeMap<String, ConvertedCell>) -> BTreeMap<String, ConvertedCell> {
    let sum: f64 = cells.values().filter_map(ConvertedCell::amount).sum();
    let total = if sum.is_finite() && sum > 0.0 {
        sum
    } else {
        if !sum.is_finite() {
            tracing::warn!("Amount total overflows ({}); proportions set to 0.0", sum);
        }
        0.0
    };

    cells
        .iter()
        .map(|(ingredient, cell)| {
            let out = match cell {
                ConvertedCell::Amount(v) if total != 0.0 => ConvertedCell::Amount(v / total),
                ConvertedCell::Amount(_) => ConvertedCell::Amount(0.0),
                other => *other,
            };
            (ingredient.clone(), out)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::units::ML_PER_SHOT;

    fn engine() -> Engine {
        Engine::default()
    }

    fn a1() -> RecipeRecord {
        RecipeRecord::new("A1")
            .with_measure("Gin", "1 3/4 shot")
            .with_measure("Grand Marnier", "1 Shot")
            .with_measure("Lemon Juice", "1/4 Shot")
            .with_measure("Grenadine", "1/8 Shot")
            .with_measure("Lemon Peel", "1")
    }

    fn amount(cell: &ConvertedCell) -> f64 {
        cell.amount().unwrap()
    }

    #[test]
    fn test_normalize_measure() {
        let outcome = engine().normalize_measure("1 3/4 shot");
        assert!((outcome.parsed.value - 1.75).abs() < 1e-9);
        assert_eq!(outcome.resolved.unwrap().unit, "shot");
        assert!((amount(&outcome.converted) - 1.75 * ML_PER_SHOT).abs() < 1e-9);
    }

    #[test]
    fn test_implied_count_is_flag() {
        let outcome = engine().normalize_measure("1");
        assert_eq!(outcome.parsed.unit_phrase, "count");
        assert_eq!(outcome.converted, ConvertedCell::Flag);
    }

    #[test]
    fn test_normalize_row_a1() {
        let converted = engine().normalize_row(&a1());
        let cells = &converted.cells;

        assert!((amount(&cells["Gin"]) - 77.63).abs() < 0.01);
        assert!((amount(&cells["Grand Marnier"]) - 44.36).abs() < 0.01);
        assert!((amount(&cells["Lemon Juice"]) - 11.09).abs() < 0.01);
        assert!((amount(&cells["Grenadine"]) - 5.545).abs() < 0.001);
        assert_eq!(cells["Lemon Peel"], ConvertedCell::Flag);
        assert!(converted.unresolved.is_empty());
    }

    #[test]
    fn test_normalize_recipe_a1_proportions() {
        let (_, props) = engine().normalize_recipe(&a1());

        assert!((props.fraction("Gin") - 0.56).abs() < 0.005);
        assert!((props.fraction("Grand Marnier") - 0.32).abs() < 0.005);
        assert!((props.fraction("Lemon Juice") - 0.08).abs() < 0.005);
        assert!((props.fraction("Grenadine") - 0.04).abs() < 0.005);
        assert!(props.flagged.contains("Lemon Peel"));
        assert!(!props.fractions.contains_key("Lemon Peel"));
        assert!((props.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_row_skips_empty_and_records_unknown() {
        let record = RecipeRecord::new("Rocks")
            .with_measure("Whiskey", "2 oz")
            .with_measure("Ice", "ice")
            .with_measure("Water", "");
        let converted = engine().normalize_row(&record);

        assert_eq!(converted.cells.len(), 2);
        assert_eq!(converted.cells["Ice"], ConvertedCell::Unknown);
        assert_eq!(converted.unresolved["Ice"], "ice");
        assert!(!converted.cells.contains_key("Water"));
    }

    #[test]
    fn test_unknown_passes_through_proportions() {
        let record = RecipeRecord::new("Rocks")
            .with_measure("Whiskey", "2 oz")
            .with_measure("Ice", "ice");
        let (_, props) = engine().normalize_recipe(&record);

        assert!((props.fraction("Whiskey") - 1.0).abs() < 1e-9);
        assert!(props.unknown.contains("Ice"));
        assert!(!props.fractions.contains_key("Ice"));
    }

    #[test]
    fn test_normalize_cells_idempotent() {
        let cells = BTreeMap::from([
            ("a".to_string(), ConvertedCell::Amount(3.0)),
            ("b".to_string(), ConvertedCell::Amount(1.0)),
            ("c".to_string(), ConvertedCell::Flag),
        ]);
        let once = normalize_cells(&cells);
        let twice = normalize_cells(&once);

        for key in ["a", "b"] {
            assert!((amount(&once[key]) - amount(&twice[key])).abs() < 1e-12);
        }
        assert!((amount(&once["a"]) - 0.75).abs() < 1e-12);
        assert_eq!(twice["c"], ConvertedCell::Flag);
    }

    #[test]
    fn test_normalize_cells_zero_sum() {
        let cells = BTreeMap::from([
            ("a".to_string(), ConvertedCell::Amount(0.0)),
            ("b".to_string(), ConvertedCell::Flag),
            ("c".to_string(), ConvertedCell::Unknown),
        ]);
        let out = normalize_cells(&cells);

        assert_eq!(out["a"], ConvertedCell::Amount(0.0));
        assert_eq!(out["b"], ConvertedCell::Flag);
        assert_eq!(out["c"], ConvertedCell::Unknown);
    }

    #[test]
    fn test_parts_recipe() {
        let record = RecipeRecord::new("Negroni")
            .with_measure("Gin", "1 part")
            .with_measure("Campari", "1 part")
            .with_measure("Vermouth", "2 parts");
        let (converted, props) = engine().normalize_recipe(&record);

        assert_eq!(converted.cells["Vermouth"], ConvertedCell::Amount(2.0));
        assert!((props.fraction("Vermouth") - 0.5).abs() < 1e-9);
        assert!((props.fraction("Gin") - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_split_row() {
        let (values, units) = engine().split_row(&a1());
        assert_eq!(values.len(), 5);
        assert_eq!(units.len(), 5);
        assert!(units.contains(&"count".to_string()));
    }

    #[test]
    fn test_batch_convert() {
        let cells = engine().batch_convert(&[1.0, 2.0], &[Some("shot".into()), Some("part".into())]);
        assert!((amount(&cells[0]) - ML_PER_SHOT).abs() < 1e-9);
        assert_eq!(cells[1], ConvertedCell::Amount(2.0));
    }

    #[test]
    fn test_normalize_batch() {
        let rocks = RecipeRecord::new("Rocks")
            .with_measure("Whiskey", "2 oz")
            .with_measure("Ice", "ice");
        let batch = engine().normalize_batch(&[a1(), rocks]);

        assert_eq!(batch.converted.len(), 2);
        assert_eq!(batch.proportions.len(), 2);
        assert_eq!(batch.proportions.fraction("Rocks", "Gin"), Some(0.0));
        assert!(batch.proportions.is_flagged("A1", "Lemon Peel"));
        assert!(batch.unresolved_units.contains("ice"));
        let names: Vec<_> = batch.converted.keys().cloned().collect();
        assert_eq!(names, vec!["A1", "Rocks"]);
    }

    #[test]
    fn test_normalize_batch_duplicate_keeps_later() {
        let first = RecipeRecord::new("Dup")
            .with_measure("Gin", "1 oz")
            .with_measure("Ice", "ice");
        let second = RecipeRecord::new("Dup").with_measure("Rum", "1 oz");
        let batch = engine().normalize_batch(&[first, second]);

        assert_eq!(batch.converted.len(), 1);
        assert!(batch.converted["Dup"].cells.contains_key("Rum"));
        assert_eq!(batch.proportions.fraction("Dup", "Rum"), Some(1.0));
        // nothing from the replaced record survives
        assert_eq!(batch.proportions.ingredients, BTreeSet::from(["Rum".to_string()]));
        assert!(batch.unresolved_units.is_empty());
    }

    #[test]
    fn test_overflowing_amount_keeps_fractions_bounded() {
        let record = RecipeRecord::new("Huge")
            .with_measure("Gin", format!("{} oz", "9".repeat(400)))
            .with_measure("Lime", "1 oz");
        let (converted, props) = engine().normalize_recipe(&record);

        assert!(converted.cells["Gin"].amount().unwrap().is_finite());
        assert!((props.fraction("Gin") - 0.5).abs() < 1e-9);
        assert!((props.fraction("Lime") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_cells_non_finite_sum() {
        let cells = BTreeMap::from([
            ("a".to_string(), ConvertedCell::Amount(f64::MAX)),
            ("b".to_string(), ConvertedCell::Amount(f64::MAX)),
            ("c".to_string(), ConvertedCell::Flag),
        ]);
        let out = normalize_cells(&cells);

        assert_eq!(out["a"], ConvertedCell::Amount(0.0));
        assert_eq!(out["b"], ConvertedCell::Amount(0.0));
        assert_eq!(out["c"], ConvertedCell::Flag);
    }
}
