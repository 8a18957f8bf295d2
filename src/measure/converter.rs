//! Unit conversion
//!
//! Converts a quantity in a canonical unit to milliliters, applying the
//! part and non-metric policies.

use serde::{Deserialize, Serialize};

use super::units::{UnitTier, Vocabulary};

/// Result of converting one measure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertedCell {
    /// Milliliters, or a relative amount for part units
    Amount(f64),
    /// Ingredient present in a non-convertible form (garnish, wedge)
    Flag,
    /// Unit text could not be resolved
    Unknown,
}

impl ConvertedCell {
    /// The numeric amount, if any
    pub fn amount(&self) -> Option<f64> {
        match self {
            ConvertedCell::Amount(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, ConvertedCell::Flag)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ConvertedCell::Unknown)
    }
}

/// Convert a quantity in the given canonical unit to milliliters
///
/// Policy, in order:
/// 1. part word -> the value unchanged
/// 2. non-metric word -> `Flag`
/// 3. unit with a factor -> value x factor
/// 4. anything else, including `None` -> `Unknown`
pub fn to_ml(vocab: &Vocabulary, value: f64, unit: Option<&str>) -> ConvertedCell {
    let Some(unit) = unit else {
        return ConvertedCell::Unknown;
    };

    match vocab.tier_of(unit) {
        Some(UnitTier::Part) => ConvertedCell::Amount(value),
        Some(UnitTier::NonMetric) => ConvertedCell::Flag,
        _ => match vocab.ml_factor(unit) {
            Some(factor) => ConvertedCell::Amount(value * factor),
            None => ConvertedCell::Unknown,
        },
    }
}

/// Convert parallel value and unit lists
///
/// Extra entries on the longer side are ignored.
pub fn batch_to_ml(vocab: &Vocabulary, values: &[f64], units: &[Option<String>]) -> Vec<ConvertedCell> {
    values
        .iter()
        .zip(units)
        .map(|(value, unit)| to_ml(vocab, *value, unit.as_deref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::units::{ML_PER_CAN, ML_PER_OZ, ML_PER_SHOT};

    fn vocab() -> Vocabulary {
        Vocabulary::standard()
    }

    #[test]
    fn test_primary_conversion() {
        let cell = to_ml(&vocab(), 1.75, Some("shot"));
        let ml = cell.amount().unwrap();
        assert!((ml - 1.75 * ML_PER_SHOT).abs() < 1e-9);
        assert!((ml - 77.63).abs() < 0.01);
    }

    #[test]
    fn test_secondary_conversion() {
        let cell = to_ml(&vocab(), 2.0, Some("can"));
        assert_eq!(cell, ConvertedCell::Amount(2.0 * ML_PER_CAN));
    }

    #[test]
    fn test_part_is_identity() {
        assert_eq!(to_ml(&vocab(), 3.0, Some("parts")), ConvertedCell::Amount(3.0));
        assert_eq!(to_ml(&vocab(), 0.5, Some("part")), ConvertedCell::Amount(0.5));
    }

    #[test]
    fn test_nonmetric_flags() {
        assert_eq!(to_ml(&vocab(), 2.0, Some("garnish")), ConvertedCell::Flag);
        assert_eq!(to_ml(&vocab(), 1.0, Some("count")), ConvertedCell::Flag);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(to_ml(&vocab(), 1.0, None), ConvertedCell::Unknown);
        assert_eq!(to_ml(&vocab(), 1.0, Some("furlong")), ConvertedCell::Unknown);
    }

    #[test]
    fn test_batch_to_ml() {
        let cells = batch_to_ml(
            &vocab(),
            &[2.0, 1.0, 1.0],
            &[Some("oz".into()), Some("wedge".into()), None],
        );
        assert_eq!(
            cells,
            vec![
                ConvertedCell::Amount(2.0 * ML_PER_OZ),
                ConvertedCell::Flag,
                ConvertedCell::Unknown,
            ]
        );
    }

    #[test]
    fn test_cell_serialization() {
        assert_eq!(serde_json::to_string(&ConvertedCell::Flag).unwrap(), r#""flag""#);
        assert_eq!(
            serde_json::to_string(&ConvertedCell::Amount(1.5)).unwrap(),
            r#"{"amount":1.5}"#
        );
    }
}
