//! Converted recipe model
//!
//! A recipe whose measures have been converted to milliliters or sentinels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::measure::ConvertedCell;

/// Converted cells for one recipe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConvertedRecord {
    pub name: String,
    pub cells: BTreeMap<String, ConvertedCell>,
    /// Ingredient -> unit phrase for cells that ended up `Unknown`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unresolved: BTreeMap<String, String>,
}

impl ConvertedRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sum of numeric cells; flags and unknowns count as zero
    pub fn numeric_total(&self) -> f64 {
        self.cells.values().filter_map(ConvertedCell::amount).sum()
    }

    pub fn has_unknown(&self) -> bool {
        self.cells.values().any(ConvertedCell::is_unknown)
    }
}
