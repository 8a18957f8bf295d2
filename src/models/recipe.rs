//! Recipe record model
//!
//! A recipe's raw ingredient measures, as handed over by the data source.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highest ingredient slot index in a catalog drink object
pub const CATALOG_INGREDIENT_SLOTS: usize = 15;

/// Raw measures for one recipe, keyed by ingredient name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub name: String,
    pub measures: BTreeMap<String, String>,
}

impl RecipeRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measures: BTreeMap::new(),
        }
    }

    /// Builder-style insert of one ingredient measure
    pub fn with_measure(mut self, ingredient: impl Into<String>, measure: impl Into<String>) -> Self {
        self.measures.insert(ingredient.into(), measure.into());
        self
    }

    /// Ingredient/measure pairs with a non-blank measure
    pub fn populated(&self) -> impl Iterator<Item = (&str, &str)> {
        self.measures
            .iter()
            .filter(|(_, m)| !m.trim().is_empty())
            .map(|(i, m)| (i.as_str(), m.as_str()))
    }

    /// Build a record from a catalog drink object
    ///
    /// Reads `strDrink` and the numbered `strIngredientN` / `strMeasureN`
    /// slots. Ingredient names are lower-cased; a slot missing either side
    /// is left out. Returns None when the drink has no name.
    pub fn from_catalog_drink(drink: &Value) -> Option<Self> {
        let name = non_blank(drink.get("strDrink"))?;
        let mut record = Self::new(name);

        for slot in 1..=CATALOG_INGREDIENT_SLOTS {
            let ingredient = non_blank(drink.get(format!("strIngredient{}", slot)));
            let measure = non_blank(drink.get(format!("strMeasure{}", slot)));
            if let (Some(ingredient), Some(measure)) = (ingredient, measure) {
                record
                    .measures
                    .insert(ingredient.trim().to_lowercase(), measure.to_string());
            }
        }

        Some(record)
    }
}

fn non_blank(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Parse a catalog search payload (`{"drinks": [...]}`) into recipe records
///
/// `"drinks": null` is how the catalog reports an empty result.
pub fn parse_catalog_response(json: &str) -> Result<Vec<RecipeRecord>, serde_json::Error> {
    #[derive(Deserialize)]
    struct CatalogResponse {
        drinks: Option<Vec<Value>>,
    }

    let response: CatalogResponse = serde_json::from_str(json)?;
    Ok(response
        .drinks
        .unwrap_or_default()
        .iter()
        .filter_map(RecipeRecord::from_catalog_drink)
        .collect())
}

/// Build records from a `{recipe: {ingredient: measure}}` mapping
pub fn records_from_map(map: BTreeMap<String, BTreeMap<String, String>>) -> Vec<RecipeRecord> {
    map.into_iter()
        .map(|(name, measures)| RecipeRecord { name, measures })
        .collect()
}
