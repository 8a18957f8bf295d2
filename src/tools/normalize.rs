//! Normalization MCP Tools
//!
//! Tools for parsing, resolving, converting, and normalizing recipe measures.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::{Engine, NormalizedBatch};
use crate::measure::{ConvertedCell, MatchKind, UnitTier};
use crate::models::{
    parse_catalog_response, records_from_map, ConvertedRecord, ProportionRecord, RecipeRecord,
};

/// Response for parse_measure
#[derive(Debug, Serialize)]
pub struct ParseMeasureResponse {
    pub raw: String,
    pub value: f64,
    pub unit_phrase: String,
    pub canonical_unit: Option<String>,
    pub tier: Option<UnitTier>,
    pub match_kind: Option<MatchKind>,
    pub converted: ConvertedCell,
}

/// Response for resolve_unit
#[derive(Debug, Serialize)]
pub struct ResolveUnitResponse {
    pub unit_phrase: String,
    pub canonical_unit: Option<String>,
    pub tier: Option<UnitTier>,
    pub match_kind: Option<MatchKind>,
}

/// Response for convert_measure
#[derive(Debug, Serialize)]
pub struct ConvertMeasureResponse {
    pub value: f64,
    pub unit: Option<String>,
    pub tier: Option<UnitTier>,
    pub converted: ConvertedCell,
}

/// Response for normalize_recipe
#[derive(Debug, Serialize)]
pub struct NormalizeRecipeResponse {
    pub converted: ConvertedRecord,
    pub proportions: ProportionRecord,
}

/// Response for normalize_recipes and normalize_catalog
#[derive(Debug, Serialize)]
pub struct NormalizeRecipesResponse {
    pub recipe_count: usize,
    pub ingredient_count: usize,
    #[serde(flatten)]
    pub batch: NormalizedBatch,
}

impl From<NormalizedBatch> for NormalizeRecipesResponse {
    fn from(batch: NormalizedBatch) -> Self {
        Self {
            recipe_count: batch.proportions.len(),
            ingredient_count: batch.proportions.ingredients.len(),
            batch,
        }
    }
}

/// One canonical unit in list_vocabulary
#[derive(Debug, Serialize)]
pub struct VocabularyEntry {
    pub unit: String,
    pub tier: UnitTier,
    pub ml_factor: Option<f64>,
}

/// Response for list_vocabulary
#[derive(Debug, Serialize)]
pub struct ListVocabularyResponse {
    pub units: Vec<VocabularyEntry>,
    pub count: usize,
}

// ============================================================================
// Measure Tools
// ============================================================================

/// Run one raw measure through parse, resolve and convert
pub fn parse_measure(engine: &Engine, raw: &str) -> Result<ParseMeasureResponse, String> {
    if raw.trim().is_empty() {
        return Err("Measure cannot be empty".to_string());
    }

    let outcome = engine.normalize_measure(raw);
    let (canonical_unit, tier, match_kind) = match outcome.resolved {
        Some(r) => (Some(r.unit), Some(r.tier), Some(r.kind)),
        None => (None, None, None),
    };

    Ok(ParseMeasureResponse {
        raw: raw.to_string(),
        value: outcome.parsed.value,
        unit_phrase: outcome.parsed.unit_phrase,
        canonical_unit,
        tier,
        match_kind,
        converted: outcome.converted,
    })
}

/// Resolve a unit phrase to its canonical unit
pub fn resolve_unit(engine: &Engine, unit_phrase: &str) -> Result<ResolveUnitResponse, String> {
    let phrase = unit_phrase.trim().to_lowercase();
    let resolved = crate::measure::resolve(engine.vocabulary(), &phrase, engine.is_verbose());

    Ok(ResolveUnitResponse {
        unit_phrase: phrase,
        canonical_unit: resolved.as_ref().map(|r| r.unit.clone()),
        tier: resolved.as_ref().map(|r| r.tier),
        match_kind: resolved.as_ref().map(|r| r.kind),
    })
}

/// Convert a value in a canonical unit to milliliters
pub fn convert_measure(
    engine: &Engine,
    value: f64,
    unit: Option<&str>,
) -> Result<ConvertMeasureResponse, String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("value must be a non-negative number, got {}", value));
    }

    let unit = unit.map(|u| u.trim().to_lowercase()).filter(|u| !u.is_empty());
    let tier = unit.as_deref().and_then(|u| engine.vocabulary().tier_of(u));
    let converted = engine.convert(value, unit.as_deref());

    Ok(ConvertMeasureResponse {
        value,
        unit,
        tier,
        converted,
    })
}

/// List every canonical unit with its tier and factor
pub fn list_vocabulary(engine: &Engine) -> ListVocabularyResponse {
    let vocab = engine.vocabulary();
    let tiers = [
        UnitTier::Primary,
        UnitTier::Secondary,
        UnitTier::Part,
        UnitTier::NonMetric,
    ];

    let units: Vec<VocabularyEntry> = tiers
        .iter()
        .flat_map(move |&tier| {
            vocab.words(tier).map(move |word| VocabularyEntry {
                unit: word.to_string(),
                tier,
                ml_factor: vocab.ml_factor(word),
            })
        })
        .collect();

    ListVocabularyResponse {
        count: units.len(),
        units,
    }
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Normalize one recipe
pub fn normalize_recipe(
    engine: &Engine,
    name: &str,
    measures: BTreeMap<String, String>,
) -> Result<NormalizeRecipeResponse, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Recipe name cannot be empty".to_string());
    }

    let record = RecipeRecord {
        name: name.to_string(),
        measures,
    };
    let (converted, proportions) = engine.normalize_recipe(&record);

    Ok(NormalizeRecipeResponse {
        converted,
        proportions,
    })
}

/// Normalize a `{recipe: {ingredient: measure}}` mapping
pub fn normalize_recipes(
    engine: &Engine,
    recipes: BTreeMap<String, BTreeMap<String, String>>,
) -> Result<NormalizeRecipesResponse, String> {
    if recipes.keys().any(|name| name.trim().is_empty()) {
        return Err("Recipe name cannot be empty".to_string());
    }

    let records = records_from_map(recipes);
    Ok(engine.normalize_batch(&records).into())
}

/// Normalize a raw catalog `{"drinks": [...]}` payload
pub fn normalize_catalog(engine: &Engine, payload: &str) -> Result<NormalizeRecipesResponse, String> {
    let records =
        parse_catalog_response(payload).map_err(|e| format!("Invalid catalog payload: {}", e))?;
    Ok(engine.normalize_batch(&records).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine {
        Engine::default()
    }

    #[test]
    fn test_parse_measure() {
        let result = parse_measure(&engine(), "1 3/4 shot").unwrap();
        assert!((result.value - 1.75).abs() < 1e-9);
        assert_eq!(result.canonical_unit.as_deref(), Some("shot"));
        assert_eq!(result.tier, Some(UnitTier::Primary));
        assert_eq!(result.match_kind, Some(MatchKind::Exact));
    }

    #[test]
    fn test_parse_measure_rejects_empty() {
        assert!(parse_measure(&engine(), "   ").is_err());
    }

    #[test]
    fn test_resolve_unit_normalizes_case() {
        let result = resolve_unit(&engine(), " Ounces ").unwrap();
        assert_eq!(result.unit_phrase, "ounces");
        assert_eq!(result.canonical_unit.as_deref(), Some("ounce"));
        assert_eq!(result.match_kind, Some(MatchKind::Substring));
    }

    #[test]
    fn test_convert_measure() {
        let result = convert_measure(&engine(), 2.0, Some("Parts")).unwrap();
        assert_eq!(result.converted, ConvertedCell::Amount(2.0));
        assert_eq!(result.tier, Some(UnitTier::Part));

        let result = convert_measure(&engine(), 1.0, None).unwrap();
        assert_eq!(result.converted, ConvertedCell::Unknown);

        assert!(convert_measure(&engine(), -1.0, Some("oz")).is_err());
        assert!(convert_measure(&engine(), f64::NAN, Some("oz")).is_err());
    }

    #[test]
    fn test_list_vocabulary() {
        let result = list_vocabulary(&engine());
        assert_eq!(result.count, 58);
        let shot = result.units.iter().find(|u| u.unit == "shot").unwrap();
        assert_eq!(shot.tier, UnitTier::Primary);
        assert!(shot.ml_factor.is_some());
        let garnish = result.units.iter().find(|u| u.unit == "garnish").unwrap();
        assert_eq!(garnish.ml_factor, None);
    }

    #[test]
    fn test_normalize_recipe() {
        let measures = BTreeMap::from([
            ("Gin".to_string(), "2 oz".to_string()),
            ("Lime".to_string(), "1 wedge".to_string()),
        ]);
        let result = normalize_recipe(&engine(), "Gin Rickey", measures).unwrap();
        assert_eq!(result.proportions.name, "Gin Rickey");
        assert!((result.proportions.fraction("Gin") - 1.0).abs() < 1e-9);
        assert!(result.proportions.flagged.contains("Lime"));

        assert!(normalize_recipe(&engine(), " ", BTreeMap::new()).is_err());
    }

    #[test]
    fn test_normalize_recipes() {
        let recipes = BTreeMap::from([
            (
                "Negroni".to_string(),
                BTreeMap::from([
                    ("Gin".to_string(), "1 part".to_string()),
                    ("Campari".to_string(), "1 part".to_string()),
                ]),
            ),
            (
                "Rocks".to_string(),
                BTreeMap::from([("Ice".to_string(), "ice".to_string())]),
            ),
        ]);
        let result = normalize_recipes(&engine(), recipes).unwrap();
        assert_eq!(result.recipe_count, 2);
        assert_eq!(result.ingredient_count, 3);
        assert!(result.batch.unresolved_units.contains("ice"));
    }

    #[test]
    fn test_normalize_catalog() {
        let payload = r#"{"drinks": [{"strDrink": "A1",
            "strIngredient1": "Gin", "strMeasure1": "1 3/4 shot ",
            "strIngredient2": "Lemon Peel", "strMeasure2": "1"}]}"#;
        let result = normalize_catalog(&engine(), payload).unwrap();
        assert_eq!(result.recipe_count, 1);
        assert!(result.batch.proportions.is_flagged("A1", "lemon peel"));
        assert_eq!(result.batch.proportions.fraction("A1", "gin"), Some(1.0));

        assert!(normalize_catalog(&engine(), "{ not json").is_err());
    }
}
