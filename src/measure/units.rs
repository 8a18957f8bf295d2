//! Unit vocabulary and conversion constants
//!
//! Provides the four unit tiers, the milliliter factor table, and the
//! validated `Vocabulary` the resolver and converter read from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Priority class of a canonical unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitTier {
    /// Reliable volume units with a known mL factor (oz, tbsp, shot)
    Primary,
    /// Lower-confidence units with an assumed mL factor (can, cube, inch)
    Secondary,
    /// Ratio units whose quantity passes through unchanged
    Part,
    /// Count and descriptive words (garnish, wedge, bottle)
    NonMetric,
}

impl UnitTier {
    /// Whether units in this tier are looked up in the factor table
    pub fn has_factor(&self) -> bool {
        matches!(self, UnitTier::Primary | UnitTier::Secondary)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitTier::Primary => "primary",
            UnitTier::Secondary => "secondary",
            UnitTier::Part => "part",
            UnitTier::NonMetric => "nonmetric",
        }
    }
}

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per shot (also a jigger)
pub const ML_PER_SHOT: f64 = 44.3602943;
/// Milliliters per fluid ounce
pub const ML_PER_OZ: f64 = 29.574;
/// Milliliters per tablespoon
pub const ML_PER_TBSP: f64 = 14.787;
/// Milliliters per teaspoon
pub const ML_PER_TSP: f64 = 4.93;
/// Milliliters per cup
pub const ML_PER_CUP: f64 = 236.59;
/// Milliliters per pint (imperial)
pub const ML_PER_PINT: f64 = 568.261;
/// Milliliters per quart
pub const ML_PER_QUART: f64 = 946.35;
/// Milliliters per gallon
pub const ML_PER_GALLON: f64 = 3785.412;
/// Milliliters per 12 oz can
pub const ML_PER_CAN: f64 = 354.882;
/// Milliliters per cubic inch
pub const ML_PER_CUBIC_INCH: f64 = 16.387;

const PRIMARY_FACTORS: &[(&str, f64)] = &[
    ("cl", 10.0),
    ("cup", ML_PER_CUP),
    ("dash", 0.92),
    ("dl", 100.0),
    ("drop", 0.05),
    ("fifth", 750.0),
    ("gal", ML_PER_GALLON),
    ("tablespoon", ML_PER_TBSP),
    ("tblsp", ML_PER_TBSP),
    ("tbsp", ML_PER_TBSP),
    ("jigger", ML_PER_SHOT),
    ("ml", 1.0),
    ("ounce", ML_PER_OZ),
    ("oz", ML_PER_OZ),
    ("pony", 29.57),
    ("pinch", 0.31),
    ("pint", ML_PER_PINT),
    ("pt", ML_PER_PINT),
    ("qt", ML_PER_QUART),
    ("quart", ML_PER_QUART),
    ("shot", ML_PER_SHOT),
    ("snit", 88.72),
    ("splash", 5.91),
    ("split", 177.44),
    ("teaspoon", ML_PER_TSP),
    ("tsp", ML_PER_TSP),
    ("wineglass", 118.29),
];

const SECONDARY_FACTORS: &[(&str, f64)] = &[
    ("can", ML_PER_CAN),
    ("cube", 30.0),
    ("float", ML_PER_OZ),
    ("g", 1.0),
    ("gr", 1.0),
    ("gram", 1.0),
    ("in", ML_PER_CUBIC_INCH),
    ("inch", ML_PER_CUBIC_INCH),
];

const PART_WORDS: &[&str] = &["part", "parts"];

const NONMETRIC_WORDS: &[&str] = &[
    "1", "bottle", "chunks", "count", "crushed", "fill", "fillwith", "garnish", "glass", "ground",
    "juice", "package", "piece", "rim", "slice", "sprig", "stick", "top", "twist", "wedge",
    "whole",
];

/// Vocabulary table inconsistency, fatal at startup
#[derive(Debug, Error, PartialEq)]
pub enum VocabularyError {
    #[error("Unit '{0}' has no conversion factor")]
    MissingFactor(String),

    #[error("Conversion factor for '{0}' has no primary or secondary unit")]
    OrphanFactor(String),

    #[error("Unit '{word}' appears in both {first} and {second} tiers")]
    DuplicateWord {
        word: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("Conversion factor for '{0}' must be a positive finite number, got {1}")]
    InvalidFactor(String, f64),

    #[error("Unit words cannot be empty")]
    EmptyWord,

    #[error("Unit '{0}' must be lower-case without whitespace")]
    MalformedWord(String),
}

/// Serializable form of the vocabulary tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    #[serde(default)]
    pub part: Vec<String>,
    #[serde(default)]
    pub nonmetric: Vec<String>,
    pub factors: BTreeMap<String, f64>,
}

/// Validated, read-only unit vocabulary
///
/// Every primary and secondary word has exactly one factor, no word sits in
/// two tiers. Words are kept sorted so fuzzy matching is deterministic.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    tiers: BTreeMap<String, UnitTier>,
    factors: BTreeMap<String, f64>,
}

impl Vocabulary {
    /// The built-in cocktail measure tables
    pub fn standard() -> Self {
        let mut tiers = BTreeMap::new();
        let mut factors = BTreeMap::new();

        for (word, factor) in PRIMARY_FACTORS {
            tiers.insert(word.to_string(), UnitTier::Primary);
            factors.insert(word.to_string(), *factor);
        }
        for (word, factor) in SECONDARY_FACTORS {
            tiers.insert(word.to_string(), UnitTier::Secondary);
            factors.insert(word.to_string(), *factor);
        }
        for word in PART_WORDS {
            tiers.insert(word.to_string(), UnitTier::Part);
        }
        for word in NONMETRIC_WORDS {
            tiers.insert(word.to_string(), UnitTier::NonMetric);
        }

        Self { tiers, factors }
    }

    /// Build a vocabulary from configuration, rejecting inconsistent tables
    pub fn from_config(config: &VocabularyConfig) -> Result<Self, VocabularyError> {
        let mut tiers: BTreeMap<String, UnitTier> = BTreeMap::new();

        let groups = [
            (&config.primary, UnitTier::Primary),
            (&config.secondary, UnitTier::Secondary),
            (&config.part, UnitTier::Part),
            (&config.nonmetric, UnitTier::NonMetric),
        ];

        for (words, tier) in groups {
            for word in words {
                validate_word(word)?;
                if let Some(existing) = tiers.get(word) {
                    return Err(VocabularyError::DuplicateWord {
                        word: word.clone(),
                        first: existing.as_str(),
                        second: tier.as_str(),
                    });
                }
                tiers.insert(word.clone(), tier);
            }
        }

        for (word, tier) in &tiers {
            if tier.has_factor() && !config.factors.contains_key(word) {
                return Err(VocabularyError::MissingFactor(word.clone()));
            }
        }

        for (word, factor) in &config.factors {
            match tiers.get(word) {
                Some(tier) if tier.has_factor() => {}
                _ => return Err(VocabularyError::OrphanFactor(word.clone())),
            }
            if !factor.is_finite() || *factor <= 0.0 {
                return Err(VocabularyError::InvalidFactor(word.clone(), *factor));
            }
        }

        Ok(Self {
            tiers,
            factors: config.factors.clone(),
        })
    }

    /// Export the tables in configuration form
    pub fn to_config(&self) -> VocabularyConfig {
        VocabularyConfig {
            primary: self.words(UnitTier::Primary).map(String::from).collect(),
            secondary: self.words(UnitTier::Secondary).map(String::from).collect(),
            part: self.words(UnitTier::Part).map(String::from).collect(),
            nonmetric: self.words(UnitTier::NonMetric).map(String::from).collect(),
            factors: self.factors.clone(),
        }
    }

    /// Tier of a canonical unit, if it is in the vocabulary
    pub fn tier_of(&self, word: &str) -> Option<UnitTier> {
        self.tiers.get(word).copied()
    }

    /// Milliliters per unit for primary and secondary words
    pub fn ml_factor(&self, word: &str) -> Option<f64> {
        self.factors.get(word).copied()
    }

    /// Words of one tier in lexicographic order
    pub fn words(&self, tier: UnitTier) -> impl Iterator<Item = &str> {
        self.tiers
            .iter()
            .filter(move |(_, t)| **t == tier)
            .map(|(w, _)| w.as_str())
    }

    /// Number of words in one tier
    pub fn count(&self, tier: UnitTier) -> usize {
        self.words(tier).count()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

fn validate_word(word: &str) -> Result<(), VocabularyError> {
    if word.is_empty() {
        return Err(VocabularyError::EmptyWord);
    }
    if word.chars().any(|c| c.is_whitespace() || c.is_uppercase()) {
        return Err(VocabularyError::MalformedWord(word.to_string()));
    }
    Ok(())
}
