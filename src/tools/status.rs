//! Bartindr Status Tool
//!
//! Provides runtime status information about the normalization service.

use serde::Serialize;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::build_info::BuildInfo;
use crate::measure::{UnitTier, Vocabulary};

/// Normalization instructions for AI assistants
pub const NORMALIZATION_INSTRUCTIONS: &str = r#"
# Bartindr Measure Normalization

Turns free-text cocktail measures ("1 3/4 shot", "fill to top", "1") into
milliliters and then into per-recipe proportions that sum to 1.

## Pipeline

1. **parse_measure** - splits a raw measure into a number and a unit phrase.
   - No number ("ice") -> value 1
   - No unit ("1") -> unit phrase "count"
   - Mixed numbers are summed: "1 3/4" -> 1.75
2. **resolve_unit** - maps the unit phrase to a canonical unit.
   - Exact matches win over everything
   - Otherwise substring matches: primary + part words first, then
     secondary words, then non-metric words; longest word wins, equal
     lengths go to the alphabetically first word
3. **convert_measure** - converts to mL.
   - part/parts: value passes through unchanged (ratio unit)
   - non-metric words (garnish, wedge, count...): `flag`
   - unresolvable unit: `unknown`
4. **normalize_recipe / normalize_recipes** - converts every ingredient of
   a recipe and divides numeric amounts by the recipe total.

## Reading Results

- `fractions` only holds numeric ingredients
- `flagged` lists ingredients present without a usable amount
- `unknown` lists ingredients whose unit could not be resolved
- A recipe with no numeric amounts gets 0.0 for every numeric ingredient

Use **list_vocabulary** to see every canonical unit with its tier and mL factor.
Use **normalize_catalog** to normalize a raw catalog `{"drinks": [...]}` payload.
"#;

/// Vocabulary size per tier
#[derive(Debug, Clone, Serialize)]
pub struct VocabularySummary {
    pub source: String,
    pub primary: usize,
    pub secondary: usize,
    pub part: usize,
    pub nonmetric: usize,
}

impl VocabularySummary {
    pub fn new(source: impl Into<String>, vocab: &Vocabulary) -> Self {
        Self {
            source: source.into(),
            primary: vocab.count(UnitTier::Primary),
            secondary: vocab.count(UnitTier::Secondary),
            part: vocab.count(UnitTier::Part),
            nonmetric: vocab.count(UnitTier::NonMetric),
        }
    }
}

/// Runtime status of the Bartindr service
#[derive(Debug, Clone, Serialize)]
pub struct BartindrStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Engine information
    pub vocabulary: VocabularySummary,
    pub verbose: bool,

    /// Process information
    pub started_at: String,
    pub uptime_seconds: u64,
    pub process_id: u32,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    vocabulary: VocabularySummary,
    verbose: bool,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(vocabulary: VocabularySummary, verbose: bool) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            vocabulary,
            verbose,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> BartindrStatus {
        let build_info = BuildInfo::current();

        BartindrStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            vocabulary: self.vocabulary.clone(),
            verbose: self.verbose,
            started_at: self.started_at.to_rfc3339(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: std::process::id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_vocabulary() {
        let summary = VocabularySummary::new("built-in", &Vocabulary::standard());
        let tracker = StatusTracker::new(summary, true);
        let status = tracker.get_status();

        assert_eq!(status.vocabulary.source, "built-in");
        assert_eq!(status.vocabulary.part, 2);
        assert!(status.verbose);
        assert_eq!(status.process_id, std::process::id());
    }
}
