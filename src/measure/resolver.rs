//! Unit resolution
//!
//! Maps a free-text unit phrase onto one canonical vocabulary word.

use serde::Serialize;

use super::text::remove_spaces;
use super::units::{UnitTier, Vocabulary};

/// How a canonical unit was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The cleaned phrase is a vocabulary word
    Exact,
    /// A vocabulary word is a substring of the cleaned phrase
    Substring,
}

/// A resolved canonical unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUnit {
    pub unit: String,
    pub tier: UnitTier,
    pub kind: MatchKind,
}

/// Resolve a unit phrase to its canonical unit word
///
/// Shorthand for [`resolve`] that drops the match details.
pub fn resolve_unit(vocab: &Vocabulary, unit_phrase: &str, verbose: bool) -> Option<String> {
    resolve(vocab, unit_phrase, verbose).map(|r| r.unit)
}

/// Resolve a unit phrase against the tiered vocabulary
///
/// Order:
/// 1. exact match on primary, secondary or part words
/// 2. exact match on non-metric words
/// 3. substring match on primary + part words, then secondary, then
///    non-metric; within a tier the longest word wins and equal lengths
///    fall back to the lexicographically smallest
///
/// `verbose` only raises the log level of fallback diagnostics.
pub fn resolve(vocab: &Vocabulary, unit_phrase: &str, verbose: bool) -> Option<ResolvedUnit> {
    let item = remove_spaces(unit_phrase);

    if let Some(tier) = vocab.tier_of(&item) {
        return Some(ResolvedUnit {
            unit: item,
            tier,
            kind: MatchKind::Exact,
        });
    }

    let passes: [&[UnitTier]; 3] = [
        &[UnitTier::Primary, UnitTier::Part],
        &[UnitTier::Secondary],
        &[UnitTier::NonMetric],
    ];

    for tiers in passes {
        if let Some((word, tier)) = longest_substring_match(vocab, &item, tiers) {
            if verbose {
                tracing::info!("no exact match found for [{}]; using [{}]", item, word);
            } else {
                tracing::trace!("no exact match found for [{}]; using [{}]", item, word);
            }
            return Some(ResolvedUnit {
                unit: word.to_string(),
                tier,
                kind: MatchKind::Substring,
            });
        }
    }

    if verbose {
        tracing::info!("no units for [{}]", item);
    } else {
        tracing::trace!("no units for [{}]", item);
    }
    None
}

fn longest_substring_match<'v>(
    vocab: &'v Vocabulary,
    item: &str,
    tiers: &[UnitTier],
) -> Option<(&'v str, UnitTier)> {
    let mut best: Option<(&'v str, UnitTier)> = None;

    for &tier in tiers {
        for word in vocab.words(tier) {
            if !item.contains(word) {
                continue;
            }
            best = match best {
                None => Some((word, tier)),
                Some((current, _)) if is_better(word, current) => Some((word, tier)),
                keep => keep,
            };
        }
    }

    best
}

fn is_better(candidate: &str, current: &str) -> bool {
    candidate.len() > current.len() || (candidate.len() == current.len() && candidate < current)
}
