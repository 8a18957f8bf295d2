//! Measurement normalization module
//!
//! Handles quantity parsing, unit resolution, and conversion to milliliters.

pub mod converter;
pub mod quantity;
pub mod resolver;
pub mod text;
pub mod units;

pub use converter::{batch_to_ml, to_ml, ConvertedCell};
pub use quantity::{parse_numeric_token, parse_quantity, ParsedQuantity, IMPLIED_UNIT, IMPLIED_VALUE};
pub use resolver::{resolve, resolve_unit, MatchKind, ResolvedUnit};
pub use text::{remove_spaces, split_numeric_alpha, strip_punctuation};
pub use units::{UnitTier, Vocabulary, VocabularyConfig, VocabularyError};
