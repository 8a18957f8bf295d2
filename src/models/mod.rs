//! Data models
//!
//! Rust structs for recipe records at each normalization stage.

mod converted;
mod proportion;
mod recipe;

pub use converted::ConvertedRecord;
pub use proportion::{ProportionRecord, ProportionTable};
pub use recipe::{
    parse_catalog_response, records_from_map, RecipeRecord, CATALOG_INGREDIENT_SLOTS,
};
