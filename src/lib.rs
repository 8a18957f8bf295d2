//! Bartindr Library
//!
//! Measurement normalization for cocktail recipe data: quantity parsing,
//! tiered unit resolution, conversion to milliliters, and per-recipe
//! proportions.

pub mod build_info;
pub mod config;
pub mod engine;
pub mod mcp;
pub mod measure;
pub mod models;
pub mod tools;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, MeasureOutcome, NormalizedBatch};
