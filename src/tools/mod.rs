//! Bartindr Tools module
//!
//! MCP tool implementations for the measurement normalization service.

pub mod normalize;
pub mod status;
