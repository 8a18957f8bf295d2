//! MCP module
//!
//! Exposes the normalization tools over the Model Context Protocol.

pub mod server;

pub use server::BartindrService;
