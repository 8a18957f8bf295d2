//! Bartindr MCP Server Implementation
//!
//! Implements the MCP server with all normalization tools.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::engine::Engine;
use crate::tools::normalize;
use crate::tools::status::StatusTracker;

/// Bartindr MCP Service
#[derive(Clone)]
pub struct BartindrService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    engine: Arc<Engine>,
    tool_router: ToolRouter<BartindrService>,
}

impl BartindrService {
    pub fn new(engine: Engine, status_tracker: StatusTracker) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(status_tracker)),
            engine: Arc::new(engine),
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Measure Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseMeasureParams {
    /// Raw measure text, e.g. "1 3/4 shot" or "fill to top"
    pub measure: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResolveUnitParams {
    /// Unit phrase, e.g. "ounces" or "fill to top"
    pub unit_phrase: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertMeasureParams {
    /// Quantity in the given unit
    pub value: f64,
    /// Canonical unit (see list_vocabulary); omit for an unresolved unit
    pub unit: Option<String>,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeRecipeParams {
    /// Recipe name
    pub name: String,
    /// Ingredient name -> raw measure text
    pub measures: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeRecipesParams {
    /// Recipe name -> (ingredient name -> raw measure text)
    pub recipes: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeCatalogParams {
    /// Raw catalog search payload: {"drinks": [...]}
    pub payload: String,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl BartindrService {
    // --- Status ---

    #[tool(description = "Get the current status of the Bartindr service including build info and the loaded unit vocabulary")]
    async fn engine_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(description = "Get instructions for normalizing cocktail measures. Call this when unsure how to use the normalization tools.")]
    fn normalization_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::NORMALIZATION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(NORMALIZATION_INSTRUCTIONS)]))
    }

    #[tool(description = "List every canonical unit with its tier (primary, secondary, part, nonmetric) and mL factor")]
    fn list_vocabulary(&self) -> Result<CallToolResult, McpError> {
        to_json(&normalize::list_vocabulary(&self.engine))
    }

    // --- Measures ---

    #[tool(description = "Parse a raw measure into value and unit phrase, resolve the unit, and convert to mL")]
    fn parse_measure(&self, Parameters(p): Parameters<ParseMeasureParams>) -> Result<CallToolResult, McpError> {
        let result = normalize::parse_measure(&self.engine, &p.measure).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Resolve a free-text unit phrase to a canonical unit")]
    fn resolve_unit(&self, Parameters(p): Parameters<ResolveUnitParams>) -> Result<CallToolResult, McpError> {
        let result = normalize::resolve_unit(&self.engine, &p.unit_phrase).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Convert a value in a canonical unit to mL. Part units pass through, non-metric units return a flag")]
    fn convert_measure(&self, Parameters(p): Parameters<ConvertMeasureParams>) -> Result<CallToolResult, McpError> {
        let result = normalize::convert_measure(&self.engine, p.value, p.unit.as_deref()).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Recipes ---

    #[tool(description = "Normalize one recipe's ingredient measures to mL and to proportions summing to 1")]
    fn normalize_recipe(&self, Parameters(p): Parameters<NormalizeRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = normalize::normalize_recipe(&self.engine, &p.name, p.measures).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Normalize many recipes at once; returns converted values, proportions, and unresolved unit phrases")]
    fn normalize_recipes(&self, Parameters(p): Parameters<NormalizeRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = normalize::normalize_recipes(&self.engine, p.recipes).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Normalize every drink in a raw cocktail catalog payload ({\"drinks\": [...]})")]
    fn normalize_catalog(&self, Parameters(p): Parameters<NormalizeCatalogParams>) -> Result<CallToolResult, McpError> {
        let result = normalize::normalize_catalog(&self.engine, &p.payload).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for BartindrService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bartindr".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Bartindr".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Bartindr - cocktail measure normalization. \
                 Call normalization_instructions first. \
                 Measures: parse_measure, resolve_unit, convert_measure, list_vocabulary. \
                 Recipes: normalize_recipe, normalize_recipes, normalize_catalog. \
                 Status: engine_status."
                    .into(),
            ),
        }
    }
}
