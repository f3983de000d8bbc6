//! NTA MCP Server Implementation
//!
//! Implements the MCP server with all NTA tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::analyzer::Analyzer;
use crate::config::NtaConfig;
use crate::tools::analyze;
use crate::tools::status::{Readiness, StatusTracker};

/// NTA MCP Service
#[derive(Clone)]
pub struct NtaService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    analyzer: Arc<Analyzer>,
    config: Arc<NtaConfig>,
    tool_router: ToolRouter<NtaService>,
}

impl NtaService {
    pub fn new(config: NtaConfig, analyzer: Analyzer) -> Self {
        let tracker = StatusTracker::new(Readiness {
            entity_source: analyzer.entity_source_name().to_string(),
            nutrition_source: analyzer.nutrition_source_name().map(str::to_string),
            usda_configured: analyzer.external_configured(),
        });
        Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            analyzer: Arc::new(analyzer),
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeTextParams {
    /// Free-text meal description, e.g. "I had 2 eggs and a slice of toast"
    pub text: String,
    /// Query the USDA database before the built-in table (default true)
    #[serde(default = "default_include_usda")]
    pub include_usda: bool,
}

fn default_include_usda() -> bool { true }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupNutritionParams {
    /// Ingredient name, e.g. "brown rice"
    pub ingredient: String,
    /// Number of servings or units (default 1.0)
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Unit such as "g", "cup", "slice" (optional)
    pub unit: Option<String>,
}

fn default_quantity() -> f64 { 1.0 }

#[derive(Debug, Serialize)]
struct ConfigResponse<'a> {
    server: &'static str,
    version: &'static str,
    config: crate::config::ConfigSummary,
    effective_entity_source: &'a str,
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl NtaService {
    #[tool(description = "Analyze a free-text meal description. Extracts food items with quantities and units, resolves nutrition (USDA FoodData Central, then a built-in table), and returns per-item macros plus rounded totals.")]
    async fn analyze_text(&self, Parameters(p): Parameters<AnalyzeTextParams>) -> Result<CallToolResult, McpError> {
        let result = analyze::analyze_text(&self.analyzer, &p.text, p.include_usda).await;
        to_json(&result)
    }

    #[tool(description = "Look up nutrition for a single named ingredient with an optional quantity and unit")]
    async fn lookup_nutrition(&self, Parameters(p): Parameters<LookupNutritionParams>) -> Result<CallToolResult, McpError> {
        let result = analyze::lookup_nutrition(&self.analyzer, &p.ingredient, p.quantity, p.unit.as_deref())
            .await
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the current status of the NTA service including build info, uptime, process information, and which sources are active")]
    async fn nta_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        to_json(&status)
    }

    #[tool(description = "Show the effective NTA configuration (API key redacted)")]
    async fn nta_config(&self) -> Result<CallToolResult, McpError> {
        let response = ConfigResponse {
            server: crate::build_info::NAME,
            version: crate::build_info::VERSION,
            config: self.config.summary(),
            effective_entity_source: self.analyzer.entity_source_name(),
        };
        to_json(&response)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NtaService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nta".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrition Text Analyzer".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrition Text Analyzer (NTA) - turns meal descriptions into quantified nutrition. \
                 analyze_text: full description in, items and totals out. \
                 lookup_nutrition: one ingredient with quantity and unit. \
                 Items carry provenance external_db (USDA) or fallback_table (estimated). \
                 Service: nta_status, nta_config."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_info() {
        let config = NtaConfig::default();
        let analyzer = Analyzer::from_config(&config).unwrap();
        let service = NtaService::new(config, analyzer);
        let info = service.get_info();
        assert_eq!(info.server_info.name, "nta");
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_params_defaults() {
        let p: AnalyzeTextParams = serde_json::from_str(r#"{"text": "2 eggs"}"#).unwrap();
        assert!(p.include_usda);

        let p: LookupNutritionParams = serde_json::from_str(r#"{"ingredient": "rice"}"#).unwrap();
        assert_eq!(p.quantity, 1.0);
        assert_eq!(p.unit, None);
    }
}
