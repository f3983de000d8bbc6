//! Analysis request and response records

use serde::{Deserialize, Serialize};

use super::{NutritionTotals, ResolvedFoodItem};

fn default_include_external() -> bool {
    true
}

/// A free-text analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
    /// Whether to query the external nutrition database before the fallback table
    #[serde(default = "default_include_external")]
    pub include_external: bool,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            include_external: true,
        }
    }

    pub fn without_external(mut self) -> Self {
        self.include_external = false;
        self
    }
}

/// Descriptive counters attached to every analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub entity_source: String,
    pub external_configured: bool,
    pub external_lookup_enabled: bool,
    pub items_external: usize,
    pub items_estimated: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Complete nutrition analysis for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionAnalysis {
    pub success: bool,
    pub input_type: String,
    pub raw_input: String,
    pub items: Vec<ResolvedFoodItem>,
    pub totals: NutritionTotals,
    /// Wall-clock seconds, rounded to milliseconds
    pub processing_time: f64,
    pub warnings: Vec<String>,
    pub metadata: AnalysisMetadata,
}

impl NutritionAnalysis {
    /// Terminal result for a request that could not be analyzed at all
    pub fn failed(raw_input: &str, reason: &str, processing_time: f64, metadata: AnalysisMetadata) -> Self {
        Self {
            success: false,
            input_type: "text".to_string(),
            raw_input: raw_input.to_string(),
            items: Vec::new(),
            totals: NutritionTotals::zero(),
            processing_time,
            warnings: vec![format!("Analysis failed: {}", reason)],
            metadata: AnalysisMetadata {
                error: Some(reason.to_string()),
                ..metadata
            },
        }
    }
}
