//! Analysis MCP Tools
//!
//! Tools for analyzing meal descriptions and looking up single ingredients.

use serde::Serialize;

use crate::analyzer::Analyzer;
use crate::models::{AnalysisRequest, NutritionAnalysis, ResolvedFoodItem};

/// Response for lookup_nutrition
#[derive(Debug, Serialize)]
pub struct LookupNutritionResponse {
    pub item: ResolvedFoodItem,
    pub external_configured: bool,
}

/// Analyze free text; failures are reported inside the analysis
pub async fn analyze_text(analyzer: &Analyzer, text: &str, include_usda: bool) -> NutritionAnalysis {
    let mut request = AnalysisRequest::new(text);
    if !include_usda {
        request = request.without_external();
    }
    analyzer.analyze(&request).await
}

/// Resolve nutrition for a directly named ingredient
pub async fn lookup_nutrition(
    analyzer: &Analyzer,
    ingredient: &str,
    quantity: f64,
    unit: Option<&str>,
) -> Result<LookupNutritionResponse, String> {
    let item = analyzer
        .lookup(ingredient, quantity, unit, true)
        .await
        .map_err(|e| e.to_string())?;

    Ok(LookupNutritionResponse {
        item,
        external_configured: analyzer.external_configured(),
    })
}
