//! External nutrition database seam
//!
//! A `NutritionSource` answers two questions: which foods match a name, and
//! what nutrients a given food carries. Every failure is an error value; the
//! resolver decides how to degrade.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MacroProfile;

/// Kilojoules per kilocalorie
pub const KJ_PER_KCAL: f64 = 4.184;

/// Lookup error types
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}")]
    Status { service: String, status: u16 },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Lookup timed out after {0}s")]
    Timeout(u64),

    #[error("Lookup source not configured")]
    NotConfigured,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Result type for nutrition lookups
pub type LookupResult<T> = Result<T, LookupError>;

/// One search candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodSearchResult {
    pub fdc_id: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data_type: Option<String>,
}

/// A single reported nutrient amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrient {
    pub name: String,
    pub unit_name: String,
    pub amount: f64,
}

impl FoodNutrient {
    pub fn new(name: &str, unit_name: &str, amount: f64) -> Self {
        Self {
            name: name.to_string(),
            unit_name: unit_name.to_string(),
            amount,
        }
    }
}

/// Detailed nutrient record for one food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodDetails {
    pub fdc_id: u64,
    pub description: String,
    pub nutrients: Vec<FoodNutrient>,
}

/// External nutrition database
#[async_trait]
pub trait NutritionSource: Send + Sync {
    /// Short name used in logs and status output
    fn name(&self) -> &str;

    /// Whether the source has what it needs (credentials, endpoint) to be queried
    fn is_configured(&self) -> bool;

    /// Candidates for a food name, best first
    async fn search(&self, query: &str, limit: u32) -> LookupResult<Vec<FoodSearchResult>>;

    /// Nutrient record for a candidate; `Ok(None)` when the source has no record
    async fn detail(&self, fdc_id: u64) -> LookupResult<Option<FoodDetails>>;
}

/// Map a nutrient record onto a macro profile
///
/// Energy reported in kJ is converted to kcal; a kcal entry takes precedence
/// when both are present. Fiber and sugar stay absent unless reported.
pub fn extract_macros(details: &FoodDetails) -> MacroProfile {
    let mut macros = MacroProfile::default();
    let mut have_kcal = false;

    for nutrient in &details.nutrients {
        let amount = nutrient.amount.max(0.0);
        match nutrient.name.as_str() {
            "Energy" => match nutrient.unit_name.to_uppercase().as_str() {
                "KCAL" => {
                    macros.calories = amount;
                    have_kcal = true;
                }
                "KJ" if !have_kcal => macros.calories = amount / KJ_PER_KCAL,
                _ => {}
            },
            "Protein" => macros.protein = amount,
            "Carbohydrate, by difference" => macros.carbs = amount,
            "Total lipid (fat)" => macros.fats = amount,
            "Fiber, total dietary" => macros.fiber = Some(amount),
            "Sugars, total including NLEA" => macros.sugar = Some(amount),
            _ => {}
        }
    }

    macros
}
