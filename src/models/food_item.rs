//! Food item models
//!
//! An extracted item is what the text says; a resolved item adds the nutrition
//! found for it.

use serde::{Deserialize, Serialize};

use super::MacroProfile;

/// Which tier produced a resolved item's macros
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    ExternalDb,
    FallbackTable,
}

/// A food item assembled from one entity group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub ingredient: String,
    pub quantity: f64,
    /// Canonical unit (see `nutrition::units::normalize_unit`)
    pub unit: String,
    pub confidence: f64,
}

/// An extracted item with its quantity-scaled nutrition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFoodItem {
    pub ingredient: String,
    pub quantity: f64,
    pub unit: String,
    pub confidence: f64,
    pub macros: MacroProfile,
    pub provenance: Provenance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// FoodData Central id of the matched food, for external_db items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl ResolvedFoodItem {
    pub fn is_external(&self) -> bool {
        self.provenance == Provenance::ExternalDb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_serialization() {
        assert_eq!(
            serde_json::to_string(&Provenance::ExternalDb).unwrap(),
            r#""external_db""#
        );
        assert_eq!(
            serde_json::to_string(&Provenance::FallbackTable).unwrap(),
            r#""fallback_table""#
        );
    }
}
