//! Shared nutrition data structures
//!
//! Used for per-serving baselines, scaled item macros, and request totals.

use serde::{Deserialize, Serialize};

/// Macronutrient profile
///
/// Either a per-serving baseline or an already-scaled amount, depending on context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroProfile {
    pub calories: f64,
    pub protein: f64,       // grams
    pub carbs: f64,         // grams
    pub fats: f64,          // grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>, // grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>, // grams
}

impl MacroProfile {
    /// Profile with every optional field present
    pub const fn new(calories: f64, protein: f64, carbs: f64, fats: f64, fiber: f64, sugar: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fats,
            fiber: Some(fiber),
            sugar: Some(sugar),
        }
    }

    /// Scale every field by a multiplier; absent optional fields stay absent
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fats: self.fats * multiplier,
            fiber: self.fiber.map(|v| v * multiplier),
            sugar: self.sugar.map(|v| v * multiplier),
        }
    }
}

impl std::ops::Mul<f64> for MacroProfile {
    type Output = MacroProfile;

    fn mul(self, multiplier: f64) -> MacroProfile {
        self.scale(multiplier)
    }
}

/// Summed macros for one request, rounded to one decimal place
///
/// Fiber and sugar are always reported here; items without them count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub fiber: f64,
    pub sugar: f64,
}

impl NutritionTotals {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Accumulate one profile, treating absent optional fields as zero
    pub fn add(&self, macros: &MacroProfile) -> Self {
        Self {
            calories: self.calories + macros.calories,
            protein: self.protein + macros.protein,
            carbs: self.carbs + macros.carbs,
            fats: self.fats + macros.fats,
            fiber: self.fiber + macros.fiber.unwrap_or(0.0),
            sugar: self.sugar + macros.sugar.unwrap_or(0.0),
        }
    }
}
