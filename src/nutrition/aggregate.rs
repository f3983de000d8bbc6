//! Request totals
//!
//! Rounding rule used everywhere in this crate: scale by 10^places, round half
//! away from zero (`f64::round`), scale back.

use crate::models::{NutritionTotals, ResolvedFoodItem};

/// Round to a fixed number of decimal places, half away from zero
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Sum item macros and round each total to one decimal place
pub fn calculate_totals(items: &[ResolvedFoodItem]) -> NutritionTotals {
    let sum = items
        .iter()
        .fold(NutritionTotals::zero(), |acc, item| acc.add(&item.macros));

    NutritionTotals {
        calories: round_to(sum.calories, 1),
        protein: round_to(sum.protein, 1),
        carbs: round_to(sum.carbs, 1),
        fats: round_to(sum.fats, 1),
        fiber: round_to(sum.fiber, 1),
        sugar: round_to(sum.sugar, 1),
    }
}
