//! Item confidence
//!
//! Recognizer scores win when any are present. Without them the score comes
//! from which kinds of evidence the group holds.

use crate::models::{EntityLabel, Span};

pub const CONFIDENCE_FULL: f64 = 0.95;
pub const CONFIDENCE_PARTIAL: f64 = 0.80;
pub const CONFIDENCE_FOOD_ONLY: f64 = 0.65;
pub const CONFIDENCE_NO_FOOD: f64 = 0.50;

/// Confidence in [0, 1] for a group of spans (unrounded)
pub fn score_group(spans: &[Span]) -> f64 {
    let scores: Vec<f64> = spans.iter().filter_map(|s| s.score).collect();
    if !scores.is_empty() {
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        return mean.clamp(0.0, 1.0);
    }

    let has = |label: EntityLabel| spans.iter().any(|s| s.label == label);
    if !has(EntityLabel::Food) {
        return CONFIDENCE_NO_FOOD;
    }

    match (has(EntityLabel::Quantity), has(EntityLabel::Unit)) {
        (true, true) => CONFIDENCE_FULL,
        (true, false) | (false, true) => CONFIDENCE_PARTIAL,
        (false, false) => CONFIDENCE_FOOD_ONLY,
    }
}
