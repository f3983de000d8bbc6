//! Data models
//!
//! Per-request records flowing through the extraction and resolution pipeline.

mod analysis;
mod food_item;
mod nutrition;
mod span;

pub use analysis::{AnalysisMetadata, AnalysisRequest, NutritionAnalysis};
pub use food_item::{ExtractedItem, Provenance, ResolvedFoodItem};
pub use nutrition::{MacroProfile, NutritionTotals};
pub use span::{EntityGroup, EntityLabel, Span};
