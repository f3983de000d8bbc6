//! Nutrition resolution module
//!
//! Unit normalization, the fallback table, the external database client,
//! tiered resolution, and totals.

pub mod aggregate;
pub mod fallback;
pub mod resolver;
pub mod source;
pub mod units;
pub mod usda;

pub use aggregate::{calculate_totals, round_to};
pub use resolver::{resolve_fallback, NutritionResolver};
pub use source::{
    extract_macros, FoodDetails, FoodNutrient, FoodSearchResult, LookupError, LookupResult,
    NutritionSource,
};
pub use units::normalize_unit;
pub use usda::{UsdaClient, UsdaClientConfig};
