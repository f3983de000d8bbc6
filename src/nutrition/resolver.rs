//! Nutrition resolution
//!
//! Resolves an extracted item to quantity-scaled macros. The external source
//! is tried first when enabled and configured; anything short of a usable
//! nutrient record falls back to the built-in table. Resolution never fails.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::aggregate::round_to;
use super::fallback::{self, FallbackMatch};
use super::source::{extract_macros, LookupError, LookupResult, NutritionSource};
use crate::models::{ExtractedItem, MacroProfile, Provenance, ResolvedFoodItem};

/// Confidence added when the external source confirms an item
pub const EXTERNAL_CONFIDENCE_BOOST: f64 = 0.05;

pub const NOTE_NO_MATCH: &str = "no external match";
pub const NOTE_LOOKUP_FAILED: &str = "external lookup failed";
pub const NOTE_ESTIMATED: &str = "estimated values used";

/// Result of the external tier for one item
enum ExternalOutcome {
    Found { fdc_id: u64, per_serving: MacroProfile },
    NoMatch,
    Failed,
}

/// Tiered nutrition resolver
#[derive(Clone)]
pub struct NutritionResolver {
    source: Option<Arc<dyn NutritionSource>>,
    timeout: Duration,
}

impl NutritionResolver {
    pub fn new(source: Option<Arc<dyn NutritionSource>>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Resolver that only ever uses the fallback table
    pub fn fallback_only() -> Self {
        Self::new(None, Duration::from_secs(15))
    }

    /// Whether an external source is present and able to answer queries
    pub fn external_configured(&self) -> bool {
        self.source.as_ref().is_some_and(|s| s.is_configured())
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref().map(|s| s.name())
    }

    /// Resolve one item
    pub async fn resolve(&self, item: &ExtractedItem, include_external: bool) -> ResolvedFoodItem {
        let source = match &self.source {
            Some(source) if include_external && source.is_configured() => source,
            _ => return resolve_fallback(item, &[NOTE_ESTIMATED]),
        };

        match self.lookup_external(source.as_ref(), &item.ingredient).await {
            ExternalOutcome::Found { fdc_id, per_serving } => {
                info!(
                    ingredient = %item.ingredient,
                    fdc_id,
                    source = source.name(),
                    "Resolved from external database"
                );
                ResolvedFoodItem {
                    ingredient: item.ingredient.clone(),
                    quantity: item.quantity,
                    unit: item.unit.clone(),
                    confidence: round_to((item.confidence + EXTERNAL_CONFIDENCE_BOOST).min(1.0), 2),
                    macros: per_serving.scale(item.quantity),
                    provenance: Provenance::ExternalDb,
                    note: None,
                    external_id: Some(fdc_id.to_string()),
                }
            }
            ExternalOutcome::NoMatch => resolve_fallback(item, &[NOTE_NO_MATCH, NOTE_ESTIMATED]),
            ExternalOutcome::Failed => resolve_fallback(item, &[NOTE_LOOKUP_FAILED, NOTE_ESTIMATED]),
        }
    }

    async fn lookup_external(&self, source: &dyn NutritionSource, ingredient: &str) -> ExternalOutcome {
        let candidates = match self.bounded(source.search(ingredient, 1)).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(ingredient, error = %e, "External search failed");
                return ExternalOutcome::Failed;
            }
        };

        let Some(best) = candidates.into_iter().next() else {
            debug!(ingredient, "No external candidates");
            return ExternalOutcome::NoMatch;
        };

        match self.bounded(source.detail(best.fdc_id)).await {
            Ok(Some(details)) => ExternalOutcome::Found {
                fdc_id: best.fdc_id,
                per_serving: extract_macros(&details),
            },
            Ok(None) => {
                warn!(ingredient, fdc_id = best.fdc_id, "External detail missing");
                ExternalOutcome::Failed
            }
            Err(e) => {
                warn!(ingredient, fdc_id = best.fdc_id, error = %e, "External detail failed");
                ExternalOutcome::Failed
            }
        }
    }

    /// Apply the per-call timeout to an external request
    async fn bounded<T, F>(&self, call: F) -> LookupResult<T>
    where
        F: Future<Output = LookupResult<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout(self.timeout.as_secs())),
        }
    }
}

/// Resolve an item from the fallback table
pub fn resolve_fallback(item: &ExtractedItem, notes: &[&str]) -> ResolvedFoodItem {
    let (per_serving, matched) = fallback::lookup(&item.ingredient);
    match matched {
        FallbackMatch::Exact(key) | FallbackMatch::Partial(key) => {
            debug!(ingredient = %item.ingredient, key, "Fallback table match")
        }
        FallbackMatch::Generic => {
            debug!(ingredient = %item.ingredient, "No fallback match, using generic profile")
        }
    }

    ResolvedFoodItem {
        ingredient: item.ingredient.clone(),
        quantity: item.quantity,
        unit: item.unit.clone(),
        confidence: item.confidence,
        macros: per_serving.scale(item.quantity),
        provenance: Provenance::FallbackTable,
        note: if notes.is_empty() {
            None
        } else {
            Some(notes.join("; "))
        },
        external_id: None,
    }
}
