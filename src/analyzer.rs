//! Analysis pipeline
//!
//! Runs one request end to end: entity extraction, grouping, item assembly,
//! concurrent nutrition resolution, and totals. Only an invalid request fails
//! the whole analysis; every other problem degrades to a warning, a skipped
//! item, or fallback nutrition.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, EntitySourceKind, NtaConfig};
use crate::extraction::{
    assemble_items, group_spans, DisabledEntitySource, EntitySource, EntitySourceError,
    HttpEntitySource, LexiconEntitySource,
};
use crate::models::{
    AnalysisMetadata, AnalysisRequest, ExtractedItem, NutritionAnalysis, ResolvedFoodItem,
};
use crate::nutrition::{
    calculate_totals, normalize_unit, round_to, LookupError, NutritionResolver, NutritionSource,
    UsdaClient,
};

pub const WARNING_NO_ITEMS: &str = "No food items could be identified";
pub const WARNING_BASIC_EXTRACTION: &str = "Using basic extraction (no entity recognizer service)";
pub const WARNING_ESTIMATED: &str = "Using estimated nutrition data (USDA API not configured)";

/// Analysis error types
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Text is empty")]
    EmptyText,

    #[error("Text is {len} characters, the limit is {max}")]
    TextTooLong { len: usize, max: usize },

    #[error("Ingredient name is empty")]
    EmptyIngredient,

    #[error("Quantity must be a positive number, got {0}")]
    InvalidQuantity(f64),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Entity source error: {0}")]
    EntitySource(#[from] EntitySourceError),

    #[error("Nutrition source error: {0}")]
    Lookup(#[from] LookupError),
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// The text-to-nutrition pipeline
pub struct Analyzer {
    entities: Arc<dyn EntitySource>,
    resolver: NutritionResolver,
    lookup_permits: Semaphore,
    max_text_len: usize,
}

impl Analyzer {
    pub fn new(
        entities: Arc<dyn EntitySource>,
        resolver: NutritionResolver,
        max_concurrent_lookups: usize,
        max_text_len: usize,
    ) -> Self {
        Self {
            entities,
            resolver,
            lookup_permits: Semaphore::new(max_concurrent_lookups.max(1)),
            max_text_len,
        }
    }

    /// Build the entity source and USDA client the configuration asks for
    pub fn from_config(config: &NtaConfig) -> AnalysisResult<Self> {
        let entities: Arc<dyn EntitySource> = match config.entity_source {
            EntitySourceKind::Lexicon => Arc::new(LexiconEntitySource),
            EntitySourceKind::Http => {
                let url = config.ner_url.clone().ok_or(ConfigError::MissingNerUrl)?;
                Arc::new(HttpEntitySource::new(url, config.lookup_timeout())?)
            }
            EntitySourceKind::None => Arc::new(DisabledEntitySource),
        };

        let usda: Arc<dyn NutritionSource> = Arc::new(UsdaClient::new(config.usda_client_config())?);
        let resolver = NutritionResolver::new(Some(usda), config.lookup_timeout());

        info!(
            entity_source = entities.name(),
            usda_configured = resolver.external_configured(),
            max_concurrent_lookups = config.max_concurrent_lookups,
            "Analyzer ready"
        );

        Ok(Self::new(
            entities,
            resolver,
            config.max_concurrent_lookups,
            config.max_text_len,
        ))
    }

    pub fn entity_source_name(&self) -> &str {
        self.entities.name()
    }

    pub fn external_configured(&self) -> bool {
        self.resolver.external_configured()
    }

    /// Name of the external nutrition source, if one is attached
    pub fn nutrition_source_name(&self) -> Option<&str> {
        self.resolver.source_name()
    }

    /// Analyze a request; never fails, problems are reported in the result
    pub async fn analyze(&self, request: &AnalysisRequest) -> NutritionAnalysis {
        let started = Instant::now();
        let external_configured = self.external_configured();
        let mut metadata = AnalysisMetadata {
            entity_source: self.entity_source_name().to_string(),
            external_configured,
            external_lookup_enabled: request.include_external && external_configured,
            ..AnalysisMetadata::default()
        };

        if let Err(e) = self.validate_text(&request.text) {
            warn!(error = %e, "Rejected analysis request");
            return NutritionAnalysis::failed(
                &request.text,
                &e.to_string(),
                elapsed_secs(started),
                metadata,
            );
        }

        info!(
            chars = request.text.chars().count(),
            include_external = request.include_external,
            "Analyzing text"
        );

        let mut warnings = Vec::new();
        let mut spans = match self.entities.extract(&request.text).await {
            Ok(spans) => spans,
            Err(e) => {
                warn!(source = self.entity_source_name(), error = %e, "Entity extraction failed");
                warnings.push(format!("Entity extraction unavailable: {}", e));
                Vec::new()
            }
        };
        spans.sort_by_key(|s| s.start);

        let groups = group_spans(&spans);
        let extracted = assemble_items(&groups);
        debug!(
            spans = spans.len(),
            groups = groups.len(),
            items = extracted.len(),
            "Extraction complete"
        );

        let items = self.resolve_all(&extracted, request.include_external).await;
        let totals = calculate_totals(&items);

        if items.is_empty() {
            warnings.push(WARNING_NO_ITEMS.to_string());
        }
        if self.entity_source_name() == "lexicon" {
            warnings.push(WARNING_BASIC_EXTRACTION.to_string());
        }
        if !external_configured {
            warnings.push(WARNING_ESTIMATED.to_string());
        }

        metadata.items_external = items.iter().filter(|i| i.is_external()).count();
        metadata.items_estimated = items.len() - metadata.items_external;

        let processing_time = elapsed_secs(started);
        info!(
            items = items.len(),
            calories = totals.calories,
            processing_time,
            "Analysis complete"
        );

        NutritionAnalysis {
            success: true,
            input_type: "text".to_string(),
            raw_input: request.text.clone(),
            items,
            totals,
            processing_time,
            warnings,
            metadata,
        }
    }

    /// Resolve a directly named ingredient without entity extraction
    pub async fn lookup(
        &self,
        ingredient: &str,
        quantity: f64,
        unit: Option<&str>,
        include_external: bool,
    ) -> AnalysisResult<ResolvedFoodItem> {
        let ingredient = ingredient.trim();
        if ingredient.is_empty() {
            return Err(AnalysisError::EmptyIngredient);
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(AnalysisError::InvalidQuantity(quantity));
        }

        let item = ExtractedItem {
            ingredient: ingredient.to_string(),
            quantity,
            unit: normalize_unit(unit),
            confidence: 1.0,
        };
        Ok(self.resolver.resolve(&item, include_external).await)
    }

    fn validate_text(&self, text: &str) -> AnalysisResult<()> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyText);
        }
        let len = text.chars().count();
        if len > self.max_text_len {
            return Err(AnalysisError::TextTooLong {
                len,
                max: self.max_text_len,
            });
        }
        Ok(())
    }

    /// Resolve items concurrently, results in input order
    async fn resolve_all(
        &self,
        items: &[ExtractedItem],
        include_external: bool,
    ) -> Vec<ResolvedFoodItem> {
        let lookups = items.iter().map(|item| async move {
            // The semaphore is never closed, so acquiring cannot fail
            let _permit = self.lookup_permits.acquire().await.ok();
            self.resolver.resolve(item, include_external).await
        });
        join_all(lookups).await
    }
}

fn elapsed_secs(started: Instant) -> f64 {
    round_to(started.elapsed().as_secs_f64(), 3)
}
