//! Entity sources
//!
//! An entity source turns text into position-ordered FOOD/QUANTITY/UNIT spans.
//! The recognizer itself is external; this module only defines the seam and
//! the ways of reaching one.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::build_info::BuildInfo;
use crate::models::{EntityLabel, Span};

/// Entity source error types
#[derive(Debug, Error)]
pub enum EntitySourceError {
    #[error("Entity source unavailable: {0}")]
    Unavailable(String),

    #[error("Entity service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Entity service returned HTTP {0}")]
    Status(u16),

    #[error("Malformed entity response: {0}")]
    Malformed(String),
}

/// Result type for entity extraction
pub type EntityResult<T> = Result<T, EntitySourceError>;

/// Producer of labeled spans
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Short name used in logs and response metadata
    fn name(&self) -> &str;

    /// Spans over `text`, ordered by start offset
    async fn extract(&self, text: &str) -> EntityResult<Vec<Span>>;
}

/// Source that is switched off; every call reports unavailability
#[derive(Debug, Clone, Default)]
pub struct DisabledEntitySource;

#[async_trait]
impl EntitySource for DisabledEntitySource {
    fn name(&self) -> &str {
        "none"
    }

    async fn extract(&self, _text: &str) -> EntityResult<Vec<Span>> {
        Err(EntitySourceError::Unavailable(
            "no entity recognizer configured".to_string(),
        ))
    }
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    entities: Vec<RawEntity>,
}

/// Entity as sent by the service; labels are free-form strings
#[derive(Debug, Deserialize)]
struct RawEntity {
    label: String,
    text: String,
    start: usize,
    end: usize,
    #[serde(default)]
    score: Option<f64>,
}

/// Keep food-vocabulary entities and order them by position
fn into_spans(entities: Vec<RawEntity>) -> Vec<Span> {
    let mut spans: Vec<Span> = entities
        .into_iter()
        .filter_map(|e| {
            let label = EntityLabel::parse(&e.label)?;
            Some(Span {
                label,
                text: e.text,
                start: e.start,
                end: e.end,
                score: e.score,
            })
        })
        .collect();
    spans.sort_by_key(|s| s.start);
    spans
}

/// Named-entity recognizer reached over HTTP
///
/// POSTs `{"text": ...}` and expects
/// `{"entities": [{"label", "text", "start", "end", "score"?}]}`.
pub struct HttpEntitySource {
    url: String,
    http_client: reqwest::Client,
}

impl HttpEntitySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> EntityResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BuildInfo::current().user_agent())
            .build()?;
        Ok(Self {
            url: url.into(),
            http_client,
        })
    }
}

#[async_trait]
impl EntitySource for HttpEntitySource {
    fn name(&self) -> &str {
        "http"
    }

    async fn extract(&self, text: &str) -> EntityResult<Vec<Span>> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&ExtractRequest { text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EntitySourceError::Status(response.status().as_u16()));
        }

        let body: ExtractResponse = response
            .json()
            .await
            .map_err(|e| EntitySourceError::Malformed(e.to_string()))?;

        let spans = into_spans(body.entities);
        debug!(count = spans.len(), "Entity service returned spans");
        Ok(spans)
    }
}
