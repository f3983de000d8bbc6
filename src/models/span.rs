//! Entity spans and groups
//!
//! Spans are emitted by an entity source; groups are clusters of spans that
//! describe one food item.

use serde::{Deserialize, Serialize};

/// Entity label emitted by the recognizer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Food,
    Quantity,
    Unit,
}

impl EntityLabel {
    /// Parse a label, returning None for labels outside the food vocabulary
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "FOOD" => Some(EntityLabel::Food),
            "QUANTITY" => Some(EntityLabel::Quantity),
            "UNIT" => Some(EntityLabel::Unit),
            _ => None,
        }
    }
}

/// A labeled region of the source text
///
/// `start` and `end` are character offsets into the analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub label: EntityLabel,
    pub text: String,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Span {
    pub fn new(label: EntityLabel, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            label,
            text: text.into(),
            start,
            end,
            score: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn is_food(&self) -> bool {
        self.label == EntityLabel::Food
    }
}

/// Ordered spans describing one food item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityGroup {
    pub spans: Vec<Span>,
}

impl EntityGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn has_food(&self) -> bool {
        self.spans.iter().any(Span::is_food)
    }

    /// Spans with the given label, in group order
    pub fn with_label(&self, label: EntityLabel) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(move |s| s.label == label)
    }
}
