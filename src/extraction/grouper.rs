//! Span grouping
//!
//! The recognizer marks no item boundaries. A FOOD span arriving when the
//! current group already holds one is the only boundary signal, so it always
//! starts a new group. Conjunctions and punctuation are not boundaries.

use crate::models::{EntityGroup, Span};

/// Partition position-ordered spans into per-item groups
///
/// Concatenating the returned groups reproduces the input exactly.
pub fn group_spans(spans: &[Span]) -> Vec<EntityGroup> {
    let mut groups = Vec::new();
    let mut current = EntityGroup::new();
    let mut has_food = false;

    for span in spans {
        if span.is_food() && has_food {
            groups.push(std::mem::take(&mut current));
        }
        if span.is_food() {
            has_food = true;
        }
        current.push(span.clone());
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}
