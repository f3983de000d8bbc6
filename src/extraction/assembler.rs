//! Item assembly
//!
//! Builds one `ExtractedItem` from a group. Quantity and unit come from the
//! closest QUANTITY/UNIT span that ends at or before the first FOOD span;
//! spans trailing the food belong to whatever the text mentions next.

use thiserror::Error;
use tracing::warn;

use super::confidence::score_group;
use super::quantity::{parse_quantity, DEFAULT_QUANTITY};
use crate::models::{EntityGroup, EntityLabel, ExtractedItem, Span};
use crate::nutrition::aggregate::round_to;
use crate::nutrition::units::{normalize_unit, DEFAULT_UNIT};

/// Assembly error types
#[derive(Debug, Error, PartialEq)]
pub enum AssemblyError {
    #[error("Span '{text}' has start {start} after end {end}")]
    InvertedSpan { text: String, start: usize, end: usize },

    #[error("Group has no FOOD span")]
    NoFood,
}

/// Result type for item assembly
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Assemble a group into an item
///
/// Returns `Ok(None)` when the joined FOOD text is blank.
pub fn assemble_item(group: &EntityGroup) -> AssemblyResult<Option<ExtractedItem>> {
    if let Some(bad) = group.spans.iter().find(|s| s.start > s.end) {
        return Err(AssemblyError::InvertedSpan {
            text: bad.text.clone(),
            start: bad.start,
            end: bad.end,
        });
    }

    let foods: Vec<&Span> = group.with_label(EntityLabel::Food).collect();
    let first_food = foods.first().ok_or(AssemblyError::NoFood)?;

    let ingredient = foods
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    if ingredient.is_empty() {
        return Ok(None);
    }

    let anchor = first_food.start;
    let quantity = closest_preceding(group, EntityLabel::Quantity, anchor)
        .map(|s| parse_quantity(Some(&s.text)))
        .unwrap_or(DEFAULT_QUANTITY);
    let unit = closest_preceding(group, EntityLabel::Unit, anchor)
        .map(|s| normalize_unit(Some(&s.text)))
        .unwrap_or_else(|| DEFAULT_UNIT.to_string());

    Ok(Some(ExtractedItem {
        ingredient,
        quantity,
        unit,
        confidence: round_to(score_group(&group.spans), 2),
    }))
}

/// Assemble every group that holds a FOOD span, skipping malformed ones
pub fn assemble_items(groups: &[EntityGroup]) -> Vec<ExtractedItem> {
    groups
        .iter()
        .filter(|g| g.has_food())
        .filter_map(|g| match assemble_item(g) {
            Ok(item) => item,
            Err(e) => {
                warn!(error = %e, "Skipping malformed entity group");
                None
            }
        })
        .collect()
}

/// The span with the given label ending closest before `anchor`
///
/// On equal end offsets the earliest span in the group wins.
fn closest_preceding(group: &EntityGroup, label: EntityLabel, anchor: usize) -> Option<&Span> {
    group
        .with_label(label)
        .filter(|s| s.end <= anchor)
        .fold(None, |best: Option<&Span>, span| match best {
            Some(b) if b.end >= span.end => Some(b),
            _ => Some(span),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityLabel::{Food, Quantity, Unit};

    fn group(spans: Vec<Span>) -> EntityGroup {
        EntityGroup { spans }
    }

    #[test]
    fn test_quantity_before_food() {
        // "I had 2 apples"
        let item = assemble_item(&group(vec![
            Span::new(Quantity, "2", 6, 7),
            Span::new(Food, "apples", 8, 14),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(
            item,
            ExtractedItem {
                ingredient: "apples".to_string(),
                quantity: 2.0,
                unit: "servings".to_string(),
                confidence: 0.80,
            }
        );
    }

    #[test]
    fn test_full_item() {
        // "3 cups of rice"
        let item = assemble_item(&group(vec![
            Span::new(Quantity, "3", 0, 1),
            Span::new(Unit, "cups", 2, 6),
            Span::new(Food, "rice", 10, 14),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(item.quantity, 3.0);
        assert_eq!(item.unit, "cups");
        assert_eq!(item.confidence, 0.95);
    }

    #[test]
    fn test_trailing_quantity_is_ignored() {
        // "3 eggs and 2 ..." where the "2" landed in the egg group
        let item = assemble_item(&group(vec![
            Span::new(Quantity, "3", 4, 5),
            Span::new(Food, "eggs", 6, 10),
            Span::new(Quantity, "2", 15, 16),
            Span::new(Unit, "slices", 17, 23),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(item.quantity, 3.0);
        assert_eq!(item.unit, "servings");
    }

    #[test]
    fn test_closest_preceding_quantity_wins() {
        let item = assemble_item(&group(vec![
            Span::new(Quantity, "5", 0, 1),
            Span::new(Quantity, "half", 2, 6),
            Span::new(Food, "pizza", 7, 12),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(item.quantity, 0.5);
    }

    #[test]
    fn test_food_texts_are_joined() {
        let item = assemble_item(&group(vec![
            Span::new(Food, " peanut", 0, 6),
            Span::new(Food, "butter ", 7, 13),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(item.ingredient, "peanut butter");
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.confidence, 0.65);
    }

    #[test]
    fn test_blank_food_yields_nothing() {
        let result = assemble_item(&group(vec![Span::new(Food, "  ", 0, 2)])).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_malformed_groups_are_errors() {
        let inverted = group(vec![Span::new(Food, "rice", 9, 4)]);
        assert!(matches!(
            assemble_item(&inverted),
            Err(AssemblyError::InvertedSpan { .. })
        ));

        let no_food = group(vec![Span::new(Quantity, "2", 0, 1)]);
        assert_eq!(assemble_item(&no_food), Err(AssemblyError::NoFood));
    }

    #[test]
    fn test_assemble_items_skips_bad_groups() {
        let groups = vec![
            group(vec![Span::new(Quantity, "2", 0, 1)]),
            group(vec![Span::new(Food, "rice", 9, 4)]),
            group(vec![Span::new(Food, "  ", 10, 12)]),
            group(vec![Span::new(Quantity, "3", 13, 14), Span::new(Food, "eggs", 15, 19)]),
        ];
        let items = assemble_items(&groups);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].ingredient, "eggs");
        assert_eq!(items[0].quantity, 3.0);
    }

    #[test]
    fn test_model_scores_rounded() {
        let item = assemble_item(&group(vec![
            Span::new(Quantity, "2", 0, 1).with_score(0.912),
            Span::new(Food, "eggs", 2, 6).with_score(0.874),
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(item.confidence, 0.89);
    }
}
