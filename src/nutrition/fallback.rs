//! Built-in per-serving nutrition table
//!
//! Used when the external database is disabled, unconfigured, or has nothing
//! useful for an ingredient. Matching is deterministic: an exact
//! case-insensitive key wins, otherwise the first entry (in table order) whose
//! key contains or is contained in the ingredient. Overlapping keys such as
//! "chicken" and "chicken breast" therefore resolve by position.

use crate::models::MacroProfile;

/// Profile used when nothing in the table matches
pub const GENERIC_PROFILE: MacroProfile = MacroProfile::new(150.0, 8.0, 20.0, 5.0, 2.0, 5.0);

/// Per-serving profiles, in match order
pub static FALLBACK_TABLE: &[(&str, MacroProfile)] = &[
    // Fruits
    ("apple", MacroProfile::new(95.0, 0.5, 25.0, 0.3, 4.0, 19.0)),
    ("banana", MacroProfile::new(105.0, 1.3, 27.0, 0.4, 3.1, 14.0)),
    ("orange", MacroProfile::new(65.0, 1.3, 16.0, 0.2, 3.4, 13.0)),
    ("strawberry", MacroProfile::new(49.0, 1.0, 12.0, 0.5, 3.3, 7.0)),
    ("grape", MacroProfile::new(69.0, 0.7, 18.0, 0.2, 0.9, 15.0)),
    ("mango", MacroProfile::new(99.0, 1.4, 25.0, 0.6, 2.6, 23.0)),
    ("pineapple", MacroProfile::new(82.0, 0.9, 22.0, 0.2, 2.3, 16.0)),
    ("watermelon", MacroProfile::new(46.0, 0.9, 12.0, 0.2, 0.6, 9.0)),
    ("peach", MacroProfile::new(58.0, 1.4, 14.0, 0.4, 2.3, 13.0)),
    ("pear", MacroProfile::new(101.0, 0.6, 27.0, 0.2, 5.5, 17.0)),
    // Vegetables
    ("broccoli", MacroProfile::new(55.0, 4.6, 11.0, 0.6, 5.1, 2.6)),
    ("carrot", MacroProfile::new(41.0, 0.9, 10.0, 0.2, 2.8, 4.7)),
    ("tomato", MacroProfile::new(22.0, 1.1, 4.8, 0.2, 1.4, 3.2)),
    ("lettuce", MacroProfile::new(15.0, 1.4, 2.9, 0.2, 1.3, 0.8)),
    ("spinach", MacroProfile::new(23.0, 2.9, 3.6, 0.4, 2.2, 0.4)),
    ("cucumber", MacroProfile::new(16.0, 0.7, 3.6, 0.1, 0.5, 1.7)),
    ("bell pepper", MacroProfile::new(31.0, 1.0, 6.0, 0.3, 2.1, 4.2)),
    ("mushroom", MacroProfile::new(22.0, 3.1, 3.3, 0.3, 1.0, 2.0)),
    ("onion", MacroProfile::new(40.0, 1.1, 9.0, 0.1, 1.7, 4.2)),
    ("garlic", MacroProfile::new(149.0, 6.4, 33.0, 0.5, 2.1, 1.0)),
    // Proteins
    ("chicken", MacroProfile::new(165.0, 31.0, 0.0, 3.6, 0.0, 0.0)),
    ("chicken breast", MacroProfile::new(165.0, 31.0, 0.0, 3.6, 0.0, 0.0)),
    ("beef", MacroProfile::new(250.0, 26.0, 0.0, 15.0, 0.0, 0.0)),
    ("pork", MacroProfile::new(242.0, 27.0, 0.0, 14.0, 0.0, 0.0)),
    ("fish", MacroProfile::new(206.0, 22.0, 0.0, 12.0, 0.0, 0.0)),
    ("salmon", MacroProfile::new(208.0, 20.0, 0.0, 13.0, 0.0, 0.0)),
    ("tuna", MacroProfile::new(132.0, 28.0, 0.0, 1.3, 0.0, 0.0)),
    ("egg", MacroProfile::new(155.0, 13.0, 1.1, 11.0, 0.0, 1.1)),
    ("tofu", MacroProfile::new(76.0, 8.0, 1.9, 4.8, 0.3, 0.7)),
    // Carbohydrates
    ("bread", MacroProfile::new(265.0, 9.0, 49.0, 3.2, 2.7, 5.0)),
    ("rice", MacroProfile::new(130.0, 2.7, 28.0, 0.3, 0.4, 0.1)),
    ("brown rice", MacroProfile::new(112.0, 2.3, 24.0, 0.9, 1.8, 0.4)),
    ("pasta", MacroProfile::new(131.0, 5.0, 25.0, 1.1, 1.8, 0.6)),
    ("potato", MacroProfile::new(77.0, 2.0, 17.0, 0.1, 2.1, 0.8)),
    ("sweet potato", MacroProfile::new(86.0, 1.6, 20.0, 0.1, 3.0, 4.2)),
    ("oats", MacroProfile::new(389.0, 16.9, 66.0, 6.9, 10.6, 0.99)),
    ("quinoa", MacroProfile::new(120.0, 4.4, 21.0, 1.9, 2.8, 0.9)),
    // Popular dishes
    ("pizza", MacroProfile::new(285.0, 12.0, 36.0, 10.0, 2.3, 3.8)),
    ("burger", MacroProfile::new(295.0, 17.0, 23.0, 14.0, 2.0, 4.0)),
    ("salad", MacroProfile::new(65.0, 5.0, 7.0, 4.0, 3.0, 4.0)),
    ("sandwich", MacroProfile::new(230.0, 10.0, 30.0, 8.0, 3.0, 4.0)),
    ("soup", MacroProfile::new(85.0, 4.0, 12.0, 2.5, 2.0, 3.0)),
    ("wrap", MacroProfile::new(245.0, 11.0, 32.0, 9.0, 2.5, 3.5)),
    // Dairy & snacks
    ("cheese", MacroProfile::new(113.0, 7.0, 1.0, 9.0, 0.0, 0.5)),
    ("yogurt", MacroProfile::new(59.0, 10.0, 3.6, 0.4, 0.0, 3.6)),
    ("milk", MacroProfile::new(61.0, 3.2, 4.8, 3.3, 0.0, 5.1)),
    ("nuts", MacroProfile::new(607.0, 20.0, 16.0, 54.0, 8.0, 4.0)),
    ("almonds", MacroProfile::new(579.0, 21.0, 22.0, 50.0, 12.5, 4.4)),
    ("peanuts", MacroProfile::new(567.0, 26.0, 16.0, 49.0, 8.5, 4.7)),
    ("avocado", MacroProfile::new(160.0, 2.0, 9.0, 15.0, 7.0, 0.7)),
];

/// How a fallback profile was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMatch {
    Exact(&'static str),
    Partial(&'static str),
    Generic,
}

/// Find the per-serving profile for an ingredient
pub fn lookup(ingredient: &str) -> (MacroProfile, FallbackMatch) {
    let name = ingredient.to_lowercase();

    if let Some((key, profile)) = FALLBACK_TABLE.iter().find(|(key, _)| *key == name) {
        return (*profile, FallbackMatch::Exact(key));
    }

    if let Some((key, profile)) = FALLBACK_TABLE
        .iter()
        .find(|(key, _)| name.contains(key) || key.contains(name.as_str()))
    {
        return (*profile, FallbackMatch::Partial(key));
    }

    (GENERIC_PROFILE, FallbackMatch::Generic)
}

/// Whether a lowercased name is a table key
pub fn is_known_food(name: &str) -> bool {
    FALLBACK_TABLE.iter().any(|(key, _)| *key == name)
}
