//! Unit normalization
//!
//! Maps the many spellings of a measurement unit onto one canonical form.

/// Canonical unit used when the text names no unit
pub const DEFAULT_UNIT: &str = "servings";

/// Look up the canonical form of a known unit spelling
///
/// Input is expected lowercased and trimmed.
pub fn canonical_unit(unit: &str) -> Option<&'static str> {
    let canonical = match unit {
        "g" | "gram" | "grams" => "grams",
        "kg" | "kilogram" | "kilograms" => "kg",
        "ml" | "milliliter" | "milliliters" => "ml",
        "l" | "liter" | "litre" | "liters" | "litres" => "liters",
        "cup" | "cups" => "cups",
        "slice" | "slices" => "slices",
        "pc" | "piece" | "pieces" => "pieces",
        "tbsp" | "tablespoon" | "tablespoons" => "tablespoons",
        "tsp" | "teaspoon" | "teaspoons" => "teaspoons",
        "glass" | "glasses" => "glasses",
        "serve" | "serving" | "servings" => "servings",
        "oz" | "ounce" | "ounces" => "ounces",
        "lb" | "pound" | "pounds" => "pounds",
        "bowl" | "bowls" => "bowls",
        "plate" | "plates" => "plates",
        "can" | "cans" => "cans",
        "bottle" | "bottles" => "bottles",
        "handful" => "handful",
        "bunch" => "bunch",
        _ => return None,
    };
    Some(canonical)
}

/// Normalize a raw unit token
///
/// Known spellings map to their canonical form, unknown tokens pass through
/// lowercased, and a missing or blank token becomes "servings".
pub fn normalize_unit(unit: Option<&str>) -> String {
    let lower = match unit {
        Some(u) => u.trim().to_lowercase(),
        None => return DEFAULT_UNIT.to_string(),
    };

    if lower.is_empty() {
        return DEFAULT_UNIT.to_string();
    }

    match canonical_unit(&lower) {
        Some(canonical) => canonical.to_string(),
        None => lower,
    }
}
