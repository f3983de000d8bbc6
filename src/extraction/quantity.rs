//! Quantity parsing
//!
//! Turns a raw QUANTITY token ("2", "1/2", "1 1/2", "half", "twenty five")
//! into a positive number. Parsing never fails: anything unrecognized counts
//! as one serving.

/// Quantity assumed when none can be read
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// Parse a quantity token, first successful rule wins
pub fn parse_quantity(token: Option<&str>) -> f64 {
    let lower = match token {
        Some(t) => t.trim().to_lowercase(),
        None => return DEFAULT_QUANTITY,
    };
    if lower.is_empty() {
        return DEFAULT_QUANTITY;
    }

    lower
        .parse::<f64>()
        .ok()
        .and_then(positive)
        .or_else(|| parse_fraction(&lower))
        .or_else(|| parse_mixed_fraction(&lower))
        .or_else(|| quantity_word(&lower))
        .or_else(|| words_to_number(&lower))
        .unwrap_or(DEFAULT_QUANTITY)
}

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// "a/b"
fn parse_fraction(s: &str) -> Option<f64> {
    let (num, denom) = s.split_once('/')?;
    let num: f64 = num.trim().parse().ok()?;
    let denom: f64 = denom.trim().parse().ok()?;
    if denom == 0.0 {
        return None;
    }
    positive(num / denom)
}

/// "<int> <int>/<int>", extra trailing text is ignored
fn parse_mixed_fraction(s: &str) -> Option<f64> {
    let mut parts = s.split_whitespace();
    let whole: u64 = parts.next()?.parse().ok()?;
    let (num, denom) = parts.next()?.split_once('/')?;
    let num: u64 = num.parse().ok()?;
    let denom: u64 = denom
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()?;
    if denom == 0 {
        return None;
    }
    positive(whole as f64 + num as f64 / denom as f64)
}

/// Common quantity words
pub fn quantity_word(word: &str) -> Option<f64> {
    let value = match word {
        "one" | "a" | "an" => 1.0,
        "two" => 2.0,
        "three" => 3.0,
        "four" => 4.0,
        "five" => 5.0,
        "six" => 6.0,
        "seven" => 7.0,
        "eight" => 8.0,
        "nine" => 9.0,
        "ten" => 10.0,
        "half" => 0.5,
        "quarter" => 0.25,
        "third" => 1.0 / 3.0,
        _ => return None,
    };
    Some(value)
}

fn small_number(word: &str) -> Option<u64> {
    let value = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(value)
}

fn scale_word(word: &str) -> Option<u64> {
    match word {
        "hundred" => Some(100),
        "thousand" => Some(1_000),
        "million" => Some(1_000_000),
        _ => None,
    }
}

/// Whether a word takes part in spelled-out numbers
pub fn is_number_word(word: &str) -> bool {
    small_number(word).is_some() || scale_word(word).is_some() || word == "point"
}

/// Convert spelled-out numbers such as "twenty five", "one hundred and two",
/// or "two point five"
///
/// Words that are not number words are skipped; at least one number word
/// must be present.
pub fn words_to_number(s: &str) -> Option<f64> {
    let words: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == '-')
        .map(|w| w.trim_matches(|c: char| !c.is_alphabetic()))
        .filter(|w| is_number_word(w))
        .collect();
    if words.is_empty() {
        return None;
    }

    let (integer_words, decimal_words) = match words.iter().position(|w| *w == "point") {
        Some(idx) => (&words[..idx], &words[idx + 1..]),
        None => (&words[..], &words[0..0]),
    };

    // Overflow means the words are not a quantity
    let mut total: u64 = 0;
    let mut current: u64 = 0;
    for word in integer_words {
        if let Some(n) = small_number(word) {
            current = current.checked_add(n)?;
        } else if let Some(scale) = scale_word(word) {
            let scaled = current.max(1).checked_mul(scale)?;
            if scale == 100 {
                current = scaled;
            } else {
                total = total.checked_add(scaled)?;
                current = 0;
            }
        }
    }
    let mut value = total.checked_add(current)? as f64;

    // Digits after "point" are read one word per digit
    let mut place = 0.1;
    for word in decimal_words {
        match small_number(word) {
            Some(digit) if digit < 10 => {
                value += digit as f64 * place;
                place /= 10.0;
            }
            _ => return None,
        }
    }

    positive(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_quantity(Some("2")), 2.0);
        assert_eq!(parse_quantity(Some("2.5")), 2.5);
        assert_eq!(parse_quantity(Some(" 200 ")), 200.0);
    }

    #[test]
    fn test_parse_fractions() {
        assert_eq!(parse_quantity(Some("1/2")), 0.5);
        assert_eq!(parse_quantity(Some("3/4")), 0.75);
        assert_eq!(parse_quantity(Some("1 1/2")), 1.5);
        assert_eq!(parse_quantity(Some("2 3/4")), 2.75);
    }

    #[test]
    fn test_zero_denominator_falls_through() {
        assert_eq!(parse_quantity(Some("1/0")), 1.0);
        assert_eq!(parse_quantity(Some("1 1/0")), 1.0);
    }

    #[test]
    fn test_parse_words() {
        assert_eq!(parse_quantity(Some("half")), 0.5);
        assert_eq!(parse_quantity(Some("Quarter")), 0.25);
        assert_eq!(parse_quantity(Some("a")), 1.0);
        assert_eq!(parse_quantity(Some("an")), 1.0);
        assert_eq!(parse_quantity(Some("ten")), 10.0);
        assert!((parse_quantity(Some("third")) - 0.3333).abs() < 1e-3);
    }

    #[test]
    fn test_parse_spelled_out_numbers() {
        assert_eq!(parse_quantity(Some("twelve")), 12.0);
        assert_eq!(parse_quantity(Some("twenty five")), 25.0);
        assert_eq!(parse_quantity(Some("twenty-five")), 25.0);
        assert_eq!(parse_quantity(Some("one hundred and two")), 102.0);
        assert_eq!(parse_quantity(Some("two thousand three hundred")), 2300.0);
        assert_eq!(parse_quantity(Some("two point five")), 2.5);
    }

    #[test]
    fn test_missing_or_unparseable_defaults_to_one() {
        assert_eq!(parse_quantity(None), 1.0);
        assert_eq!(parse_quantity(Some("")), 1.0);
        assert_eq!(parse_quantity(Some("some")), 1.0);
        assert_eq!(parse_quantity(Some("a few")), 1.0);
    }

    #[test]
    fn test_overflowing_number_words_default_to_one() {
        let many_hundreds = vec!["hundred"; 10].join(" ");
        assert_eq!(parse_quantity(Some(&many_hundreds)), 1.0);
        assert_eq!(words_to_number(&many_hundreds), None);

        // Just under the limit still parses
        let nine_hundreds = vec!["hundred"; 9].join(" ");
        assert_eq!(words_to_number(&nine_hundreds), Some(1e18));
    }

    #[test]
    fn test_non_positive_values_are_rejected() {
        assert_eq!(parse_quantity(Some("0")), 1.0);
        assert_eq!(parse_quantity(Some("-2")), 1.0);
        assert_eq!(parse_quantity(Some("inf")), 1.0);
        assert_eq!(parse_quantity(Some("NaN")), 1.0);
        assert_eq!(parse_quantity(Some("zero")), 1.0);
    }
}
