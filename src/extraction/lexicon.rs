//! Dictionary-based entity source
//!
//! A small rule tagger for running without a recognizer service. It knows the
//! foods in the fallback table plus a few common extras, the unit alias table,
//! numerals, fractions, and number words. Accuracy is well below a trained
//! model; it exists so the pipeline produces useful spans on its own.

use async_trait::async_trait;

use super::quantity::{is_number_word, quantity_word};
use super::source::{EntityResult, EntitySource};
use crate::models::{EntityLabel, Span};
use crate::nutrition::fallback;
use crate::nutrition::units::canonical_unit;

/// Foods recognized in addition to the fallback table keys
const EXTRA_FOODS: &[&str] = &[
    "water",
    "juice",
    "orange juice",
    "coffee",
    "tea",
    "steak",
    "cereal",
    "toast",
    "sushi",
    "cookie",
    "chips",
    "turkey",
    "oatmeal",
    "blueberry",
    "peanut butter",
    "chocolate bar",
];

/// Longest food phrase tried, in words
const MAX_FOOD_WORDS: usize = 3;

#[derive(Debug, Clone)]
struct Token {
    lower: String,
    start: usize,
    end: usize,
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '/' | '\'' | '-')
}

/// Split text into word tokens with character offsets
fn tokenize(chars: &[char]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !is_token_char(chars[i]) {
            i += 1;
            continue;
        }
        let mut start = i;
        while i < chars.len() && is_token_char(chars[i]) {
            i += 1;
        }
        let mut end = i;

        while end > start && matches!(chars[end - 1], '.' | '/' | '\'' | '-') {
            end -= 1;
        }
        while start < end && matches!(chars[start], '/' | '\'' | '-') {
            start += 1;
        }

        if start < end {
            tokens.push(Token {
                lower: chars[start..end].iter().collect::<String>().to_lowercase(),
                start,
                end,
            });
        }
    }

    tokens
}

fn is_numeral(s: &str) -> bool {
    s.parse::<f64>().map(|v| v.is_finite()).unwrap_or(false)
}

fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn is_fraction(s: &str) -> bool {
    match s.split_once('/') {
        Some((num, denom)) => is_integer(num) && is_integer(denom),
        None => false,
    }
}

/// Split "200g" or "1.5l" into number and unit character counts
fn split_glued(token: &str) -> Option<usize> {
    let digits = token
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .count();
    if digits == 0 || digits == token.chars().count() {
        return None;
    }
    let number: String = token.chars().take(digits).collect();
    let unit: String = token.chars().skip(digits).collect();
    (is_numeral(&number) && canonical_unit(&unit).is_some()).then_some(digits)
}

/// Singular spellings to try for a phrase ("strawberries" -> "strawberry")
fn singular_forms(phrase: &str) -> Vec<String> {
    let mut forms = vec![phrase.to_string()];
    if let Some(stem) = phrase.strip_suffix("ies") {
        forms.push(format!("{}y", stem));
    }
    if let Some(stem) = phrase.strip_suffix("es") {
        forms.push(stem.to_string());
    }
    if let Some(stem) = phrase.strip_suffix('s') {
        forms.push(stem.to_string());
    }
    forms
}

fn is_food_phrase(phrase: &str) -> bool {
    singular_forms(phrase)
        .iter()
        .any(|form| fallback::is_known_food(form) || EXTRA_FOODS.contains(&form.as_str()))
}

/// Number of tokens forming the longest food phrase at the front of `tokens`
fn match_food(tokens: &[Token]) -> Option<usize> {
    (1..=MAX_FOOD_WORDS.min(tokens.len())).rev().find(|&n| {
        let phrase = tokens[..n]
            .iter()
            .map(|t| t.lower.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        is_food_phrase(&phrase)
    })
}

fn span(chars: &[char], label: EntityLabel, start: usize, end: usize) -> Span {
    Span::new(label, chars[start..end].iter().collect::<String>(), start, end)
}

/// Tag text into position-ordered spans
pub fn tag_text(text: &str) -> Vec<Span> {
    let chars: Vec<char> = text.chars().collect();
    let tokens = tokenize(&chars);
    let mut spans = Vec::new();
    // Units are only recognized right after a quantity
    let mut after_quantity = false;
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        let lower = token.lower.as_str();

        // "1 1/2"
        if is_integer(lower) && i + 1 < tokens.len() && is_fraction(&tokens[i + 1].lower) {
            spans.push(span(&chars, EntityLabel::Quantity, token.start, tokens[i + 1].end));
            after_quantity = true;
            i += 2;
            continue;
        }

        if is_numeral(lower) || is_fraction(lower) {
            spans.push(span(&chars, EntityLabel::Quantity, token.start, token.end));
            after_quantity = true;
            i += 1;
            continue;
        }

        // "200g"
        if let Some(digits) = split_glued(lower) {
            let split = token.start + digits;
            spans.push(span(&chars, EntityLabel::Quantity, token.start, split));
            spans.push(span(&chars, EntityLabel::Unit, split, token.end));
            after_quantity = false;
            i += 1;
            continue;
        }

        // "twenty five", "one hundred and two"
        if is_number_word(lower) && lower != "point" {
            let mut j = i + 1;
            while j < tokens.len() {
                let next = tokens[j].lower.as_str();
                let joins = next == "and"
                    && tokens.get(j + 1).is_some_and(|t| is_number_word(&t.lower));
                if is_number_word(next) || joins {
                    j += 1;
                } else {
                    break;
                }
            }
            spans.push(span(&chars, EntityLabel::Quantity, token.start, tokens[j - 1].end));
            after_quantity = true;
            i = j;
            continue;
        }

        // "half", "a"; the article in "half a pizza" is not a second quantity
        if quantity_word(lower).is_some() {
            let article = matches!(lower, "a" | "an");
            if article && after_quantity {
                after_quantity = false;
            } else {
                spans.push(span(&chars, EntityLabel::Quantity, token.start, token.end));
                after_quantity = true;
            }
            i += 1;
            continue;
        }

        if after_quantity && canonical_unit(lower).is_some() {
            spans.push(span(&chars, EntityLabel::Unit, token.start, token.end));
            after_quantity = false;
            i += 1;
            continue;
        }

        if let Some(n) = match_food(&tokens[i..]) {
            spans.push(span(&chars, EntityLabel::Food, token.start, tokens[i + n - 1].end));
            after_quantity = false;
            i += n;
            continue;
        }

        after_quantity = false;
        i += 1;
    }

    spans
}

/// Entity source backed by the built-in dictionaries
#[derive(Debug, Clone, Default)]
pub struct LexiconEntitySource;

#[async_trait]
impl EntitySource for LexiconEntitySource {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn extract(&self, text: &str) -> EntityResult<Vec<Span>> {
        Ok(tag_text(text))
    }
}
