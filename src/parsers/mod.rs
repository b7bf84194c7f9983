pub mod price;

pub use price::*;

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static COMMA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\w)").expect("Invalid comma regex"));

/// Everything from this marker on is an upsell, not part of the dish.
pub const ADD_ON_MARKER: &str = "Add on";

// Soft hyphen, raw and as it shows up after a latin-1/utf-8 mix-up
const SOFT_HYPHENS: [&str; 2] = ["\u{00C2}\u{00AD}", "\u{00AD}"];

/// Decode HTML entities and collapse whitespace. Used on text that did not
/// come through an HTML parser, such as JSON API strings.
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All text below `element`, whitespace collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let text = element.text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean whitespace and punctuation artifacts in scraped menu text.
///
/// Applying it twice gives the same result as applying it once.
pub fn normalize_text(text: &str) -> String {
    let mut cleaned = text.to_string();
    for artifact in SOFT_HYPHENS {
        cleaned = cleaned.replace(artifact, "");
    }
    cleaned = cleaned.replace(['_', '-'], " ");
    cleaned = COMMA_REGEX.replace_all(&cleaned, ", ${1}").into_owned();
    cleaned = WHITESPACE_REGEX.replace_all(&cleaned, " ").into_owned();

    if let Some(idx) = cleaned.find(ADD_ON_MARKER) {
        cleaned.truncate(idx);
    }

    cleaned.trim().to_string()
}

/// Normalize a dish or line name for display: cleaned, then title-cased.
pub fn normalize_name(name: &str) -> String {
    title_case(&normalize_text(name).to_uppercase())
}

pub fn normalize_description(description: &str) -> String {
    normalize_text(description)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}
