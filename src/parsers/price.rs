use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MenuError, Result};
use crate::models::Price;

// "7.–" and "7.-" are how round francs are written on Swiss menus
static ROUND_AMOUNT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,][–-]$").expect("Invalid round amount regex"));

/// Parse a price segment such as `"CHF 12.50 / 14.00"`.
///
/// Only the first `/`-separated alternative counts; the currency prefix is
/// optional and matched case-insensitively.
pub fn parse_price(segment: &str, currency_prefix: &str) -> Result<Price> {
    let first = segment.split('/').next().unwrap_or_default().trim();
    let amount = strip_prefix_ignore_case(first, currency_prefix).trim();
    let amount = ROUND_AMOUNT_REGEX.replace(amount, "");
    let amount = amount.replace(',', ".");

    amount
        .parse::<f64>()
        .ok()
        .and_then(Price::from_amount)
        .ok_or_else(|| MenuError::parse("price", segment))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> &'a str {
    match text.get(..prefix.len()) {
        Some(head) if !prefix.is_empty() && head.eq_ignore_ascii_case(prefix) => &text[prefix.len()..],
        _ => text,
    }
}
