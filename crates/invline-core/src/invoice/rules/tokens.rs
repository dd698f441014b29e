//! Token predicates and single-shot pattern grabs.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use super::numbers::eu_number;
use super::patterns::{EU_NUMBER_TOKEN, INT_TOKEN, MONEY, UOM_TOKEN};

/// Strict money token (`1.234,56`).
pub fn is_money(token: &str) -> bool {
    MONEY
        .find(token)
        .is_some_and(|m| m.start() == 0 && m.end() == token.len())
}

/// Loose European number token (`10`, `1.000`, `12,5`).
pub fn is_eu_number(token: &str) -> bool {
    EU_NUMBER_TOKEN.is_match(token)
}

/// 1-8 letter unit-of-measure shaped token.
pub fn is_uom(token: &str) -> bool {
    UOM_TOKEN.is_match(token)
}

/// 1-4 digit integer token.
pub fn is_small_int(token: &str) -> bool {
    INT_TOKEN.is_match(token)
}

/// All strict money tokens in a line, in order of appearance.
pub fn money_tokens(line: &str) -> Vec<&str> {
    MONEY.find_iter(line).map(|m| m.as_str()).collect()
}

/// Parsed values of all money tokens in a line.
pub fn money_values(line: &str) -> Vec<Decimal> {
    money_tokens(line).into_iter().filter_map(eu_number).collect()
}

/// First capture group of the `idx`-th match of `re` in `text`.
///
/// Patterns without a capture group yield the whole match.
pub fn grab(re: &Regex, text: &str, idx: usize) -> Option<String> {
    let caps = re.captures_iter(text).nth(idx)?;
    caps.get(1)
        .or_else(|| caps.get(0))
        .map(|m| m.as_str().trim().to_string())
}

/// Parse `DD.MM.YYYY`.
pub fn parse_dmy(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%d.%m.%Y").ok()
}
