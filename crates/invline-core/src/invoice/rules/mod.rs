//! Shared rules for supplier invoice text: numbers, token shapes, header searches.

pub mod header;
pub mod numbers;
pub mod patterns;
pub mod tokens;

pub use header::HeaderRules;
pub use numbers::{eu_number, line_amount, parse_eu_number, to_quantity};
pub use tokens::{grab, is_eu_number, is_money, is_small_int, is_uom, money_tokens, money_values, parse_dmy};

/// A named step in an ordered fallback chain. Rules are tried in order and
/// the first one returning `Some` wins.
pub struct Rule<I: ?Sized, O> {
    pub name: &'static str,
    pub apply: fn(&I) -> Option<O>,
}

/// Evaluate `rules` in order against `input`.
pub fn first_match<I: ?Sized, O>(rules: &[Rule<I, O>], input: &I) -> Option<(&'static str, O)> {
    rules
        .iter()
        .find_map(|rule| (rule.apply)(input).map(|out| (rule.name, out)))
}
