//! European number parsing (`1.234,56`).

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

/// Parse a European-formatted number, `.` for thousands and `,` for decimals.
///
/// Returns `None` for missing, blank or unparseable input.
pub fn parse_eu_number(s: Option<&str>) -> Option<Decimal> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }

    let normalized = s.replace('.', "").replace(',', ".");
    Decimal::from_str(&normalized).ok()
}

/// Shorthand for [`parse_eu_number`] on a present string.
pub fn eu_number(s: &str) -> Option<Decimal> {
    parse_eu_number(Some(s))
}

/// Convert a parsed number into a quantity. Fractional or negative values are rejected.
pub fn to_quantity(value: Decimal) -> Option<u32> {
    if value.is_sign_negative() || !value.fract().is_zero() {
        return None;
    }
    value.trunc().to_u32()
}

/// `qty × unit_price`, rounded to cents. `None` when the product overflows.
pub fn line_amount(qty: u32, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(qty).checked_mul(unit_price).map(|v| v.round_dp(2))
}
