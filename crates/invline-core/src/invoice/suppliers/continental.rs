//! ContiTech / Continental invoices.
//!
//! The item code stands alone on its own line. Quantity and unit sit on the
//! lines just above it; the `... EUR` unit price and the `UOM ... amount` line
//! follow below.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::invoice::SupplierExtractor;
use crate::invoice::rules::patterns::{
    CONTI_AMOUNT_LINE, CONTI_CODE_LINE, CONTI_DATE, CONTI_EUR_PRICE, CONTI_INVOICE_NUMBER,
    CONTI_QTY_LINE, CONTI_UOM_LINE,
};
use crate::invoice::rules::{HeaderRules, eu_number};
use crate::models::invoice::{Extraction, LineItem, Supplier};

/// Lines searched above the code for quantity and unit.
const LOOKBACK: usize = 3;

/// The forward window covers `i + 1 .. i + FORWARD`.
const FORWARD: usize = 10;

/// ContiTech / Continental extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinentalExtractor;

impl ContinentalExtractor {
    pub fn new() -> Self {
        Self
    }

    fn header_rules() -> HeaderRules {
        HeaderRules {
            invoice_number: &CONTI_INVOICE_NUMBER,
            invoice_date: &CONTI_DATE,
            currency: None,
            default_currency: Some("EUR"),
        }
    }
}

impl SupplierExtractor for ContinentalExtractor {
    fn supplier(&self) -> Supplier {
        Supplier::Continental
    }

    fn parse(&self, text: &str) -> Extraction {
        let header = Self::header_rules().extract(Supplier::Continental, text);
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();

        let mut items = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            if is_code_line(lines[i].trim()) {
                if let Some(item) = parse_candidate(&lines, i) {
                    trace!("Continental item {} at line {}", item.item, i + 1);
                    items.push(item);
                    // Lines in the forward window are consumed.
                    i = (i + FORWARD).min(lines.len());
                    continue;
                }
            }
            i += 1;
        }

        debug!("Continental: {} items", items.len());
        Extraction { header, items }
    }
}

/// A bare item code: upper-case alphanumerics with `-/.`, at least one letter and one digit.
fn is_code_line(line: &str) -> bool {
    CONTI_CODE_LINE.is_match(line)
        && line.chars().any(|c| c.is_ascii_digit())
        && line.chars().any(|c| c.is_ascii_uppercase())
}

fn parse_candidate(lines: &[&str], i: usize) -> Option<LineItem> {
    let code = lines[i].trim();

    let mut qty: Option<u32> = None;
    let mut uom: Option<String> = None;
    for line in &lines[i.saturating_sub(LOOKBACK)..i] {
        let line = line.trim();
        if CONTI_QTY_LINE.is_match(line) {
            qty = line.parse().ok().or(qty);
        }
        if CONTI_UOM_LINE.is_match(line) {
            uom = Some(line.to_string());
        }
    }

    let mut unit_price: Option<Decimal> = None;
    let mut amount: Option<Decimal> = None;
    let end = (i + FORWARD).min(lines.len());
    for line in &lines[(i + 1).min(end)..end] {
        if unit_price.is_none() && line.contains("EUR") {
            unit_price = CONTI_EUR_PRICE
                .captures(line)
                .and_then(|caps| eu_number(&caps[1]));
        }
        if let Some(caps) = CONTI_AMOUNT_LINE.captures(line) {
            if uom.is_none() {
                uom = Some(caps[1].to_string());
            }
            amount = eu_number(&caps[2]).or(amount);
        }
    }

    Some(LineItem::new(code, qty?, Some(uom?), unit_price?, amount?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const INVOICE: &str = "\
ContiTech Antriebssysteme GmbH
Invoice 90012345
Date: 02.04.2024
10
PCE
6PK1035
V-ribbed belt
4,20 EUR
PCE 42,00
Made in Germany
Customs tariff 40103900
Order ref 4711
Delivery 80001234
2
PCE
CT1000K
Timing belt
18,75 EUR
PCE 37,50
";

    #[test]
    fn test_parse_header() {
        let result = ContinentalExtractor::new().parse(INVOICE);
        assert_eq!(result.header.supplier, "ContiTech / Continental");
        assert_eq!(result.header.invoice_number.as_deref(), Some("90012345"));
        assert_eq!(result.header.invoice_date, NaiveDate::from_ymd_opt(2024, 4, 2));
        assert_eq!(result.header.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_parse_items_in_order() {
        let result = ContinentalExtractor::new().parse(INVOICE);
        assert_eq!(
            result.items,
            vec![
                LineItem::new("6PK1035", 10, Some("PCE".into()), dec("4.20"), dec("42.00")),
                LineItem::new("CT1000K", 2, Some("PCE".into()), dec("18.75"), dec("37.50")),
            ]
        );
    }

    #[test]
    fn test_resumes_after_forward_window() {
        // 7PK1140K sits inside the forward window of 6PK1035 and would
        // otherwise resolve with qty 5 and the 15,00 amount line.
        let text = "\
Invoice 90012345
Date: 02.04.2024
10
PCE
6PK1035
V-ribbed belt
4,20 EUR
PCE 42,00
5
PCE
7PK1140K
3,00 EUR
Made in Germany
Packed in carton
PCE 15,00
";
        let result = ContinentalExtractor::new().parse(text);
        assert_eq!(
            result.items,
            vec![LineItem::new("6PK1035", 10, Some("PCE".into()), dec("4.20"), dec("42.00"))]
        );

        let nested = parse_candidate(&text.lines().collect::<Vec<_>>(), 10).unwrap();
        assert_eq!(nested.item, "7PK1140K");
        assert_eq!(nested.amount, dec("15.00"));
    }

    #[test]
    fn test_incomplete_candidate_is_dropped() {
        let text = "PCE\nCT908\n12,00 EUR\nPCE 24,00\n";
        assert!(ContinentalExtractor::new().parse(text).items.is_empty());
    }

    #[test]
    fn test_unit_lines_are_not_codes() {
        assert!(!is_code_line("PCE"));
        assert!(!is_code_line("EUR"));
        assert!(!is_code_line("100"));
        assert!(is_code_line("10X1000"));
        assert!(is_code_line("CT-1/2.5"));
        assert!(!is_code_line("ct1000"));
    }

    #[test]
    fn test_degenerate_input() {
        let extractor = ContinentalExtractor::new();
        for result in [extractor.parse(""), extractor.parse_optional(None)] {
            assert_eq!(result.header.supplier, "ContiTech / Continental");
            assert!(result.header.is_bare());
            assert!(result.items.is_empty());
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        let extractor = ContinentalExtractor::new();
        assert_eq!(extractor.parse(INVOICE), extractor.parse(INVOICE));
    }
}
