//! Valeo invoices and packing lists.
//!
//! Invoice items are built around description lines: the lines that follow
//! a description carry the part code, customs code, prices and a quantity
//! followed by its country of origin. Surcharge lines form items of their own.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::invoice::SupplierExtractor;
use crate::invoice::rules::patterns::{
    ANY_LETTER, VALEO_CODE_LINE, VALEO_CURRENCY, VALEO_CUSTOMS_LINE, VALEO_DATE,
    VALEO_INVOICE_NUMBER, VALEO_LEADING_CODE, VALEO_LETTER_PAIR, VALEO_PARCEL, VALEO_QTY_LINE,
};
use crate::invoice::rules::{HeaderRules, money_values};
use crate::models::config::ExtractionConfig;
use crate::models::invoice::{Extraction, LineItem, PackingRow, Supplier};

const INVOICE_START: &[&str] = &["Our p/n", "Your p/n", "Invoice"];
const INVOICE_END: &[&str] = &["Recap", "Total", "Payment terms", "Packing list"];

const PACKING_START: &[&str] = &["Packing list", "Parcel N°"];
const PACKING_END: &[&str] = &["Invoice", "Our p/n", "Your p/n"];

/// Country-of-origin codes printed under the quantity.
const COUNTRY_CODES: &[&str] = &[
    "FR", "ES", "IT", "RO", "CZ", "TN", "CN", "DE", "PL", "PT", "BE", "HU", "GB", "SK", "TR",
];

/// Lines examined after a description or surcharge marker.
const SCAN_LINES: usize = 13;

const UOM: &str = "PC";
const SURCHARGE_ITEM: &str = "SURCHARGE";

/// Valeo extractor.
#[derive(Debug, Clone, Copy)]
pub struct ValeoExtractor {
    dedupe: bool,
    surcharge: bool,
}

impl Default for ValeoExtractor {
    fn default() -> Self {
        Self {
            dedupe: false,
            surcharge: true,
        }
    }
}

impl ValeoExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            dedupe: config.valeo_dedupe,
            surcharge: config.valeo_surcharge,
        }
    }

    /// Drop exact-duplicate rows, keeping the first occurrence.
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Emit `SURCHARGE` rows.
    pub fn with_surcharge(mut self, surcharge: bool) -> Self {
        self.surcharge = surcharge;
        self
    }

    fn header_rules() -> HeaderRules {
        HeaderRules {
            invoice_number: &VALEO_INVOICE_NUMBER,
            invoice_date: &VALEO_DATE,
            currency: Some(&*VALEO_CURRENCY),
            default_currency: None,
        }
    }

    fn parse_items(&self, lines: &[&str]) -> Vec<LineItem> {
        let mut items = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i].trim();

            let (item, next) = if self.surcharge && is_surcharge(line) {
                scan_surcharge(lines, i)
            } else if is_description(line) {
                scan_item(lines, i)
            } else {
                i += 1;
                continue;
            };

            if let Some(item) = item {
                trace!("Valeo item {} from line {}", item.item, i + 1);
                items.push(item);
            }
            i = next;
        }

        items
    }
}

impl SupplierExtractor for ValeoExtractor {
    fn supplier(&self) -> Supplier {
        Supplier::Valeo
    }

    fn parse(&self, text: &str) -> Extraction {
        let header = Self::header_rules().extract(Supplier::Valeo, text);

        let body = window(text, INVOICE_START, INVOICE_END).unwrap_or(text);
        let lines: Vec<&str> = body.lines().collect();
        let mut items = self.parse_items(&lines);

        if self.dedupe {
            let before = items.len();
            let mut seen = HashSet::new();
            items.retain(|item| seen.insert(item.clone()));
            trace!("Valeo dedupe removed {} rows", before - items.len());
        }

        debug!("Valeo: {} items", items.len());
        Extraction { header, items }
    }

    fn parse_packing(&self, text: &str) -> Vec<PackingRow> {
        let Some(segment) = window(text, PACKING_START, PACKING_END) else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        let mut parcel: Option<String> = None;
        let mut material: Option<String> = None;
        let mut quantity: Option<u32> = None;

        for line in segment.lines() {
            if let Some(m) = VALEO_PARCEL.find(line) {
                parcel = Some(m.as_str().to_string());
                continue;
            }
            if ANY_LETTER.is_match(line) || line.contains(['.', ',']) {
                continue;
            }

            for token in line.split_whitespace() {
                if !token.bytes().all(|b| b.is_ascii_digit()) {
                    continue;
                }
                match token.len() {
                    5..=10 => material = Some(token.to_string()),
                    1..=4 => quantity = token.parse().ok(),
                    _ => {}
                }

                if let (Some(p), Some(m), Some(q)) = (&parcel, &material, quantity) {
                    rows.push(PackingRow {
                        parcel: p.clone(),
                        material: m.clone(),
                        quantity: q,
                    });
                    material = None;
                    quantity = None;
                }
            }
        }

        if self.dedupe {
            let mut seen = HashSet::new();
            rows.retain(|row| seen.insert(row.clone()));
        }

        debug!("Valeo packing list: {} rows", rows.len());
        rows
    }
}

/// Slice of `text` from the first start marker found (in list order) to the
/// first end marker found after it. Matching ignores ASCII case.
fn window<'a>(text: &'a str, starts: &[&str], ends: &[&str]) -> Option<&'a str> {
    let haystack = text.to_ascii_lowercase();

    let start = starts
        .iter()
        .find_map(|marker| haystack.find(&marker.to_ascii_lowercase()))?;
    let end = ends
        .iter()
        .find_map(|marker| haystack[start..].find(&marker.to_ascii_lowercase()))
        .map_or(text.len(), |offset| start + offset);

    Some(&text[start..end])
}

fn is_country_code(line: &str) -> bool {
    COUNTRY_CODES.contains(&line.trim())
}

fn is_surcharge(line: &str) -> bool {
    line.trim().to_lowercase().starts_with("surcharge")
}

fn is_description(line: &str) -> bool {
    let lower = line.trim().to_lowercase();
    if !VALEO_LETTER_PAIR.is_match(&lower) || is_country_code(line) {
        return false;
    }
    !(lower.starts_with("your order") || lower.contains("goods value") || lower.starts_with("surcharge"))
}

/// Money on a scanned line: two or more tokens give (unit, amount), a single
/// one is a tentative unit price.
fn take_money(line: &str, unit: &mut Option<Decimal>, amount: &mut Option<Decimal>) {
    match money_values(line).as_slice() {
        [.., u, a] => {
            *unit = Some(*u);
            *amount = Some(*a);
        }
        [u] if unit.is_none() => *unit = Some(*u),
        _ => {}
    }
}

fn scan_item(lines: &[&str], i: usize) -> (Option<LineItem>, usize) {
    let mut qty: Option<u32> = None;
    let mut customs: Option<&str> = None;
    let mut code: Option<&str> = None;
    let mut unit: Option<Decimal> = None;
    let mut amount: Option<Decimal> = None;

    let limit = (i + 1 + SCAN_LINES).min(lines.len());
    let mut j = i + 1;
    while j < limit {
        let line = lines[j].trim();
        if line.is_empty() {
            j += 1;
            continue;
        }
        if is_description(line) || is_surcharge(line) {
            break;
        }

        if qty.is_none()
            && VALEO_QTY_LINE.is_match(line)
            && lines.get(j + 1).is_some_and(|next| is_country_code(next))
        {
            qty = line.parse().ok();
        }
        if customs.is_none() && VALEO_CUSTOMS_LINE.is_match(line) {
            customs = Some(line);
        }
        if code.is_none() && VALEO_CODE_LINE.is_match(line) && customs != Some(line) {
            code = Some(line);
        }
        take_money(line, &mut unit, &mut amount);

        j += 1;
    }

    let code = code.or_else(|| {
        VALEO_LEADING_CODE
            .captures(lines[i])
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    });

    let item = match (code, qty.filter(|&q| q > 0), unit, amount) {
        (Some(code), Some(qty), Some(unit), Some(amount)) => {
            Some(LineItem::new(code, qty, Some(UOM.to_string()), unit, amount))
        }
        _ => None,
    };
    (item, j)
}

fn scan_surcharge(lines: &[&str], i: usize) -> (Option<LineItem>, usize) {
    let mut qty: Option<u32> = None;
    let mut unit: Option<Decimal> = None;
    let mut amount: Option<Decimal> = None;

    let limit = (i + 1 + SCAN_LINES).min(lines.len());
    let mut j = i;
    while j < limit {
        let line = lines[j].trim();
        if j > i && (is_description(line) || is_surcharge(line)) {
            break;
        }

        if qty.is_none() && VALEO_QTY_LINE.is_match(line) {
            qty = line.parse().ok();
        }
        if let [.., u, a] = money_values(line).as_slice() {
            unit = Some(*u);
            amount = Some(*a);
        }

        j += 1;
    }

    let item = match (qty.filter(|&q| q > 0), unit, amount) {
        (Some(qty), Some(unit), Some(amount)) => Some(LineItem::new(
            SURCHARGE_ITEM,
            qty,
            Some(UOM.to_string()),
            unit,
            amount,
        )),
        _ => None,
    };
    (item, j)
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

    fn pc(code: &str, qty: u32, unit: &str, amount: &str) -> LineItem {
        LineItem::new(code, qty, Some("PC".into()), dec(unit), dec(amount))
    }

    const INVOICE: &str = "\
Valeo Service Deutschland
Invoice 695123456
Invoice date: 12.05.2024
Currency: EUR
Our p/n Your p/n Description
WIPER BLADE KIT 600MM
574145
85124000
12,50 300,00
24
FR
437153 ALTERNATOR 14V
85115000
189,90
189,90 379,80
2
CZ
HEADLAMP LEFT
088976
99,00 99,00
SURCHARGE COPPER
2
1,20 2,40
Recap
VAT summary 21,00 21,00
";

    const PACKING: &str = "\
Packing list
Parcel N° Valeo Material N Quantity
12345-Z-H01-02
9876543
24
Gross weight 12.5 kg
12345-Z-H01-03
1234567
10
7654321 5
";

    #[test]
    fn test_parse_header() {
        let result = ValeoExtractor::new().parse(INVOICE);
        assert_eq!(result.header.supplier, "Valeo");
        assert_eq!(result.header.invoice_number.as_deref(), Some("695123456"));
        assert_eq!(result.header.invoice_date, NaiveDate::from_ymd_opt(2024, 5, 12));
        assert_eq!(result.header.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_parse_items() {
        let result = ValeoExtractor::new().parse(INVOICE);
        assert_eq!(
            result.items,
            vec![
                pc("574145", 24, "12.50", "300.00"),
                pc("437153", 2, "189.90", "379.80"),
                pc("SURCHARGE", 2, "1.20", "2.40"),
            ]
        );
    }

    #[test]
    fn test_surcharge_can_be_disabled() {
        let result = ValeoExtractor::new().with_surcharge(false).parse(INVOICE);
        assert!(result.items.iter().all(|item| item.item != "SURCHARGE"));
        assert_eq!(result.items.len(), 2);
    }

    #[test]
    fn test_dedupe() {
        let doubled = "\
Our p/n Your p/n Description
WIPER BLADE
574145
12,50 25,00
2
FR
WIPER BLADE
574145
12,50 25,00
2
FR
";
        assert_eq!(ValeoExtractor::new().parse(doubled).items.len(), 2);
        assert_eq!(
            ValeoExtractor::new().with_dedupe(true).parse(doubled).items,
            vec![pc("574145", 2, "12.50", "25.00")]
        );
    }

    #[test]
    fn test_qty_needs_country_code() {
        let text = "BRAKE DISC\n569123\n40,00 80,00\n2\n\n";
        assert!(ValeoExtractor::new().parse(text).items.is_empty());
    }

    #[test]
    fn test_window_missing_start_uses_whole_text() {
        assert_eq!(window("no markers", INVOICE_START, INVOICE_END), None);
        assert_eq!(window("a OUR P/N b RECAP c", INVOICE_START, INVOICE_END), Some("OUR P/N b "));
    }

    #[test]
    fn test_parse_packing() {
        let rows = ValeoExtractor::new().parse_packing(PACKING);
        let row = |parcel: &str, material: &str, quantity| PackingRow {
            parcel: parcel.into(),
            material: material.into(),
            quantity,
        };
        assert_eq!(
            rows,
            vec![
                row("12345-Z-H01-02", "9876543", 24),
                row("12345-Z-H01-03", "1234567", 10),
                row("12345-Z-H01-03", "7654321", 5),
            ]
        );
    }

    #[test]
    fn test_packing_absent() {
        assert!(ValeoExtractor::new().parse_packing(INVOICE).is_empty());
        assert!(ValeoExtractor::new().parse_packing("").is_empty());
    }

    #[test]
    fn test_degenerate_input() {
        let extractor = ValeoExtractor::new();
        for result in [extractor.parse(""), extractor.parse_optional(None)] {
            assert_eq!(result.header.supplier, "Valeo");
            assert!(result.header.is_bare());
            assert!(result.items.is_empty());
        }
    }

    #[test]
    fn test_parse_is_idempotent() {
        let extractor = ValeoExtractor::new();
        assert_eq!(extractor.parse(INVOICE), extractor.parse(INVOICE));
        assert_eq!(extractor.parse_packing(PACKING), extractor.parse_packing(PACKING));
    }
}
