//! Bosch invoices (Croatian layout).
//!
//! Items are blocks anchored by a running line number ("Rbr"). The first two
//! lines of a block carry quantity, unit and prices; the item code sits on a
//! "Kataloški broj" line somewhere below.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::invoice::SupplierExtractor;
use crate::invoice::rules::patterns::{
    BOSCH_ARTICLE_NO, BOSCH_CATALOG_NO, BOSCH_CURRENCY, BOSCH_DATE, BOSCH_INVOICE_NUMBER,
    BOSCH_LINE_NUMBER, BOSCH_QTY, DIGIT_GROUP, DOTTED_CODE, UOM_WHITELIST,
};
use crate::invoice::rules::{HeaderRules, Rule, eu_number, first_match, line_amount, money_tokens};
use crate::models::invoice::{Extraction, LineItem, Supplier};

/// Item code fallback chain, first hit wins.
const ITEM_CODE_RULES: &[Rule<[String], String>] = &[
    Rule { name: "catalog number", apply: catalog_number },
    Rule { name: "article number", apply: article_number },
    Rule { name: "dotted code", apply: dotted_code },
];

/// Bosch extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoschExtractor;

impl BoschExtractor {
    pub fn new() -> Self {
        Self
    }

    fn header_rules() -> HeaderRules {
        HeaderRules {
            invoice_number: &BOSCH_INVOICE_NUMBER,
            invoice_date: &BOSCH_DATE,
            currency: Some(&*BOSCH_CURRENCY),
            default_currency: None,
        }
    }
}

impl SupplierExtractor for BoschExtractor {
    fn supplier(&self) -> Supplier {
        Supplier::Bosch
    }

    fn parse(&self, text: &str) -> Extraction {
        let header = Self::header_rules().extract(Supplier::Bosch, text);
        let lines: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();

        let anchors: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| BOSCH_LINE_NUMBER.is_match(l))
            .map(|(i, _)| i)
            .collect();

        let mut items = Vec::new();
        for (n, &start) in anchors.iter().enumerate() {
            let end = anchors.get(n + 1).copied().unwrap_or(lines.len());
            let block = &lines[start..end];

            match parse_block(block) {
                Some(item) => items.push(item),
                None => trace!("Dropped incomplete Bosch block at line {}", start + 1),
            }
        }

        debug!("Bosch: {} items from {} blocks", items.len(), anchors.len());
        Extraction { header, items }
    }
}

fn parse_block(block: &[String]) -> Option<LineItem> {
    let window = block
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let (qty, uom) = qty_and_uom(&window);
    let (unit_price, amount) = prices(block, &window, qty)?;
    let (rule, item) = first_match(ITEM_CODE_RULES, block)?;
    trace!("Bosch item code {} via {}", item, rule);

    Some(LineItem::new(item, qty?, uom, unit_price, amount))
}

/// Unit from the whitelist; quantity is the nearest integer to its left.
fn qty_and_uom(window: &str) -> (Option<u32>, Option<String>) {
    let Some(m) = UOM_WHITELIST.find(window) else {
        return (None, None);
    };

    let qty = BOSCH_QTY
        .find_iter(&window[..m.start()])
        .last()
        .and_then(|q| q.as_str().parse().ok());

    (qty, Some(m.as_str().to_uppercase()))
}

/// Unit price and amount from the window, widening to three lines if needed.
fn prices(block: &[String], window: &str, qty: Option<u32>) -> Option<(Decimal, Decimal)> {
    let money = money_tokens(window);

    match (money.as_slice(), qty) {
        ([.., unit, amount], _) => Some((eu_number(unit)?, eu_number(amount)?)),
        ([unit], Some(qty)) => {
            let unit = eu_number(unit)?;
            Some((unit, line_amount(qty, unit)?))
        }
        _ => {
            let wide = block.iter().take(3).map(String::as_str).collect::<Vec<_>>().join(" ");
            match money_tokens(&wide).as_slice() {
                [.., unit, amount] => Some((eu_number(unit)?, eu_number(amount)?)),
                _ => None,
            }
        }
    }
}

fn catalog_number(block: &[String]) -> Option<String> {
    block.iter().find_map(|line| {
        BOSCH_CATALOG_NO
            .captures(line.trim())
            .map(|caps| caps[1].trim().to_string())
    })
}

fn article_number(block: &[String]) -> Option<String> {
    block.iter().find_map(|line| {
        BOSCH_ARTICLE_NO
            .captures(line.trim())
            .map(|caps| shorten_article(&caps[1]))
    })
}

fn dotted_code(block: &[String]) -> Option<String> {
    block
        .iter()
        .find_map(|line| DOTTED_CODE.find(line).map(|m| m.as_str().to_string()))
}

/// Keep the last three numeric groups, the shape the ERP uses.
fn shorten_article(raw: &str) -> String {
    let spaced = raw.replace('.', " ");
    let groups: Vec<&str> = DIGIT_GROUP.find_iter(&spaced).map(|m| m.as_str()).collect();

    if groups.len() >= 3 {
        groups[groups.len() - 3..].join(".")
    } else {
        raw.trim().to_string()
    }
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
Robert Bosch d.o.o.
Broj računa: 2024-00123
Datum: 15.03.2024
Valuta: EUR
Rbr Naziv Količina JM Cijena Iznos
1 Filter ulja 10 KOM 12,50 125,00
Kataloški broj: 0 451 103 316
2 Svjećica 4 KOM 8,00
Kataloški broj artikla: 1234.567.890.123
3 Brisač metlica 2 KOM
prednji lijevi
cijena 25,00 iznos 50,00
Šifra 3 397 007 620 oznaka 339.700.762
4 Bez cijene 5 KOM
Kataloški broj: 1 987 946 400
";

    #[test]
    fn test_parse_header() {
        let result = BoschExtractor::new().parse(INVOICE);
        assert_eq!(result.header.supplier, "Bosch");
        assert_eq!(result.header.invoice_number.as_deref(), Some("2024-00123"));
        assert_eq!(result.header.invoice_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(result.header.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_parse_items() {
        let result = BoschExtractor::new().parse(INVOICE);

        assert_eq!(
            result.items,
            vec![
                LineItem::new("0 451 103 316", 10, Some("KOM".into()), dec("12.50"), dec("125.00")),
                LineItem::new("567.890.123", 4, Some("KOM".into()), dec("8.00"), dec("32.00")),
                LineItem::new("339.700.762", 2, Some("KOM".into()), dec("25.00"), dec("50.00")),
            ]
        );
    }

    #[test]
    fn test_article_number_keeps_last_three_groups() {
        let block = vec![
            "7 Senzor 1 KOM 10,00 10,00".to_string(),
            "Kataloški broj artikla: 1234.567.890.123".to_string(),
        ];
        let (rule, code) = first_match(ITEM_CODE_RULES, block.as_slice()).unwrap();
        assert_eq!(rule, "article number");
        assert_eq!(code, "567.890.123");
        assert_eq!(parse_block(&block).unwrap().item, "567.890.123");
    }

    #[test]
    fn test_catalog_number_beats_article_number() {
        let block = vec![
            "1 Filter 1 KOM 1,00 1,00".to_string(),
            "Katalo\u{0161}ki broj artikla: 1.111.222.333".to_string(),
            "Kataloski broj: F 026 400 012".to_string(),
        ];
        let (rule, code) = first_match(ITEM_CODE_RULES, block.as_slice()).unwrap();
        assert_eq!(rule, "catalog number");
        assert_eq!(code, "F 026 400 012");
    }

    #[test]
    fn test_shorten_article_short_input() {
        assert_eq!(shorten_article(" 12.34 "), "12.34");
    }

    #[test]
    fn test_qty_is_nearest_integer_before_unit() {
        assert_eq!(qty_and_uom("12 Filter 3 kom 1,00"), (Some(3), Some("KOM".to_string())));
        assert_eq!(qty_and_uom("12 Filter bez jedinice"), (None, None));
    }

    #[test]
    fn test_degenerate_input() {
        let extractor = BoschExtractor::new();
        for result in [extractor.parse(""), extractor.parse_optional(None)] {
            assert_eq!(result.header.supplier, "Bosch");
            assert!(result.header.is_bare());
            assert!(result.items.is_empty());
        }
    }

    #[test]
    fn test_oversized_amount_drops_block() {
        let text = "\
1 Filter 99999 KOM 79228162514264337593543950,00
Kataloški broj: 0 451 103 316
2 Svjećica 4 KOM 8,00
Kataloški broj: 0 242 236 565
";
        let result = BoschExtractor::new().parse(text);
        assert_eq!(
            result.items,
            vec![LineItem::new("0 242 236 565", 4, Some("KOM".into()), dec("8.00"), dec("32.00"))]
        );
    }

    #[test]
    fn test_parse_is_idempotent() {
        let extractor = BoschExtractor::new();
        assert_eq!(extractor.parse(INVOICE), extractor.parse(INVOICE));
    }
}
