//! Diesel Technic invoices: one item per line, columns separated by whitespace.

use tracing::{debug, trace};

use crate::invoice::SupplierExtractor;
use crate::invoice::rules::patterns::{
    CURRENCY, DIESEL_COLUMN_HEADER, DIESEL_DATE, DIESEL_INVOICE_NUMBER,
};
use crate::invoice::rules::{
    HeaderRules, Rule, eu_number, first_match, is_eu_number, is_small_int, is_uom, to_quantity,
};
use crate::models::invoice::{Extraction, LineItem, Supplier};

const MIN_TOKENS: usize = 6;

/// Quantity/unit layouts in front of the unit price, tried in order.
const QTY_RULES: &[Rule<[String], (String, String)>] = &[
    Rule { name: "qty uom pack", apply: qty_uom_pack },
    Rule { name: "qty uom", apply: qty_uom },
];

/// Diesel Technic extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct DieselTechnicExtractor;

impl DieselTechnicExtractor {
    pub fn new() -> Self {
        Self
    }

    fn header_rules() -> HeaderRules {
        HeaderRules {
            invoice_number: &DIESEL_INVOICE_NUMBER,
            invoice_date: &DIESEL_DATE,
            currency: Some(&*CURRENCY),
            default_currency: None,
        }
    }
}

impl SupplierExtractor for DieselTechnicExtractor {
    fn supplier(&self) -> Supplier {
        Supplier::DieselTechnic
    }

    fn parse(&self, text: &str) -> Extraction {
        let header = Self::header_rules().extract(Supplier::DieselTechnic, text);

        let items: Vec<LineItem> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !DIESEL_COLUMN_HEADER.is_match(line))
            .filter_map(parse_line)
            .collect();

        debug!("Diesel Technic: {} items", items.len());
        Extraction { header, items }
    }
}

fn parse_line(line: &str) -> Option<LineItem> {
    let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if tokens.len() < MIN_TOKENS {
        return None;
    }

    let numeric: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| is_eu_number(t))
        .map(|(i, _)| i)
        .collect();
    let [.., price_i, amount_i] = numeric.as_slice() else {
        return None;
    };

    let (rule, (qty, uom)) = first_match(QTY_RULES, &tokens[..*price_i])?;
    let Some(qty) = eu_number(&qty).and_then(to_quantity) else {
        trace!("Rejected non-integer quantity {:?} in {:?}", qty, line);
        return None;
    };
    trace!("Diesel line matched {}", rule);

    Some(LineItem::new(
        tokens[1].clone(),
        qty,
        Some(uom),
        eu_number(&tokens[*price_i])?,
        eu_number(&tokens[*amount_i])?,
    ))
}

fn qty_uom_pack(before: &[String]) -> Option<(String, String)> {
    match before {
        [.., qty, uom, pack] if is_eu_number(qty) && is_uom(uom) && is_small_int(pack) => {
            Some((qty.clone(), uom.clone()))
        }
        _ => None,
    }
}

fn qty_uom(before: &[String]) -> Option<(String, String)> {
    match before {
        [.., qty, uom] if is_eu_number(qty) && is_uom(uom) => Some((qty.clone(), uom.clone())),
        _ => None,
    }
}
