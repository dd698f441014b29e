//! NGK / Niterra invoices.
//!
//! Item lines start with a 5-6 digit position code. Fields are read right to
//! left: amount, unit, quantity, then the unit price (an `EUR` marker may sit
//! in between).

use tracing::debug;

use crate::invoice::SupplierExtractor;
use crate::invoice::rules::patterns::{CURRENCY, NGK_DATE, NGK_INVOICE_NUMBER, NGK_LINE_START};
use crate::invoice::rules::{HeaderRules, eu_number, is_eu_number, is_uom, to_quantity};
use crate::models::invoice::{Extraction, LineItem, Supplier};

/// NGK / Niterra extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NgkExtractor;

impl NgkExtractor {
    pub fn new() -> Self {
        Self
    }

    fn header_rules() -> HeaderRules {
        HeaderRules {
            invoice_number: &NGK_INVOICE_NUMBER,
            invoice_date: &NGK_DATE,
            currency: Some(&*CURRENCY),
            default_currency: None,
        }
    }
}

impl SupplierExtractor for NgkExtractor {
    fn supplier(&self) -> Supplier {
        Supplier::Ngk
    }

    fn parse(&self, text: &str) -> Extraction {
        let header = Self::header_rules().extract(Supplier::Ngk, text);

        let items: Vec<LineItem> = text
            .lines()
            .map(str::trim)
            .filter(|line| NGK_LINE_START.is_match(line))
            .filter_map(parse_line)
            .collect();

        debug!("NGK: {} items", items.len());
        Extraction { header, items }
    }
}

fn parse_line(line: &str) -> Option<LineItem> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let amount_i = tokens.iter().rposition(|t| is_eu_number(t))?;
    let uom_i = amount_i.checked_sub(1).filter(|&i| is_uom(tokens[i]))?;
    let qty_i = uom_i.checked_sub(1).filter(|&i| is_eu_number(tokens[i]))?;

    let price = tokens[..qty_i]
        .iter()
        .rev()
        .filter(|t| !t.eq_ignore_ascii_case("EUR"))
        .find(|t| is_eu_number(t))?;

    Some(LineItem::new(
        *tokens.get(1)?,
        eu_number(tokens[qty_i]).and_then(to_quantity)?,
        Some(tokens[uom_i].to_string()),
        eu_number(price)?,
        eu_number(tokens[amount_i])?,
    ))
}
