//! ERP-facing record shapes.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::invoice::{InvoiceHeader, LineItem};

/// Canonical six-field item record. Field order matches [`ErpRecord::COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErpRecord {
    #[serde(rename = "Item")]
    pub item: Option<String>,
    #[serde(rename = "Qty")]
    pub qty: Option<u32>,
    #[serde(rename = "UoM")]
    pub uom: Option<String>,
    #[serde(rename = "Unit Price")]
    pub unit_price: Option<Decimal>,
    #[serde(rename = "Amount")]
    pub amount: Option<Decimal>,
    #[serde(rename = "VAT")]
    pub vat: Option<Decimal>,
}

impl ErpRecord {
    pub const COLUMNS: [&'static str; 6] = ["Item", "Qty", "UoM", "Unit Price", "Amount", "VAT"];

    /// Cell values in column order; absent values render as empty strings.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            cell(&self.item),
            cell(&self.qty),
            cell(&self.uom),
            cell(&self.unit_price),
            cell(&self.amount),
            cell(&self.vat),
        ]
    }
}

/// Map a line item into the ERP record shape.
pub fn to_erp_record(item: &LineItem) -> ErpRecord {
    ErpRecord {
        item: Some(item.item.clone()),
        qty: Some(item.qty),
        uom: item.uom.clone(),
        unit_price: Some(item.unit_price),
        amount: Some(item.amount),
        vat: item.vat,
    }
}

/// Header sheet row: document metadata plus the processing timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Invoice Number")]
    pub invoice_number: Option<String>,
    #[serde(rename = "Invoice Date")]
    pub invoice_date: Option<String>,
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
    #[serde(rename = "Processed At")]
    pub processed_at: String,
}

impl HeaderRecord {
    pub const COLUMNS: [&'static str; 5] = [
        "Supplier",
        "Invoice Number",
        "Invoice Date",
        "Currency",
        "Processed At",
    ];

    /// Build a header row. Dates render as `DD.MM.YYYY`, the timestamp with `timestamp_format`.
    pub fn new(header: &InvoiceHeader, processed_at: NaiveDateTime, timestamp_format: &str) -> Self {
        Self {
            supplier: header.supplier.clone(),
            invoice_number: header.invoice_number.clone(),
            invoice_date: header.invoice_date.map(|d| d.format("%d.%m.%Y").to_string()),
            currency: header.currency.clone(),
            processed_at: processed_at.format(timestamp_format).to_string(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.supplier.clone(),
            cell(&self.invoice_number),
            cell(&self.invoice_date),
            cell(&self.currency),
            self.processed_at.clone(),
        ]
    }
}

fn cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::Supplier;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_to_erp_record() {
        let item = LineItem::new(
            "6PK1035",
            10,
            Some("PCE".into()),
            Decimal::from_str("4.20").unwrap(),
            Decimal::from_str("42.00").unwrap(),
        );
        let record = to_erp_record(&item);

        assert_eq!(record.item.as_deref(), Some("6PK1035"));
        assert_eq!(record.qty, Some(10));
        assert_eq!(record.vat, None);
        assert_eq!(record.to_row(), vec!["6PK1035", "10", "PCE", "4.20", "42.00", ""]);
    }

    #[test]
    fn test_empty_record_row() {
        assert_eq!(ErpRecord::default().to_row(), vec![""; 6]);
        assert_eq!(ErpRecord::COLUMNS.len(), ErpRecord::default().to_row().len());
    }

    #[test]
    fn test_header_record() {
        let mut header = InvoiceHeader::new(Supplier::Valeo);
        header.invoice_number = Some("695123456".into());
        header.invoice_date = NaiveDate::from_ymd_opt(2024, 5, 12);

        let processed = NaiveDate::from_ymd_opt(2024, 5, 13)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let record = HeaderRecord::new(&header, processed, "%Y-%m-%d %H:%M:%S");

        assert_eq!(
            record.to_row(),
            vec!["Valeo", "695123456", "12.05.2024", "", "2024-05-13 09:30:00"]
        );
    }
}
