//! Invoice data models shared by every supplier extractor.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InvlineError;

/// Suppliers with a dedicated extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Supplier {
    /// Robert Bosch (Croatian-language invoices).
    Bosch,
    /// ContiTech / Continental power transmission.
    Continental,
    /// Diesel Technic.
    DieselTechnic,
    /// NGK / Niterra spark plugs and sensors.
    Ngk,
    /// Valeo (invoice + packing list).
    Valeo,
}

impl Supplier {
    /// All suppliers, in a stable order.
    pub const ALL: [Supplier; 5] = [
        Supplier::Bosch,
        Supplier::Continental,
        Supplier::DieselTechnic,
        Supplier::Ngk,
        Supplier::Valeo,
    ];

    /// Short key used on the command line and in configuration.
    pub fn key(&self) -> &'static str {
        match self {
            Supplier::Bosch => "bosch",
            Supplier::Continental => "conti",
            Supplier::DieselTechnic => "diesel",
            Supplier::Ngk => "ngk",
            Supplier::Valeo => "valeo",
        }
    }

    /// Value written into the `Supplier` header field.
    pub fn display_name(&self) -> &'static str {
        match self {
            Supplier::Bosch => "Bosch",
            Supplier::Continental => "ContiTech / Continental",
            Supplier::DieselTechnic => "Diesel Technic",
            Supplier::Ngk => "NGK / Niterra",
            Supplier::Valeo => "Valeo",
        }
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Supplier {
    type Err = InvlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let key = key.strip_suffix("_golden").unwrap_or(&key);

        match key {
            "bosch" => Ok(Supplier::Bosch),
            "conti" | "continental" | "contitech" => Ok(Supplier::Continental),
            "diesel" | "diesel_technic" | "dieseltechnic" | "dt" => Ok(Supplier::DieselTechnic),
            "ngk" | "niterra" => Ok(Supplier::Ngk),
            "valeo" => Ok(Supplier::Valeo),
            _ => Err(InvlineError::UnknownSupplier(s.to_string())),
        }
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Supplier name, always set by the extractor.
    pub supplier: String,

    /// Invoice number/identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Invoice date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,

    /// Currency code (EUR, USD, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl InvoiceHeader {
    /// A header carrying only the supplier name.
    pub fn new(supplier: Supplier) -> Self {
        Self {
            supplier: supplier.display_name().to_string(),
            invoice_number: None,
            invoice_date: None,
            currency: None,
        }
    }

    /// True when nothing beyond the supplier was found.
    pub fn is_bare(&self) -> bool {
        self.invoice_number.is_none() && self.invoice_date.is_none() && self.currency.is_none()
    }
}

/// One invoiced product line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItem {
    /// Supplier item code.
    pub item: String,

    /// Quantity.
    pub qty: u32,

    /// Unit of measure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,

    /// Unit price.
    pub unit_price: Decimal,

    /// Line amount.
    pub amount: Decimal,

    /// VAT. No extractor fills this in yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat: Option<Decimal>,
}

impl LineItem {
    /// Create a line item without VAT.
    pub fn new(
        item: impl Into<String>,
        qty: u32,
        uom: Option<String>,
        unit_price: Decimal,
        amount: Decimal,
    ) -> Self {
        Self {
            item: item.into(),
            qty,
            uom,
            unit_price,
            amount,
            vat: None,
        }
    }
}

/// One parcel/material/quantity row from a Valeo packing list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackingRow {
    /// Parcel number.
    #[serde(rename = "Parcel N°")]
    pub parcel: String,

    /// Valeo material number.
    #[serde(rename = "Valeo Material N")]
    pub material: String,

    /// Quantity packed.
    #[serde(rename = "Quantity")]
    pub quantity: u32,
}

impl PackingRow {
    pub const COLUMNS: [&'static str; 3] = ["Parcel N°", "Valeo Material N", "Quantity"];

    pub fn to_row(&self) -> Vec<String> {
        vec![self.parcel.clone(), self.material.clone(), self.quantity.to_string()]
    }
}

/// Output of a supplier extractor: header plus items in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub header: InvoiceHeader,
    pub items: Vec<LineItem>,
}

impl Extraction {
    /// Empty result for a supplier.
    pub fn empty(supplier: Supplier) -> Self {
        Self {
            header: InvoiceHeader::new(supplier),
            items: Vec::new(),
        }
    }

    /// Sum of all line amounts, `None` on overflow.
    pub fn total_amount(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, i| acc.checked_add(i.amount))
    }
}
