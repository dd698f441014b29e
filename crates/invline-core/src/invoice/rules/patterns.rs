//! Common regex patterns for supplier invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// European number body: `1.234`, `1234`, `1.234,5`, `12,50`.
pub const EU_NUM: &str = r"(?:\d{1,3}(?:\.\d{3})*|\d+)(?:,\d+)?";

lazy_static! {
    // Token shapes (whole-token matches)
    pub static ref EU_NUMBER_TOKEN: Regex = Regex::new(&format!("^{EU_NUM}$")).unwrap();

    pub static ref UOM_TOKEN: Regex = Regex::new(r"^[A-Za-zČĆŽŠĐčćžšđ]{1,8}$").unwrap();

    pub static ref INT_TOKEN: Regex = Regex::new(r"^\d{1,4}$").unwrap();

    // Money: comma plus exactly two decimals, never a bare integer
    pub static ref MONEY: Regex = Regex::new(
        r"\b(?:\d{1,3}(?:\.\d{3})*|\d+),\d{2}\b"
    ).unwrap();

    // Known units of measure
    pub static ref UOM_WHITELIST: Regex = Regex::new(
        r"(?i)\b(KOM|PC|PCS|STK|SET|KOMADA|PAR|M|KM|KG|L)\b"
    ).unwrap();

    // Header fields shared by several suppliers
    pub static ref CURRENCY: Regex = Regex::new(
        r"(?i)\b(EUR|USD|GBP|PLN|HRK)\b"
    ).unwrap();

    // Bosch
    pub static ref BOSCH_INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:Broj\s+ra[cč]una|Invoice\s*No\.?)\s*[:#]?\s*([A-Z0-9\-/]+)"
    ).unwrap();

    pub static ref BOSCH_DATE: Regex = Regex::new(
        r"(?i)(?:Datum|Date)\s*[:#]?\s*(\d{2}\.\d{2}\.\d{4})"
    ).unwrap();

    pub static ref BOSCH_CURRENCY: Regex = Regex::new(
        r"(?i)\b(EUR|USD|PLN|HRK)\b"
    ).unwrap();

    pub static ref BOSCH_LINE_NUMBER: Regex = Regex::new(r"^\s*(\d{1,4})\b").unwrap();

    pub static ref BOSCH_QTY: Regex = Regex::new(r"\b\d{1,5}\b").unwrap();

    pub static ref BOSCH_CATALOG_NO: Regex = Regex::new(
        r"(?i)^Katalo[šs]ki\s+broj\s*:\s*(.+)$"
    ).unwrap();

    pub static ref BOSCH_ARTICLE_NO: Regex = Regex::new(
        r"(?i)^Katalo[šs]ki\s+broj\s+artikla\s*:\s*(.+)$"
    ).unwrap();

    pub static ref DOTTED_CODE: Regex = Regex::new(r"\b\d{3}\.\d{3}\.\d{3}\b").unwrap();

    pub static ref DIGIT_GROUP: Regex = Regex::new(r"\d{1,3}").unwrap();

    // Continental
    pub static ref CONTI_INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:Number|Invoice)\s+(\d{5,})\b"
    ).unwrap();

    pub static ref CONTI_DATE: Regex = Regex::new(
        r"(?i)\b(?:Date|Datum)\s*[:#]?\s*(\d{2}\.\d{2}\.\d{4})"
    ).unwrap();

    pub static ref CONTI_CODE_LINE: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9\-/\.]{2,}$").unwrap();

    pub static ref CONTI_QTY_LINE: Regex = Regex::new(r"^\d{1,5}$").unwrap();

    pub static ref CONTI_UOM_LINE: Regex = Regex::new(r"^[A-Z]{2,4}$").unwrap();

    pub static ref CONTI_EUR_PRICE: Regex = Regex::new(
        &format!(r"({EU_NUM})\s*EUR")
    ).unwrap();

    pub static ref CONTI_AMOUNT_LINE: Regex = Regex::new(
        &format!(r"\b([A-Z]{{2,4}})\b.*?({EU_NUM})\s*$")
    ).unwrap();

    // Diesel Technic
    pub static ref DIESEL_INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)INVOICE\s+NO\.?\s*([A-Z0-9\-/]+)"
    ).unwrap();

    pub static ref DIESEL_DATE: Regex = Regex::new(
        r"(?i)DATE\s*(\d{2}\.\d{2}\.\d{4})"
    ).unwrap();

    pub static ref DIESEL_COLUMN_HEADER: Regex = Regex::new(
        r"(?i)ART\.?\s*NO\.?|DESCRIPTION|QTY\.|UNIT\b|PRICE\b|AMOUNT\b|CARRIED OVER"
    ).unwrap();

    // NGK / Niterra
    pub static ref NGK_INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)Invoice\s*No\.?\s*([A-Z0-9\-/]+)"
    ).unwrap();

    pub static ref NGK_DATE: Regex = Regex::new(
        r"(?i)Date\s*(\d{2}\.\d{2}\.\d{4})"
    ).unwrap();

    pub static ref NGK_LINE_START: Regex = Regex::new(r"^\s*\d{5,6}\s+\S+").unwrap();

    // Valeo
    pub static ref VALEO_INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)\bInvoice\s+(\d+)\b"
    ).unwrap();

    pub static ref VALEO_DATE: Regex = Regex::new(
        r"(?i)INVOICE\s*DATE\s*[:\-]?\s*(\d{2}\.\d{2}\.\d{4})"
    ).unwrap();

    pub static ref VALEO_CURRENCY: Regex = Regex::new(r"\b(EUR|USD|GBP|PLN|HRK)\b").unwrap();

    pub static ref VALEO_QTY_LINE: Regex = Regex::new(r"^\d{1,4}$").unwrap();

    pub static ref VALEO_CUSTOMS_LINE: Regex = Regex::new(r"^\d{8}$").unwrap();

    pub static ref VALEO_CODE_LINE: Regex = Regex::new(r"^\d{4,8}$").unwrap();

    pub static ref VALEO_LEADING_CODE: Regex = Regex::new(r"^\s*(\d{4,8})\b").unwrap();

    pub static ref VALEO_LETTER_PAIR: Regex = Regex::new(r"[a-z]{2}").unwrap();

    pub static ref VALEO_PARCEL: Regex = Regex::new(r"\b\d+-Z-H\d{2}-\d{2}\b").unwrap();

    pub static ref ANY_LETTER: Regex = Regex::new(r"\p{L}").unwrap();
}
