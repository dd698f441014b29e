//! Vendor routing: pick the supplier extractor for a document.

use tracing::debug;

use super::SupplierExtractor;
use super::suppliers::{
    BoschExtractor, ContinentalExtractor, DieselTechnicExtractor, NgkExtractor, ValeoExtractor,
};
use crate::models::config::ExtractionConfig;
use crate::models::invoice::Supplier;

/// Keyword rules, checked in order against the lower-cased text.
const KEYWORDS: &[(Supplier, &[&str])] = &[
    (Supplier::Valeo, &["valeo", "packing list", "our p/n"]),
    (Supplier::Ngk, &["ngk", "niterra"]),
    (Supplier::DieselTechnic, &["diesel technic"]),
    (Supplier::Continental, &["contitech", "continental"]),
    (Supplier::Bosch, &["bosch", "kataloški broj", "kataloski broj"]),
];

/// Supplier used when no keyword matches.
pub const DEFAULT_SUPPLIER: Supplier = Supplier::DieselTechnic;

/// Sniff the supplier from document text. Falls back to [`DEFAULT_SUPPLIER`].
pub fn detect_supplier(text: &str) -> Supplier {
    detect_supplier_or(text, DEFAULT_SUPPLIER)
}

/// Sniff the supplier, falling back to `fallback` when nothing matches.
pub fn detect_supplier_or(text: &str, fallback: Supplier) -> Supplier {
    let lower = text.to_lowercase();

    let detected = KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(supplier, _)| *supplier);

    match detected {
        Some(supplier) => {
            debug!("Detected supplier {}", supplier.key());
            supplier
        }
        None => {
            debug!("No supplier keyword found, using {}", fallback.key());
            fallback
        }
    }
}

/// An explicit choice wins over detection.
pub fn route(text: &str, explicit: Option<Supplier>) -> Supplier {
    explicit.unwrap_or_else(|| detect_supplier(text))
}

/// Extractor with default options.
pub fn extractor_for(supplier: Supplier) -> Box<dyn SupplierExtractor> {
    extractor_with_config(supplier, &ExtractionConfig::default())
}

/// Extractor with options taken from configuration.
pub fn extractor_with_config(
    supplier: Supplier,
    config: &ExtractionConfig,
) -> Box<dyn SupplierExtractor> {
    match supplier {
        Supplier::Bosch => Box::new(BoschExtractor::new()),
        Supplier::Continental => Box::new(ContinentalExtractor::new()),
        Supplier::DieselTechnic => Box::new(DieselTechnicExtractor::new()),
        Supplier::Ngk => Box::new(NgkExtractor::new()),
        Supplier::Valeo => Box::new(ValeoExtractor::from_config(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_keywords() {
        assert_eq!(detect_supplier("VALEO SERVICE"), Supplier::Valeo);
        assert_eq!(detect_supplier("Niterra EMEA GmbH"), Supplier::Ngk);
        assert_eq!(detect_supplier("ContiTech Antriebssysteme"), Supplier::Continental);
        assert_eq!(detect_supplier("Robert BOSCH d.o.o."), Supplier::Bosch);
        assert_eq!(detect_supplier("Kataloški broj: 0 451 103 316"), Supplier::Bosch);
        assert_eq!(detect_supplier("Diesel Technic AG"), Supplier::DieselTechnic);
    }

    #[test]
    fn test_detect_rule_order() {
        // Valeo outranks everything, NGK outranks Continental.
        assert_eq!(detect_supplier("Packing list for Bosch parts"), Supplier::Valeo);
        assert_eq!(detect_supplier("NGK via Continental logistics"), Supplier::Ngk);
    }

    #[test]
    fn test_detect_default() {
        assert_eq!(detect_supplier(""), Supplier::DieselTechnic);
        assert_eq!(detect_supplier("Acme Corp invoice"), Supplier::DieselTechnic);
        assert_eq!(detect_supplier_or("Acme Corp invoice", Supplier::Ngk), Supplier::Ngk);
    }

    #[test]
    fn test_route_override() {
        assert_eq!(route("Valeo invoice", Some(Supplier::Bosch)), Supplier::Bosch);
        assert_eq!(route("Valeo invoice", None), Supplier::Valeo);
    }

    #[test]
    fn test_extractor_for() {
        for supplier in Supplier::ALL {
            assert_eq!(extractor_for(supplier).supplier(), supplier);
        }
    }
}
