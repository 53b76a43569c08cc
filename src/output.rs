//! Rendering of lookup results for the terminal
//!
//! Listings print as a two-column table, prices as labelled lines. With
//! `--json` the same data is printed as pretty JSON instead.

use serde::Serialize;

use crate::catalog::{CatalogEntry, PriceQuote};
use crate::money::{format_brl, Comparison};

/// Formats a listing as a code/name table
pub fn entries_table(entries: &[CatalogEntry]) -> String {
    if entries.is_empty() {
        return "No entries found.".to_string();
    }

    let width = entries
        .iter()
        .map(|entry| entry.code.chars().count())
        .max()
        .unwrap_or(0)
        .max("CODE".len());

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(format!("{:<width$}  NAME", "CODE", width = width));
    for entry in entries {
        lines.push(format!("{:<width$}  {}", entry.code, entry.name, width = width));
    }
    lines.join("\n")
}

/// Formats a price quote, with the comparison if one was requested
pub fn quote_text(quote: &PriceQuote, comparison: Option<&Comparison>) -> String {
    let mut lines = vec![
        format!("{} {} ({})", quote.brand, quote.model, quote.model_year),
        format!("Fuel:            {}", quote.fuel),
        format!("Reference price: {}", quote.value),
        format!("Reference month: {}", quote.reference_month),
    ];
    if let Some(code) = &quote.fipe_code {
        lines.push(format!("FIPE code:       {}", code));
    }

    if let Some(comparison) = comparison {
        lines.push(format!("Spent:           {}", format_brl(comparison.spent)));
        let verdict = if comparison.is_below_reference() {
            "below reference"
        } else {
            "above reference"
        };
        lines.push(format!(
            "Difference:      {} ({})",
            format_brl(comparison.difference),
            verdict
        ));
    }

    lines.join("\n")
}

/// JSON shape for `price`
#[derive(Debug, Serialize)]
pub struct QuoteReport<'a> {
    pub quote: &'a PriceQuote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<&'a Comparison>,
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Listing, ListingSource};

    fn quote() -> PriceQuote {
        PriceQuote {
            value: "R$ 35.000,00".to_string(),
            reference_month: "outubro de 2024".to_string(),
            brand: "Fiat".to_string(),
            model: "Palio 1.0".to_string(),
            model_year: "2015".to_string(),
            fuel: "Gasolina".to_string(),
            fipe_code: Some("001234-5".to_string()),
            fuel_acronym: None,
        }
    }

    #[test]
    fn test_entries_table_aligns_codes() {
        let table = entries_table(&[
            CatalogEntry::new("6", "Audi"),
            CatalogEntry::new("21", "Fiat"),
        ]);
        assert_eq!(table, "CODE  NAME\n6     Audi\n21    Fiat");
    }

    #[test]
    fn test_entries_table_empty() {
        assert_eq!(entries_table(&[]), "No entries found.");
    }

    #[test]
    fn test_quote_text_with_comparison() {
        let comparison = Comparison::new(35_000.0, 38_500.0);
        let text = quote_text(&quote(), Some(&comparison));

        assert!(text.starts_with("Fiat Palio 1.0 (2015)"));
        assert!(text.contains("Reference price: R$ 35.000,00"));
        assert!(text.contains("FIPE code:       001234-5"));
        assert!(text.contains("Spent:           R$ 38.500,00"));
        assert!(text.contains("-R$ 3.500,00 (above reference)"));
    }

    #[test]
    fn test_quote_text_without_comparison() {
        let text = quote_text(&quote(), None);
        assert!(!text.contains("Spent"));
    }

    #[test]
    fn test_json_shapes() {
        let listing = Listing {
            entries: vec![CatalogEntry::new("21", "Fiat")],
            source: ListingSource::Fallback,
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&listing).unwrap()).unwrap();
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["entries"][0]["code"], "21");

        let quote = quote();
        let report = QuoteReport {
            quote: &quote,
            comparison: None,
        };
        let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        assert_eq!(json["quote"]["value"], "R$ 35.000,00");
        assert!(json.get("comparison").is_none());
        assert!(json["quote"].get("fuel_acronym").is_none());
    }
}
