//! Static brand list used when the brand lookup fails
//!
//! Only the brand listing degrades. Models, years and prices are tied to a
//! user's choice of brand and feed financial comparisons, so a substitute for
//! them would silently corrupt a record; those failures always propagate.

use super::CatalogEntry;

/// Common manufacturers with their FIPE car-table codes
///
/// Codes match the upstream car table so a later models lookup still resolves
/// once the service is reachable again.
pub static FALLBACK_BRANDS: [(&str, &str); 16] = [
    ("6", "Audi"),
    ("7", "BMW"),
    ("15", "Citroën"),
    ("21", "Fiat"),
    ("22", "Ford"),
    ("23", "GM - Chevrolet"),
    ("25", "Honda"),
    ("26", "Hyundai"),
    ("29", "Jeep"),
    ("31", "Kia Motors"),
    ("39", "Mercedes-Benz"),
    ("43", "Nissan"),
    ("44", "Peugeot"),
    ("48", "Renault"),
    ("56", "Toyota"),
    ("59", "VW - VolksWagen"),
];

/// The fallback brand list as catalog entries
pub fn fallback_brands() -> Vec<CatalogEntry> {
    FALLBACK_BRANDS
        .iter()
        .map(|(code, name)| CatalogEntry::new(*code, *name))
        .collect()
}
