//! Upstream JSON shapes
//!
//! Field names follow the FIPE API (`codigo`, `nome`, `Valor`, ...). Codes
//! arrive as strings for brands and years but as numbers for models, so both
//! forms are accepted and normalized to strings.

use serde::Deserialize;

use super::{CatalogEntry, DecodeError, PriceQuote};
use crate::cache::Operation;

/// A catalog code as sent by the API
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Code {
    Text(String),
    Number(serde_json::Number),
}

impl From<Code> for String {
    fn from(code: Code) -> Self {
        match code {
            Code::Text(text) => text,
            Code::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Entry {
    codigo: Code,
    nome: String,
}

impl From<Entry> for CatalogEntry {
    fn from(entry: Entry) -> Self {
        CatalogEntry {
            code: entry.codigo.into(),
            name: entry.nome,
        }
    }
}

/// `/marcas/{brand}/modelos` wraps the models with a list of years
#[derive(Debug, Deserialize)]
struct ModelsPage {
    modelos: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Price {
    #[serde(rename = "Valor")]
    value: String,
    #[serde(rename = "MesReferencia", default)]
    reference_month: String,
    #[serde(rename = "Marca", default)]
    brand: String,
    #[serde(rename = "Modelo", default)]
    model: String,
    #[serde(rename = "AnoModelo")]
    model_year: Option<Code>,
    #[serde(rename = "Combustivel", default)]
    fuel: String,
    #[serde(rename = "CodigoFipe")]
    fipe_code: Option<String>,
    #[serde(rename = "SiglaCombustivel")]
    fuel_acronym: Option<String>,
}

impl From<Price> for PriceQuote {
    fn from(price: Price) -> Self {
        PriceQuote {
            value: price.value,
            reference_month: price.reference_month.trim().to_string(),
            brand: price.brand,
            model: price.model,
            model_year: price.model_year.map(String::from).unwrap_or_default(),
            fuel: price.fuel,
            fipe_code: price.fipe_code,
            fuel_acronym: price.fuel_acronym,
        }
    }
}

fn json_error(operation: Operation) -> impl FnOnce(serde_json::Error) -> DecodeError {
    move |source| DecodeError::Json { operation, source }
}

/// Decodes a bare array of `{codigo, nome}` objects
pub(crate) fn decode_entries(
    operation: Operation,
    body: &str,
) -> Result<Vec<CatalogEntry>, DecodeError> {
    let entries: Vec<Entry> = serde_json::from_str(body).map_err(json_error(operation))?;
    Ok(entries.into_iter().map(CatalogEntry::from).collect())
}

/// Decodes the `modelos` list out of a models page
pub(crate) fn decode_models(body: &str) -> Result<Vec<CatalogEntry>, DecodeError> {
    let page: ModelsPage = serde_json::from_str(body).map_err(json_error(Operation::Models))?;
    Ok(page.modelos.into_iter().map(CatalogEntry::from).collect())
}

pub(crate) fn decode_price(body: &str) -> Result<PriceQuote, DecodeError> {
    let price: Price = serde_json::from_str(body).map_err(json_error(Operation::Price))?;
    Ok(price.into())
}
