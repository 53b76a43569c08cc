//! FIPE reference-price catalog
//!
//! The catalog is a four-level listing: brands, models of a brand, model
//! years of a model, and the reference price for one model year.
//! [`CatalogClient`] talks to the upstream API directly; [`CatalogService`] is
//! what callers should use, adding the cache and the brand-list fallback on
//! top of it.

pub mod client;
pub mod fallback;
pub mod service;
mod wire;

pub use client::CatalogClient;
pub use fallback::{fallback_brands, FALLBACK_BRANDS};
pub use service::{CatalogService, Listing, ListingSource};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::Operation;
use crate::transport::TransportFailure;

/// Kind of vehicle the catalog covers; selects the upstream table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    #[default]
    Cars,
    Motorcycles,
    Trucks,
}

impl VehicleKind {
    /// Path segment used by the upstream API
    pub fn path_segment(&self) -> &'static str {
        match self {
            VehicleKind::Cars => "carros",
            VehicleKind::Motorcycles => "motos",
            VehicleKind::Trucks => "caminhoes",
        }
    }
}

/// One row of a brand, model or year listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Opaque catalog code, passed back verbatim in follow-up lookups
    pub code: String,
    /// Display name
    pub name: String,
}

impl CatalogEntry {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Reference price for one model year
///
/// `value` keeps the upstream currency formatting (e.g. `"R$ 35.000,00"`);
/// converting it to a number is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub value: String,
    /// Month the reference table was published, e.g. `"outubro de 2024"`
    pub reference_month: String,
    pub brand: String,
    pub model: String,
    pub model_year: String,
    pub fuel: String,
    /// FIPE table code for the vehicle, when provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fipe_code: Option<String>,
    /// Single-letter fuel abbreviation, when provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_acronym: Option<String>,
}

/// A response body that did not have the shape expected for its operation
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed {operation} response: {source}")]
    Json {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation} lookup produced a {found} instead of a {expected}")]
    Shape {
        operation: Operation,
        expected: &'static str,
        found: &'static str,
    },
}

impl DecodeError {
    pub fn operation(&self) -> Operation {
        match self {
            DecodeError::Json { operation, .. } | DecodeError::Shape { operation, .. } => *operation,
        }
    }
}

/// Failure of a catalog lookup
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request itself failed
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    /// The request succeeded but the body could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl UpstreamError {
    /// The transport failure, if that is what this is
    pub fn transport(&self) -> Option<&TransportFailure> {
        match self {
            UpstreamError::Transport(failure) => Some(failure),
            UpstreamError::Decode(_) => None,
        }
    }
}
