//! fipequote library
//!
//! FIPE reference-price lookups with retrying transport, a TTL cache with
//! single-flight misses, and a static brand list for when the catalog is down.
//! The binary is a thin CLI over [`catalog::CatalogService`].

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod money;
pub mod output;
pub mod transport;
