//! Cached catalog lookups with brand-list degradation
//!
//! Each call checks the cache first. On a miss the upstream client is called
//! once per key, even under concurrent callers, and only successful results are
//! stored. If the brand lookup fails, the static fallback list is served for
//! that call without being cached, so the real list is picked up as soon as the
//! service recovers. Every other failure is returned to the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use super::{fallback_brands, CatalogClient, CatalogEntry, DecodeError, PriceQuote, UpstreamError};
use crate::cache::{CacheKey, CacheStats, Operation, TtlCache};
use crate::config::Config;
use crate::transport::{HttpBackend, ReqwestBackend, Transport};

/// What the cache stores for one lookup
#[derive(Debug, Clone)]
enum CatalogPayload {
    Entries(Vec<CatalogEntry>),
    Quote(PriceQuote),
}

impl CatalogPayload {
    fn kind(&self) -> &'static str {
        match self {
            CatalogPayload::Entries(_) => "listing",
            CatalogPayload::Quote(_) => "price quote",
        }
    }
}

/// Where a listing came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    /// Upstream response, possibly served from cache
    Live,
    /// Static substitute served because the upstream lookup failed
    Fallback,
}

/// A listing together with its origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub entries: Vec<CatalogEntry>,
    pub source: ListingSource,
}

impl Listing {
    pub fn is_fallback(&self) -> bool {
        self.source == ListingSource::Fallback
    }
}

/// Catalog lookups for the rest of the application
///
/// Owns its cache for the life of the process. Share it behind an `Arc`.
pub struct CatalogService {
    client: CatalogClient,
    cache: TtlCache<CatalogPayload>,
    ttl: Duration,
}

impl CatalogService {
    /// Creates a service over `client` with the given freshness window and
    /// cache capacity
    pub fn new(client: CatalogClient, ttl: Duration, max_entries: usize) -> Self {
        Self {
            client,
            cache: TtlCache::new(max_entries),
            ttl,
        }
    }

    /// Builds the full stack from configuration, talking HTTP through reqwest
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with_backend(config, Arc::new(ReqwestBackend::new()))
    }

    /// Builds the full stack from configuration over a custom HTTP backend
    pub fn from_config_with_backend(config: &Config, backend: Arc<dyn HttpBackend>) -> Self {
        let transport = Transport::with_backend(config.api.endpoint(), backend)
            .with_timeout(config.api.timeout())
            .with_retry(config.retry.policy());
        Self::new(
            CatalogClient::new(transport),
            config.cache.ttl(),
            config.cache.max_entries,
        )
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops every cached lookup
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Lists brands; never fails
    ///
    /// On upstream failure the static fallback list is returned instead.
    pub async fn list_brands(&self) -> Vec<CatalogEntry> {
        self.list_brands_with_source().await.entries
    }

    /// Lists brands and reports whether the fallback list was used
    pub async fn list_brands_with_source(&self) -> Listing {
        let result = self
            .cached_entries(CacheKey::brands(), || self.client.list_brands())
            .await;

        match result {
            Ok(entries) => Listing {
                entries,
                source: ListingSource::Live,
            },
            Err(err) => {
                warn!(error = %err, "Brand lookup failed, serving fallback list");
                Listing {
                    entries: fallback_brands(),
                    source: ListingSource::Fallback,
                }
            }
        }
    }

    /// Lists the models of a brand
    pub async fn list_models(&self, brand: &str) -> Result<Vec<CatalogEntry>, UpstreamError> {
        self.cached_entries(CacheKey::models(brand), || self.client.list_models(brand))
            .await
    }

    /// Lists the model years of a model
    pub async fn list_years(
        &self,
        brand: &str,
        model: &str,
    ) -> Result<Vec<CatalogEntry>, UpstreamError> {
        self.cached_entries(CacheKey::years(brand, model), || {
            self.client.list_years(brand, model)
        })
        .await
    }

    /// Fetches the reference price for a model year
    pub async fn get_price(
        &self,
        brand: &str,
        model: &str,
        year: &str,
    ) -> Result<PriceQuote, UpstreamError> {
        let payload = self
            .cache
            .get_or_compute(CacheKey::price(brand, model, year), self.ttl, || async {
                self.client
                    .get_price(brand, model, year)
                    .await
                    .map(CatalogPayload::Quote)
            })
            .await?;

        match payload {
            CatalogPayload::Quote(quote) => Ok(quote),
            other => Err(shape_error(Operation::Price, "price quote", &other)),
        }
    }

    async fn cached_entries<F, Fut>(
        &self,
        key: CacheKey,
        fetch: F,
    ) -> Result<Vec<CatalogEntry>, UpstreamError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<CatalogEntry>, UpstreamError>>,
    {
        let operation = key.operation();
        let payload = self
            .cache
            .get_or_compute(key, self.ttl, move || async move {
                fetch().await.map(CatalogPayload::Entries)
            })
            .await?;

        match payload {
            CatalogPayload::Entries(entries) => Ok(entries),
            other => Err(shape_error(operation, "listing", &other)),
        }
    }
}

fn shape_error(operation: Operation, expected: &'static str, found: &CatalogPayload) -> UpstreamError {
    UpstreamError::Decode(DecodeError::Shape {
        operation,
        expected,
        found: found.kind(),
    })
}
