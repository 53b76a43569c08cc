//! Uncached client for the FIPE catalog endpoints

use tracing::debug;
use urlencoding::encode;

use super::{wire, CatalogEntry, PriceQuote, UpstreamError};
use crate::cache::Operation;
use crate::transport::Transport;

/// Base URL for the public FIPE API (without the vehicle kind segment)
pub const FIPE_BASE_URL: &str = "https://parallelum.com.br/fipe/api/v1";

/// Client for the four catalog lookups
///
/// Every call goes to the network (through [`Transport`] retries). Codes are
/// passed through verbatim apart from path-segment encoding.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    transport: Transport,
}

impl CatalogClient {
    /// Create a client over a transport rooted at `{base}/{vehicle kind}`
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Lists every brand
    pub async fn list_brands(&self) -> Result<Vec<CatalogEntry>, UpstreamError> {
        let reply = self.transport.get("/marcas").await?;
        let brands = wire::decode_entries(Operation::Brands, &reply.body)?;
        debug!(count = brands.len(), "Fetched brands");
        Ok(brands)
    }

    /// Lists the models of a brand
    pub async fn list_models(&self, brand: &str) -> Result<Vec<CatalogEntry>, UpstreamError> {
        let path = format!("/marcas/{}/modelos", encode(brand));
        let reply = self.transport.get(&path).await?;
        let models = wire::decode_models(&reply.body)?;
        debug!(brand, count = models.len(), "Fetched models");
        Ok(models)
    }

    /// Lists the model years available for a model
    pub async fn list_years(
        &self,
        brand: &str,
        model: &str,
    ) -> Result<Vec<CatalogEntry>, UpstreamError> {
        let path = format!(
            "/marcas/{}/modelos/{}/anos",
            encode(brand),
            encode(model)
        );
        let reply = self.transport.get(&path).await?;
        let years = wire::decode_entries(Operation::Years, &reply.body)?;
        debug!(brand, model, count = years.len(), "Fetched model years");
        Ok(years)
    }

    /// Fetches the reference price for one model year
    pub async fn get_price(
        &self,
        brand: &str,
        model: &str,
        year: &str,
    ) -> Result<PriceQuote, UpstreamError> {
        let path = format!(
            "/marcas/{}/modelos/{}/anos/{}",
            encode(brand),
            encode(model),
            encode(year)
        );
        let reply = self.transport.get(&path).await?;
        Ok(wire::decode_price(&reply.body)?)
    }
}
