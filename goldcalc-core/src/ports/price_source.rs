//! Gold price source port
//!
//! Defines the interface for fetching the 24K gold price per gram from an
//! external quote provider (Gold-API, MetalPriceAPI, test doubles, etc.)

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Gold price source trait
///
/// Each implementation owns its request target, headers and the extraction
/// of a price from the response body. The GoldRateService walks an ordered
/// list of these without knowing the specifics of each provider.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Source name used in logs and rate bookkeeping (e.g. "Gold-API")
    fn name(&self) -> &str;

    /// Fetch the 24K price per gram in `currency`
    ///
    /// Returns whatever the provider reported; the caller decides whether a
    /// zero or negative value is usable.
    async fn fetch_price(&self, currency: &str) -> Result<Decimal>;
}
