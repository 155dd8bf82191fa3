//! MetalPriceAPI price source
//!
//! `GET {base}/latest?api_key=..&base=XAU&currencies={currency}` returns the
//! price of one troy ounce of gold in each requested currency under `rates`.
//!
//! API Documentation: https://metalpriceapi.com/documentation

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::http::{check_response_status, map_body_error, map_request_error, normalize_base_url};
use crate::domain::pricing::round_whole;
use crate::ports::PriceSource;

/// Default production API URL
pub const METAL_PRICE_API_URL: &str = "https://api.metalpriceapi.com/v1";

/// Grams in one troy ounce
pub const TROY_OUNCE_GRAMS: Decimal = Decimal::from_parts(311035, 0, 0, false, 4);

/// MetalPriceAPI `latest` response
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(default)]
    error: Option<JsonValue>,
}

/// MetalPriceAPI client
#[derive(Debug, Clone)]
pub struct MetalPriceApiSource {
    client: Client,
    name: String,
    base_url: String,
    api_key: String,
}

impl MetalPriceApiSource {
    pub fn new(client: Client, name: &str, base_url: &str, api_key: &str) -> Result<Self> {
        if api_key.is_empty() {
            anyhow::bail!("{}: API key cannot be empty", name);
        }

        Ok(Self {
            client,
            name: name.to_string(),
            base_url: normalize_base_url(name, base_url)?,
            api_key: api_key.to_string(),
        })
    }

    /// Convert the per-ounce quote for `currency` into a whole per-gram price
    fn extract_price(&self, data: LatestRatesResponse, currency: &str) -> Result<Decimal> {
        if data.success == Some(false) {
            let detail = data
                .error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no details".to_string());
            anyhow::bail!("{} reported failure: {}", self.name, detail);
        }

        let per_ounce = data
            .rates
            .get(currency)
            .copied()
            .with_context(|| format!("{} response has no rate for {}", self.name, currency))?;
        let per_ounce = Decimal::try_from(per_ounce)
            .with_context(|| format!("{} returned an unusable rate: {}", self.name, per_ounce))?;

        Ok(round_whole(per_ounce / TROY_OUNCE_GRAMS))
    }
}

#[async_trait]
impl PriceSource for MetalPriceApiSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_price(&self, currency: &str) -> Result<Decimal> {
        let url = format!("{}/latest", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("base", "XAU"),
                ("currencies", currency),
            ])
            .send()
            .await
            .map_err(|e| map_request_error(&self.name, e))?;

        check_response_status(&self.name, &response)?;

        let data: LatestRatesResponse = response
            .json()
            .await
            .map_err(|e| map_body_error(&self.name, e))?;

        self.extract_price(data, currency)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapters::http::build_client;
    use crate::adapters::price_mock::{MockConfig, MockPriceServer};

    fn source_for(server: &MockPriceServer) -> MetalPriceApiSource {
        let client = build_client(Duration::from_secs(5)).unwrap();
        MetalPriceApiSource::new(client, "MetalPriceAPI", &server.base_url(), "demo").unwrap()
    }

    #[test]
    fn test_troy_ounce_constant() {
        assert_eq!(TROY_OUNCE_GRAMS, Decimal::new(311035, 4));
    }

    #[test]
    fn test_reject_empty_api_key() {
        let client = build_client(Duration::from_secs(5)).unwrap();
        assert!(MetalPriceApiSource::new(client, "MetalPriceAPI", METAL_PRICE_API_URL, "").is_err());
    }

    #[tokio::test]
    async fn test_fetch_price_converts_ounce_to_gram() {
        // 292372.9 / 31.1035 = 9400.0...
        let server = MockPriceServer::start(MockConfig {
            price_per_ounce: 292372.9,
            ..Default::default()
        })
        .unwrap();

        let price = source_for(&server).fetch_price("PHP").await.unwrap();
        assert_eq!(price, Decimal::new(9400, 0));
    }

    #[tokio::test]
    async fn test_fetch_price_reported_failure() {
        let server = MockPriceServer::start(MockConfig {
            body_override: Some(
                r#"{"success":false,"error":{"statusCode":101,"message":"invalid key"}}"#
                    .to_string(),
            ),
            ..Default::default()
        })
        .unwrap();

        let err = source_for(&server).fetch_price("PHP").await.unwrap_err();
        assert!(err.to_string().contains("reported failure"));
    }

    #[tokio::test]
    async fn test_dropped_connection_error_hides_api_key() {
        let server = MockPriceServer::start(MockConfig {
            drop_connection: true,
            ..Default::default()
        })
        .unwrap();

        let client = build_client(Duration::from_secs(5)).unwrap();
        let source =
            MetalPriceApiSource::new(client, "MetalPriceAPI", &server.base_url(), "SECRET-KEY-123")
                .unwrap();

        let err = source.fetch_price("PHP").await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("MetalPriceAPI"));
        assert!(!message.contains("SECRET-KEY-123"), "key leaked: {}", message);
        assert!(!message.contains("api_key"), "query leaked: {}", message);
    }

    #[tokio::test]
    async fn test_unparseable_body_error_hides_api_key() {
        let server = MockPriceServer::start(MockConfig {
            body_override: Some("<html>maintenance</html>".to_string()),
            ..Default::default()
        })
        .unwrap();

        let client = build_client(Duration::from_secs(5)).unwrap();
        let source =
            MetalPriceApiSource::new(client, "MetalPriceAPI", &server.base_url(), "SECRET-KEY-123")
                .unwrap();

        let err = source.fetch_price("PHP").await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Failed to parse MetalPriceAPI response"));
        assert!(!message.contains("SECRET-KEY-123"), "key leaked: {}", message);
    }

    #[tokio::test]
    async fn test_non_200_success_status_accepted() {
        let server = MockPriceServer::start(MockConfig {
            status: 203,
            ..Default::default()
        })
        .unwrap();

        let price = source_for(&server).fetch_price("PHP").await.unwrap();
        assert_eq!(price, Decimal::new(9400, 0));
    }

    #[tokio::test]
    async fn test_fetch_price_missing_currency() {
        let server = MockPriceServer::start(MockConfig::default()).unwrap();

        let err = source_for(&server).fetch_price("EUR").await.unwrap_err();
        assert!(err.to_string().contains("no rate for EUR"));
    }
}
