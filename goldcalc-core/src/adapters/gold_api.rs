//! Gold-API price source
//!
//! `GET {base}/XAU/{currency}` with an `x-access-token` header. The response
//! carries the 24K gram price directly as `price_gram_24k`.
//!
//! API Documentation: https://www.goldapi.io/dashboard

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::http::{check_response_status, map_body_error, map_request_error, normalize_base_url};
use crate::domain::pricing::round_whole;
use crate::ports::PriceSource;

/// Default production API URL
pub const GOLD_API_URL: &str = "https://www.goldapi.io/api";

/// Gold-API quote response (only the fields we read)
#[derive(Debug, Deserialize)]
struct GoldApiQuote {
    #[serde(default)]
    price_gram_24k: Option<f64>,
}

/// Gold-API client
#[derive(Debug, Clone)]
pub struct GoldApiSource {
    client: Client,
    name: String,
    base_url: String,
    access_token: String,
}

impl GoldApiSource {
    pub fn new(client: Client, name: &str, base_url: &str, access_token: &str) -> Result<Self> {
        if access_token.is_empty() {
            anyhow::bail!("{}: access token cannot be empty", name);
        }

        Ok(Self {
            client,
            name: name.to_string(),
            base_url: normalize_base_url(name, base_url)?,
            access_token: access_token.to_string(),
        })
    }

    fn extract_price(&self, quote: GoldApiQuote) -> Result<Decimal> {
        let raw = quote
            .price_gram_24k
            .with_context(|| format!("{} response has no price_gram_24k", self.name))?;
        let price = Decimal::try_from(raw)
            .with_context(|| format!("{} returned an unusable price: {}", self.name, raw))?;
        Ok(round_whole(price))
    }
}

#[async_trait]
impl PriceSource for GoldApiSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_price(&self, currency: &str) -> Result<Decimal> {
        let url = format!("{}/XAU/{}", self.base_url, currency);

        let response = self
            .client
            .get(&url)
            .header("x-access-token", &self.access_token)
            .send()
            .await
            .map_err(|e| map_request_error(&self.name, e))?;

        check_response_status(&self.name, &response)?;

        let quote: GoldApiQuote = response
            .json()
            .await
            .map_err(|e| map_body_error(&self.name, e))?;

        self.extract_price(quote)
    }
}
