//! Cached gold rate state

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where the acquisition routine currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateStatus {
    /// No fetch has completed yet
    Idle,
    Fetching,
    /// Rate came from an external source
    Live,
    /// Every source failed; rate is a simulated estimate
    Estimated,
}

/// Base 24K price per gram and its bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldRate {
    pub base_rate_24k: Decimal,
    pub last_updated: Option<DateTime<Utc>>,
    pub is_loading: bool,
    /// Advisory message; set when the rate is an estimate
    pub error: Option<String>,
    pub currency: String,
    pub status: RateStatus,
    /// Name of the source that supplied the current rate
    pub source: Option<String>,
}

impl GoldRate {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            base_rate_24k: Decimal::ZERO,
            last_updated: None,
            is_loading: false,
            error: None,
            currency: currency.into(),
            status: RateStatus::Idle,
            source: None,
        }
    }

    pub fn begin_fetch(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.status = RateStatus::Fetching;
    }

    pub fn finish_fetch(&mut self) {
        self.is_loading = false;
    }

    /// Adopt a rate reported by an external source
    pub fn adopt_live(&mut self, rate: Decimal, source: &str) {
        self.base_rate_24k = rate;
        self.last_updated = Some(Utc::now());
        self.status = RateStatus::Live;
        self.source = Some(source.to_string());
    }

    /// Adopt a simulated rate and flag it with an advisory message
    pub fn adopt_estimate(&mut self, rate: Decimal, advisory: &str) {
        self.base_rate_24k = rate;
        self.last_updated = Some(Utc::now());
        self.error = Some(advisory.to_string());
        self.status = RateStatus::Estimated;
        self.source = Some("simulated".to_string());
    }

    /// Set a rate supplied by the user instead of fetched
    pub fn adopt_manual(&mut self, rate: Decimal) {
        self.base_rate_24k = rate;
        self.last_updated = Some(Utc::now());
        self.error = None;
        self.status = RateStatus::Live;
        self.source = Some("manual".to_string());
    }

    pub fn is_estimated(&self) -> bool {
        self.status == RateStatus::Estimated
    }
}
