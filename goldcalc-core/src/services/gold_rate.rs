//! Gold rate service - ranked price acquisition and pricing
//!
//! Sources are tried strictly in order; the first positive price wins. When
//! every source fails the service falls back to a simulated estimate, so a
//! fetch always ends with a usable rate.

use std::time::Duration;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::adapters::http::build_client;
use crate::adapters::simulated::ESTIMATE_ADVISORY;
use crate::adapters::{GoldApiSource, MetalPriceApiSource, SimulatedRate};
use crate::config::{Config, SourceConfig};
use crate::domain::pricing::{price_item, rate_for_purity};
use crate::domain::result::Error;
use crate::domain::{GoldRate, PricingResult, PurityGrade, RateStatus, PURITY_TABLE};
use crate::ports::PriceSource;

/// A source that was tried and rejected during a fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceWarning {
    pub source: String,
    pub message: String,
}

/// What a fetch ended with
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateFetchOutcome {
    pub status: RateStatus,
    pub source: Option<String>,
    pub base_rate_24k: Decimal,
    /// In the order the sources were tried
    pub warnings: Vec<SourceWarning>,
}

/// Build the configured sources in rank order, sharing one HTTP client
pub fn build_price_sources(config: &Config) -> Result<Vec<Box<dyn PriceSource>>> {
    let client = build_client(Duration::from_secs(config.request_timeout_secs))?;
    let mut sources: Vec<Box<dyn PriceSource>> = Vec::new();

    for source in config.active_sources() {
        let built: Box<dyn PriceSource> = match source {
            SourceConfig::GoldApi(s) => Box::new(GoldApiSource::new(
                client.clone(),
                &s.name,
                &s.url,
                &s.access_token,
            )?),
            SourceConfig::MetalPriceApi(s) => Box::new(MetalPriceApiSource::new(
                client.clone(),
                &s.name,
                &s.url,
                &s.api_key,
            )?),
        };
        sources.push(built);
    }

    Ok(sources)
}

/// Gold rate service owning the cached rate
pub struct GoldRateService {
    sources: Vec<Box<dyn PriceSource>>,
    simulated: SimulatedRate,
    rate: GoldRate,
}

impl GoldRateService {
    pub fn new(
        currency: impl Into<String>,
        sources: Vec<Box<dyn PriceSource>>,
        simulated: SimulatedRate,
    ) -> Self {
        Self {
            sources,
            simulated,
            rate: GoldRate::new(currency),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.simulated.validate()?;
        Ok(Self::new(
            config.currency.clone(),
            build_price_sources(config)?,
            SimulatedRate::from_config(&config.simulated),
        ))
    }

    pub fn rate(&self) -> &GoldRate {
        &self.rate
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn purity_table(&self) -> &'static [PurityGrade] {
        PURITY_TABLE
    }

    /// Use a known base rate instead of fetching one
    pub fn set_base_rate(&mut self, rate: Decimal) -> crate::domain::result::Result<()> {
        if rate <= Decimal::ZERO {
            return Err(Error::validation("base rate must be positive"));
        }
        self.rate.adopt_manual(rate);
        Ok(())
    }

    /// Refresh the base 24K rate
    ///
    /// Never fails: source errors are logged and collected as warnings, and
    /// total failure falls through to the simulated estimate.
    pub async fn fetch_gold_rate(&mut self) -> RateFetchOutcome {
        self.rate.begin_fetch();
        let warnings = self.acquire().await;
        self.rate.finish_fetch();

        RateFetchOutcome {
            status: self.rate.status,
            source: self.rate.source.clone(),
            base_rate_24k: self.rate.base_rate_24k,
            warnings,
        }
    }

    async fn acquire(&mut self) -> Vec<SourceWarning> {
        let mut warnings = Vec::new();
        let currency = self.rate.currency.clone();

        for source in &self.sources {
            match source.fetch_price(&currency).await {
                Ok(price) if price > Decimal::ZERO => {
                    tracing::debug!(source = source.name(), %price, "adopted gold rate");
                    self.rate.adopt_live(price, source.name());
                    return warnings;
                }
                Ok(price) => {
                    tracing::warn!(source = source.name(), %price, "ignoring non-positive price");
                    warnings.push(SourceWarning {
                        source: source.name().to_string(),
                        message: format!("returned a non-positive price: {}", price),
                    });
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "price source failed");
                    warnings.push(SourceWarning {
                        source: source.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::warn!("all price sources failed, using estimated market rate");
        let estimate = self.simulated.estimate().await;
        self.rate.adopt_estimate(estimate, ESTIMATE_ADVISORY);
        warnings
    }

    /// Per-gram rate for a purity label; unknown labels price as 24K
    pub fn rate_for_purity(&self, purity: &str) -> Decimal {
        rate_for_purity(self.rate.base_rate_24k, purity)
    }

    /// Price a line item at the current base rate
    pub fn calculate_gold_value(
        &self,
        purity: &str,
        grams: Decimal,
        making_charge: Decimal,
    ) -> PricingResult {
        price_item(self.rate.base_rate_24k, purity, grams, making_charge)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::adapters::price_mock::{MockConfig, MockPriceServer};
    use crate::config::{GoldApiSettings, MetalPriceApiSettings};

    enum Reply {
        Price(i64),
        Fail(&'static str),
    }

    struct StubSource {
        name: &'static str,
        reply: Reply,
        calls: Arc<AtomicUsize>,
    }

    impl StubSource {
        fn boxed(name: &'static str, reply: Reply) -> (Box<dyn PriceSource>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Box::new(Self {
                name,
                reply,
                calls: calls.clone(),
            });
            (source, calls)
        }
    }

    #[async_trait]
    impl PriceSource for StubSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_price(&self, _currency: &str) -> anyhow::Result<Decimal> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Price(p) => Ok(Decimal::new(p, 0)),
                Reply::Fail(msg) => Err(anyhow::anyhow!(msg)),
            }
        }
    }

    fn instant_estimate() -> SimulatedRate {
        SimulatedRate::new(Decimal::new(9400, 0), 100, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let (first, first_calls) = StubSource::boxed("first", Reply::Price(9512));
        let (second, second_calls) = StubSource::boxed("second", Reply::Price(1));
        let mut service = GoldRateService::new("PHP", vec![first, second], instant_estimate());

        let outcome = service.fetch_gold_rate().await;

        assert_eq!(outcome.status, RateStatus::Live);
        assert_eq!(outcome.source.as_deref(), Some("first"));
        assert_eq!(outcome.base_rate_24k, Decimal::new(9512, 0));
        assert!(outcome.warnings.is_empty());
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);

        let rate = service.rate();
        assert!(!rate.is_loading);
        assert!(rate.error.is_none());
        assert!(rate.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_falls_through_failed_and_non_positive_sources() {
        let (failing, failing_calls) = StubSource::boxed("failing", Reply::Fail("connection refused"));
        let (zero, zero_calls) = StubSource::boxed("zero", Reply::Price(0));
        let (good, _) = StubSource::boxed("good", Reply::Price(9300));
        let mut service =
            GoldRateService::new("PHP", vec![failing, zero, good], instant_estimate());

        let outcome = service.fetch_gold_rate().await;

        assert_eq!(outcome.source.as_deref(), Some("good"));
        assert_eq!(outcome.base_rate_24k, Decimal::new(9300, 0));
        assert_eq!(outcome.warnings.len(), 2);
        assert_eq!(outcome.warnings[0].source, "failing");
        assert!(outcome.warnings[0].message.contains("connection refused"));
        assert_eq!(outcome.warnings[1].source, "zero");
        assert!(outcome.warnings[1].message.contains("non-positive"));
        assert_eq!(failing_calls.load(Ordering::SeqCst), 1);
        assert_eq!(zero_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_sources_fail_uses_estimate() {
        let (a, _) = StubSource::boxed("a", Reply::Fail("timeout"));
        let (b, _) = StubSource::boxed("b", Reply::Price(-5));
        let mut service = GoldRateService::new("PHP", vec![a, b], instant_estimate());

        let outcome = service.fetch_gold_rate().await;

        assert_eq!(outcome.status, RateStatus::Estimated);
        assert_eq!(outcome.source.as_deref(), Some("simulated"));
        assert_eq!(outcome.warnings.len(), 2);

        let rate = service.rate();
        assert!(!rate.is_loading);
        assert_eq!(rate.error.as_deref(), Some(ESTIMATE_ADVISORY));
        assert!(rate.base_rate_24k >= Decimal::new(9300, 0));
        assert!(rate.base_rate_24k <= Decimal::new(9500, 0));
        assert!(rate.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_no_sources_uses_estimate() {
        let mut service = GoldRateService::new("PHP", Vec::new(), instant_estimate());
        let outcome = service.fetch_gold_rate().await;
        assert_eq!(outcome.status, RateStatus::Estimated);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_live_fetch_clears_previous_advisory() {
        let mut service = GoldRateService::new("PHP", Vec::new(), instant_estimate());
        service.fetch_gold_rate().await;
        assert!(service.rate().error.is_some());

        let (good, _) = StubSource::boxed("good", Reply::Price(9600));
        service.sources.push(good);
        service.fetch_gold_rate().await;
        assert!(service.rate().error.is_none());
        assert_eq!(service.rate().status, RateStatus::Live);
    }

    #[test]
    fn test_calculate_gold_value_uses_current_rate() {
        let mut service = GoldRateService::new("PHP", Vec::new(), instant_estimate());
        service.set_base_rate(Decimal::new(9400, 0)).unwrap();

        let result = service.calculate_gold_value("24K", Decimal::new(10, 0), Decimal::new(500, 0));
        assert_eq!(result.total, Decimal::new(105840, 0));
        assert_eq!(service.rate_for_purity("18K"), Decimal::new(7050, 0));
    }

    #[test]
    fn test_set_base_rate_rejects_non_positive() {
        let mut service = GoldRateService::new("PHP", Vec::new(), instant_estimate());
        assert!(service.set_base_rate(Decimal::ZERO).is_err());
        assert_eq!(service.rate().status, RateStatus::Idle);
    }

    #[test]
    fn test_build_sources_from_config() {
        let config = Config::default();
        let sources = build_price_sources(&config).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Gold-API", "MetalPriceAPI"]);
    }

    #[test]
    fn test_build_sources_rejects_bad_url() {
        let mut config = Config::default();
        config.sources = vec![SourceConfig::GoldApi(GoldApiSettings {
            url: "not a url".to_string(),
            ..Default::default()
        })];
        assert!(build_price_sources(&config).is_err());
    }

    #[tokio::test]
    async fn test_fetch_against_mock_endpoints() {
        let failing = MockPriceServer::start(MockConfig {
            status: 503,
            ..Default::default()
        })
        .unwrap();
        let working = MockPriceServer::start(MockConfig::default()).unwrap();

        let mut config = Config::default();
        config.sources = vec![
            SourceConfig::GoldApi(GoldApiSettings {
                url: failing.base_url(),
                ..Default::default()
            }),
            SourceConfig::MetalPriceApi(MetalPriceApiSettings {
                url: working.base_url(),
                ..Default::default()
            }),
        ];
        config.simulated.delay_ms = 0;

        let mut service = GoldRateService::from_config(&config).unwrap();
        let outcome = service.fetch_gold_rate().await;

        assert_eq!(outcome.status, RateStatus::Live);
        assert_eq!(outcome.source.as_deref(), Some("MetalPriceAPI"));
        assert_eq!(outcome.base_rate_24k, Decimal::new(9400, 0));
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].source, "Gold-API");
        assert!(outcome.warnings[0].message.contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_warnings_never_carry_api_key() {
        let dropping = MockPriceServer::start(MockConfig {
            drop_connection: true,
            ..Default::default()
        })
        .unwrap();

        let mut config = Config::default();
        config.sources = vec![SourceConfig::MetalPriceApi(MetalPriceApiSettings {
            url: dropping.base_url(),
            api_key: "SECRET-KEY-123".to_string(),
            ..Default::default()
        })];
        config.simulated.delay_ms = 0;

        let mut service = GoldRateService::from_config(&config).unwrap();
        let outcome = service.fetch_gold_rate().await;

        assert_eq!(outcome.status, RateStatus::Estimated);
        assert_eq!(outcome.warnings.len(), 1);
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("SECRET-KEY-123"), "key leaked: {}", json);
    }

    #[test]
    fn test_from_config_rejects_non_positive_estimates() {
        let mut config = Config::default();
        config.offline = true;
        config.simulated.base_price = Decimal::ZERO;
        config.simulated.variance = 100;

        assert!(GoldRateService::from_config(&config).is_err());
    }
}
