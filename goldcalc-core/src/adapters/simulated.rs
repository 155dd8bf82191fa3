//! Simulated market rate
//!
//! Last resort when no external source produced a usable price: waits a
//! moment, then reports a configured base estimate with a bounded random
//! variance.

use std::time::Duration;

use rand::Rng;
use rust_decimal::Decimal;

use crate::config::SimulatedRateConfig;

/// Advisory message attached to an estimated rate
pub const ESTIMATE_ADVISORY: &str = "Using estimated market rate (API unavailable)";

/// Generator for estimated rates
#[derive(Debug, Clone)]
pub struct SimulatedRate {
    base_price: Decimal,
    variance: u32,
    delay: Duration,
}

impl SimulatedRate {
    pub fn new(base_price: Decimal, variance: u32, delay: Duration) -> Self {
        Self {
            base_price,
            variance,
            delay,
        }
    }

    pub fn from_config(config: &SimulatedRateConfig) -> Self {
        Self::new(
            config.base_price,
            config.variance,
            Duration::from_millis(config.delay_ms),
        )
    }

    /// Inclusive bounds of any estimate
    pub fn bounds(&self) -> (Decimal, Decimal) {
        let v = Decimal::from(self.variance);
        (self.base_price - v, self.base_price + v)
    }

    /// Produce an estimate after the configured delay
    pub async fn estimate(&self) -> Decimal {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let v = i64::from(self.variance);
        let offset = rand::thread_rng().gen_range(-v..=v);
        self.base_price + Decimal::from(offset)
    }
}
