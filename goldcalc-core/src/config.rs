//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "currency": "PHP",
//!   "requestTimeoutSecs": 10,
//!   "sources": [
//!     { "kind": "goldApi", "name": "Gold-API", "url": "https://www.goldapi.io/api", "accessToken": "goldapi-demo" },
//!     { "kind": "metalPriceApi", "name": "MetalPriceAPI", "url": "https://api.metalpriceapi.com/v1", "apiKey": "demo" }
//!   ],
//!   "simulated": { "basePrice": 9400, "variance": 100, "delayMs": 500 },
//!   "passwordHashing": { "timeCost": 2, "memoryCost": 19456, "parallelism": 1 }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapters::gold_api::GOLD_API_URL;
use crate::adapters::metal_price_api::METAL_PRICE_API_URL;
use crate::domain::result::Error;
use crate::domain::Argon2Params;

/// Environment variable that disables every network source (for CI/testing)
pub const OFFLINE_ENV: &str = "GOLDCALC_OFFLINE";

const SETTINGS_FILE: &str = "settings.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default = "default_timeout_secs")]
    request_timeout_secs: u64,
    #[serde(default = "default_sources")]
    sources: Vec<SourceConfig>,
    #[serde(default)]
    simulated: SimulatedRateConfig,
    #[serde(default)]
    password_hashing: Argon2Params,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            request_timeout_secs: default_timeout_secs(),
            sources: default_sources(),
            simulated: SimulatedRateConfig::default(),
            password_hashing: Argon2Params::default(),
            other: HashMap::new(),
        }
    }
}

fn default_currency() -> String {
    "PHP".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::GoldApi(GoldApiSettings::default()),
        SourceConfig::MetalPriceApi(MetalPriceApiSettings::default()),
    ]
}

/// A ranked external price source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceConfig {
    GoldApi(GoldApiSettings),
    MetalPriceApi(MetalPriceApiSettings),
}

impl SourceConfig {
    pub fn name(&self) -> &str {
        match self {
            SourceConfig::GoldApi(s) => &s.name,
            SourceConfig::MetalPriceApi(s) => &s.name,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            SourceConfig::GoldApi(s) => &s.url,
            SourceConfig::MetalPriceApi(s) => &s.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoldApiSettings {
    pub name: String,
    pub url: String,
    pub access_token: String,
}

impl Default for GoldApiSettings {
    fn default() -> Self {
        Self {
            name: "Gold-API".to_string(),
            url: GOLD_API_URL.to_string(),
            access_token: "goldapi-demo".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetalPriceApiSettings {
    pub name: String,
    pub url: String,
    pub api_key: String,
}

impl Default for MetalPriceApiSettings {
    fn default() -> Self {
        Self {
            name: "MetalPriceAPI".to_string(),
            url: METAL_PRICE_API_URL.to_string(),
            api_key: "demo".to_string(),
        }
    }
}

/// Estimate used when every source fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulatedRateConfig {
    /// Base 24K price per gram in the configured currency
    pub base_price: Decimal,
    /// Maximum absolute deviation from the base price
    pub variance: u32,
    pub delay_ms: u64,
}

impl SimulatedRateConfig {
    /// Every estimate in `basePrice ± variance` must be a positive price
    pub fn validate(&self) -> crate::domain::result::Result<()> {
        let lowest = self.base_price - Decimal::from(self.variance);
        if lowest <= Decimal::ZERO {
            return Err(Error::config(format!(
                "simulated basePrice ({}) must be greater than variance ({})",
                self.base_price, self.variance
            )));
        }
        Ok(())
    }
}

impl Default for SimulatedRateConfig {
    fn default() -> Self {
        Self {
            base_price: Decimal::new(9400, 0),
            variance: 100,
            delay_ms: 500,
        }
    }
}

/// Gold calculator configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub currency: String,
    pub request_timeout_secs: u64,
    pub sources: Vec<SourceConfig>,
    pub simulated: SimulatedRateConfig,
    pub password_hashing: Argon2Params,
    /// Skip all network sources; set from GOLDCALC_OFFLINE
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(SettingsFile::default(), false)
    }
}

impl Config {
    fn from_settings(raw: SettingsFile, offline: bool) -> Self {
        Self {
            currency: raw.currency,
            request_timeout_secs: raw.request_timeout_secs,
            sources: raw.sources,
            simulated: raw.simulated,
            password_hashing: raw.password_hashing,
            offline,
        }
    }

    /// Load config from the data directory
    ///
    /// A missing or unparseable settings file yields the defaults. Simulated
    /// settings that could produce a non-positive estimate are rejected.
    /// Offline mode comes only from the GOLDCALC_OFFLINE environment variable.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            match serde_json::from_str(&content) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(path = %settings_path.display(), error = %e, "ignoring unreadable settings");
                    SettingsFile::default()
                }
            }
        } else {
            SettingsFile::default()
        };
        raw.simulated.validate()?;

        let offline = match std::env::var(OFFLINE_ENV).ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            _ => false,
        };

        Ok(Self::from_settings(raw, offline))
    }

    /// Save config to the data directory
    /// Preserves other settings this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join(SETTINGS_FILE);

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.currency = self.currency.clone();
        settings.request_timeout_secs = self.request_timeout_secs;
        settings.sources = self.sources.clone();
        settings.simulated = self.simulated.clone();
        settings.password_hashing = self.password_hashing.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Sources that will actually be queried, in rank order
    pub fn active_sources(&self) -> &[SourceConfig] {
        if self.offline {
            &[]
        } else {
            &self.sources
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.currency, "PHP");
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].name(), "Gold-API");
        assert_eq!(config.sources[1].name(), "MetalPriceAPI");
        assert_eq!(config.simulated.base_price, Decimal::new(9400, 0));
        assert_eq!(config.simulated.variance, 100);
        assert_eq!(config.simulated.delay_ms, 500);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.currency, "PHP");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_load_partial_settings() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{
                "currency": "USD",
                "sources": [{ "kind": "metalPriceApi", "apiKey": "live-key" }],
                "simulated": { "basePrice": 120 }
            }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.sources.len(), 1);
        match &config.sources[0] {
            SourceConfig::MetalPriceApi(s) => {
                assert_eq!(s.api_key, "live-key");
                assert_eq!(s.name, "MetalPriceAPI");
                assert_eq!(s.url, METAL_PRICE_API_URL);
            }
            other => panic!("unexpected source {:?}", other),
        }
        assert_eq!(config.simulated.base_price, Decimal::new(120, 0));
        assert_eq!(config.simulated.variance, 100);
    }

    #[test]
    fn test_load_garbage_gives_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.sources.len(), 2);
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "theme": "dark", "currency": "PHP" }"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.currency = "AED".to_string();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["currency"], "AED");
        assert_eq!(value["sources"][0]["kind"], "goldApi");

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.currency, "AED");
    }

    #[test]
    fn test_simulated_validation() {
        assert!(SimulatedRateConfig::default().validate().is_ok());

        let at_zero = SimulatedRateConfig {
            base_price: Decimal::new(100, 0),
            variance: 100,
            delay_ms: 0,
        };
        assert!(matches!(at_zero.validate(), Err(Error::Config(_))));

        let tight = SimulatedRateConfig {
            base_price: Decimal::new(101, 0),
            variance: 100,
            delay_ms: 0,
        };
        assert!(tight.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_non_positive_estimates() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{ "sources": [], "simulated": { "basePrice": 0, "variance": 100, "delayMs": 0 } }"#,
        )
        .unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("basePrice"));
    }

    #[test]
    fn test_offline_has_no_active_sources() {
        let mut config = Config::default();
        assert_eq!(config.active_sources().len(), 2);
        config.offline = true;
        assert!(config.active_sources().is_empty());
    }
}
