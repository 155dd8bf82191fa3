//! GoldCalc Core - state layer for the gold pricing calculator
//!
//! This crate follows a hexagonal architecture:
//!
//! - **domain**: Core entities and pure logic (User, GoldRate, purity table, pricing)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore, PriceSource)
//! - **services**: Business logic orchestration (user directory, gold rate, event log)
//! - **adapters**: Concrete implementations (JSON file store, HTTP price sources, simulator)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::FileStore;
use config::Config;
use ports::KeyValueStore;
use services::{GoldRateService, UserDirectoryService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{GoldRate, PricingResult, PurityGrade, RateStatus, SessionUser, User};
pub use services::{
    LogEntry, LogEvent, LogQuery, LoggingService, RateFetchOutcome, SourceWarning,
    SOURCE_FAILED_EVENT,
};

/// Main context for calculator operations
///
/// Owns the configuration and the two stateful services. Front ends build
/// one context and pass it to whatever needs user or rate state.
pub struct GoldCalcContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub users: UserDirectoryService,
    pub gold_rate: GoldRateService,
}

impl GoldCalcContext {
    /// Create a context backed by JSON files in `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(data_dir)?);
        Self::with_store(config, store)
    }

    /// Create a context over an already constructed store
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let users = UserDirectoryService::new(Arc::clone(&store), config.password_hashing.clone());
        let gold_rate = GoldRateService::from_config(&config)?;

        Ok(Self {
            config,
            store,
            users,
            gold_rate,
        })
    }
}
