//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod gold_rate;
pub mod logging;
mod user_directory;

pub use gold_rate::{build_price_sources, GoldRateService, RateFetchOutcome, SourceWarning};
pub use logging::{
    EventCount, LogEntry, LogEvent, LogQuery, LoggingService, SourceFailures, RATE_EVENT_PREFIX,
    SOURCE_FAILED_EVENT,
};
pub use user_directory::{UserDirectoryService, SESSION_KEY, USERS_KEY};
