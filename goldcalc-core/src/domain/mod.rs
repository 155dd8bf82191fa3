//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

pub mod credential;
pub mod pricing;
pub mod purity;
mod rate;
pub mod result;
mod user;

pub use credential::Argon2Params;
pub use pricing::PricingResult;
pub use purity::{PurityGrade, PURITY_TABLE};
pub use rate::{GoldRate, RateStatus};
pub use user::{generate_user_id, validate_registration, SessionUser, User, DEMO_ACCOUNT_TYPE};
