//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Local JSON files (and an in-memory map) for the KeyValueStore port
//! - Gold-API and MetalPriceAPI HTTP clients for the PriceSource port
//! - A simulated rate generator used when every source fails

pub mod file_store;
pub mod gold_api;
pub mod http;
pub mod memory_store;
pub mod metal_price_api;
pub mod simulated;

#[cfg(test)]
pub mod price_mock;

pub use file_store::FileStore;
pub use gold_api::GoldApiSource;
pub use memory_store::MemoryStore;
pub use metal_price_api::MetalPriceApiSource;
pub use simulated::SimulatedRate;
