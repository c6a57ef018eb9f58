//! Service implementations
//!
//! Real implementations of the service traits plus the refresh workflow

pub mod openaq_client;
pub mod refresher;
pub mod sqlite_store;

#[cfg(test)]
mod tests;

// Re-export service implementations
pub use openaq_client::RealAirQualityApi;
pub use refresher::{sample_cities, Refresher};
pub use sqlite_store::SqliteMeasurementStore;
