//! Service trait definitions for dependency injection
//!
//! All I/O operations are abstracted through these traits for testability

use async_trait::async_trait;

use shared::{CityEntry, Measurement, Place, PlaceBatch, PlaceKey, RawMeasurement};
use crate::error::DashboardResult;
use crate::types::{PlaceValues, StoreCounts};

/// Remote air quality measurement API
#[mockall::automock]
#[async_trait]
pub trait AirQualityApi: Send + Sync {
    /// List up to `limit` known cities
    async fn cities(&self, limit: usize) -> DashboardResult<Vec<CityEntry>>;

    /// List the entries for a single city name, one per matching country
    async fn cities_named(&self, city: &str) -> DashboardResult<Vec<CityEntry>>;

    /// Fetch readings of `parameter` for a city/country pair
    async fn measurements(
        &self,
        city: &str,
        country: &str,
        parameter: &str,
    ) -> DashboardResult<Vec<RawMeasurement>>;
}

/// Relational store holding places and their measurements
#[mockall::automock]
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Create the schema if it does not exist yet
    async fn initialize(&self) -> DashboardResult<()>;

    /// Drop and recreate the schema, then insert every batch, in one transaction
    async fn replace_all(&self, batches: Vec<PlaceBatch>) -> DashboardResult<StoreCounts>;

    /// First place matching the key, if any
    async fn find_place(&self, key: &PlaceKey) -> DashboardResult<Option<Place>>;

    /// All measurements owned by a place, in insertion order
    async fn measurements_for(&self, place_id: i64) -> DashboardResult<Vec<Measurement>>;

    /// Every place in a country with its measured values
    async fn country_values(&self, country: &str) -> DashboardResult<Vec<PlaceValues>>;

    /// Every stored place, ordered by country then city
    async fn places(&self) -> DashboardResult<Vec<Place>>;

    /// Distinct countries present in the store, sorted
    async fn countries(&self) -> DashboardResult<Vec<String>>;
}
