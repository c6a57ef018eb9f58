//! Refresh workflow
//!
//! Replaces the store contents with a fresh random sample of cities from the
//! remote API. Every remote call finishes before the store is touched, and
//! the store swap is a single transaction.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use shared::{component_info, component_warn, logging, CityEntry, Component, PlaceBatch};
use crate::config::RefreshConfig;
use crate::error::DashboardResult;
use crate::traits::{AirQualityApi, MeasurementStore};
use crate::types::RefreshReport;

/// Pick up to `sample_size` distinct entries at random
pub fn sample_cities<R: Rng + ?Sized>(entries: &[CityEntry], sample_size: usize, rng: &mut R) -> Vec<CityEntry> {
    entries.choose_multiple(rng, sample_size).cloned().collect()
}

/// Orchestrates a full store repopulation
pub struct Refresher<A, S> {
    api: Arc<A>,
    store: Arc<S>,
    config: RefreshConfig,
}

impl<A, S> Refresher<A, S>
where
    A: AirQualityApi,
    S: MeasurementStore,
{
    pub fn new(api: Arc<A>, store: Arc<S>, config: RefreshConfig) -> Self {
        Self { api, store, config }
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Run a refresh with an entropy-seeded sample
    pub async fn refresh(&self) -> DashboardResult<RefreshReport> {
        let mut rng = StdRng::from_entropy();
        self.refresh_with_rng(&mut rng).await
    }

    /// Run a refresh drawing the city sample from `rng`
    pub async fn refresh_with_rng<R: Rng + Send>(&self, rng: &mut R) -> DashboardResult<RefreshReport> {
        logging::log_startup(Component::Refresh, "store refresh");

        let cities = self.api.cities(self.config.city_limit).await?;
        if cities.is_empty() {
            component_warn!(
                Component::Refresh,
                "City listing is empty, only {} will be loaded",
                self.config.excluded_city
            );
        }
        let sampled = sample_cities(&cities, self.config.sample_size, rng);
        logging::log_progress(
            Component::Refresh,
            "Sampled cities",
            &format!("{} of {}", sampled.len(), cities.len()),
        );

        let mut batches = Vec::with_capacity(sampled.len() + 1);
        for entry in sampled.iter().filter(|entry| !self.is_excluded(entry)) {
            batches.push(self.fetch_batch(entry).await?);
        }

        // The excluded city is loaded by name, once per country that has it
        let excluded = self.api.cities_named(&self.config.excluded_city).await?;
        for entry in &excluded {
            batches.push(self.fetch_batch(entry).await?);
        }

        let counts = self.store.replace_all(batches).await?;

        let report = RefreshReport {
            sampled: sampled.len(),
            excluded_entries: excluded.len(),
            places: counts.places,
            measurements: counts.measurements,
            completed_at: Utc::now(),
        };
        logging::log_success(
            Component::Refresh,
            &format!(
                "Refresh complete: {} places, {} measurements",
                report.places, report.measurements
            ),
        );
        Ok(report)
    }

    fn is_excluded(&self, entry: &CityEntry) -> bool {
        entry.city == self.config.excluded_city
    }

    async fn fetch_batch(&self, entry: &CityEntry) -> DashboardResult<PlaceBatch> {
        let measurements = self
            .api
            .measurements(&entry.city, &entry.country, &self.config.parameter)
            .await?;
        component_info!(
            Component::Refresh,
            "Fetched {} readings for {}/{}",
            measurements.len(),
            entry.country,
            entry.city
        );
        Ok(PlaceBatch::new(entry.key(), measurements))
    }
}
