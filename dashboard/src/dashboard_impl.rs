//! Main dashboard implementation
//!
//! This module contains the DashboardServer struct that owns the injected
//! services, resolves each page's data and serves the axum router.

use std::net::SocketAddr;
use std::sync::Arc;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use shared::{logging, Component, Measurement, Place};
use crate::config::{RefreshConfig, ViewDefaults};
use crate::core::{country_averages, filter_at_or_above, parse_record_path, resolve_place, resolve_threshold, summary_statistics};
use crate::error::{DashboardError, DashboardResult};
use crate::services::Refresher;
use crate::state::DashboardState;
use crate::traits::{AirQualityApi, MeasurementStore};
use crate::types::{CountryListing, DashboardOutcome, DashboardView, RefreshReport, RootParams};
use crate::web::handlers;

/// Main dashboard server with dependency injection
pub struct DashboardServer<A, S> {
    state: Arc<DashboardState>,
    store: Arc<S>,
    refresher: Arc<Refresher<A, S>>,
    defaults: ViewDefaults,
}

impl<A, S> Clone for DashboardServer<A, S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            store: self.store.clone(),
            refresher: self.refresher.clone(),
            defaults: self.defaults.clone(),
        }
    }
}

impl<A, S> DashboardServer<A, S>
where
    A: AirQualityApi + 'static,
    S: MeasurementStore + 'static,
{
    /// Create a new dashboard server with dependency injection
    pub fn new(
        bind_address: SocketAddr,
        api: A,
        store: S,
        refresh_config: RefreshConfig,
        defaults: ViewDefaults,
    ) -> Self {
        let store = Arc::new(store);
        let refresher = Refresher::new(Arc::new(api), store.clone(), refresh_config);

        Self {
            state: Arc::new(DashboardState::new(bind_address)),
            store,
            refresher: Arc::new(refresher),
            defaults,
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::root_query::<A, S>).post(handlers::root_form::<A, S>))
            .route("/refresh", get(handlers::refresh::<A, S>))
            .route("/cities", get(handlers::cities::<A, S>))
            .route("/health", get(handlers::health::<A, S>))
            // Records pages: /{country}-{city}
            .route("/:place", get(handlers::records::<A, S>))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.clone())
    }

    /// Create the schema if needed and serve until Ctrl+C
    pub async fn run(&self) -> DashboardResult<()> {
        self.store.initialize().await?;

        let router = self.build_router();
        let bind_address = self.state.bind_address;

        let listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .map_err(|e| DashboardError::ServerStartup(format!("Failed to bind to {}: {}", bind_address, e)))?;

        logging::log_startup(Component::Dashboard, &format!("dashboard on http://{}", bind_address));

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Get server state for external access
    pub fn state(&self) -> &Arc<DashboardState> {
        &self.state
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Resolve the dashboard data for a request
    pub async fn dashboard(&self, params: &RootParams) -> DashboardResult<DashboardOutcome> {
        let key = resolve_place(params.place.as_deref(), &self.defaults.place);
        let threshold = resolve_threshold(params.value.as_deref(), self.defaults.threshold)?;

        let Some(place) = self.store.find_place(&key).await? else {
            return Ok(DashboardOutcome::NotLoaded { requested: key });
        };

        let records = self.store.measurements_for(place.id).await?;
        let filtered = filter_at_or_above(&records, threshold);
        let values: Vec<f64> = records.iter().map(|m| m.value).collect();
        let place_summary = summary_statistics(&values);

        let country = self.store.country_values(&place.country).await?;
        let averages = country_averages(&country);

        let places = self.store.places().await?.iter().map(Place::key).collect();

        Ok(DashboardOutcome::Loaded(DashboardView {
            place,
            threshold,
            filtered,
            place_summary,
            country_summary: averages.summary,
            country_places: averages.place_means.len(),
            places,
        }))
    }

    /// Place named by a `country-city` path segment and all its measurements
    pub async fn records(&self, segment: &str) -> DashboardResult<(Place, Vec<Measurement>)> {
        let key = parse_record_path(segment)?;
        let place = self
            .store
            .find_place(&key)
            .await?
            .ok_or(DashboardError::PlaceNotFound {
                country: key.country,
                city: key.city,
            })?;
        let measurements = self.store.measurements_for(place.id).await?;
        Ok((place, measurements))
    }

    /// Distinct countries, each with its cities
    pub async fn country_listing(&self) -> DashboardResult<Vec<CountryListing>> {
        let countries = self.store.countries().await?;
        let places = self.store.places().await?;

        let listings = countries
            .into_iter()
            .map(|country| {
                let mut cities: Vec<String> = places
                    .iter()
                    .filter(|place| place.country == country)
                    .map(|place| place.city.clone())
                    .collect();
                cities.dedup();
                CountryListing { country, cities }
            })
            .collect();
        Ok(listings)
    }

    /// Run the refresh workflow unless one is already running
    pub async fn refresh(&self) -> DashboardResult<RefreshReport> {
        let _guard = self
            .state
            .begin_refresh()
            .ok_or(DashboardError::RefreshInProgress)?;

        let report = self.refresher.refresh().await.map_err(|e| {
            logging::log_error(Component::Refresh, "Store refresh", &e);
            e
        })?;
        self.state.record_refresh(report.clone()).await;
        Ok(report)
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(Component::Dashboard, "Received Ctrl+C signal"),
        Err(err) => logging::log_error(Component::Dashboard, "Signal handling", &err),
    }
}
