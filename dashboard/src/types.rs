//! Type definitions for the dashboard
//!
//! Data types exchanged between the store, the refresh workflow and the
//! view handlers that are not service traits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared::{Measurement, Place, PlaceKey, Threshold};
use crate::core::aggregator::Summary;

/// A place together with the values of its measurements
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceValues {
    pub place: Place,
    pub values: Vec<f64>,
}

/// Rows written by a store replacement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    pub places: usize,
    pub measurements: usize,
}

/// Outcome of a completed refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshReport {
    /// Cities picked from the remote listing
    pub sampled: usize,
    /// Entries returned for the excluded city lookup
    pub excluded_entries: usize,
    pub places: usize,
    pub measurements: usize,
    pub completed_at: DateTime<Utc>,
}

/// Raw dashboard request parameters, from the query string or a form body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootParams {
    pub place: Option<String>,
    pub value: Option<String>,
}

/// Everything the dashboard page shows for one place
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub place: Place,
    pub threshold: Threshold,
    /// Measurements at or above the threshold
    pub filtered: Vec<Measurement>,
    pub place_summary: Option<Summary>,
    pub country_summary: Option<Summary>,
    /// Places in the country that contributed a mean
    pub country_places: usize,
    /// Options for the place selector
    pub places: Vec<PlaceKey>,
}

/// Result of resolving the dashboard for a request
#[derive(Debug, Clone)]
pub enum DashboardOutcome {
    Loaded(DashboardView),
    /// The requested place is not in the store (e.g. before the first refresh)
    NotLoaded { requested: PlaceKey },
}

/// Countries with their cities, for the cities page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryListing {
    pub country: String,
    pub cities: Vec<String>,
}
