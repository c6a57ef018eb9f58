//! Runtime configuration for the dashboard and the refresh workflow

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use shared::{PlaceKey, Threshold};
use crate::error::{DashboardError, DashboardResult};

pub const DEFAULT_API_URL: &str = "https://api.openaq.org/v1";
pub const DEFAULT_EXCLUDED_CITY: &str = "Los Angeles";
pub const DEFAULT_PLACE: &str = "CL/Los Angeles";
pub const DEFAULT_THRESHOLD: f64 = 18.0;
pub const DEFAULT_CITY_LIMIT: usize = 3000;
pub const DEFAULT_SAMPLE_SIZE: usize = 98;
pub const MEASURED_PARAMETER: &str = "pm25";

/// Settings for the refresh workflow
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshConfig {
    /// Cities requested from the remote listing
    pub city_limit: usize,
    /// Cities sampled from the listing
    pub sample_size: usize,
    /// City skipped while sampling and loaded by name afterwards
    pub excluded_city: String,
    /// Pollutant parameter requested for every place
    pub parameter: String,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            city_limit: DEFAULT_CITY_LIMIT,
            sample_size: DEFAULT_SAMPLE_SIZE,
            excluded_city: DEFAULT_EXCLUDED_CITY.to_string(),
            parameter: MEASURED_PARAMETER.to_string(),
        }
    }
}

/// Full dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub bind_address: SocketAddr,
    pub database: PathBuf,
    pub api_url: String,
    pub request_timeout: Duration,
    pub default_place: String,
    pub default_threshold: f64,
    pub refresh: RefreshConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 5000)),
            database: PathBuf::from("db.sqlite3"),
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            default_place: DEFAULT_PLACE.to_string(),
            default_threshold: DEFAULT_THRESHOLD,
            refresh: RefreshConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Check the settings and resolve the typed defaults used by the views
    pub fn validate(&self) -> DashboardResult<ViewDefaults> {
        if self.refresh.sample_size == 0 {
            return Err(DashboardError::config("sample_size", "must be greater than zero"));
        }
        if self.refresh.city_limit == 0 {
            return Err(DashboardError::config("city_limit", "must be greater than zero"));
        }
        if self.refresh.excluded_city.trim().is_empty() {
            return Err(DashboardError::config("excluded_city", "must not be empty"));
        }
        if url::Url::parse(&self.api_url).is_err() {
            return Err(DashboardError::config("api_url", format!("not a valid URL: {}", self.api_url)));
        }

        let place = PlaceKey::from_composite(&self.default_place)
            .map_err(|e| DashboardError::config("default_place", e.to_string()))?;
        let threshold = Threshold::new(self.default_threshold)
            .map_err(|e| DashboardError::config("default_threshold", e.to_string()))?;

        Ok(ViewDefaults { place, threshold })
    }
}

/// Fallbacks for dashboard requests that omit parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDefaults {
    pub place: PlaceKey,
    pub threshold: Threshold,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            place: PlaceKey::new("CL", "Los Angeles"),
            threshold: Threshold::new(DEFAULT_THRESHOLD).unwrap_or(Threshold::ZERO),
        }
    }
}
