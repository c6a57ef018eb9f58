//! Air quality dashboard library
//!
//! Fetches pm2.5 measurements from OpenAQ, keeps them in SQLite and serves
//! per-city and per-country statistics as HTML pages.

pub mod config;
pub mod core;
pub mod dashboard_impl;
pub mod error;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use config::{DashboardConfig, RefreshConfig, ViewDefaults};
pub use dashboard_impl::DashboardServer;
pub use error::{DashboardError, DashboardResult};
pub use state::DashboardState;
pub use types::*;

// Re-export trait definitions
pub use traits::{AirQualityApi, MeasurementStore};

// Re-export service implementations
pub use services::{RealAirQualityApi, Refresher, SqliteMeasurementStore};
