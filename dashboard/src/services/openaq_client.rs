//! OpenAQ API client
//!
//! Fetches city listings and pollutant readings from the OpenAQ v1 REST API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use shared::{component_debug, CityEntry, Component, RawMeasurement};
use crate::error::{DashboardError, DashboardResult};
use crate::traits::AirQualityApi;

/// Every OpenAQ list endpoint wraps its rows in `results`
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    results: Vec<T>,
}

/// Real OpenAQ client implementation
#[derive(Clone)]
pub struct RealAirQualityApi {
    client: reqwest::Client,
    base_url: Url,
}

impl RealAirQualityApi {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> DashboardResult<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| DashboardError::config("api_url", e.to_string()))?;

        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("aq-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_results<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> DashboardResult<Vec<T>> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| DashboardError::remote(format!("Invalid endpoint {endpoint}: {e}")))?;

        component_debug!(Component::OpenAq, "GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| DashboardError::remote(format!("{endpoint}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::RemoteStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| DashboardError::remote(format!("Failed to parse {endpoint} response: {e}")))?;

        Ok(envelope.results)
    }
}

#[async_trait]
impl AirQualityApi for RealAirQualityApi {
    async fn cities(&self, limit: usize) -> DashboardResult<Vec<CityEntry>> {
        self.get_results("cities", &[("limit", limit.to_string())]).await
    }

    async fn cities_named(&self, city: &str) -> DashboardResult<Vec<CityEntry>> {
        self.get_results("cities", &[("city", city.to_string())]).await
    }

    async fn measurements(
        &self,
        city: &str,
        country: &str,
        parameter: &str,
    ) -> DashboardResult<Vec<RawMeasurement>> {
        self.get_results(
            "measurements",
            &[
                ("city", city.to_string()),
                ("country", country.to_string()),
                ("parameter", parameter.to_string()),
            ],
        )
        .await
    }
}
