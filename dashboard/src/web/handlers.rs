//! HTTP handlers
//!
//! Each handler maps one request onto the server's store queries and
//! renders the result.

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    response::{Html, Json},
};
use serde_json::{json, Value};

use crate::core::collect_root_params;
use crate::error::DashboardResult;
use crate::traits::{AirQualityApi, MeasurementStore};
use crate::types::{DashboardOutcome, RootParams};
use crate::web::views;
use crate::DashboardServer;

async fn render_dashboard<A, S>(server: &DashboardServer<A, S>, params: RootParams) -> DashboardResult<Html<String>>
where
    A: AirQualityApi + 'static,
    S: MeasurementStore + 'static,
{
    match server.dashboard(&params).await? {
        DashboardOutcome::Loaded(view) => Ok(views::dashboard_page(&view)),
        DashboardOutcome::NotLoaded { requested } => Ok(views::not_loaded_page(&requested)),
    }
}

/// Dashboard with parameters from the query string - GET /
pub async fn root_query<A, S>(
    State(server): State<DashboardServer<A, S>>,
    RawQuery(query): RawQuery,
) -> DashboardResult<Html<String>>
where
    A: AirQualityApi + 'static,
    S: MeasurementStore + 'static,
{
    let params = collect_root_params([query.as_deref().unwrap_or_default().as_bytes()]);
    render_dashboard(&server, params).await
}

/// Dashboard with parameters from the query string and a form body - POST /
///
/// Query parameters win over body parameters. The body is read as
/// urlencoded whatever its content type, and may be empty.
pub async fn root_form<A, S>(
    State(server): State<DashboardServer<A, S>>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> DashboardResult<Html<String>>
where
    A: AirQualityApi + 'static,
    S: MeasurementStore + 'static,
{
    let query = query.unwrap_or_default();
    let params = collect_root_params([query.as_bytes(), body.as_ref()]);
    render_dashboard(&server, params).await
}

/// Repopulate the store from the remote API - GET /refresh
pub async fn refresh<A, S>(State(server): State<DashboardServer<A, S>>) -> DashboardResult<Html<String>>
where
    A: AirQualityApi + 'static,
    S: MeasurementStore + 'static,
{
    let report = server.refresh().await?;
    Ok(views::refresh_page(&report))
}

/// Countries and their cities - GET /cities
pub async fn cities<A, S>(State(server): State<DashboardServer<A, S>>) -> DashboardResult<Html<String>>
where
    A: AirQualityApi + 'static,
    S: MeasurementStore + 'static,
{
    let listings = server.country_listing().await?;
    Ok(views::cities_page(&listings))
}

/// All measurements of one place - GET /{country}-{city}
pub async fn records<A, S>(
    State(server): State<DashboardServer<A, S>>,
    Path(segment): Path<String>,
) -> DashboardResult<Html<String>>
where
    A: AirQualityApi + 'static,
    S: MeasurementStore + 'static,
{
    let (place, measurements) = server.records(&segment).await?;
    Ok(views::records_page(&place, &measurements))
}

/// Health check endpoint - GET /health
pub async fn health<A, S>(State(server): State<DashboardServer<A, S>>) -> Json<Value>
where
    A: AirQualityApi + 'static,
    S: MeasurementStore + 'static,
{
    let state = server.state();
    Json(json!({
        "status": "healthy",
        "uptime_seconds": state.get_uptime_seconds(),
        "refreshing": state.is_refreshing(),
        "last_refresh": state.last_refresh().await,
        "version": env!("CARGO_PKG_VERSION")
    }))
}
