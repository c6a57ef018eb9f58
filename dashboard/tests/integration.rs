//! Integration tests for the dashboard
//!
//! These tests drive the axum router end to end over an in-memory SQLite
//! store, with the remote API mocked.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use dashboard::traits::{MeasurementStore, MockAirQualityApi};
use dashboard::{DashboardError, DashboardOutcome, RootParams};
use fixtures::*;
use helpers::*;
use shared::{CityEntry, PlaceKey};

fn create_refresh_api() -> MockAirQualityApi {
    let mut api = MockAirQualityApi::new();
    api.expect_cities().returning(|_| Ok(create_test_cities(100)));
    api.expect_cities_named()
        .returning(|city| Ok(vec![CityEntry::new(city, "US")]));
    api.expect_measurements()
        .returning(|_, _, _| Ok(create_test_readings(&[8.0, 9.0])));
    api
}

mod dashboard_page_tests {
    use super::*;

    #[tokio::test]
    async fn test_dashboard_filters_and_summarizes() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let (status, html) = get(server.build_router(), "/?value=15").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Value: 20)"));
        assert!(html.contains("Value: 30)"));
        assert!(!html.contains("Value: 10)"));
        // City statistics
        assert!(html.contains("20.00"));
        assert!(html.contains("10.00"));
        // Country statistics over place means
        assert!(html.contains("27.50"));
        assert!(html.contains("10.61"));
    }

    #[tokio::test]
    async fn test_dashboard_view_values() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let params = RootParams {
            place: Some("CL/Los Angeles".to_string()),
            value: Some("15".to_string()),
        };
        let DashboardOutcome::Loaded(view) = server.dashboard(&params).await.unwrap() else {
            panic!("expected loaded dashboard");
        };

        let filtered: Vec<f64> = view.filtered.iter().map(|m| m.value).collect();
        assert_eq!(filtered, vec![20.0, 30.0]);

        let place = view.place_summary.unwrap();
        assert!((place.mean - 20.0).abs() < 1e-9);
        assert!((place.std_dev - 10.0).abs() < 1e-9);

        let country = view.country_summary.unwrap();
        assert!((country.mean - 27.5).abs() < 1e-9);
        assert_eq!(view.country_places, 2);
        assert_eq!(view.places.len(), 3);
    }

    #[tokio::test]
    async fn test_defaults_apply_without_parameters() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let (status, html) = get(server.build_router(), "/").await;

        // Default threshold 18 keeps 20 and 30
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Los Angeles, CL"));
        assert!(html.contains("Value: 20)"));
        assert!(!html.contains("Value: 10)"));
    }

    #[tokio::test]
    async fn test_blank_threshold_shows_everything() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let (status, html) = get(server.build_router(), "/?value=").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Value: 10)"));
    }

    #[tokio::test]
    async fn test_form_submission_selects_place() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let (status, html) = post_form(server.build_router(), "/", "place=CL%2FSantiago&value=35").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Santiago, CL"));
        assert!(html.contains("Value: 40)"));
        assert!(!html.contains("Value: 30)"));
        assert!(html.contains(r#"<option value="CL/Santiago" selected>"#));
    }

    #[tokio::test]
    async fn test_repeated_parameter_uses_first_value() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let (status, html) = get(server.build_router(), "/?value=25&value=15").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Value: 30)"));
        assert!(!html.contains("Value: 20)"));
    }

    #[tokio::test]
    async fn test_post_without_body_reads_query() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;
        let request = Request::builder()
            .method("POST")
            .uri("/?value=5")
            .body(Body::empty())
            .unwrap();

        let (status, html) = send(server.build_router(), request).await;

        // Below the default threshold of 18, so the query value was applied
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Value: 10)"));
    }

    #[tokio::test]
    async fn test_post_merges_query_and_form() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let (status, html) = post_form(server.build_router(), "/?value=5", "place=CL%2FSantiago&value=35").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Santiago, CL"));
        assert!(html.contains("Value: 30)"));
    }

    #[tokio::test]
    async fn test_single_reading_has_no_statistics() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let (status, html) = get(server.build_router(), "/?place=US/Boston&value=0").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("*No data*"));
        assert!(html.contains("Value: 5)"));
    }

    #[tokio::test]
    async fn test_non_numeric_threshold_is_rejected() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let (status, html) = get(server.build_router(), "/?value=abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.contains("Threshold must be a number."));
    }

    #[tokio::test]
    async fn test_empty_store_shows_not_loaded_page() {
        let server = create_test_server(MockAirQualityApi::new(), vec![]).await;

        let (status, html) = get(server.build_router(), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("No data loaded yet for CL/Los Angeles"));
        assert!(html.contains(r#"href="/refresh""#));

        let outcome = server.dashboard(&RootParams::default()).await.unwrap();
        assert!(matches!(
            outcome,
            DashboardOutcome::NotLoaded { requested } if requested == PlaceKey::new("CL", "Los Angeles")
        ));
    }
}

mod records_page_tests {
    use super::*;

    #[tokio::test]
    async fn test_records_lists_every_measurement() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let (status, html) = get(server.build_router(), "/CL-Los%20Angeles").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Records for Los Angeles, CL"));
        assert!(html.contains("3 measurements"));
        assert!(html.contains("Value: 10)"));
    }

    #[tokio::test]
    async fn test_unknown_place_is_not_found() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let (status, html) = get(server.build_router(), "/CL-Unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("No records found for Unknown (CL)."));

        let (status, _) = get(server.build_router(), "/nodash").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert!(matches!(
            server.records("CL-Unknown").await,
            Err(DashboardError::PlaceNotFound { .. })
        ));
    }
}

mod cities_page_tests {
    use super::*;

    #[tokio::test]
    async fn test_cities_grouped_by_country() {
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;

        let listings = server.country_listing().await.unwrap();
        let countries: Vec<&str> = listings.iter().map(|l| l.country.as_str()).collect();
        assert_eq!(countries, vec!["CL", "US"]);
        assert_eq!(listings[0].cities, vec!["Los Angeles".to_string(), "Santiago".to_string()]);

        let (status, html) = get(server.build_router(), "/cities").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"<a href="/US-Boston">Boston</a>"#));
        assert!(html.contains("/CL-Los%20Angeles"));
    }
}

mod refresh_tests {
    use super::*;

    #[tokio::test]
    async fn test_refresh_replaces_store_contents() {
        let server = create_test_server(create_refresh_api(), create_sample_snapshot()).await;

        let (status, html) = get(server.build_router(), "/refresh").await;

        assert_eq!(status, StatusCode::OK);
        assert!(
            html.contains("Loaded 98 places") || html.contains("Loaded 99 places"),
            "unexpected refresh page: {html}"
        );

        let places = server.store().places().await.unwrap();
        assert!(places.len() == 98 || places.len() == 99);
        assert!(server
            .store()
            .find_place(&PlaceKey::new("CL", "Santiago"))
            .await
            .unwrap()
            .is_none());
        assert!(server.state().last_refresh().await.is_some());
        assert!(!server.state().is_refreshing());
    }

    #[tokio::test]
    async fn test_concurrent_refresh_is_rejected() {
        // No expectations: any remote call would fail the test
        let server = create_test_server(MockAirQualityApi::new(), create_sample_snapshot()).await;
        let _guard = server.state().begin_refresh().unwrap();

        let (status, _) = get(server.build_router(), "/refresh").await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(server
            .store()
            .find_place(&PlaceKey::new("CL", "Santiago"))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_reports_bad_gateway() {
        let mut api = MockAirQualityApi::new();
        api.expect_cities()
            .returning(|_| Err(DashboardError::remote("connection refused")));
        let server = create_test_server(api, create_sample_snapshot()).await;

        let (status, _) = get(server.build_router(), "/refresh").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!server.state().is_refreshing());
        assert_eq!(server.store().places().await.unwrap().len(), 3);
    }
}

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = create_test_server(MockAirQualityApi::new(), vec![]).await;

        let (status, body) = get(server.build_router(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["refreshing"], false);
        assert!(json["last_refresh"].is_null());
    }
}
