//! Dashboard-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use shared::{Component, ValidationError, component_error};

use crate::web::views;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("No place found for {country}/{city}")]
    PlaceNotFound { country: String, city: String },

    #[error("Remote API request failed: {message}")]
    RemoteApi { message: String },

    #[error("Remote API returned HTTP {status} for {endpoint}")]
    RemoteStatus { endpoint: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Store task failed: {0}")]
    StoreTask(String),

    #[error("A refresh is already in progress")]
    RefreshInProgress,

    #[error("Configuration error: {field}: {message}")]
    Config { field: String, message: String },

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteApi {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Validation(ValidationError::MalformedPlacePath { .. }) => StatusCode::NOT_FOUND,
            DashboardError::Validation(_) => StatusCode::BAD_REQUEST,
            DashboardError::PlaceNotFound { .. } => StatusCode::NOT_FOUND,
            DashboardError::RemoteApi { .. }
            | DashboardError::RemoteStatus { .. }
            | DashboardError::Http(_) => StatusCode::BAD_GATEWAY,
            DashboardError::RefreshInProgress => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text rendered on the error page
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Validation(e) => e.user_message(),
            DashboardError::PlaceNotFound { country, city } => {
                format!("No records found for {city} ({country}).")
            }
            DashboardError::RefreshInProgress => {
                "A refresh is already in progress, try again shortly.".to_string()
            }
            DashboardError::RemoteApi { .. }
            | DashboardError::RemoteStatus { .. }
            | DashboardError::Http(_) => {
                "Could not fetch data from the air quality service.".to_string()
            }
            _ => "Something went wrong while handling the request.".to_string(),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            component_error!(Component::Dashboard, status = status.as_u16(), "Request failed: {}", self);
        }
        (status, views::error_page(&self.user_message())).into_response()
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let validation = DashboardError::from(ValidationError::NonNumericThreshold { input: "x".into() });
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let bad_path = DashboardError::from(ValidationError::MalformedPlacePath { input: "x".into() });
        assert_eq!(bad_path.status_code(), StatusCode::NOT_FOUND);

        let missing = DashboardError::PlaceNotFound {
            country: "CL".into(),
            city: "Unknown".into(),
        };
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        assert_eq!(DashboardError::remote("down").status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(DashboardError::RefreshInProgress.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            DashboardError::config("port", "bad").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_user_messages_hide_internals() {
        let err = DashboardError::RemoteStatus {
            endpoint: "/cities".into(),
            status: 503,
        };
        assert!(!err.user_message().contains("503"));

        let err = DashboardError::from(ValidationError::NonNumericThreshold { input: "abc".into() });
        assert_eq!(err.user_message(), "Threshold must be a number.");
    }
}
