//! Shared error types for the air quality dashboard

use thiserror::Error;

/// Request parameters that could not be turned into typed values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Threshold must be a number, got '{input}'")]
    NonNumericThreshold { input: String },

    #[error("Threshold must be finite, got {value}")]
    NonFiniteThreshold { value: f64 },

    #[error("Malformed place '{input}', expected country/city")]
    MalformedPlace { input: String },

    #[error("Malformed place path '{input}', expected country-city")]
    MalformedPlacePath { input: String },
}

impl ValidationError {
    /// Message shown to the user on the error page
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::NonNumericThreshold { .. } | ValidationError::NonFiniteThreshold { .. } => {
                "Threshold must be a number.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;
