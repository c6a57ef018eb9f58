//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{ValidationError, ValidationResult};

/// Store-assigned place identifier
pub type PlaceId = i64;

/// A (country, city) pair tracked in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub country: String,
    pub city: String,
}

impl Place {
    pub fn key(&self) -> PlaceKey {
        PlaceKey::new(self.country.clone(), self.city.clone())
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.country, self.city)
    }
}

/// A single pm2.5 reading owned by a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: i64,
    pub datetime: Option<String>,
    pub value: f64,
    pub place_id: PlaceId,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(Date: {}, Value: {})",
            self.datetime.as_deref().unwrap_or("-"),
            self.value
        )
    }
}

/// Lookup key for a place
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaceKey {
    pub country: String,
    pub city: String,
}

impl PlaceKey {
    pub fn new(country: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            city: city.into(),
        }
    }

    /// Parse the `country/city` form used by the dashboard place selector.
    ///
    /// Only the first two components are used, so `US/Boston/extra` names
    /// Boston. Both components must be non-empty once trimmed.
    pub fn from_composite(input: &str) -> ValidationResult<Self> {
        let mut parts = input.split('/').map(str::trim);
        match (parts.next(), parts.next()) {
            (Some(country), Some(city)) if !country.is_empty() && !city.is_empty() => {
                Ok(Self::new(country, city))
            }
            _ => Err(ValidationError::MalformedPlace {
                input: input.to_string(),
            }),
        }
    }

    /// Parse the `country-city` form used by record page paths.
    ///
    /// Splits on the first `-`: country codes never contain one, city names may.
    pub fn from_path_segment(input: &str) -> ValidationResult<Self> {
        match input.split_once('-') {
            Some((country, city)) if !country.is_empty() && !city.is_empty() => {
                Ok(Self::new(country, city))
            }
            _ => Err(ValidationError::MalformedPlacePath {
                input: input.to_string(),
            }),
        }
    }

    /// The `country/city` form accepted by [`PlaceKey::from_composite`]
    pub fn composite(&self) -> String {
        format!("{}/{}", self.country, self.city)
    }
}

impl fmt::Display for PlaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.country, self.city)
    }
}

/// Validated lower bound for filtering measurements
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Threshold(f64);

impl Threshold {
    pub const ZERO: Threshold = Threshold(0.0);

    pub fn new(value: f64) -> ValidationResult<Self> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(ValidationError::NonFiniteThreshold { value })
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl FromStr for Threshold {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::NonNumericThreshold { input: s.to_string() })?;
        Threshold::new(value)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// City listing entry returned by the remote measurement API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub locations: Option<u64>,
}

impl CityEntry {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            count: None,
            locations: None,
        }
    }

    pub fn key(&self) -> PlaceKey {
        PlaceKey::new(self.country.clone(), self.city.clone())
    }
}

/// Timestamp pair attached to a remote reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementDate {
    pub utc: String,
    #[serde(default)]
    pub local: Option<String>,
}

/// Raw reading returned by the remote measurement API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurement {
    pub date: MeasurementDate,
    pub value: f64,
}

impl RawMeasurement {
    pub fn new(utc: impl Into<String>, value: f64) -> Self {
        Self {
            date: MeasurementDate {
                utc: utc.into(),
                local: None,
            },
            value,
        }
    }
}

/// A place to insert together with its readings
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceBatch {
    pub key: PlaceKey,
    pub measurements: Vec<RawMeasurement>,
}

impl PlaceBatch {
    pub fn new(key: PlaceKey, measurements: Vec<RawMeasurement>) -> Self {
        Self { key, measurements }
    }
}

/// Part of the system a log line originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Dashboard,
    Refresh,
    Store,
    OpenAq,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Dashboard => write!(f, "dashboard"),
            Component::Refresh => write!(f, "refresh"),
            Component::Store => write!(f, "store"),
            Component::OpenAq => write!(f, "openaq"),
        }
    }
}
