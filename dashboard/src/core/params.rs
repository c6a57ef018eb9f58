//! Typed parsing of dashboard request parameters

use shared::{PlaceKey, Threshold, ValidationResult};
use crate::types::RootParams;

/// Dashboard parameters from urlencoded sources, earlier sources first.
///
/// A repeated key keeps its first value; unknown keys and undecodable bytes
/// are ignored, so this never fails.
pub fn collect_root_params<'a>(sources: impl IntoIterator<Item = &'a [u8]>) -> RootParams {
    let mut params = RootParams::default();
    for source in sources {
        for (key, value) in url::form_urlencoded::parse(source) {
            let slot = match key.as_ref() {
                "place" => &mut params.place,
                "value" => &mut params.value,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
    }
    params
}

/// Place named by the composite `country/city` parameter.
///
/// Absent or malformed input falls back to `default` without surfacing an error.
pub fn resolve_place(raw: Option<&str>, default: &PlaceKey) -> PlaceKey {
    raw.and_then(|value| PlaceKey::from_composite(value).ok())
        .unwrap_or_else(|| default.clone())
}

/// Threshold named by the `value` parameter.
///
/// Absent input uses `default`, blank input means zero, anything else must
/// parse as a finite number.
pub fn resolve_threshold(raw: Option<&str>, default: Threshold) -> ValidationResult<Threshold> {
    match raw {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(Threshold::ZERO),
        Some(value) => value.parse(),
    }
}

/// Place named by a `country-city` record path segment
pub fn parse_record_path(segment: &str) -> ValidationResult<PlaceKey> {
    PlaceKey::from_path_segment(segment)
}
