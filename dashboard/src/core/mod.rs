//! Core business logic modules
//!
//! Pure business logic with no I/O dependencies

pub mod aggregator;
pub mod params;

// Re-export commonly used types
pub use aggregator::{CountryAverages, Summary, country_averages, filter_at_or_above, summary_statistics};
pub use params::{collect_root_params, parse_record_path, resolve_place, resolve_threshold};
