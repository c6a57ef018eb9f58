//! Shared types for the air quality dashboard
//!
//! Contains the place/measurement domain model, the records exchanged with
//! the remote measurement API, request validation errors and the tracing
//! setup used by every binary in the workspace.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
