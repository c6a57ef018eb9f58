//! Service tests for the dashboard
//!
//! This module contains tests for the store, the OpenAQ client and the
//! refresh workflow.
