//! Shared test utilities for the alerts-configurator workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fake`]: [`FakeAlertsApi`], an in-memory alerting service with a call log
//! - [`fixtures`]: builders for desired entities and temporary config files

pub mod fake;
pub mod fixtures;

pub use fake::{ApiCall, FakeAlertsApi};
