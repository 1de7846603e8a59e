//! Typed client for the remote alerting REST API
//!
//! - [`model`]: wire types mirroring the service's JSON schema
//! - [`Resource`]/[`ResourceKind`]: what the generic operations need to know about a type
//! - [`AlertsApi`]: the per-resource operations the synchronizer depends on
//! - [`HttpAlertsApi`]: the blocking HTTP implementation

pub mod api;
pub mod error;
pub mod http;
pub mod model;
pub mod resource;

pub use api::AlertsApi;
pub use error::{Error, Result};
pub use http::{ApiSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpAlertsApi};
pub use resource::{Resource, ResourceKind};
