//! Reconciliation of desired alert configuration against the remote service
//!
//! This crate sits between the configuration model and the API client:
//!
//! ```text
//!                alerts-cli
//!                    |
//!               alerts-core
//!                /        \
//!       alerts-config   alerts-api
//! ```
//!
//! - **resolve**: policy and application names to remote identifiers
//! - **mapper**: pure conversion of desired entities to wire entities
//! - **reconcile**: name-based create/update/delete of one category
//! - **sync**: the driver running every policy and category in order
//!
//! # Example
//!
//! ```ignore
//! use alerts_api::{ApiSettings, HttpAlertsApi};
//! use alerts_core::{SyncEngine, SyncOptions};
//!
//! let api = HttpAlertsApi::new(&ApiSettings::new(key))?;
//! let config = alerts_config::load_config("alerts.toml".as_ref())?;
//! let report = SyncEngine::new(&api, SyncOptions { dry_run: true }).sync(&config)?;
//! ```

pub mod error;
pub mod mapper;
pub mod reconcile;
pub mod resolve;
pub mod sync;

pub use error::{Error, Result};
pub use mapper::Desired;
pub use reconcile::{Action, MatchKey, Reconciler, plan};
pub use resolve::{EntityIds, ResolvedPolicy, resolve_applications, resolve_policy};
pub use sync::{ActionRecord, Operation, PolicyReport, SyncEngine, SyncOptions, SyncReport};
