//! Synchronization driver
//!
//! This module provides:
//! - **engine**: per-policy resolution and reconciliation of every declared category
//! - **report**: the record of actions taken (or planned, in dry-run mode)

mod engine;
mod report;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{ActionRecord, Operation, PolicyReport, SyncReport};
