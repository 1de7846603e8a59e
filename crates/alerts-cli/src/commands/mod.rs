//! Command implementations for alerts-cli

pub mod sync;
pub mod validate;

pub use sync::run_sync;
pub use validate::run_validate;
