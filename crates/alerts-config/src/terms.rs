//! Threshold terms shared by APM, external service and NRQL conditions
//!
//! # Example TOML
//!
//! ```toml
//! [[policies.nrql_conditions.terms]]
//! duration = 5
//! operator = "above"
//! priority = "critical"
//! threshold = 90.0
//! time_function = "all"
//! ```

use serde::{Deserialize, Serialize};

/// Durations (in minutes) accepted by the alerting service
pub const ALLOWED_DURATIONS: [u32; 6] = [5, 10, 15, 30, 60, 120];

/// A single threshold term of a condition
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TermsConfig {
    /// How long (in minutes) the threshold must be breached
    pub duration: u32,
    /// Comparison applied to the threshold
    pub operator: Operator,
    /// Severity of the violation
    #[serde(default)]
    pub priority: Priority,
    /// Threshold value
    pub threshold: f64,
    /// Whether all or any data points in the duration must breach
    #[serde(default)]
    pub time_function: TimeFunction,
}

impl TermsConfig {
    /// Whether the configured duration is one the service accepts
    pub fn has_allowed_duration(&self) -> bool {
        ALLOWED_DURATIONS.contains(&self.duration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Above,
    Below,
    Equal,
}

impl Operator {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
            Self::Equal => "equal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Critical,
    Warning,
}

impl Priority {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeFunction {
    #[default]
    All,
    Any,
}

impl TimeFunction {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
        }
    }
}
