//! Alert condition definitions, one struct per condition category
//!
//! # Example TOML
//!
//! ```toml
//! [[policies.apm_conditions]]
//! type = "apm_app_metric"
//! name = "Apdex too low"
//! entities = ["checkout-service"]
//! metric = "apdex"
//! condition_scope = "application"
//!
//! [[policies.apm_conditions.terms]]
//! duration = 5
//! operator = "below"
//! threshold = 0.8
//!
//! [[policies.nrql_conditions]]
//! name = "Error rate"
//! query = "SELECT percentage(count(*), WHERE error IS true) FROM Transaction"
//! since_value = 3
//! ```

use serde::{Deserialize, Serialize};

use crate::Named;
use crate::terms::TermsConfig;

fn default_enabled() -> bool {
    true
}

/// Kind of APM condition, each maps to a distinct remote condition type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApmConditionKind {
    /// Metric of an APM application (apdex, error rate, response time...)
    ApmAppMetric,
    /// Metric of a key transaction
    ApmKtMetric,
    /// JVM metric of an APM application (heap, GC cpu time...)
    ApmJvmMetric,
}

impl ApmConditionKind {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::ApmAppMetric => "apm_app_metric",
            Self::ApmKtMetric => "apm_kt_metric",
            Self::ApmJvmMetric => "apm_jvm_metric",
        }
    }
}

/// Whether an APM condition evaluates the whole application or each instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConditionScope {
    #[default]
    Application,
    Instance,
}

impl ConditionScope {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Instance => "instance",
        }
    }
}

/// APM metric condition applied to a set of applications
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApmCondition {
    #[serde(rename = "type")]
    pub kind: ApmConditionKind,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Application names, resolved to ids before the condition is sent
    pub entities: Vec<String>,
    pub metric: String,
    #[serde(default)]
    pub condition_scope: ConditionScope,
    /// Hours after which open violations are closed automatically
    #[serde(default)]
    pub violation_close_timer: Option<u32>,
    #[serde(default)]
    pub runbook_url: Option<String>,
    pub terms: Vec<TermsConfig>,
}

/// Condition on an external service called by APM applications
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExternalServiceCondition {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Application names, resolved to ids before the condition is sent
    pub entities: Vec<String>,
    /// Host of the external service, without the protocol
    pub external_service_url: String,
    pub metric: String,
    #[serde(default)]
    pub runbook_url: Option<String>,
    pub terms: Vec<TermsConfig>,
}

/// Aggregation used to turn NRQL query results into a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueFunction {
    #[default]
    SingleValue,
    Sum,
}

impl ValueFunction {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::SingleValue => "single_value",
            Self::Sum => "sum",
        }
    }
}

/// How gaps in the signal are filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillOption {
    #[default]
    None,
    LastValue,
    Static,
}

impl FillOption {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LastValue => "last_value",
            Self::Static => "static",
        }
    }
}

/// Streaming signal settings of an NRQL condition
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct SignalConfig {
    /// Aggregation window in seconds
    #[serde(default)]
    pub aggregation_window: Option<u32>,
    /// Number of windows to wait before evaluating
    #[serde(default)]
    pub evaluation_offset: Option<u32>,
    #[serde(default)]
    pub fill_option: FillOption,
    /// Required when `fill_option` is `static`
    #[serde(default)]
    pub fill_value: Option<f64>,
}

/// Condition driven by an NRQL query
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NrqlCondition {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub query: String,
    /// Query window in minutes (1..=120)
    pub since_value: u32,
    #[serde(default)]
    pub value_function: ValueFunction,
    #[serde(default)]
    pub runbook_url: Option<String>,
    #[serde(default)]
    pub signal: Option<SignalConfig>,
    pub terms: Vec<TermsConfig>,
}

/// Condition raised when a synthetics monitor fails
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SyntheticsCondition {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub monitor_id: String,
    #[serde(default)]
    pub runbook_url: Option<String>,
}

impl Named for ApmCondition {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for ExternalServiceCondition {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for NrqlCondition {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for SyntheticsCondition {
    fn name(&self) -> &str {
        &self.name
    }
}
