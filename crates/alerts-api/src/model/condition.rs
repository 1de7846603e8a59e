use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceKind};

/// A threshold term as the service expects it: every value is a string code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terms {
    pub duration: String,
    pub operator: String,
    pub priority: String,
    pub threshold: String,
    pub time_function: String,
}

/// APM metric condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub condition_type: String,
    pub name: String,
    pub enabled: bool,
    /// Ids of the monitored applications, as strings
    #[serde(default)]
    pub entities: Vec<String>,
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation_close_timer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook_url: Option<String>,
    #[serde(default)]
    pub terms: Vec<Terms>,
}

impl Resource for AlertsCondition {
    const KIND: ResourceKind = ResourceKind::ApmCondition;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Condition on an external service called by APM applications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsExternalServiceCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub condition_type: String,
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub entities: Vec<String>,
    pub external_service_url: String,
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook_url: Option<String>,
    #[serde(default)]
    pub terms: Vec<Terms>,
}

impl Resource for AlertsExternalServiceCondition {
    const KIND: ResourceKind = ResourceKind::ExternalServiceCondition;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
