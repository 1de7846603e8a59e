use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceKind};

/// Condition raised when a synthetics monitor fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsSyntheticsCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub monitor_id: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook_url: Option<String>,
}

impl Resource for AlertsSyntheticsCondition {
    const KIND: ResourceKind = ResourceKind::SyntheticsCondition;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
