use serde::{Deserialize, Serialize};

use crate::resource::{Resource, ResourceKind};

/// A notification channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsChannel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: String,
    #[serde(default)]
    pub configuration: ChannelConfiguration,
    /// Policies the channel is associated with, managed by the service
    #[serde(default, skip_serializing)]
    pub links: Option<ChannelLinks>,
}

/// Type-specific channel settings; only the fields relevant to the
/// channel's type are set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_key: Option<String>,
    /// Comma-separated email addresses (email) or recipients (OpsGenie)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipients: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_json_attachment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Comma-separated team names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<String>,
    /// Comma-separated tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelLinks {
    #[serde(default)]
    pub policy_ids: Vec<u64>,
}

impl Resource for AlertsChannel {
    const KIND: ResourceKind = ResourceKind::Channel;
    const SHARED: bool = true;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn belongs_to(&self, policy_id: u64) -> bool {
        self.links
            .as_ref()
            .is_some_and(|links| links.policy_ids.contains(&policy_id))
    }

    fn linked_elsewhere(&self, policy_id: u64) -> bool {
        self.links
            .as_ref()
            .is_some_and(|links| links.policy_ids.iter().any(|&id| id != policy_id))
    }
}
