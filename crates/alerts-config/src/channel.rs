//! Notification channel definitions
//!
//! Channels are a closed set of variants tagged by `type`:
//!
//! ```toml
//! [[policies.channels]]
//! type = "pagerduty"
//! name = "Platform on-call"
//! service_key = "0123456789abcdef"
//!
//! [[policies.channels]]
//! type = "email"
//! name = "Platform team"
//! emails = ["platform@example.com"]
//! include_json_attachment = true
//! ```

use serde::{Deserialize, Serialize};

use crate::Named;

/// A notification channel associated with a policy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ChannelConfig {
    #[serde(rename = "pagerduty")]
    PagerDuty(PagerDutyChannel),
    #[serde(rename = "email")]
    Email(EmailChannel),
    #[serde(rename = "slack")]
    Slack(SlackChannel),
    #[serde(rename = "webhook")]
    Webhook(WebhookChannel),
    #[serde(rename = "opsgenie")]
    OpsGenie(OpsGenieChannel),
    #[serde(rename = "user")]
    User(UserChannel),
}

impl ChannelConfig {
    /// Remote type code of the channel
    pub fn type_code(&self) -> &'static str {
        match self {
            Self::PagerDuty(_) => "pagerduty",
            Self::Email(_) => "email",
            Self::Slack(_) => "slack",
            Self::Webhook(_) => "webhook",
            Self::OpsGenie(_) => "opsgenie",
            Self::User(_) => "user",
        }
    }
}

impl Named for ChannelConfig {
    fn name(&self) -> &str {
        match self {
            Self::PagerDuty(c) => &c.name,
            Self::Email(c) => &c.name,
            Self::Slack(c) => &c.name,
            Self::Webhook(c) => &c.name,
            Self::OpsGenie(c) => &c.name,
            Self::User(c) => &c.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PagerDutyChannel {
    pub name: String,
    pub service_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmailChannel {
    pub name: String,
    pub emails: Vec<String>,
    #[serde(default)]
    pub include_json_attachment: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SlackChannel {
    pub name: String,
    /// Incoming webhook URL
    pub url: String,
    /// Target channel, defaults to the one bound to the webhook
    #[serde(default)]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayloadType {
    #[default]
    Json,
    Form,
}

impl PayloadType {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebhookChannel {
    pub name: String,
    pub base_url: String,
    #[serde(default)]
    pub auth_username: Option<String>,
    #[serde(default)]
    pub auth_password: Option<String>,
    #[serde(default)]
    pub payload_type: PayloadType,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OpsGenieChannel {
    pub name: String,
    pub api_key: String,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserChannel {
    pub name: String,
    pub user_id: u64,
}
