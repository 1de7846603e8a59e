//! Validation of desired-state configuration
//!
//! Runs before any remote call. Every issue is collected so a user can fix
//! a file in one pass.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::channel::ChannelConfig;
use crate::condition::{FillOption, SignalConfig};
use crate::policy::{AlertsConfig, PolicyConfig};
use crate::terms::{ALLOWED_DURATIONS, TermsConfig};
use crate::Named;

/// Hours accepted for `violation_close_timer`
const ALLOWED_CLOSE_TIMERS: [u32; 6] = [1, 2, 4, 8, 12, 24];

/// Inclusive bounds of an NRQL `since_value`, in minutes
const SINCE_VALUE_RANGE: std::ops::RangeInclusive<u32> = 1..=120;

/// A single problem found in a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Policy the issue belongs to
    pub policy: String,
    /// Category and name of the offending entity, if the issue is not policy-wide
    pub entity: Option<String>,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(entity) => write!(f, "policy '{}', {}: {}", self.policy, entity, self.message),
            None => write!(f, "policy '{}': {}", self.policy, self.message),
        }
    }
}

struct Collector<'a> {
    policy: &'a str,
    issues: Vec<ValidationIssue>,
}

impl<'a> Collector<'a> {
    fn policy_issue(&mut self, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            policy: self.policy.to_string(),
            entity: None,
            message: message.into(),
        });
    }

    fn entity_issue(&mut self, category: &str, name: &str, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            policy: self.policy.to_string(),
            entity: Some(format!("{} '{}'", category, name)),
            message: message.into(),
        });
    }

    fn require(&mut self, category: &str, name: &str, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.entity_issue(category, name, format!("{} must not be empty", field));
        }
    }

    /// Names must be non-empty and unique within a category, they are the
    /// only key used to match remote entities
    fn check_names<T: Named>(&mut self, category: &str, items: &[T]) {
        let mut seen = HashSet::new();
        for item in items {
            let name = item.name();
            if name.trim().is_empty() {
                self.policy_issue(format!("{} with an empty name", category));
            } else if !seen.insert(name) {
                self.entity_issue(category, name, "duplicate name");
            }
        }
    }

    fn check_terms(&mut self, category: &str, name: &str, terms: &[TermsConfig]) {
        if terms.is_empty() {
            self.entity_issue(category, name, "at least one term is required");
        }
        for term in terms {
            if !term.has_allowed_duration() {
                self.entity_issue(
                    category,
                    name,
                    format!(
                        "term duration {} is not one of {:?}",
                        term.duration, ALLOWED_DURATIONS
                    ),
                );
            }
            if !term.threshold.is_finite() || term.threshold < 0.0 {
                self.entity_issue(
                    category,
                    name,
                    format!("term threshold {} must be a non-negative number", term.threshold),
                );
            }
        }
    }

    fn check_entities(&mut self, category: &str, name: &str, entities: &[String]) {
        if entities.is_empty() {
            self.entity_issue(category, name, "at least one entity is required");
        }
        if entities.iter().any(|e| e.trim().is_empty()) {
            self.entity_issue(category, name, "entity names must not be empty");
        }
    }

    fn check_signal(&mut self, name: &str, signal: &SignalConfig) {
        match (signal.fill_option, signal.fill_value) {
            (FillOption::Static, None) => {
                self.entity_issue("NRQL condition", name, "fill_value is required for static fill");
            }
            (FillOption::None | FillOption::LastValue, Some(_)) => {
                self.entity_issue(
                    "NRQL condition",
                    name,
                    "fill_value is only allowed with static fill",
                );
            }
            _ => {}
        }
    }

    fn check_channel(&mut self, channel: &ChannelConfig) {
        const CATEGORY: &str = "channel";
        let name = channel.name();
        match channel {
            ChannelConfig::PagerDuty(c) => self.require(CATEGORY, name, "service_key", &c.service_key),
            ChannelConfig::Email(c) => {
                if c.emails.is_empty() {
                    self.entity_issue(CATEGORY, name, "at least one email is required");
                }
                for email in &c.emails {
                    self.require(CATEGORY, name, "email", email);
                }
            }
            ChannelConfig::Slack(c) => self.require(CATEGORY, name, "url", &c.url),
            ChannelConfig::Webhook(c) => {
                self.require(CATEGORY, name, "base_url", &c.base_url);
                if c.auth_password.is_some() && c.auth_username.is_none() {
                    self.entity_issue(CATEGORY, name, "auth_password requires auth_username");
                }
            }
            ChannelConfig::OpsGenie(c) => self.require(CATEGORY, name, "api_key", &c.api_key),
            ChannelConfig::User(_) => {}
        }
    }

    fn check_policy(&mut self, policy: &PolicyConfig) {
        if let Some(channels) = &policy.channels {
            self.check_names("channel", channels);
            for channel in channels {
                self.check_channel(channel);
            }
        }

        if let Some(conditions) = &policy.apm_conditions {
            const CATEGORY: &str = "APM condition";
            self.check_names(CATEGORY, conditions);
            for c in conditions {
                self.check_entities(CATEGORY, &c.name, &c.entities);
                self.require(CATEGORY, &c.name, "metric", &c.metric);
                self.check_terms(CATEGORY, &c.name, &c.terms);
                if let Some(timer) = c.violation_close_timer
                    && !ALLOWED_CLOSE_TIMERS.contains(&timer)
                {
                    self.entity_issue(
                        CATEGORY,
                        &c.name,
                        format!(
                            "violation_close_timer {} is not one of {:?}",
                            timer, ALLOWED_CLOSE_TIMERS
                        ),
                    );
                }
            }
        }

        if let Some(conditions) = &policy.external_service_conditions {
            const CATEGORY: &str = "external service condition";
            self.check_names(CATEGORY, conditions);
            for c in conditions {
                self.check_entities(CATEGORY, &c.name, &c.entities);
                self.require(CATEGORY, &c.name, "external_service_url", &c.external_service_url);
                if c.external_service_url.contains("://") {
                    self.entity_issue(
                        CATEGORY,
                        &c.name,
                        "external_service_url must not include the protocol",
                    );
                }
                self.require(CATEGORY, &c.name, "metric", &c.metric);
                self.check_terms(CATEGORY, &c.name, &c.terms);
            }
        }

        if let Some(conditions) = &policy.nrql_conditions {
            const CATEGORY: &str = "NRQL condition";
            self.check_names(CATEGORY, conditions);
            for c in conditions {
                self.require(CATEGORY, &c.name, "query", &c.query);
                if !SINCE_VALUE_RANGE.contains(&c.since_value) {
                    self.entity_issue(
                        CATEGORY,
                        &c.name,
                        format!("since_value {} must be between 1 and 120", c.since_value),
                    );
                }
                self.check_terms(CATEGORY, &c.name, &c.terms);
                if let Some(signal) = &c.signal {
                    self.check_signal(&c.name, signal);
                }
            }
        }

        if let Some(conditions) = &policy.synthetics_conditions {
            const CATEGORY: &str = "synthetics condition";
            self.check_names(CATEGORY, conditions);
            for c in conditions {
                self.require(CATEGORY, &c.name, "monitor_id", &c.monitor_id);
            }
        }
    }
}

/// Validate a configuration and return every issue found
pub fn validate(config: &AlertsConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for policy in &config.policies {
        let mut collector = Collector {
            policy: &policy.name,
            issues: Vec::new(),
        };

        if policy.name.trim().is_empty() {
            collector.policy_issue("policy name must not be empty");
        } else if !seen.insert(policy.name.as_str()) {
            collector.policy_issue("policy is declared more than once");
        }

        collector.check_policy(policy);
        issues.extend(collector.issues);
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> AlertsConfig {
        AlertsConfig::parse(content).unwrap()
    }

    #[test]
    fn test_valid_config_has_no_issues() {
        let config = parse(
            r#"
[[policies]]
name = "Prod Alerts"

[[policies.nrql_conditions]]
name = "Errors"
query = "SELECT count(*) FROM TransactionError"
since_value = 5

[[policies.nrql_conditions.terms]]
duration = 5
operator = "above"
threshold = 10.0
"#,
        );
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn test_duplicate_condition_names_reported() {
        let config = parse(
            r#"
[[policies]]
name = "Prod Alerts"

[[policies.synthetics_conditions]]
name = "Homepage"
monitor_id = "a"

[[policies.synthetics_conditions]]
name = "Homepage"
monitor_id = "b"
"#,
        );
        let issues = validate(&config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "duplicate name");
        assert_eq!(
            issues[0].to_string(),
            "policy 'Prod Alerts', synthetics condition 'Homepage': duplicate name"
        );
    }

    #[test]
    fn test_same_name_in_different_categories_is_allowed() {
        let config = parse(
            r#"
[[policies]]
name = "Prod Alerts"

[[policies.synthetics_conditions]]
name = "Homepage"
monitor_id = "a"

[[policies.channels]]
type = "user"
name = "Homepage"
user_id = 42
"#,
        );
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn test_duplicate_policies_reported() {
        let config = parse(
            r#"
[[policies]]
name = "Prod Alerts"

[[policies]]
name = "Prod Alerts"
"#,
        );
        let issues = validate(&config);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("more than once"));
    }

    #[test]
    fn test_nrql_issues_collected() {
        let config = parse(
            r#"
[[policies]]
name = "Prod Alerts"

[[policies.nrql_conditions]]
name = "Broken"
query = " "
since_value = 0
terms = []

[policies.nrql_conditions.signal]
fill_option = "static"
"#,
        );
        let messages: Vec<String> = validate(&config).into_iter().map(|i| i.message).collect();
        assert_eq!(messages.len(), 4, "got: {:?}", messages);
        assert!(messages.contains(&"query must not be empty".to_string()));
        assert!(messages.contains(&"since_value 0 must be between 1 and 120".to_string()));
        assert!(messages.contains(&"at least one term is required".to_string()));
        assert!(messages.contains(&"fill_value is required for static fill".to_string()));
    }

    #[test]
    fn test_external_service_url_with_protocol() {
        let config = parse(
            r#"
[[policies]]
name = "Prod Alerts"

[[policies.external_service_conditions]]
name = "Payments"
entities = ["billing"]
external_service_url = "https://payments.example.com"
metric = "response_time_average"

[[policies.external_service_conditions.terms]]
duration = 5
operator = "above"
threshold = 1.5
"#,
        );
        let issues = validate(&config);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("protocol"));
    }

    #[test]
    fn test_empty_email_list_reported() {
        let config = parse(
            r#"
[[policies]]
name = "Prod Alerts"

[[policies.channels]]
type = "email"
name = "Team"
emails = []
"#,
        );
        let issues = validate(&config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].entity.as_deref(), Some("channel 'Team'"));
    }
}
