//! Mapping of desired configuration to wire entities
//!
//! Pure: no I/O, no side effects. Application names must already be
//! resolved into [`EntityIds`].

use alerts_api::Resource;
use alerts_api::model::{
    AlertsChannel, AlertsCondition, AlertsExternalServiceCondition, AlertsNrqlCondition,
    AlertsSyntheticsCondition, ChannelConfiguration, Nrql, Signal, Terms,
};
use alerts_config::{
    ApmCondition, ChannelConfig, ExternalServiceCondition, Named, NrqlCondition, SignalConfig,
    SyntheticsCondition, TermsConfig,
};

use crate::resolve::EntityIds;
use crate::{Error, Result};

/// Remote type code of external service conditions
const EXTERNAL_SERVICE_TYPE: &str = "apm";

/// A desired entity that can be sent to the service
pub trait Desired: Named {
    type Wire: Resource;

    /// Build the wire entity; `policy` only names the owner in errors
    fn to_wire(&self, policy: &str, ids: &EntityIds) -> Result<Self::Wire>;
}

fn map_terms(terms: &[TermsConfig]) -> Vec<Terms> {
    terms
        .iter()
        .map(|t| Terms {
            duration: t.duration.to_string(),
            operator: t.operator.as_code().to_string(),
            priority: t.priority.as_code().to_string(),
            threshold: t.threshold.to_string(),
            time_function: t.time_function.as_code().to_string(),
        })
        .collect()
}

fn map_entities(policy: &str, names: &[String], ids: &EntityIds) -> Result<Vec<String>> {
    names
        .iter()
        .map(|name| {
            ids.application(name)
                .map(|id| id.to_string())
                .ok_or_else(|| Error::ApplicationNotFound {
                    policy: policy.to_string(),
                    name: name.clone(),
                })
        })
        .collect()
}

fn map_signal(signal: &SignalConfig) -> Signal {
    Signal {
        aggregation_window: signal.aggregation_window.map(|w| w.to_string()),
        evaluation_offset: signal.evaluation_offset.map(|o| o.to_string()),
        fill_option: Some(signal.fill_option.as_code().to_string()),
        fill_value: signal.fill_value.map(|v| v.to_string()),
    }
}

fn join_non_empty(values: &[String]) -> Option<String> {
    (!values.is_empty()).then(|| values.join(","))
}

impl Desired for ApmCondition {
    type Wire = AlertsCondition;

    fn to_wire(&self, policy: &str, ids: &EntityIds) -> Result<AlertsCondition> {
        Ok(AlertsCondition {
            id: None,
            condition_type: self.kind.as_code().to_string(),
            name: self.name.clone(),
            enabled: self.enabled,
            entities: map_entities(policy, &self.entities, ids)?,
            metric: self.metric.clone(),
            condition_scope: Some(self.condition_scope.as_code().to_string()),
            violation_close_timer: self.violation_close_timer.map(|h| h.to_string()),
            runbook_url: self.runbook_url.clone(),
            terms: map_terms(&self.terms),
        })
    }
}

impl Desired for ExternalServiceCondition {
    type Wire = AlertsExternalServiceCondition;

    fn to_wire(&self, policy: &str, ids: &EntityIds) -> Result<AlertsExternalServiceCondition> {
        Ok(AlertsExternalServiceCondition {
            id: None,
            condition_type: EXTERNAL_SERVICE_TYPE.to_string(),
            name: self.name.clone(),
            enabled: self.enabled,
            entities: map_entities(policy, &self.entities, ids)?,
            external_service_url: self.external_service_url.clone(),
            metric: self.metric.clone(),
            runbook_url: self.runbook_url.clone(),
            terms: map_terms(&self.terms),
        })
    }
}

impl Desired for NrqlCondition {
    type Wire = AlertsNrqlCondition;

    fn to_wire(&self, _policy: &str, _ids: &EntityIds) -> Result<AlertsNrqlCondition> {
        Ok(AlertsNrqlCondition {
            id: None,
            name: self.name.clone(),
            enabled: self.enabled,
            runbook_url: self.runbook_url.clone(),
            terms: map_terms(&self.terms),
            value_function: self.value_function.as_code().to_string(),
            nrql: Nrql {
                query: self.query.clone(),
                since_value: self.since_value.to_string(),
            },
            signal: self.signal.as_ref().map(map_signal),
        })
    }
}

impl Desired for SyntheticsCondition {
    type Wire = AlertsSyntheticsCondition;

    fn to_wire(&self, _policy: &str, _ids: &EntityIds) -> Result<AlertsSyntheticsCondition> {
        Ok(AlertsSyntheticsCondition {
            id: None,
            name: self.name.clone(),
            monitor_id: self.monitor_id.clone(),
            enabled: self.enabled,
            runbook_url: self.runbook_url.clone(),
        })
    }
}

impl Desired for ChannelConfig {
    type Wire = AlertsChannel;

    fn to_wire(&self, _policy: &str, _ids: &EntityIds) -> Result<AlertsChannel> {
        let configuration = match self {
            ChannelConfig::PagerDuty(c) => ChannelConfiguration {
                service_key: Some(c.service_key.clone()),
                ..Default::default()
            },
            ChannelConfig::Email(c) => ChannelConfiguration {
                recipients: Some(c.emails.join(",")),
                include_json_attachment: Some(c.include_json_attachment),
                ..Default::default()
            },
            ChannelConfig::Slack(c) => ChannelConfiguration {
                url: Some(c.url.clone()),
                channel: c.channel.clone(),
                ..Default::default()
            },
            ChannelConfig::Webhook(c) => ChannelConfiguration {
                base_url: Some(c.base_url.clone()),
                auth_username: c.auth_username.clone(),
                auth_password: c.auth_password.clone(),
                payload_type: Some(c.payload_type.as_code().to_string()),
                ..Default::default()
            },
            ChannelConfig::OpsGenie(c) => ChannelConfiguration {
                api_key: Some(c.api_key.clone()),
                teams: join_non_empty(&c.teams),
                tags: join_non_empty(&c.tags),
                recipients: join_non_empty(&c.recipients),
                ..Default::default()
            },
            ChannelConfig::User(c) => ChannelConfiguration {
                user_id: Some(c.user_id),
                ..Default::default()
            },
        };

        Ok(AlertsChannel {
            id: None,
            name: self.name().to_string(),
            channel_type: self.type_code().to_string(),
            configuration,
            links: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerts_config::{
        ApmConditionKind, ConditionScope, EmailChannel, FillOption, OpsGenieChannel, Operator,
        Priority, TimeFunction, ValueFunction,
    };
    use pretty_assertions::assert_eq;

    fn critical_above(threshold: f64) -> TermsConfig {
        TermsConfig {
            duration: 5,
            operator: Operator::Above,
            priority: Priority::Critical,
            threshold,
            time_function: TimeFunction::All,
        }
    }

    #[test]
    fn test_terms_use_string_codes() {
        let terms = map_terms(&[critical_above(2.5), TermsConfig {
            duration: 60,
            operator: Operator::Below,
            priority: Priority::Warning,
            threshold: 10.0,
            time_function: TimeFunction::Any,
        }]);

        assert_eq!(
            terms,
            vec![
                Terms {
                    duration: "5".to_string(),
                    operator: "above".to_string(),
                    priority: "critical".to_string(),
                    threshold: "2.5".to_string(),
                    time_function: "all".to_string(),
                },
                Terms {
                    duration: "60".to_string(),
                    operator: "below".to_string(),
                    priority: "warning".to_string(),
                    threshold: "10".to_string(),
                    time_function: "any".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_nrql_condition_mapping() {
        let condition = NrqlCondition {
            name: "Errors".to_string(),
            enabled: false,
            query: "SELECT count(*) FROM TransactionError".to_string(),
            since_value: 3,
            value_function: ValueFunction::Sum,
            runbook_url: Some("https://wiki.example.com/errors".to_string()),
            signal: Some(SignalConfig {
                aggregation_window: Some(60),
                evaluation_offset: None,
                fill_option: FillOption::Static,
                fill_value: Some(0.0),
            }),
            terms: vec![critical_above(10.0)],
        };

        let wire = condition.to_wire("Prod", &EntityIds::new()).unwrap();

        assert_eq!(wire.id, None);
        assert!(!wire.enabled);
        assert_eq!(wire.value_function, "sum");
        assert_eq!(wire.nrql.since_value, "3");
        let signal = wire.signal.unwrap();
        assert_eq!(signal.aggregation_window.as_deref(), Some("60"));
        assert_eq!(signal.evaluation_offset, None);
        assert_eq!(signal.fill_option.as_deref(), Some("static"));
        assert_eq!(signal.fill_value.as_deref(), Some("0"));
    }

    #[test]
    fn test_apm_condition_resolves_entities() {
        let condition = ApmCondition {
            kind: ApmConditionKind::ApmAppMetric,
            name: "Apdex".to_string(),
            enabled: true,
            entities: vec!["orders".to_string(), "billing".to_string()],
            metric: "apdex".to_string(),
            condition_scope: ConditionScope::Instance,
            violation_close_timer: Some(24),
            runbook_url: None,
            terms: vec![critical_above(0.7)],
        };
        let mut ids = EntityIds::new();
        ids.insert("orders", 101);
        ids.insert("billing", 102);

        let wire = condition.to_wire("Prod", &ids).unwrap();

        assert_eq!(wire.condition_type, "apm_app_metric");
        assert_eq!(wire.entities, vec!["101", "102"]);
        assert_eq!(wire.condition_scope.as_deref(), Some("instance"));
        assert_eq!(wire.violation_close_timer.as_deref(), Some("24"));
    }

    #[test]
    fn test_unresolved_application_fails() {
        let condition = ExternalServiceCondition {
            name: "Payments".to_string(),
            enabled: true,
            entities: vec!["billing".to_string()],
            external_service_url: "payments.example.com".to_string(),
            metric: "response_time_average".to_string(),
            runbook_url: None,
            terms: vec![critical_above(1.0)],
        };

        let err = condition.to_wire("Prod", &EntityIds::new()).unwrap_err();
        assert!(matches!(err, Error::ApplicationNotFound { policy, name } if policy == "Prod" && name == "billing"));
    }

    #[test]
    fn test_email_channel_mapping() {
        let channel = ChannelConfig::Email(EmailChannel {
            name: "Team".to_string(),
            emails: vec!["a@example.com".to_string(), "b@example.com".to_string()],
            include_json_attachment: true,
        });

        let wire = channel.to_wire("Prod", &EntityIds::new()).unwrap();

        assert_eq!(wire.channel_type, "email");
        assert_eq!(wire.configuration.recipients.as_deref(), Some("a@example.com,b@example.com"));
        assert_eq!(wire.configuration.include_json_attachment, Some(true));
        assert_eq!(wire.configuration.service_key, None);
    }

    #[test]
    fn test_opsgenie_channel_omits_empty_lists() {
        let channel = ChannelConfig::OpsGenie(OpsGenieChannel {
            name: "OpsGenie".to_string(),
            api_key: "key".to_string(),
            teams: vec!["sre".to_string()],
            tags: Vec::new(),
            recipients: Vec::new(),
        });

        let wire = channel.to_wire("Prod", &EntityIds::new()).unwrap();
        let json = serde_json::to_value(&wire.configuration).unwrap();
        assert_eq!(json, serde_json::json!({ "api_key": "key", "teams": "sre" }));
    }
}
