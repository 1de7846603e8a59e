//! Builders for desired entities and temporary configuration files.
//!
//! Builders produce valid entities with sensible defaults; tests override
//! individual fields where the scenario needs it.

use std::fs;
use std::path::{Path, PathBuf};

use alerts_config::{
    ApmCondition, ApmConditionKind, ChannelConfig, ConditionScope, EmailChannel,
    ExternalServiceCondition, NrqlCondition, Operator, PagerDutyChannel, Priority,
    SyntheticsCondition, TermsConfig, TimeFunction, ValueFunction,
};
use tempfile::TempDir;

/// A critical "above threshold for 5 minutes" term
pub fn critical_above(threshold: f64) -> TermsConfig {
    TermsConfig {
        duration: 5,
        operator: Operator::Above,
        priority: Priority::Critical,
        threshold,
        time_function: TimeFunction::All,
    }
}

pub fn nrql(name: &str, query: &str) -> NrqlCondition {
    NrqlCondition {
        name: name.to_string(),
        enabled: true,
        query: query.to_string(),
        since_value: 3,
        value_function: ValueFunction::SingleValue,
        runbook_url: None,
        signal: None,
        terms: vec![critical_above(10.0)],
    }
}

pub fn apm(name: &str, applications: &[&str]) -> ApmCondition {
    ApmCondition {
        kind: ApmConditionKind::ApmAppMetric,
        name: name.to_string(),
        enabled: true,
        entities: applications.iter().map(|a| a.to_string()).collect(),
        metric: "apdex".to_string(),
        condition_scope: ConditionScope::Application,
        violation_close_timer: None,
        runbook_url: None,
        terms: vec![critical_above(0.7)],
    }
}

pub fn external_service(name: &str, applications: &[&str]) -> ExternalServiceCondition {
    ExternalServiceCondition {
        name: name.to_string(),
        enabled: true,
        entities: applications.iter().map(|a| a.to_string()).collect(),
        external_service_url: "payments.example.com".to_string(),
        metric: "response_time_average".to_string(),
        runbook_url: None,
        terms: vec![critical_above(1.5)],
    }
}

pub fn synthetics(name: &str, monitor_id: &str) -> SyntheticsCondition {
    SyntheticsCondition {
        name: name.to_string(),
        enabled: true,
        monitor_id: monitor_id.to_string(),
        runbook_url: None,
    }
}

pub fn pagerduty(name: &str, service_key: &str) -> ChannelConfig {
    ChannelConfig::PagerDuty(PagerDutyChannel {
        name: name.to_string(),
        service_key: service_key.to_string(),
    })
}

pub fn email(name: &str, emails: &[&str]) -> ChannelConfig {
    ChannelConfig::Email(EmailChannel {
        name: name.to_string(),
        emails: emails.iter().map(|e| e.to_string()).collect(),
        include_json_attachment: false,
    })
}

/// A configuration file inside a temporary directory, removed on drop
pub struct ConfigFile {
    _dir: TempDir,
    path: PathBuf,
}

impl ConfigFile {
    /// Write `content` to `file_name` in a fresh temporary directory
    pub fn new(file_name: &str, content: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(file_name);
        fs::write(&path, content).unwrap();
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
