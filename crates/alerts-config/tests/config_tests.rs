//! Integration tests for configuration loading

use alerts_config::{
    ChannelConfig, ConfigFormat, Error, FillOption, ValueFunction, load_config, read_config,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(temp: &TempDir, file: &str, content: &str) -> PathBuf {
    let path = temp.path().join(file);
    fs::write(&path, content).unwrap();
    path
}

const FULL_TOML: &str = r#"
[[policies]]
name = "Prod Alerts"

[[policies.channels]]
type = "pagerduty"
name = "Platform on-call"
service_key = "0123456789abcdef"

[[policies.channels]]
type = "email"
name = "Platform team"
emails = ["platform@example.com", "sre@example.com"]
include_json_attachment = true

[[policies.nrql_conditions]]
name = "Error rate"
query = "SELECT percentage(count(*), WHERE error IS true) FROM Transaction"
since_value = 3
value_function = "sum"
runbook_url = "https://wiki.example.com/runbooks/errors"

[policies.nrql_conditions.signal]
aggregation_window = 60
evaluation_offset = 3
fill_option = "static"
fill_value = 0.0

[[policies.nrql_conditions.terms]]
duration = 5
operator = "above"
priority = "critical"
threshold = 5.0
time_function = "all"

[[policies.nrql_conditions.terms]]
duration = 10
operator = "above"
priority = "warning"
threshold = 2.0
time_function = "any"

[[policies]]
name = "Staging Alerts"
synthetics_conditions = []
"#;

#[test]
fn test_load_full_toml_config() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "alerts.toml", FULL_TOML);

    let config = load_config(&path).unwrap();

    assert_eq!(config.policies.len(), 2);
    let prod = &config.policies[0];
    assert_eq!(prod.name, "Prod Alerts");

    let channels = prod.channels.as_ref().unwrap();
    assert_eq!(channels.len(), 2);
    assert!(matches!(&channels[0], ChannelConfig::PagerDuty(pd) if pd.service_key == "0123456789abcdef"));

    let nrql = &prod.nrql_conditions.as_ref().unwrap()[0];
    assert_eq!(nrql.value_function, ValueFunction::Sum);
    assert_eq!(nrql.terms.len(), 2);
    let signal = nrql.signal.as_ref().unwrap();
    assert_eq!(signal.fill_option, FillOption::Static);
    assert_eq!(signal.fill_value, Some(0.0));

    let staging = &config.policies[1];
    assert!(staging.nrql_conditions.is_none());
    assert_eq!(staging.synthetics_conditions.as_ref().map(Vec::len), Some(0));
}

#[test]
fn test_load_json_config() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "alerts.json",
        r#"{
  "policies": [
    {
      "name": "Prod Alerts",
      "channels": [
        { "type": "slack", "name": "Alerts room", "url": "https://hooks.slack.com/services/T/B/X" }
      ]
    }
  ]
}"#,
    );

    let config = load_config(&path).unwrap();
    let channels = config.policies[0].channels.as_ref().unwrap();
    assert_eq!(channels[0].type_code(), "slack");
}

#[test]
fn test_load_yaml_config() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "alerts.yml",
        r#"
policies:
  - name: Prod Alerts
    synthetics_conditions:
      - name: Homepage down
        monitor_id: 7a4a3b2c-0000-4000-8000-000000000001
"#,
    );

    let config = load_config(&path).unwrap();
    let synthetics = config.policies[0].synthetics_conditions.as_ref().unwrap();
    assert_eq!(synthetics[0].name, "Homepage down");
    assert!(synthetics[0].enabled);
}

#[test]
fn test_parse_error_names_format_and_path() {
    let temp = TempDir::new().unwrap();
    let path = write_config(&temp, "alerts.toml", "[[policies]\nname = ");

    let err = read_config(&path).unwrap_err();
    match &err {
        Error::ConfigParse { format, path: p, .. } => {
            assert_eq!(format, "TOML");
            assert_eq!(p, &path);
        }
        other => panic!("expected ConfigParse, got {:?}", other),
    }
}

#[test]
fn test_invalid_config_rejected_with_every_issue() {
    let temp = TempDir::new().unwrap();
    let path = write_config(
        &temp,
        "alerts.toml",
        r#"
[[policies]]
name = ""

[[policies]]
name = "Prod Alerts"

[[policies.channels]]
type = "pagerduty"
name = "On-call"
service_key = ""
"#,
    );

    // Parsing alone succeeds
    assert!(read_config(&path).is_ok());

    let err = load_config(&path).unwrap_err();
    assert_eq!(err.issues().len(), 2);
    let display = err.to_string();
    assert!(display.contains("2 issue(s)"), "got: {}", display);
    assert!(display.contains("service_key must not be empty"), "got: {}", display);
}

#[test]
fn test_format_detection_is_case_insensitive() {
    let format = ConfigFormat::from_path(std::path::Path::new("ALERTS.YAML")).unwrap();
    assert_eq!(format, ConfigFormat::Yaml);
}
