//! Integration tests for the alerts CLI binary.
//!
//! These tests exercise the compiled binary using assert_cmd; sync runs
//! against a wiremock server standing in for the alerting service.

use alerts_test_utils::fixtures::ConfigFile;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONFIG: &str = r#"
[[policies]]
name = "Prod Alerts"

[[policies.nrql_conditions]]
name = "cpu-high"
query = "SELECT average(cpuPercent) FROM SystemSample"
since_value = 3

[[policies.nrql_conditions.terms]]
duration = 5
operator = "above"
threshold = 90.0
"#;

/// Get a Command for the alerts binary
fn alerts_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("alerts"));
    cmd.env_remove("NEW_RELIC_API_KEY")
        .env_remove("NEW_RELIC_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_output() {
    alerts_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn test_no_command_prints_hint() {
    alerts_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("alerts --help"));
}

#[test]
fn test_validate_valid_file() {
    let file = ConfigFile::new("alerts.toml", CONFIG);
    alerts_cmd()
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid (1 policy)"));
}

#[test]
fn test_validate_reports_every_issue() {
    let file = ConfigFile::new(
        "alerts.json",
        r#"{
            "policies": [{
                "name": "Prod Alerts",
                "nrql_conditions": [{
                    "name": "cpu-high",
                    "query": "",
                    "since_value": 500,
                    "terms": []
                }]
            }]
        }"#,
    );
    alerts_cmd()
        .arg("validate")
        .arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("policy 'Prod Alerts', NRQL condition 'cpu-high'"))
        .stderr(predicate::str::contains("Configuration has 3 issue(s)"));
}

#[test]
fn test_sync_requires_api_key() {
    let file = ConfigFile::new("alerts.toml", CONFIG);
    alerts_cmd()
        .arg("sync")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key given"));
}

#[test]
fn test_sync_missing_file() {
    alerts_cmd()
        .args(["sync", "does-not-exist.toml", "--api-key", "key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.toml"));
}

async fn mount_prod_policy(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/alerts_policies.json"))
        .and(query_param("filter[name]", "Prod Alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "policies": [{ "id": 11, "name": "Prod Alerts", "incident_preference": "PER_POLICY" }]
        })))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_dry_run_json_against_service() {
    let server = MockServer::start().await;
    mount_prod_policy(&server).await;
    Mock::given(method("GET"))
        .and(path("/v2/alerts_nrql_conditions.json"))
        .and(query_param("policy_id", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "nrql_conditions": [{
                "id": 7, "name": "stale", "enabled": true, "terms": [],
                "value_function": "single_value",
                "nrql": { "query": "SELECT 1 FROM Transaction", "since_value": "3" }
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let file = ConfigFile::new("alerts.toml", CONFIG);
    let config_path = file.path().to_path_buf();
    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        alerts_cmd()
            .arg("sync")
            .arg(&config_path)
            .args(["--dry-run", "--json", "--api-key", "key", "--api-url", uri.as_str()])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["policies"][0]["policy_id"], 11);
    assert_eq!(
        report["policies"][0]["actions"],
        json!([
            { "operation": "create", "kind": "nrql_condition", "name": "cpu-high" },
            { "operation": "delete", "kind": "nrql_condition", "name": "stale", "id": 7 }
        ])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_unknown_policy_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/alerts_policies.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "policies": [] })))
        .mount(&server)
        .await;

    let file = ConfigFile::new("alerts.toml", CONFIG);
    let config_path = file.path().to_path_buf();
    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        alerts_cmd()
            .arg("sync")
            .arg(&config_path)
            .env("NEW_RELIC_API_KEY", "key")
            .args(["--api-url", uri.as_str()])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Policy Prod Alerts does not exist"), "stderr: {}", stderr);
}
