//! Validate command implementation

use std::path::Path;

use alerts_config::PolicyConfig;
use colored::Colorize;

use crate::error::{CliError, Result};

/// Run the validate command
///
/// Parses the file and reports every validation issue; never contacts the
/// service.
pub fn run_validate(config_path: &Path) -> Result<()> {
    let config = alerts_config::read_config(config_path)?;
    let issues = alerts_config::validate(&config);

    if issues.is_empty() {
        println!(
            "{} {} is valid ({} polic{}).",
            "OK".green().bold(),
            config_path.display(),
            config.policies.len(),
            if config.policies.len() == 1 { "y" } else { "ies" }
        );
        for policy in &config.policies {
            println!("   {} {}", "-".green(), summarize(policy));
        }
        return Ok(());
    }

    println!("{} {} has problems:", "INVALID".red().bold(), config_path.display());
    for issue in &issues {
        println!("   {} {}", "!".red(), issue);
    }
    Err(CliError::user(format!(
        "Configuration has {} issue(s)",
        issues.len()
    )))
}

/// One line per policy: the managed categories and their sizes
fn summarize(policy: &PolicyConfig) -> String {
    let categories = [
        ("channels", policy.channels.as_ref().map(Vec::len)),
        ("APM conditions", policy.apm_conditions.as_ref().map(Vec::len)),
        (
            "external service conditions",
            policy.external_service_conditions.as_ref().map(Vec::len),
        ),
        ("NRQL conditions", policy.nrql_conditions.as_ref().map(Vec::len)),
        ("synthetics conditions", policy.synthetics_conditions.as_ref().map(Vec::len)),
    ];

    let managed: Vec<String> = categories
        .iter()
        .filter_map(|(label, count)| count.map(|n| format!("{} {}", n, label)))
        .collect();

    if managed.is_empty() {
        format!("{}: nothing managed", policy.name)
    } else {
        format!("{}: {}", policy.name, managed.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerts_test_utils::fixtures::ConfigFile;

    #[test]
    fn test_valid_file() {
        let file = ConfigFile::new(
            "alerts.toml",
            r#"
[[policies]]
name = "Prod Alerts"

[[policies.synthetics_conditions]]
name = "Homepage"
monitor_id = "monitor-1"
"#,
        );
        assert!(run_validate(file.path()).is_ok());
    }

    #[test]
    fn test_invalid_file_reports_issue_count() {
        let file = ConfigFile::new(
            "alerts.toml",
            r#"
[[policies]]
name = "Prod Alerts"

[[policies.synthetics_conditions]]
name = "Homepage"
monitor_id = ""
"#,
        );
        let err = run_validate(file.path()).unwrap_err();
        assert_eq!(err.to_string(), "Configuration has 1 issue(s)");
    }

    #[test]
    fn test_summary_lists_managed_categories() {
        let mut policy = PolicyConfig::new("Prod Alerts");
        assert_eq!(summarize(&policy), "Prod Alerts: nothing managed");

        policy.channels = Some(Vec::new());
        policy.nrql_conditions = Some(vec![alerts_test_utils::fixtures::nrql("cpu", "SELECT 1")]);
        assert_eq!(summarize(&policy), "Prod Alerts: 0 channels, 1 NRQL conditions");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = ConfigFile::new("alerts.ini", "");
        let err = run_validate(file.path()).unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(alerts_config::Error::UnsupportedFormat { .. })
        ));
    }
}
