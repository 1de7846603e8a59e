//! Sync command implementation

use std::path::Path;

use alerts_api::HttpAlertsApi;
use alerts_core::{ActionRecord, Operation, PolicyReport, SyncEngine, SyncOptions, SyncReport};
use colored::Colorize;

use crate::cli::ApiArgs;
use crate::error::Result;

/// Run the sync command
///
/// Loads and validates the configuration before connecting, so an invalid
/// file never reaches the service.
pub fn run_sync(config_path: &Path, api: &ApiArgs, dry_run: bool, json: bool) -> Result<()> {
    let config = alerts_config::load_config(config_path)?;
    let client = HttpAlertsApi::new(&api.settings()?)?;

    if !json {
        let verb = if dry_run { "Planning" } else { "Synchronizing" };
        println!(
            "{} {} {} polic{} from {}...",
            "=>".blue().bold(),
            verb,
            config.policies.len(),
            if config.policies.len() == 1 { "y" } else { "ies" },
            config_path.display()
        );
    }

    let report = SyncEngine::new(&client, SyncOptions { dry_run }).sync(&config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    for policy in &report.policies {
        print_policy(policy, report.dry_run);
    }

    let mut summary = format!(
        "{} created, {} updated, {} deleted",
        report.count(Operation::Create),
        report.count(Operation::Update),
        report.count(Operation::Delete)
    );
    let (attached, detached) = (report.count(Operation::Attach), report.count(Operation::Detach));
    if attached + detached > 0 {
        summary.push_str(&format!(", {} attached, {} detached", attached, detached));
    }
    if report.dry_run {
        println!("{} Dry run, nothing changed: would have {}.", "OK".green().bold(), summary);
    } else if report.is_noop() {
        println!("{} Nothing to synchronize.", "OK".green().bold());
    } else {
        println!("{} Synchronization complete: {}.", "OK".green().bold(), summary);
    }
}

fn print_policy(policy: &PolicyReport, dry_run: bool) {
    println!(
        "{} {} (id: {})",
        "Policy".bold(),
        policy.policy.cyan(),
        policy.policy_id
    );
    for action in &policy.actions {
        println!("   {} {}", marker(action), describe(action, dry_run));
    }
}

fn marker(action: &ActionRecord) -> colored::ColoredString {
    match action.operation {
        Operation::Create => "+".green(),
        Operation::Update => "~".yellow(),
        Operation::Delete => "-".red(),
        Operation::Attach => "+".cyan(),
        Operation::Detach => "-".yellow(),
    }
}

fn describe(action: &ActionRecord, dry_run: bool) -> String {
    if dry_run {
        format!("[dry-run] Would {}", action)
    } else {
        action.to_string()
    }
}
