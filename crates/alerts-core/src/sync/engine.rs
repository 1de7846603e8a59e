//! SyncEngine implementation
//!
//! The SyncEngine drives a run: policies are processed one at a time in
//! configuration order and, within a policy, categories are reconciled in a
//! fixed order (channels first, then each condition type).

use alerts_api::{AlertsApi, Resource};
use alerts_config::{AlertsConfig, PolicyConfig};
use tracing::{debug, info};

use super::report::{PolicyReport, SyncReport};
use crate::Result;
use crate::mapper::Desired;
use crate::reconcile::Reconciler;
use crate::resolve::{EntityIds, ResolvedPolicy, resolve_applications, resolve_policy};

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, only read remote state and report what would change.
    /// Actions are logged as "[dry-run] Would ..."
    pub dry_run: bool,
}

/// Engine aligning remote alert policies with a desired configuration
pub struct SyncEngine<'a, A> {
    api: &'a A,
    options: SyncOptions,
}

impl<'a, A: AlertsApi> SyncEngine<'a, A> {
    pub fn new(api: &'a A, options: SyncOptions) -> Self {
        Self { api, options }
    }

    /// Synchronize every policy of the configuration.
    ///
    /// The configuration is validated as a whole before the first remote
    /// call. The first error terminates the run; changes already made stay.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] for an invalid configuration,
    /// [`crate::Error::PolicyNotFound`] or [`crate::Error::ApplicationNotFound`]
    /// for unknown names and [`crate::Error::Remote`] for failed calls.
    pub fn sync(&self, config: &AlertsConfig) -> Result<SyncReport> {
        config.validate()?;

        let mut report = SyncReport::new(self.options.dry_run);
        for policy in &config.policies {
            report.policies.push(self.sync_policy(policy)?);
        }

        info!(
            policies = report.policies.len(),
            actions = report.actions().count(),
            dry_run = self.options.dry_run,
            "Synchronization finished"
        );
        Ok(report)
    }

    /// Synchronize a single policy without validating it first
    pub fn sync_policy(&self, config: &PolicyConfig) -> Result<PolicyReport> {
        let policy = resolve_policy(self.api, &config.name)?;
        let ids = resolve_applications(self.api, &policy, config.application_names())?;

        let mut report = PolicyReport::new(policy.name.clone(), policy.id);
        let reconciler = Reconciler::new(self.api, self.options.dry_run);

        self.category(&reconciler, &policy, config.channels.as_deref(), &ids, &mut report)?;
        self.category(&reconciler, &policy, config.apm_conditions.as_deref(), &ids, &mut report)?;
        self.category(
            &reconciler,
            &policy,
            config.external_service_conditions.as_deref(),
            &ids,
            &mut report,
        )?;
        self.category(&reconciler, &policy, config.nrql_conditions.as_deref(), &ids, &mut report)?;
        self.category(
            &reconciler,
            &policy,
            config.synthetics_conditions.as_deref(),
            &ids,
            &mut report,
        )?;

        Ok(report)
    }

    fn category<D: Desired>(
        &self,
        reconciler: &Reconciler<'_, A>,
        policy: &ResolvedPolicy,
        desired: Option<&[D]>,
        ids: &EntityIds,
        report: &mut PolicyReport,
    ) -> Result<()> {
        let Some(desired) = desired else {
            debug!(
                "No {}s for policy {} - skipping...",
                <D::Wire as Resource>::KIND,
                policy.name
            );
            return Ok(());
        };

        let actions = reconciler.reconcile(policy, desired, ids)?;
        report.actions.extend(actions);
        Ok(())
    }
}
