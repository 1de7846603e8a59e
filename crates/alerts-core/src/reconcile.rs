//! Name-based reconciliation of one entity category
//!
//! Desired entities are matched against observed entities by [`MatchKey`],
//! their exact (case-sensitive) name. Matches are updated unconditionally,
//! unmatched desired entities are created and every observed entity left
//! unmatched is deleted. Renaming an entity is therefore a delete followed by
//! a create.
//!
//! When several observed entities share a name, the one with the lowest
//! identifier is matched and the others are deleted as orphans.
//!
//! Shared kinds (channels) live account-wide and are only associated with
//! policies. For those, a desired entity missing from the policy but present
//! elsewhere in the account is attached rather than created, and an orphan
//! still linked to another policy is detached rather than deleted.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;

use alerts_api::{AlertsApi, Resource};
use tracing::{debug, info, warn};

use crate::mapper::Desired;
use crate::resolve::{EntityIds, ResolvedPolicy};
use crate::sync::{ActionRecord, Operation};
use crate::{Error, Result};

/// Identity used to correlate desired and observed entities
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey(String);

impl MatchKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MatchKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One remote mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Action<W> {
    Create(W),
    Update { id: u64, entity: W },
    /// Link an existing shared entity to the policy, then update it
    Attach { id: u64, entity: W },
    Delete { id: u64, name: String },
    /// Unlink a shared entity that other policies still use
    Detach { id: u64, name: String },
}

impl<W: Resource> Action<W> {
    pub fn operation(&self) -> Operation {
        match self {
            Action::Create(_) => Operation::Create,
            Action::Update { .. } => Operation::Update,
            Action::Attach { .. } => Operation::Attach,
            Action::Delete { .. } => Operation::Delete,
            Action::Detach { .. } => Operation::Detach,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Action::Create(entity)
            | Action::Update { entity, .. }
            | Action::Attach { entity, .. } => entity.name(),
            Action::Delete { name, .. } | Action::Detach { name, .. } => name,
        }
    }

    /// Remote identifier the action targets; `None` for creates
    pub fn id(&self) -> Option<u64> {
        match self {
            Action::Create(_) => None,
            Action::Update { id, .. }
            | Action::Attach { id, .. }
            | Action::Delete { id, .. }
            | Action::Detach { id, .. } => Some(*id),
        }
    }
}

/// Record `id` under `name`, keeping the lowest; true if the name was taken
fn keep_lowest(index: &mut HashMap<MatchKey, u64>, name: &str, id: u64) -> bool {
    match index.get_mut(name) {
        Some(kept) => {
            *kept = (*kept).min(id);
            true
        }
        None => {
            index.insert(MatchKey::new(name), id);
            false
        }
    }
}

/// Compute the actions aligning the entities of policy `policy_id` in
/// `observed` with `desired`.
///
/// `observed` may hold entities of other policies (shared kinds are listed
/// account-wide); those are only ever attached, never updated in place or
/// removed. Creates, updates and attaches follow the order of `desired`;
/// deletes and detaches follow the order of `observed`. Observed entities
/// without an identifier cannot be addressed and are ignored.
pub fn plan<W: Resource>(policy_id: u64, desired: Vec<W>, observed: &[W]) -> Vec<Action<W>> {
    let mut linked: HashMap<MatchKey, u64> = HashMap::new();
    let mut elsewhere: HashMap<MatchKey, u64> = HashMap::new();
    for entity in observed {
        let Some(id) = entity.id() else {
            warn!(kind = %W::KIND, name = entity.name(), "Ignoring listed entity without id");
            continue;
        };
        if !entity.belongs_to(policy_id) {
            keep_lowest(&mut elsewhere, entity.name(), id);
        } else if keep_lowest(&mut linked, entity.name(), id) {
            warn!(
                kind = %W::KIND,
                name = entity.name(),
                "Duplicate remote name, keeping the lowest id"
            );
        }
    }

    let mut retained = HashSet::new();
    let mut actions = Vec::with_capacity(desired.len());
    for entity in desired {
        let name = entity.name();
        if let Some(&id) = linked.get(name) {
            retained.insert(id);
            actions.push(Action::Update { id, entity });
        } else if let Some(&id) = elsewhere.get(name) {
            actions.push(Action::Attach { id, entity });
        } else {
            actions.push(Action::Create(entity));
        }
    }

    for entity in observed {
        let Some(id) = entity.id() else { continue };
        if !entity.belongs_to(policy_id) || retained.contains(&id) {
            continue;
        }
        let name = entity.name().to_string();
        if entity.linked_elsewhere(policy_id) {
            actions.push(Action::Detach { id, name });
        } else {
            actions.push(Action::Delete { id, name });
        }
    }

    actions
}

/// Applies reconciliation plans through an [`AlertsApi`]
pub struct Reconciler<'a, A> {
    api: &'a A,
    dry_run: bool,
}

impl<'a, A: AlertsApi> Reconciler<'a, A> {
    pub fn new(api: &'a A, dry_run: bool) -> Self {
        Self { api, dry_run }
    }

    /// Reconcile one category of a policy.
    ///
    /// Every desired entity is mapped before the first remote call, so a
    /// mapping failure leaves the remote state untouched. Remote failures
    /// stop the category immediately; earlier calls are not rolled back.
    pub fn reconcile<D: Desired>(
        &self,
        policy: &ResolvedPolicy,
        desired: &[D],
        ids: &EntityIds,
    ) -> Result<Vec<ActionRecord>> {
        let kind = <D::Wire as Resource>::KIND;

        let wire = desired
            .iter()
            .map(|d| d.to_wire(&policy.name, ids))
            .collect::<Result<Vec<_>>>()?;

        let observed: Vec<D::Wire> = if <D::Wire as Resource>::SHARED {
            self.api.list_all::<D::Wire>()
        } else {
            self.api.list::<D::Wire>(policy.id)
        }
        .map_err(|e| Error::remote(&policy.name, format!("list {}s", kind), e))?;
        debug!(
            policy = %policy.name,
            kind = %kind,
            desired = wire.len(),
            observed = observed.len(),
            "Reconciling"
        );

        plan(policy.id, wire, &observed)
            .into_iter()
            .map(|action| self.apply(policy, action))
            .collect()
    }

    fn apply<W: Resource>(&self, policy: &ResolvedPolicy, action: Action<W>) -> Result<ActionRecord> {
        let kind = W::KIND;
        let operation = action.operation();
        let name = action.name().to_string();

        if self.dry_run {
            let id = action.id();
            info!(
                "[dry-run] Would {} {} {} for policy {} (id: {})",
                operation, kind, name, policy.name, policy.id
            );
            return Ok(ActionRecord::new(operation, kind, name, id));
        }

        let failed = |e: alerts_api::Error| {
            Error::remote(&policy.name, format!("{} {} '{}'", operation, kind, name), e)
        };

        let id = match action {
            Action::Create(entity) => {
                let created = self.api.create(policy.id, &entity).map_err(failed)?;
                let id = created.id().ok_or_else(|| alerts_api::Error::MissingId {
                    kind: kind.to_string(),
                    name: name.clone(),
                })?;
                info!(
                    "{} {} (id: {}) created for policy {} (id: {})",
                    kind, name, id, policy.name, policy.id
                );
                id
            }
            Action::Update { id, entity } => {
                self.api.update(id, &entity).map_err(failed)?;
                info!(
                    "{} {} (id: {}) updated for policy {} (id: {})",
                    kind, name, id, policy.name, policy.id
                );
                id
            }
            Action::Attach { id, entity } => {
                self.api.attach::<W>(policy.id, id).map_err(failed)?;
                self.api.update(id, &entity).map_err(failed)?;
                info!(
                    "{} {} (id: {}) attached to policy {} (id: {})",
                    kind, name, id, policy.name, policy.id
                );
                id
            }
            Action::Delete { id, .. } => {
                self.api.delete::<W>(id).map_err(failed)?;
                info!(
                    "{} {} (id: {}) removed from policy {} (id: {})",
                    kind, name, id, policy.name, policy.id
                );
                id
            }
            Action::Detach { id, .. } => {
                self.api.detach::<W>(policy.id, id).map_err(failed)?;
                info!(
                    "{} {} (id: {}) detached from policy {} (id: {}), still used elsewhere",
                    kind, name, id, policy.name, policy.id
                );
                id
            }
        };

        Ok(ActionRecord::new(operation, kind, name, Some(id)))
    }
}
