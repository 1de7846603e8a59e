//! Reports of a synchronization run

use std::fmt;

use alerts_api::ResourceKind;
use serde::Serialize;

/// Kind of remote mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Existing shared entity linked to the policy
    Attach,
    /// Shared entity unlinked from the policy but kept for others
    Detach,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Attach => "attach",
            Operation::Detach => "detach",
        })
    }
}

/// A single remote mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    pub operation: Operation,
    pub kind: ResourceKind,
    pub name: String,
    /// Remote identifier; absent for creates planned in dry-run mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl ActionRecord {
    pub fn new(operation: Operation, kind: ResourceKind, name: impl Into<String>, id: Option<u64>) -> Self {
        Self {
            operation,
            kind,
            name: name.into(),
            id,
        }
    }
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} '{}'", self.operation, self.kind, self.name)?;
        if let Some(id) = self.id {
            write!(f, " (id: {})", id)?;
        }
        Ok(())
    }
}

/// Actions taken for one policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyReport {
    pub policy: String,
    pub policy_id: u64,
    pub actions: Vec<ActionRecord>,
}

impl PolicyReport {
    pub fn new(policy: impl Into<String>, policy_id: u64) -> Self {
        Self {
            policy: policy.into(),
            policy_id,
            actions: Vec::new(),
        }
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.actions.iter().filter(|a| a.operation == operation).count()
    }
}

/// Report from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Whether the actions were only planned
    pub dry_run: bool,
    pub policies: Vec<PolicyReport>,
}

impl SyncReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            policies: Vec::new(),
        }
    }

    /// Number of actions of the given kind across all policies
    pub fn count(&self, operation: Operation) -> usize {
        self.policies.iter().map(|p| p.count(operation)).sum()
    }

    pub fn is_noop(&self) -> bool {
        self.policies.iter().all(|p| p.actions.is_empty())
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionRecord> {
        self.policies.iter().flat_map(|p| p.actions.iter())
    }
}
