//! Name-to-identifier resolution of policies and applications
//!
//! Runs before any mapping so the mapper itself never performs I/O.

use std::collections::HashMap;

use alerts_api::AlertsApi;
use tracing::debug;

use crate::{Error, Result};

/// A policy that exists remotely
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPolicy {
    pub id: u64,
    pub name: String,
}

/// Application identifiers keyed by application name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityIds {
    applications: HashMap<String, u64>,
}

impl EntityIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, id: u64) {
        self.applications.insert(name.into(), id);
    }

    pub fn application(&self, name: &str) -> Option<u64> {
        self.applications.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

/// Look up a policy by name, failing with [`Error::PolicyNotFound`] if absent
pub fn resolve_policy<A: AlertsApi>(api: &A, name: &str) -> Result<ResolvedPolicy> {
    let policy = api
        .policy_by_name(name)
        .map_err(|e| Error::remote(name, "look up policy", e))?
        .ok_or_else(|| Error::PolicyNotFound {
            name: name.to_string(),
        })?;

    let id = policy.id.ok_or_else(|| alerts_api::Error::MissingId {
        kind: "policy".to_string(),
        name: policy.name.clone(),
    })?;

    debug!(policy = name, id, "Resolved policy");
    Ok(ResolvedPolicy {
        id,
        name: policy.name,
    })
}

/// Resolve every application name referenced by a policy's conditions
pub fn resolve_applications<'a, A: AlertsApi>(
    api: &A,
    policy: &ResolvedPolicy,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<EntityIds> {
    let mut ids = EntityIds::new();
    for name in names {
        if ids.application(name).is_some() {
            continue;
        }

        let application = api
            .application_by_name(name)
            .map_err(|e| Error::remote(&policy.name, format!("look up application '{}'", name), e))?
            .ok_or_else(|| Error::ApplicationNotFound {
                policy: policy.name.clone(),
                name: name.to_string(),
            })?;

        debug!(application = name, id = application.id, "Resolved application");
        ids.insert(name, application.id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids() {
        let mut ids = EntityIds::new();
        assert!(ids.is_empty());
        ids.insert("orders", 42);
        assert_eq!(ids.application("orders"), Some(42));
        assert_eq!(ids.application("billing"), None);
        assert_eq!(ids.len(), 1);
    }
}
