//! Resource kinds managed under a policy
//!
//! Every wire entity that lives inside a policy implements [`Resource`], which
//! is all the generic client and the reconciler need to know about it.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The categories of entity attached to a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Channel,
    ApmCondition,
    ExternalServiceCondition,
    NrqlCondition,
    SyntheticsCondition,
}

impl ResourceKind {
    /// Collection segment of the REST path, e.g. `alerts_nrql_conditions`
    pub fn collection(self) -> &'static str {
        match self {
            Self::Channel => "alerts_channels",
            Self::ApmCondition => "alerts_conditions",
            Self::ExternalServiceCondition => "alerts_external_service_conditions",
            Self::NrqlCondition => "alerts_nrql_conditions",
            Self::SyntheticsCondition => "alerts_synthetics_conditions",
        }
    }

    /// JSON key wrapping a list of entities in responses
    pub fn list_key(self) -> &'static str {
        match self {
            Self::Channel => "channels",
            Self::ApmCondition => "conditions",
            Self::ExternalServiceCondition => "external_service_conditions",
            Self::NrqlCondition => "nrql_conditions",
            Self::SyntheticsCondition => "synthetics_conditions",
        }
    }

    /// JSON key wrapping a single entity in requests and responses
    pub fn item_key(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::ApmCondition => "condition",
            Self::ExternalServiceCondition => "external_service_condition",
            Self::NrqlCondition => "nrql_condition",
            Self::SyntheticsCondition => "synthetics_condition",
        }
    }

    /// Human-readable label used in logs and error messages
    pub fn label(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::ApmCondition => "APM condition",
            Self::ExternalServiceCondition => "external service condition",
            Self::NrqlCondition => "NRQL condition",
            Self::SyntheticsCondition => "synthetics condition",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A wire entity owned by (or associated with) a policy
pub trait Resource: Clone + fmt::Debug + Serialize + DeserializeOwned {
    const KIND: ResourceKind;

    /// Whether entities of this kind live account-wide and are associated
    /// with policies, rather than being owned by a single policy.
    ///
    /// Shared entities are matched by name across the account, attached to
    /// and detached from policies, and only deleted once no policy links
    /// them.
    const SHARED: bool = false;

    /// Server-assigned identifier, `None` until the entity is created
    fn id(&self) -> Option<u64>;

    fn name(&self) -> &str;

    /// Whether a listed entity belongs to the given policy.
    ///
    /// Conditions are listed per policy so they always do; channels are
    /// listed account-wide and carry their policy links.
    fn belongs_to(&self, _policy_id: u64) -> bool {
        true
    }

    /// Whether a listed entity is still associated with any policy other
    /// than `policy_id`
    fn linked_elsewhere(&self, _policy_id: u64) -> bool {
        false
    }
}
