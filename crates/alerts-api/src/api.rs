//! The client interface the synchronizer depends on

use crate::Result;
use crate::model::{AlertsPolicy, Application};
use crate::resource::Resource;

/// Per-resource operations of the remote alerting service.
///
/// Implementations are passed explicitly to whatever needs them; nothing
/// holds a client globally. Calls are blocking and never retried.
pub trait AlertsApi {
    /// Find a policy by its exact name
    fn policy_by_name(&self, name: &str) -> Result<Option<AlertsPolicy>>;

    /// Find an application by its exact name
    fn application_by_name(&self, name: &str) -> Result<Option<Application>>;

    /// List every entity of kind `R` attached to a policy
    fn list<R: Resource>(&self, policy_id: u64) -> Result<Vec<R>>;

    /// List every entity of a shared kind in the account, whatever policies
    /// it is linked to
    fn list_all<R: Resource>(&self) -> Result<Vec<R>>;

    /// Create an entity under a policy and return it with its identifier
    fn create<R: Resource>(&self, policy_id: u64, entity: &R) -> Result<R>;

    /// Replace the entity with the given identifier
    fn update<R: Resource>(&self, id: u64, entity: &R) -> Result<R>;

    /// Delete the entity with the given identifier
    fn delete<R: Resource>(&self, id: u64) -> Result<()>;

    /// Associate an existing shared entity with a policy
    fn attach<R: Resource>(&self, policy_id: u64, id: u64) -> Result<()>;

    /// Remove a shared entity's association with a policy, leaving the
    /// entity itself in place
    fn detach<R: Resource>(&self, policy_id: u64, id: u64) -> Result<()>;
}
