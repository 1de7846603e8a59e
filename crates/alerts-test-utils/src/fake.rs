//! In-memory [`AlertsApi`] for reconciliation tests.
//!
//! Entities are stored as JSON values so one store serves every resource
//! type. Every call is recorded, and any call can be made to fail.

use std::cell::RefCell;

use alerts_api::model::{AlertsPolicy, Application};
use alerts_api::{AlertsApi, Error, Resource, ResourceKind, Result};
use serde_json::{Value, json};

/// A call received by [`FakeAlertsApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    PolicyByName(String),
    ApplicationByName(String),
    List { kind: ResourceKind, policy_id: u64 },
    ListAll { kind: ResourceKind },
    Create { kind: ResourceKind, policy_id: u64, name: String },
    Update { kind: ResourceKind, id: u64, name: String },
    Delete { kind: ResourceKind, id: u64 },
    Attach { kind: ResourceKind, policy_id: u64, id: u64 },
    Detach { kind: ResourceKind, policy_id: u64, id: u64 },
}

impl ApiCall {
    /// Whether the call changes remote state
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            ApiCall::Create { .. }
                | ApiCall::Update { .. }
                | ApiCall::Delete { .. }
                | ApiCall::Attach { .. }
                | ApiCall::Detach { .. }
        )
    }
}

struct Stored {
    kind: ResourceKind,
    /// Owning policy for conditions; every linked policy for channels
    policy_ids: Vec<u64>,
    id: u64,
    value: Value,
}

impl Stored {
    fn new<R: Resource>(id: u64, policy_ids: Vec<u64>, value: Value) -> Self {
        let value = with_server_fields::<R>(value, id, &policy_ids);
        Self {
            kind: R::KIND,
            policy_ids,
            id,
            value,
        }
    }

    fn relink<R: Resource>(&mut self) {
        self.value = with_server_fields::<R>(self.value.take(), self.id, &self.policy_ids);
    }
}

type FailWhen = Box<dyn Fn(&ApiCall) -> bool>;

struct State {
    next_id: u64,
    policies: Vec<AlertsPolicy>,
    applications: Vec<Application>,
    entities: Vec<Stored>,
    calls: Vec<ApiCall>,
    fail_when: Option<FailWhen>,
}

/// In-memory alerting service
///
/// # Example
///
/// ```rust
/// use alerts_api::AlertsApi;
/// use alerts_test_utils::FakeAlertsApi;
///
/// let api = FakeAlertsApi::new().with_policy(1, "Prod Alerts");
/// assert!(api.policy_by_name("Prod Alerts").unwrap().is_some());
/// assert_eq!(api.calls().len(), 1);
/// ```
pub struct FakeAlertsApi {
    state: RefCell<State>,
}

impl Default for FakeAlertsApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeAlertsApi {
    /// An empty service; assigned identifiers start at 1000.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                next_id: 1000,
                policies: Vec::new(),
                applications: Vec::new(),
                entities: Vec::new(),
                calls: Vec::new(),
                fail_when: None,
            }),
        }
    }

    pub fn with_policy(self, id: u64, name: &str) -> Self {
        self.state.borrow_mut().policies.push(AlertsPolicy {
            id: Some(id),
            name: name.to_string(),
            incident_preference: Some("PER_POLICY".to_string()),
        });
        self
    }

    pub fn with_application(self, id: u64, name: &str) -> Self {
        self.state.borrow_mut().applications.push(Application {
            id,
            name: name.to_string(),
        });
        self
    }

    /// Make every call matching `predicate` fail with a 500 status.
    ///
    /// Failed calls are still recorded.
    pub fn fail_when(self, predicate: impl Fn(&ApiCall) -> bool + 'static) -> Self {
        self.state.borrow_mut().fail_when = Some(Box::new(predicate));
        self
    }

    /// Store an existing entity under a policy without recording a call.
    ///
    /// Returns the entity's identifier, assigning one if it has none.
    pub fn seed<R: Resource>(&self, policy_id: u64, entity: &R) -> u64 {
        self.seed_linked(&[policy_id], entity)
    }

    /// Store an existing shared entity linked to several policies (or none).
    pub fn seed_linked<R: Resource>(&self, policy_ids: &[u64], entity: &R) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = match entity.id() {
            Some(id) => id,
            None => state.assign_id(),
        };
        let value = serde_json::to_value(entity).expect("seeded entity serializes");
        state.entities.push(Stored::new::<R>(id, policy_ids.to_vec(), value));
        id
    }

    /// Entities of type `R` currently stored under a policy
    pub fn entities<R: Resource>(&self, policy_id: u64) -> Vec<R> {
        self.state
            .borrow()
            .stored(R::KIND, policy_id)
            .map(|s| serde_json::from_value(s.value.clone()).expect("stored entity deserializes"))
            .collect()
    }

    /// Policies linked to the entity, or `None` once it has been deleted
    pub fn linked_policies<R: Resource>(&self, id: u64) -> Option<Vec<u64>> {
        let state = self.state.borrow();
        state
            .position(R::KIND, id)
            .map(|index| state.entities[index].policy_ids.clone())
    }

    /// Names of the entities of type `R` stored under a policy, in store order
    pub fn names<R: Resource>(&self, policy_id: u64) -> Vec<String> {
        self.entities::<R>(policy_id)
            .iter()
            .map(|e| e.name().to_string())
            .collect()
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.borrow().calls.clone()
    }

    /// Create, update and delete calls received so far
    pub fn mutations(&self) -> Vec<ApiCall> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.is_mutation())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn record(&self, call: ApiCall) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let fail = state.fail_when.as_ref().is_some_and(|f| f(&call));
        state.calls.push(call.clone());
        if fail {
            return Err(Error::Status {
                method: "FAKE".to_string(),
                url: format!("{:?}", call),
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl State {
    fn assign_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn stored(&self, kind: ResourceKind, policy_id: u64) -> impl Iterator<Item = &Stored> {
        self.entities
            .iter()
            .filter(move |s| s.kind == kind && s.policy_ids.contains(&policy_id))
    }

    fn position(&self, kind: ResourceKind, id: u64) -> Option<usize> {
        self.entities.iter().position(|s| s.kind == kind && s.id == id)
    }
}

/// Add the fields the service manages itself
fn with_server_fields<R: Resource>(mut value: Value, id: u64, policy_ids: &[u64]) -> Value {
    value["id"] = json!(id);
    if R::SHARED {
        value["links"] = json!({ "policy_ids": policy_ids });
    }
    value
}

fn not_shared<R: Resource>(operation: &str) -> Error {
    Error::NotShared {
        operation: operation.to_string(),
        kind: R::KIND.label().to_string(),
    }
}

fn not_found(kind: ResourceKind, id: u64) -> Error {
    Error::Status {
        method: "FAKE".to_string(),
        url: format!("{}/{}", kind.collection(), id),
        status: 404,
        body: "not found".to_string(),
    }
}

impl AlertsApi for FakeAlertsApi {
    fn policy_by_name(&self, name: &str) -> Result<Option<AlertsPolicy>> {
        self.record(ApiCall::PolicyByName(name.to_string()))?;
        Ok(self
            .state
            .borrow()
            .policies
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    fn application_by_name(&self, name: &str) -> Result<Option<Application>> {
        self.record(ApiCall::ApplicationByName(name.to_string()))?;
        Ok(self
            .state
            .borrow()
            .applications
            .iter()
            .find(|a| a.name == name)
            .cloned())
    }

    fn list<R: Resource>(&self, policy_id: u64) -> Result<Vec<R>> {
        self.record(ApiCall::List {
            kind: R::KIND,
            policy_id,
        })?;
        self.state
            .borrow()
            .stored(R::KIND, policy_id)
            .map(|s| serde_json::from_value(s.value.clone()).map_err(Error::from))
            .collect()
    }

    fn list_all<R: Resource>(&self) -> Result<Vec<R>> {
        self.record(ApiCall::ListAll { kind: R::KIND })?;
        if !R::SHARED {
            return Err(not_shared::<R>("list all"));
        }
        self.state
            .borrow()
            .entities
            .iter()
            .filter(|s| s.kind == R::KIND)
            .map(|s| serde_json::from_value(s.value.clone()).map_err(Error::from))
            .collect()
    }

    fn create<R: Resource>(&self, policy_id: u64, entity: &R) -> Result<R> {
        self.record(ApiCall::Create {
            kind: R::KIND,
            policy_id,
            name: entity.name().to_string(),
        })?;
        let mut state = self.state.borrow_mut();
        let id = state.assign_id();
        let stored = Stored::new::<R>(id, vec![policy_id], serde_json::to_value(entity)?);
        let created = serde_json::from_value(stored.value.clone())?;
        state.entities.push(stored);
        Ok(created)
    }

    fn update<R: Resource>(&self, id: u64, entity: &R) -> Result<R> {
        self.record(ApiCall::Update {
            kind: R::KIND,
            id,
            name: entity.name().to_string(),
        })?;
        let mut state = self.state.borrow_mut();
        let index = state.position(R::KIND, id).ok_or_else(|| not_found(R::KIND, id))?;
        let stored = &mut state.entities[index];
        stored.value = serde_json::to_value(entity)?;
        stored.relink::<R>();
        Ok(serde_json::from_value(stored.value.clone())?)
    }

    fn delete<R: Resource>(&self, id: u64) -> Result<()> {
        self.record(ApiCall::Delete { kind: R::KIND, id })?;
        let mut state = self.state.borrow_mut();
        let index = state.position(R::KIND, id).ok_or_else(|| not_found(R::KIND, id))?;
        state.entities.remove(index);
        Ok(())
    }

    fn attach<R: Resource>(&self, policy_id: u64, id: u64) -> Result<()> {
        self.record(ApiCall::Attach {
            kind: R::KIND,
            policy_id,
            id,
        })?;
        if !R::SHARED {
            return Err(not_shared::<R>("attach"));
        }
        let mut state = self.state.borrow_mut();
        let index = state.position(R::KIND, id).ok_or_else(|| not_found(R::KIND, id))?;
        let stored = &mut state.entities[index];
        if !stored.policy_ids.contains(&policy_id) {
            stored.policy_ids.push(policy_id);
            stored.relink::<R>();
        }
        Ok(())
    }

    fn detach<R: Resource>(&self, policy_id: u64, id: u64) -> Result<()> {
        self.record(ApiCall::Detach {
            kind: R::KIND,
            policy_id,
            id,
        })?;
        if !R::SHARED {
            return Err(not_shared::<R>("detach"));
        }
        let mut state = self.state.borrow_mut();
        let index = state.position(R::KIND, id).ok_or_else(|| not_found(R::KIND, id))?;
        let stored = &mut state.entities[index];
        if !stored.policy_ids.contains(&policy_id) {
            return Err(not_found(R::KIND, id));
        }
        stored.policy_ids.retain(|&p| p != policy_id);
        stored.relink::<R>();
        Ok(())
    }
}
