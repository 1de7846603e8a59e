//! Wire model of the remote alerting API
//!
//! These types mirror the JSON schema of the service. Fields the service
//! manages itself (identifiers, links) are optional so the same type can be
//! sent on create/update and read back from list calls.

mod channel;
mod condition;
mod nrql;
mod policy;
mod synthetics;

pub use channel::{AlertsChannel, ChannelConfiguration, ChannelLinks};
pub use condition::{AlertsCondition, AlertsExternalServiceCondition, Terms};
pub use nrql::{AlertsNrqlCondition, Nrql, Signal};
pub use policy::{AlertsPolicy, Application};
pub use synthetics::AlertsSyntheticsCondition;
