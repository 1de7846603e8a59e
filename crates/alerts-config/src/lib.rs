//! Desired-state configuration for the alerts configurator.
//!
//! A configuration file lists alert policies by name together with the
//! channels and conditions each policy should have. This crate parses those
//! files and validates them; it never talks to the remote service.

pub mod channel;
pub mod condition;
pub mod error;
pub mod loader;
pub mod policy;
pub mod terms;
pub mod validation;

pub use channel::{
    ChannelConfig, EmailChannel, OpsGenieChannel, PagerDutyChannel, PayloadType, SlackChannel,
    UserChannel, WebhookChannel,
};
pub use condition::{
    ApmCondition, ApmConditionKind, ConditionScope, ExternalServiceCondition, FillOption,
    NrqlCondition, SignalConfig, SyntheticsCondition, ValueFunction,
};
pub use error::{Error, Result};
pub use loader::{ConfigFormat, load_config, read_config};
pub use policy::{AlertsConfig, PolicyConfig};
pub use terms::{Operator, Priority, TermsConfig, TimeFunction};
pub use validation::{ValidationIssue, validate};

/// Anything identified by a human-chosen name.
///
/// The name is the only key used to match desired entities against the
/// entities that already exist remotely.
pub trait Named {
    fn name(&self) -> &str;
}
