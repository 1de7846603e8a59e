//! Policy configuration and the configuration root
//!
//! Each category of a policy is optional. A category left out of the file is
//! not synchronized at all, while a category given as an empty list removes
//! every remote entity of that category.

use serde::{Deserialize, Serialize};

use crate::channel::ChannelConfig;
use crate::condition::{ApmCondition, ExternalServiceCondition, NrqlCondition, SyntheticsCondition};
use crate::{Named, Result, validation};

/// Desired state of a single alert policy
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Name of the remote policy, which must already exist
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<ChannelConfig>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apm_conditions: Option<Vec<ApmCondition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_service_conditions: Option<Vec<ExternalServiceCondition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nrql_conditions: Option<Vec<NrqlCondition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthetics_conditions: Option<Vec<SyntheticsCondition>>,
}

impl PolicyConfig {
    /// Create a policy configuration with every category left unmanaged
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: None,
            apm_conditions: None,
            external_service_conditions: None,
            nrql_conditions: None,
            synthetics_conditions: None,
        }
    }

    /// Application names referenced by the conditions of this policy,
    /// in first-seen order and without duplicates
    pub fn application_names(&self) -> Vec<&str> {
        let apm = self
            .apm_conditions
            .iter()
            .flatten()
            .flat_map(|c| c.entities.iter());
        let external = self
            .external_service_conditions
            .iter()
            .flatten()
            .flat_map(|c| c.entities.iter());

        let mut names: Vec<&str> = Vec::new();
        for name in apm.chain(external) {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }
}

impl Named for PolicyConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Root of a desired-state file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AlertsConfig {
    #[serde(default)]
    pub policies: Vec<PolicyConfig>,
}

impl AlertsConfig {
    /// Parse a configuration from TOML content without validating it
    ///
    /// # Example
    ///
    /// ```
    /// use alerts_config::AlertsConfig;
    ///
    /// let config = AlertsConfig::parse(r#"
    /// [[policies]]
    /// name = "Prod Alerts"
    /// "#).unwrap();
    ///
    /// assert_eq!(config.policies[0].name, "Prod Alerts");
    /// ```
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Validate the whole configuration, reporting every issue found
    pub fn validate(&self) -> Result<()> {
        let issues = validation::validate(self);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(crate::Error::Invalid(issues))
        }
    }
}
