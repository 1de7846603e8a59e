use serde::{Deserialize, Serialize};

use super::Terms;
use crate::resource::{Resource, ResourceKind};

/// Condition driven by an NRQL query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsNrqlCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runbook_url: Option<String>,
    #[serde(default)]
    pub terms: Vec<Terms>,
    pub value_function: String,
    pub nrql: Nrql,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<Signal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nrql {
    pub query: String,
    pub since_value: String,
}

/// Streaming signal settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_option: Option<String>,
    /// Always sent, `null` clears a previously configured value
    #[serde(default)]
    pub fill_value: Option<String>,
}

impl Resource for AlertsNrqlCondition {
    const KIND: ResourceKind = ResourceKind::NrqlCondition;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fill_value_always_serialized() {
        let signal = Signal {
            aggregation_window: Some("60".to_string()),
            evaluation_offset: None,
            fill_option: Some("none".to_string()),
            fill_value: None,
        };

        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "aggregation_window": "60",
                "fill_option": "none",
                "fill_value": null
            })
        );
    }

    #[test]
    fn test_new_condition_has_no_id_field() {
        let condition = AlertsNrqlCondition {
            id: None,
            name: "Errors".to_string(),
            enabled: true,
            runbook_url: None,
            terms: Vec::new(),
            value_function: "single_value".to_string(),
            nrql: Nrql {
                query: "SELECT count(*) FROM TransactionError".to_string(),
                since_value: "3".to_string(),
            },
            signal: None,
        };

        let json = serde_json::to_value(&condition).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["nrql"]["since_value"], "3");
    }
}
