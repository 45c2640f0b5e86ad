//! Pass-through models for node transaction payloads.
//!
//! The node's transaction JSON is treated as opaque: only the fields this
//! crate routes on (`id`, `execution`, `deployment`, transition outputs) are
//! typed, and everything else is preserved verbatim in flattened maps so a
//! payload can be re-broadcast without loss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<Execution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    /// A confirmed payload carries an `execution` or a `deployment` section;
    /// anything else was rejected by the node.
    pub fn is_accepted(&self) -> bool {
        self.execution.is_some() || self.deployment.is_some()
    }

    pub fn is_deploy(&self) -> bool {
        self.deployment.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub program: String,
    pub function: String,
    #[serde(default)]
    pub inputs: Vec<Value>,
    #[serde(default)]
    pub outputs: Vec<TransitionOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpk: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionOutput {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXECUTE_PAYLOAD: &str = r#"{
        "type": "execute",
        "id": "at1z6ydwyklzlhe4xm8uferf9uevsynxjfkqmgcxps6rjl4x737zq8qr4s3rv",
        "execution": {
            "transitions": [{
                "id": "au16zlg0gwj2wnrxgq8699vdrc46s4a6eefg6frd5skr5e3fr8j2u8q4cs9wz",
                "program": "credits.aleo",
                "function": "transfer_public",
                "inputs": [{"type": "public", "id": "123field", "value": "aleo1abc"}],
                "outputs": [{"type": "future", "id": "456field", "value": "{ program_id: credits.aleo }"}],
                "tpk": "603...group",
                "tcm": "139...field"
            }],
            "global_state_root": "sr1...",
            "proof": "proof1..."
        },
        "fee": {"transition": {}}
    }"#;

    #[test]
    fn test_deserialize_execute_payload() {
        let transaction: Transaction = serde_json::from_str(EXECUTE_PAYLOAD).unwrap();
        assert!(transaction.is_accepted());
        assert!(!transaction.is_deploy());
        let execution = transaction.execution.as_ref().unwrap();
        assert_eq!(execution.transitions.len(), 1);
        assert_eq!(execution.transitions[0].function, "transfer_public");
        assert_eq!(execution.transitions[0].inputs.len(), 1);
        // unknown fields survive in the flattened maps
        assert!(execution.extra.contains_key("proof"));
        assert!(execution.transitions[0].extra.contains_key("tcm"));
    }

    #[test]
    fn test_round_trip_preserves_unknown_fields() {
        let transaction: Transaction = serde_json::from_str(EXECUTE_PAYLOAD).unwrap();
        let rendered = serde_json::to_value(&transaction).unwrap();
        let original: Value = serde_json::from_str(EXECUTE_PAYLOAD).unwrap();
        assert_eq!(rendered, original);
    }

    #[test]
    fn test_rejected_payload_is_not_accepted() {
        let transaction: Transaction =
            serde_json::from_str(r#"{"id": "at1abc", "error": "rejected"}"#).unwrap();
        assert!(!transaction.is_accepted());
    }
}
