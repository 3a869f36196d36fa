//! Transaction payload.
//!
//! The contract-testing tool owns the shape of a transaction; hooks only read
//! it (and may flag it skipped or failed). Fields the lifecycle needs are
//! typed, everything else is kept verbatim in `extra`. Explicit `null`s
//! deserialize to `None` and are not written back, so the hooks-handler
//! replies from the received JSON rather than from this struct.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One request/response exchange under contract test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Full transaction name, e.g. `"Machines > Machines collection > Get Machines"`.
    /// Named hooks match on this.
    #[serde(default)]
    pub name: String,
    /// Tool-assigned identifier (`"GET (200) /machines"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Where the transaction came from in the API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Value>,
    /// Request path including the server's base path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
    /// Request about to be sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Value>,
    /// Response the API description expects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
    /// Response actually received (present after execution).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real: Option<Value>,
    /// Set by a hook to skip execution and validation.
    #[serde(default)]
    pub skip: bool,
    /// Set by a hook to fail the transaction (`true` or a message).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail: Option<Value>,
    /// Test outcome reported by the tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<Value>,
    /// Validation results reported by the tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    /// Any other fields, preserved as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    /// Create a transaction with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_tool_payload() {
        let raw = json!({
            "name": "Machines > Machines collection > Get Machines",
            "id": "GET (200) /machines",
            "host": "127.0.0.1",
            "port": "3000",
            "fullPath": "/machines",
            "request": {"method": "GET", "uri": "/machines", "headers": {}, "body": ""},
            "expected": {"statusCode": "200"},
            "skip": false
        });
        let tx: Transaction = serde_json::from_value(raw).unwrap();
        assert_eq!(tx.name, "Machines > Machines collection > Get Machines");
        assert_eq!(tx.full_path.as_deref(), Some("/machines"));
        assert!(!tx.skip);
        assert_eq!(tx.extra.get("host"), Some(&json!("127.0.0.1")));
        assert_eq!(tx.extra.get("port"), Some(&json!("3000")));
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = json!({
            "name": "A > B",
            "skip": false,
            "protocol": "http:",
            "nested": {"deep": [1, 2, 3]}
        });
        let tx: Transaction = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&tx).unwrap(), raw);
    }

    #[test]
    fn skip_always_serialized() {
        let mut tx = Transaction::named("A");
        assert_eq!(serde_json::to_value(&tx).unwrap()["skip"], json!(false));
        tx.skip = true;
        assert_eq!(serde_json::to_value(&tx).unwrap()["skip"], json!(true));
    }

    #[test]
    fn explicit_null_reads_as_absent() {
        let tx: Transaction = serde_json::from_value(json!({"name": "A", "test": null, "id": null})).unwrap();
        assert_eq!(tx, Transaction::named("A"));
    }

    #[test]
    fn missing_name_defaults_to_empty() {
        let tx: Transaction = serde_json::from_value(json!({})).unwrap();
        assert!(tx.name.is_empty());
    }
}
