//! Hooks-handler wire protocol.
//!
//! The contract-testing tool connects over TCP and exchanges one JSON object
//! per line:
//!
//! ```json
//! {"uuid": "…", "event": "beforeEach", "data": { …transaction… }}
//! ```
//!
//! `data` is a transaction, or an array of them for `beforeAll`/`afterAll`.
//! The handler answers every message with the same `uuid` and `event` and
//! the data as its hooks left it.

use contract_hooks_core::{HookError, HookKind, HookScope, Result, Transaction};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatcher::HookDispatcher;

/// One message in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookMessage {
    /// Correlates a reply with its request.
    pub uuid: String,
    /// Lifecycle event name (`beforeAll`, `beforeEach`, ...).
    pub event: String,
    /// Transaction payload.
    #[serde(default)]
    pub data: Value,
}

impl HookMessage {
    /// Parse one line.
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| HookError::Protocol(format!("malformed message: {e}")))
    }

    /// Serialize without the trailing delimiter.
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The lifecycle point this message names.
    pub fn kind(&self) -> Result<HookKind> {
        self.event.parse()
    }
}

/// Run the hooks a message asks for and build the reply.
///
/// The reply carries the received `data` verbatim; only fields a hook
/// actually changed are written back into it.
pub fn handle_message(dispatcher: &HookDispatcher, message: HookMessage) -> Result<HookMessage> {
    let kind = message.kind()?;
    let HookMessage { uuid, event, mut data } = message;

    match kind.scope() {
        HookScope::Run => {
            let mut transactions: Vec<Transaction> = serde_json::from_value(data.clone())
                .map_err(|e| HookError::Protocol(format!("{kind} expects a transaction array: {e}")))?;
            let received = transactions.clone();
            dispatcher.dispatch_all(kind, &mut transactions)?;
            if let Some(originals) = data.as_array_mut() {
                for ((original, before), after) in originals.iter_mut().zip(&received).zip(&transactions) {
                    write_back(original, before, after)?;
                }
            }
        }
        HookScope::Transaction => {
            let mut transaction: Transaction = serde_json::from_value(data.clone())
                .map_err(|e| HookError::Protocol(format!("{kind} expects a transaction: {e}")))?;
            let received = transaction.clone();
            dispatcher.dispatch(kind, &mut transaction)?;
            write_back(&mut data, &received, &transaction)?;
        }
    }

    Ok(HookMessage { uuid, event, data })
}

/// Copy the fields that differ between `before` and `after` into `original`.
fn write_back(original: &mut Value, before: &Transaction, after: &Transaction) -> Result<()> {
    if before == after {
        return Ok(());
    }
    let (Value::Object(before), Value::Object(after)) =
        (serde_json::to_value(before)?, serde_json::to_value(after)?)
    else {
        return Ok(());
    };
    let Some(target) = original.as_object_mut() else {
        return Ok(());
    };

    for (key, value) in &after {
        if before.get(key) != Some(value) {
            let _ = target.insert(key.clone(), value.clone());
        }
    }
    for key in before.keys() {
        if !after.contains_key(key) {
            let _ = target.remove(key);
        }
    }
    Ok(())
}
