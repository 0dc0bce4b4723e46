//! # Typed view over message payloads.
//!
//! Workers may tag a posted payload with a user-level action. The tag lives in
//! the payload's `action` field; `msg` is read only when `action` is missing or
//! not a string:
//!
//! ```text
//! { "action": "do it!", ... }            → "do it!"
//! { "msg": "do it!" }                    → "do it!"
//! { "action": "do it!", "msg": "hi" }    → "do it!"
//! { "action": 42, "msg": "do it!" }      → "do it!"
//! "started"                     → no action
//! { "action": 42 }              → no action (not a string)
//! { "action": "" }              → no action
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::Payload;

/// Message envelope with an optional action tag.
///
/// Only the action tag is extracted; every other field of the payload is ignored.
///
/// # Example
/// ```rust
/// use serde_json::json;
/// use workvisor::Envelope;
///
/// let env = Envelope::from_payload(&json!({ "action": "do it!", "n": 3 }));
/// assert_eq!(env.action.as_deref(), Some("do it!"));
///
/// let env = Envelope::from_payload(&json!("started"));
/// assert!(env.action.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// User-level action tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl Envelope {
    /// Creates an envelope carrying `action`.
    pub fn with_action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
        }
    }

    /// Reads the envelope out of a payload.
    ///
    /// Payloads that are not objects, or whose action is not a non-empty string,
    /// yield an envelope without an action.
    pub fn from_payload(payload: &Payload) -> Self {
        let action = payload
            .get("action")
            .and_then(Value::as_str)
            .or_else(|| payload.get("msg").and_then(Value::as_str))
            .filter(|a| !a.is_empty())
            .map(str::to_owned);
        Self { action }
    }
}
