//! The JS8Call API message envelope.
//!
//! Every message on the wire -- request, reply, or unsolicited
//! notification -- is one JSON object with the same three top-level
//! fields:
//!
//! ```text
//! {"type": "STATION.GET_CALLSIGN", "value": "", "params": {"_ID": 42}}
//! ```
//!
//! - `type`: the message type string (always present).
//! - `value`: free-text payload (optional on the wire, defaults to empty).
//! - `params`: a flat JSON object of named parameters (optional, defaults
//!   to empty).
//!
//! Requests carry an integer `_ID` parameter used to correlate the reply;
//! server-originated notifications carry no `_ID` (or one unrelated to any
//! outstanding request). The protocol's convention is absence-means-empty:
//! a missing parameter is read as `0` / `""` / `false`, never as an error.
//! The `param_*` accessors implement that convention.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the correlation-ID parameter injected into every request that
/// expects (or may receive) a reply.
pub const ID_PARAM: &str = "_ID";

/// One JS8Call API message: request, reply, or notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message type string, e.g. `"RIG.GET_FREQ"` or `"RX.SPOT"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Free-text payload. Empty for most requests; carries the result for
    /// string-valued replies (callsign, grid, status text).
    #[serde(default)]
    pub value: String,

    /// Named parameters. Carries `_ID` on correlated traffic plus
    /// operation-specific fields (`DIAL`, `SPEED`, `SNR`, ...).
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Envelope {
    /// Create an envelope with the given type, empty value, and no params.
    pub fn new(kind: impl Into<String>) -> Self {
        Envelope {
            kind: kind.into(),
            value: String::new(),
            params: Map::new(),
        }
    }

    /// Set the value payload (builder style).
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the parameter map (builder style).
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// The correlation ID carried in `params._ID`, if any.
    pub fn id(&self) -> Option<i64> {
        self.params.get(ID_PARAM).and_then(Value::as_i64)
    }

    /// Stamp `params._ID` with the given correlation ID.
    pub fn set_id(&mut self, id: i64) {
        self.params.insert(ID_PARAM.to_string(), Value::from(id));
    }

    /// Read an integer parameter, defaulting to 0 when absent or non-numeric.
    pub fn param_i64(&self, key: &str) -> i64 {
        self.params.get(key).and_then(Value::as_i64).unwrap_or(0)
    }

    /// Read an unsigned integer parameter, defaulting to 0.
    pub fn param_u64(&self, key: &str) -> u64 {
        self.params.get(key).and_then(Value::as_u64).unwrap_or(0)
    }

    /// Read a string parameter, defaulting to the empty string.
    pub fn param_str(&self, key: &str) -> &str {
        self.params.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Read a boolean parameter, defaulting to `false`.
    pub fn param_bool(&self, key: &str) -> bool {
        self.params
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
