//! Wire models shared by the HTTP and WebSocket clients
//!
//! Request and response envelopes follow the Gremlin Server protocol.
//! Scripts always travel with their parameters as bindings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named script parameters, in the order they were bound
pub type Bindings = IndexMap<String, Value>;

/// A result row: property or projection key to value
pub type Row = IndexMap<String, Value>;

/// A Gremlin-Groovy script plus its parameter bindings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    /// Script text; parameters are referenced by binding name only
    pub text: String,
    /// Values for every binding name used in `text`
    pub bindings: Bindings,
}

impl Script {
    /// A script with no bindings
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bindings: Bindings::new(),
        }
    }

    /// Add a binding, builder style
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }
}

/// Username and password, sent as HTTP basic auth or SASL PLAIN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Body of an HTTP `POST /gremlin`
#[derive(Debug, Serialize)]
pub struct HttpRequest<'a> {
    pub gremlin: &'a str,
    pub bindings: &'a Bindings,
}

/// Status block of a server response
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseStatus {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub attributes: Value,
}

/// Result block of a server response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseResult {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub meta: Value,
}

/// A full response message, as returned over HTTP or in one WebSocket frame
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage {
    /// Absent on some HTTP responses; typed `g:UUID` under GraphSON v3
    #[serde(default)]
    pub request_id: Value,
    pub status: ResponseStatus,
    #[serde(default)]
    pub result: ResponseResult,
}

/// Status codes defined by the Gremlin Server protocol
pub mod status {
    pub const SUCCESS: u16 = 200;
    pub const NO_CONTENT: u16 = 204;
    pub const PARTIAL_CONTENT: u16 = 206;
    pub const AUTHENTICATE: u16 = 407;
}
