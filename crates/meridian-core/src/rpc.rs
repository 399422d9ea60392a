use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 request envelope.
///
/// An envelope without an `id` is a notification and never receives a
/// response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

impl RequestEnvelope {
    pub fn is_request(&self) -> bool {
        self.id.is_some()
    }

    /// True for the handshake request that is allowed to open a new session.
    pub fn is_initialize(&self) -> bool {
        self.method == "initialize" && self.is_request()
    }

    pub fn valid_version(&self) -> bool {
        self.jsonrpc == "2.0"
    }
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope {
    pub jsonrpc: &'static str,
    pub id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
}

// Standard JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INTERNAL_ERROR: i32 = -32603;
/// Transport-session faults: missing, unknown, or closed session.
pub const INVALID_SESSION: i32 = -32000;

impl ResponseEnvelope {
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Error envelope. Transport-level rejections pass `None` for the id,
    /// which serializes as a null correlation id.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: id.unwrap_or(serde_json::Value::Null),
            result: None,
            error: Some(ErrorObject {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn method_not_found(id: serde_json::Value, method: &str) -> Self {
        Self::error(Some(id), METHOD_NOT_FOUND, format!("method not found: {method}"))
    }

    pub fn invalid_session(message: impl Into<String>) -> Self {
        Self::error(None, INVALID_SESSION, message)
    }

    pub fn parse_error() -> Self {
        Self::error(None, PARSE_ERROR, "parse error")
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::error(None, INVALID_REQUEST, message)
    }

    /// Generic internal fault. Detail stays in the logs, never on the wire.
    pub fn internal_error(id: Option<serde_json::Value>) -> Self {
        Self::error(id, INTERNAL_ERROR, "internal error")
    }
}

/// Extract an optional string param from the RPC params object.
pub fn optional_str<'a>(params: Option<&'a serde_json::Value>, key: &str) -> Option<&'a str> {
    params.and_then(|p| p.get(key)).and_then(|v| v.as_str())
}
