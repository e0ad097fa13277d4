//! JSON-RPC 2.0 envelope types for the MCP wire format.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::mcp::{
    INVALID_PARAMS, INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::error::DispatchError;

/// Incoming request or notification. A message without `id` is a
/// notification and never gets a reply.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Decodes one message, or explains why it is not a valid request.
    pub fn from_value(message: Value) -> Result<Self, JsonRpcError> {
        // serde folds `"id": null` into `None`; only a missing key means notification.
        let has_id = message.get("id").is_some();
        let mut request: JsonRpcRequest = serde_json::from_value(message)
            .map_err(|e| JsonRpcError::invalid_request(e.to_string()))?;
        if has_id && request.id.is_none() {
            request.id = Some(Value::Null);
        }
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(JsonRpcError::invalid_request(format!(
                "unsupported jsonrpc version '{}'",
                request.jsonrpc
            )));
        }
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    pub fn parse_error(detail: impl Into<String>) -> Self {
        Self::new(PARSE_ERROR, format!("Parse error: {}", detail.into()))
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, format!("Invalid request: {}", detail.into()))
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, detail)
    }
}

impl From<DispatchError> for JsonRpcError {
    fn from(err: DispatchError) -> Self {
        JsonRpcError::invalid_params(err.to_string())
    }
}

pub fn success(id: Value, result: Value) -> Value {
    json!({ "jsonrpc": JSONRPC_VERSION, "id": id, "result": result })
}

pub fn failure(id: Value, error: JsonRpcError) -> Value {
    json!({ "jsonrpc": JSONRPC_VERSION, "id": id, "error": error })
}

/// Best-effort id of a message we could not decode, so the error can
/// still be correlated.
pub fn raw_id(message: &Value) -> Value {
    message.get("id").cloned().unwrap_or(Value::Null)
}
