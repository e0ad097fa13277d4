//! Transport-independent MCP request handling.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use super::protocol::{self, JsonRpcError, JsonRpcRequest};
use crate::config::ServerConfig;
use crate::constants::mcp::{LATEST_PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS};
use crate::tools::{call_tool, get_prompt, prompt_definitions, tool_definitions, ToolContext};

const INSTRUCTIONS: &str = "Tools for monitoring and controlling a Freqtrade bot. \
    Pairs may be given as exchange tickers (BTCUSDT) or in Freqtrade notation \
    (BTC/USDT, BTC/USDT:USDT); they are converted to the bot's trading mode.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl From<&ServerConfig> for ServerInfo {
    fn from(config: &ServerConfig) -> Self {
        Self { name: config.name.clone(), version: config.version.clone() }
    }
}

/// Routes JSON-RPC messages to the tool layer. Cheap to clone; the HTTP
/// transport hands one to every request.
#[derive(Clone)]
pub struct McpServer {
    ctx: ToolContext,
    info: Arc<ServerInfo>,
}

impl McpServer {
    pub fn new(ctx: ToolContext, info: ServerInfo) -> Self {
        Self { ctx, info: Arc::new(info) }
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Handles one raw frame. Returns `None` when nothing should be sent
    /// back (notifications only).
    pub async fn handle_text(&self, text: &str) -> Option<Value> {
        match serde_json::from_str::<Value>(text) {
            Ok(message) => self.handle_value(message).await,
            Err(e) => {
                warn!("⚠️ Dropping unparseable MCP frame: {}", e);
                Some(protocol::failure(Value::Null, JsonRpcError::parse_error(e.to_string())))
            }
        }
    }

    /// Single message or batch.
    pub async fn handle_value(&self, message: Value) -> Option<Value> {
        match message {
            Value::Array(batch) if batch.is_empty() => Some(protocol::failure(
                Value::Null,
                JsonRpcError::invalid_request("empty batch"),
            )),
            Value::Array(batch) => {
                let mut replies = Vec::with_capacity(batch.len());
                for message in batch {
                    if let Some(reply) = self.handle(message).await {
                        replies.push(reply);
                    }
                }
                (!replies.is_empty()).then_some(Value::Array(replies))
            }
            single => self.handle(single).await,
        }
    }

    pub async fn handle(&self, message: Value) -> Option<Value> {
        // Replies from the client to server-initiated requests; we never send any.
        if message.get("method").is_none()
            && (message.get("result").is_some() || message.get("error").is_some())
        {
            debug!("Ignoring client response message");
            return None;
        }

        let id = protocol::raw_id(&message);
        let request = match JsonRpcRequest::from_value(message) {
            Ok(request) => request,
            Err(e) => return Some(protocol::failure(id, e)),
        };

        if request.is_notification() {
            debug!("MCP notification: {}", request.method);
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        match self.dispatch(&request).await {
            Ok(result) => Some(protocol::success(id, result)),
            Err(e) => {
                warn!("⚠️ MCP {} failed: {}", request.method, e.message);
                Some(protocol::failure(id, e))
            }
        }
    }

    async fn dispatch(&self, request: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        match request.method.as_str() {
            "initialize" => Ok(self.initialize(&request.params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" => self.call_tool(&request.params).await,
            "prompts/list" => Ok(json!({ "prompts": prompt_definitions() })),
            "prompts/get" => self.get_prompt(&request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        }
    }

    fn initialize(&self, params: &Value) -> Value {
        let requested = params.get("protocolVersion").and_then(Value::as_str);
        let version = requested
            .filter(|v| SUPPORTED_PROTOCOL_VERSIONS.contains(v))
            .unwrap_or(LATEST_PROTOCOL_VERSION);

        let client = params
            .pointer("/clientInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unknown client");
        info!("🤝 MCP session initialized by {} (protocol {})", client, version);

        json!({
            "protocolVersion": version,
            "capabilities": {
                "tools": { "listChanged": false },
                "prompts": { "listChanged": false },
            },
            "serverInfo": { "name": self.info.name, "version": self.info.version },
            "instructions": INSTRUCTIONS,
        })
    }

    async fn call_tool(&self, params: &Value) -> Result<Value, JsonRpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| JsonRpcError::invalid_params("tools/call requires a tool name"))?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        debug!("🔧 tools/call {}", name);
        let output = call_tool(&self.ctx, name, arguments).await?;
        Ok(json!({
            "content": [{ "type": "text", "text": output.text }],
            "isError": output.is_error,
        }))
    }

    async fn get_prompt(&self, params: &Value) -> Result<Value, JsonRpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| JsonRpcError::invalid_params("prompts/get requires a prompt name"))?;
        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(JsonRpcError::invalid_params("prompt arguments must be an object")),
        };

        let prompt = get_prompt(&self.ctx, name, arguments).await?;
        Ok(json!(prompt))
    }
}
