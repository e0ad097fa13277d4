//! The one place remote calls are made and their outcome classified.

use std::future::Future;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::context::ToolContext;
use crate::constants::messages::NOT_CONNECTED;
use crate::error::FreqtradeError;
use crate::freqtrade::{BotApi, BotResult};

/// Describes a remote operation for error messages:
/// "Connection error {doing}: ..." / "Failed to {action}: ...".
#[derive(Clone, Copy, Debug)]
pub struct Operation {
    pub tool: &'static str,
    pub doing: &'static str,
    pub action: &'static str,
}

impl Operation {
    pub const fn new(tool: &'static str, doing: &'static str, action: &'static str) -> Self {
        Self { tool, doing, action }
    }
}

pub mod ops {
    use super::Operation;

    pub const MARKET_DATA: Operation =
        Operation::new("fetch_market_data", "fetching market data", "fetch market data");
    pub const BOT_STATUS: Operation =
        Operation::new("fetch_bot_status", "fetching bot status", "fetch bot status");
    pub const PROFIT: Operation = Operation::new("fetch_profit", "fetching profit", "fetch profit");
    pub const BALANCE: Operation = Operation::new("fetch_balance", "fetching balance", "fetch balance");
    pub const PERFORMANCE: Operation =
        Operation::new("fetch_performance", "fetching performance", "fetch performance");
    pub const WHITELIST: Operation =
        Operation::new("fetch_whitelist", "fetching whitelist", "fetch whitelist");
    pub const BLACKLIST: Operation =
        Operation::new("fetch_blacklist", "fetching blacklist", "fetch blacklist");
    pub const TRADES: Operation = Operation::new("fetch_trades", "fetching trades", "fetch trades");
    pub const CONFIG: Operation = Operation::new("fetch_config", "fetching config", "fetch config");
    pub const LOCKS: Operation = Operation::new("fetch_locks", "fetching locks", "fetch locks");
    pub const PLACE_TRADE: Operation = Operation::new("place_trade", "placing trade", "place trade");
    pub const START_BOT: Operation = Operation::new("start_bot", "starting bot", "start bot");
    pub const STOP_BOT: Operation = Operation::new("stop_bot", "stopping bot", "stop bot");
    pub const RELOAD_CONFIG: Operation =
        Operation::new("reload_config", "reloading config", "reload config");
    pub const ADD_BLACKLIST: Operation =
        Operation::new("add_blacklist", "adding to blacklist", "add to blacklist");
    pub const DELETE_BLACKLIST: Operation =
        Operation::new("delete_blacklist", "removing from blacklist", "remove from blacklist");
    pub const DELETE_LOCK: Operation = Operation::new("delete_lock", "deleting lock", "delete lock");
}

/// Text handed back to the agent plus whether it is an error payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(payload: &Value) -> Self {
        Self { text: payload.to_string(), is_error: false }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::error_payload(json!({ "error": message.into() }))
    }

    pub fn error_payload(payload: Value) -> Self {
        Self { text: payload.to_string(), is_error: true }
    }

    pub fn not_connected() -> Self {
        Self::error(NOT_CONNECTED)
    }

    /// Parses the text back into JSON. Handy for callers that embed it.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or_else(|_| Value::String(self.text.clone()))
    }
}

/// Converts a failed remote call into the agent-facing error payload.
pub fn failure(op: &Operation, err: &FreqtradeError) -> ToolOutput {
    warn!("❌ [{}] {}", op.tool, err);
    if err.is_connectivity() {
        ToolOutput::error(format!("Connection error {}: {}", op.doing, err))
    } else {
        ToolOutput::error(format!("Failed to {}: {}", op.action, err))
    }
}

/// Runs `call` against the bot and classifies the outcome. Never retries.
pub async fn invoke<F, Fut>(ctx: &ToolContext, op: &Operation, call: F) -> ToolOutput
where
    F: FnOnce(Arc<dyn BotApi>) -> Fut,
    Fut: Future<Output = BotResult<Value>>,
{
    let Some(bot) = ctx.bot() else {
        return ToolOutput::not_connected();
    };

    debug!("[{}] calling Freqtrade API", op.tool);
    match call(Arc::clone(bot)).await {
        Ok(payload) => ToolOutput::success(&payload),
        Err(e) => failure(op, &e),
    }
}
