//! Tool listing and dispatch.

use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::context::ToolContext;
use super::invoke::{invoke, ops, ToolOutput};
use super::params::{LockParam, MarketDataParams, NoParams, PairParam, PlaceTradeParams, TradesParams};
use super::trade::place_trade;
use crate::error::DispatchError;

#[derive(Clone, Debug, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    fn new<T: JsonSchema>(name: &'static str, description: &'static str) -> Self {
        Self { name, description, input_schema: input_schema::<T>() }
    }
}

/// JSON schema of `T` trimmed to what MCP clients expect: an object schema
/// without the meta `$schema`/`title` keys.
pub fn input_schema<T: JsonSchema>() -> Value {
    let root = schemars::schema_for!(T);
    let mut schema = serde_json::to_value(root).unwrap_or_else(|_| json!({ "type": "object" }));
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
        obj.entry("type").or_insert_with(|| json!("object"));
        obj.entry("properties").or_insert_with(|| json!({}));
    }
    schema
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new::<MarketDataParams>(
            "fetch_market_data",
            "Fetch OHLCV data for a specified trading pair and timeframe.",
        ),
        ToolDefinition::new::<NoParams>("fetch_bot_status", "Retrieve the current status of open trades."),
        ToolDefinition::new::<NoParams>("fetch_profit", "Get profit summary for the trading bot."),
        ToolDefinition::new::<NoParams>("fetch_balance", "Fetch the account balance."),
        ToolDefinition::new::<NoParams>("fetch_performance", "Retrieve trading performance metrics."),
        ToolDefinition::new::<NoParams>("fetch_whitelist", "Get the current whitelist of trading pairs."),
        ToolDefinition::new::<NoParams>("fetch_blacklist", "Get the current blacklist of trading pairs."),
        ToolDefinition::new::<TradesParams>("fetch_trades", "Fetch the history of closed trades."),
        ToolDefinition::new::<NoParams>("fetch_config", "Retrieve the current bot configuration."),
        ToolDefinition::new::<NoParams>("fetch_locks", "Get the current trade locks."),
        ToolDefinition::new::<PlaceTradeParams>(
            "place_trade",
            "Open a position via forceenter (buy/long/short) or close one via forceexit (sell/exit/close). \
             Pairs are normalized to the bot's spot/futures notation and checked against the whitelist.",
        ),
        ToolDefinition::new::<NoParams>("start_bot", "Start the Freqtrade bot."),
        ToolDefinition::new::<NoParams>("stop_bot", "Stop the Freqtrade bot."),
        ToolDefinition::new::<NoParams>("reload_config", "Reload the bot configuration."),
        ToolDefinition::new::<PairParam>("add_blacklist", "Add a pair to the blacklist."),
        ToolDefinition::new::<PairParam>("delete_blacklist", "Remove a pair from the blacklist."),
        ToolDefinition::new::<LockParam>("delete_lock", "Delete a specific trade lock by ID."),
    ]
}

fn parse_args<T: DeserializeOwned>(name: &str, arguments: Value) -> Result<T, DispatchError> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| DispatchError::InvalidArguments {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Runs tool `name`. Only an unknown tool or undecodable arguments are
/// errors here; everything that happens once the tool runs is reported
/// inside the returned `ToolOutput`.
pub async fn call_tool(ctx: &ToolContext, name: &str, arguments: Value) -> Result<ToolOutput, DispatchError> {
    let output = match name {
        "fetch_market_data" => {
            let p: MarketDataParams = parse_args(name, arguments)?;
            info!("Fetching market data for {} with timeframe {}", p.pair, p.timeframe);
            invoke(ctx, &ops::MARKET_DATA, move |bot| async move {
                bot.pair_candles(&p.pair, &p.timeframe, p.limit).await
            })
            .await
        }
        "fetch_bot_status" => invoke(ctx, &ops::BOT_STATUS, |bot| async move { bot.status().await }).await,
        "fetch_profit" => invoke(ctx, &ops::PROFIT, |bot| async move { bot.profit().await }).await,
        "fetch_balance" => invoke(ctx, &ops::BALANCE, |bot| async move { bot.balance().await }).await,
        "fetch_performance" => {
            invoke(ctx, &ops::PERFORMANCE, |bot| async move { bot.performance().await }).await
        }
        "fetch_whitelist" => invoke(ctx, &ops::WHITELIST, |bot| async move { bot.whitelist().await }).await,
        "fetch_blacklist" => invoke(ctx, &ops::BLACKLIST, |bot| async move { bot.blacklist().await }).await,
        "fetch_trades" => {
            let p: TradesParams = parse_args(name, arguments)?;
            invoke(ctx, &ops::TRADES, move |bot| async move { bot.trades(p.limit, p.offset).await }).await
        }
        "fetch_config" => invoke(ctx, &ops::CONFIG, |bot| async move { bot.show_config().await }).await,
        "fetch_locks" => invoke(ctx, &ops::LOCKS, |bot| async move { bot.locks().await }).await,
        "place_trade" => {
            let p: PlaceTradeParams = parse_args(name, arguments)?;
            place_trade(ctx, p).await
        }
        "start_bot" => {
            let out = invoke(ctx, &ops::START_BOT, |bot| async move { bot.start().await }).await;
            if !out.is_error {
                info!("▶️ Freqtrade bot started");
            }
            out
        }
        "stop_bot" => {
            let out = invoke(ctx, &ops::STOP_BOT, |bot| async move { bot.stop().await }).await;
            if !out.is_error {
                info!("⏹️ Freqtrade bot stopped");
            }
            out
        }
        "reload_config" => {
            let out = invoke(ctx, &ops::RELOAD_CONFIG, |bot| async move { bot.reload_config().await }).await;
            if !out.is_error {
                info!("🔄 Configuration reloaded");
            }
            out
        }
        "add_blacklist" => {
            let p: PairParam = parse_args(name, arguments)?;
            let pair = p.pair.clone();
            let out = invoke(ctx, &ops::ADD_BLACKLIST, move |bot| async move {
                bot.add_blacklist(&p.pair).await
            })
            .await;
            if !out.is_error {
                info!("Added {} to blacklist", pair);
            }
            out
        }
        "delete_blacklist" => {
            let p: PairParam = parse_args(name, arguments)?;
            let pair = p.pair.clone();
            let out = invoke(ctx, &ops::DELETE_BLACKLIST, move |bot| async move {
                bot.delete_blacklist(&p.pair).await
            })
            .await;
            if !out.is_error {
                info!("Removed {} from blacklist", pair);
            }
            out
        }
        "delete_lock" => {
            let p: LockParam = parse_args(name, arguments)?;
            let lock_id = p.lock_id;
            let out = invoke(ctx, &ops::DELETE_LOCK, move |bot| async move { bot.delete_lock(lock_id).await }).await;
            if !out.is_error {
                info!("Deleted lock with ID {}", lock_id);
            }
            out
        }
        other => return Err(DispatchError::UnknownTool(other.to_string())),
    };
    Ok(output)
}
