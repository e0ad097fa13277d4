//! `place_trade`: open positions via forceenter, close them via forceexit.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::context::ToolContext;
use super::invoke::{failure, ops::PLACE_TRADE, ToolOutput};
use super::params::PlaceTradeParams;
use crate::constants::{messages, tags};
use crate::error::{is_already_open_error, is_spurious_exit_error};
use crate::freqtrade::resolver::{close_strategies, resolve_trade_id};
use crate::freqtrade::whitelist::validate_with;
use crate::freqtrade::{BotApi, ExitTarget, ForceEnterRequest, OpenTradeRecord, PositionSide, TradeAction};

pub async fn place_trade(ctx: &ToolContext, params: PlaceTradeParams) -> ToolOutput {
    let Some(bot) = ctx.bot() else {
        return ToolOutput::not_connected();
    };

    let Some(action) = TradeAction::parse(&params.side) else {
        return ToolOutput::error(messages::INVALID_SIDE);
    };

    if let Some(price) = params.price {
        if !price.is_finite() || price <= 0.0 {
            return ToolOutput::error(messages::INVALID_PRICE);
        }
    }
    if params.stake_amount.is_some() {
        debug!("stake_amount ignored; sizing comes from the bot config");
    }

    let check = validate_with(bot.as_ref(), &params.pair, ctx.mode()).await;

    if !check.is_valid {
        match action {
            TradeAction::Enter(_) => {
                return ToolOutput::error_payload(json!({
                    "error": format!("Pair {} not in whitelist", params.pair),
                    "suggested_pair": check.pair,
                }));
            }
            // Pairlists change; a position opened earlier must stay closable.
            TradeAction::Exit => info!("ℹ️ {} is not whitelisted, closing anyway", check.pair),
        }
    }

    match action {
        TradeAction::Enter(side) => {
            enter(bot, &check.pair, side, params.price, params.enter_tag).await
        }
        TradeAction::Exit => exit(bot, &check.pair, &params.pair).await,
    }
}

/// Reason string from a Freqtrade payload, if it carries one.
fn payload_message(payload: &Value) -> Option<&str> {
    payload
        .get("detail")
        .or_else(|| payload.get("error"))
        .and_then(Value::as_str)
}

async fn enter(
    bot: &Arc<dyn BotApi>,
    pair: &str,
    side: PositionSide,
    price: Option<f64>,
    enter_tag: Option<String>,
) -> ToolOutput {
    let default_tag = if price.is_some() { tags::LIMIT_ENTRY } else { tags::MARKET_ENTRY };
    let tag = enter_tag.unwrap_or_else(|| default_tag.to_string());

    let request = ForceEnterRequest {
        pair: pair.to_string(),
        side,
        price,
        entry_tag: Some(tag.clone()),
    };

    let mut result = json!({
        "action": "enter",
        "side": side.as_str(),
        "pair": pair,
        "enter_tag": tag,
        "price": price,
    });

    match bot.force_enter(&request).await {
        Ok(response) => {
            if payload_message(&response).is_some_and(is_already_open_error) {
                result["note"] = json!(messages::ALREADY_OPEN_NOTE);
            }
            match price {
                Some(p) => info!("📈 Entered {} on {} via forceenter @ {}", side.as_str(), pair, p),
                None => info!("📈 Entered {} on {} via forceenter", side.as_str(), pair),
            }
            result["response"] = response;
            ToolOutput::success(&result)
        }
        Err(e) if is_already_open_error(&e.to_string()) => {
            info!("ℹ️ {} already has an open position", pair);
            result["note"] = json!(messages::ALREADY_OPEN_NOTE);
            result["response"] = json!({ "detail": e.to_string() });
            ToolOutput::success(&result)
        }
        Err(e) => failure(&PLACE_TRADE, &e),
    }
}

async fn exit(bot: &Arc<dyn BotApi>, pair: &str, original: &str) -> ToolOutput {
    let open_trades = match bot.status().await {
        Ok(payload) => OpenTradeRecord::from_status(&payload),
        Err(e) => {
            warn!("⚠️ Could not load open trades, closing by pair: {}", e);
            Vec::new()
        }
    };
    let trade_id = resolve_trade_id(pair, &open_trades);

    let mut last_error = None;
    for target in close_strategies(trade_id, pair, original) {
        match bot.force_exit(&target).await {
            Ok(response) => {
                let note = payload_message(&response)
                    .filter(|m| is_spurious_exit_error(m))
                    .map(|_| messages::SPURIOUS_EXIT_NOTE);
                return exit_success(pair, trade_id, &target, response, note);
            }
            Err(e) if is_spurious_exit_error(&e.to_string()) => {
                let response = json!({ "detail": e.to_string() });
                return exit_success(pair, trade_id, &target, response, Some(messages::SPURIOUS_EXIT_NOTE));
            }
            // No point trying other notations against a bot we cannot reach.
            Err(e) if e.is_connectivity() => return failure(&PLACE_TRADE, &e),
            Err(e) => {
                warn!("⚠️ forceexit by {} '{}' failed: {}", target.kind(), target.as_tradeid(), e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => failure(&PLACE_TRADE, &e),
        None => ToolOutput::error(format!("Failed to place trade: no way to close {}", pair)),
    }
}

fn exit_success(
    pair: &str,
    trade_id: Option<i64>,
    target: &ExitTarget,
    response: Value,
    note: Option<&str>,
) -> ToolOutput {
    info!("📉 Exited position on {} via forceexit ({})", pair, target.kind());
    let mut result = json!({
        "action": "exit",
        "pair": pair,
        "trade_id": trade_id,
        "exit_by": target.kind(),
        "response": response,
    });
    if let Some(note) = note {
        result["note"] = json!(note);
    }
    ToolOutput::success(&result)
}
