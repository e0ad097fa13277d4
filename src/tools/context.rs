use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::FreqtradeConfig;
use crate::freqtrade::{BotApi, FreqtradeClient, TradingMode};

/// Everything a tool invocation needs. Built once at startup, then shared
/// read-only; cloning is cheap.
#[derive(Clone)]
pub struct ToolContext {
    bot: Option<Arc<dyn BotApi>>,
    mode: TradingMode,
}

impl ToolContext {
    pub fn connected(bot: Arc<dyn BotApi>, mode: TradingMode) -> Self {
        Self { bot: Some(bot), mode }
    }

    /// Every tool short-circuits with the not-connected error.
    pub fn disconnected(mode: TradingMode) -> Self {
        Self { bot: None, mode }
    }

    pub fn bot(&self) -> Option<&Arc<dyn BotApi>> {
        self.bot.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.bot.is_some()
    }

    pub fn mode(&self) -> TradingMode {
        self.mode
    }

    /// Builds the REST client, checks it with `/ping` and settles the
    /// trading mode. Failures leave the context disconnected rather than
    /// aborting startup.
    pub async fn connect(config: &FreqtradeConfig) -> Self {
        let fallback_mode = config.trading_mode.unwrap_or_default();

        let client = match FreqtradeClient::new(config) {
            Ok(client) => client,
            Err(e) => {
                warn!("⚠️ Unexpected error during Freqtrade setup: {} - client will be None", e);
                return Self::disconnected(fallback_mode);
            }
        };

        match client.ping().await {
            Ok(payload) if is_pong(&payload) => {
                info!("✅ Connected to Freqtrade API at {}", client.base_url());
            }
            Ok(payload) => {
                warn!("⚠️ Failed to connect to Freqtrade API (ping answered {}) - client will be None", payload);
                return Self::disconnected(fallback_mode);
            }
            Err(e) => {
                warn!("⚠️ Freqtrade connection failed: {} - client will be None", e);
                return Self::disconnected(fallback_mode);
            }
        }

        let bot: Arc<dyn BotApi> = Arc::new(client);
        let mode = detect_trading_mode(bot.as_ref(), config.trading_mode).await;
        Self::connected(bot, mode)
    }
}

fn is_pong(payload: &Value) -> bool {
    payload.get("status").and_then(Value::as_str) == Some("pong")
}

/// Configured mode wins; otherwise the bot's own `trading_mode` setting,
/// falling back to spot.
pub async fn detect_trading_mode(bot: &dyn BotApi, configured: Option<TradingMode>) -> TradingMode {
    if let Some(mode) = configured {
        info!("🎯 Trading mode: {} (configured)", mode);
        return mode;
    }

    let detected = match bot.show_config().await {
        Ok(cfg) => cfg
            .get("trading_mode")
            .or_else(|| cfg.get("trading-mode"))
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<TradingMode>().ok()),
        Err(e) => {
            warn!("⚠️ Could not read bot config to detect trading mode: {}", e);
            None
        }
    };

    let mode = detected.unwrap_or_default();
    info!("🎯 Trading mode: {} (detected)", mode);
    mode
}
