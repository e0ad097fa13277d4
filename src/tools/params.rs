//! Tool and prompt parameter types with JsonSchema support.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// For tools that take no arguments
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Single trading pair argument
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PairParam {
    #[schemars(description = "Trading pair (e.g., \"ETH/USDT\")")]
    pub pair: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MarketDataParams {
    #[schemars(description = "Trading pair (e.g., \"BTC/USDT\")")]
    pub pair: String,

    #[schemars(description = "Candle timeframe (e.g., \"1h\", \"5m\")")]
    pub timeframe: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Maximum number of candles to return")]
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TradesParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Maximum number of trades to return")]
    pub limit: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Number of trades to skip")]
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LockParam {
    #[schemars(description = "ID of the trade lock to delete")]
    pub lock_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlaceTradeParams {
    #[schemars(
        description = "Trading pair (e.g., \"BTC/USDT\", futures \"BTC/USDT:USDT\" or exchange ticker \"BTCUSDT\")"
    )]
    pub pair: String,

    #[schemars(
        description = "One of buy/long/enter_long, short/enter_short (open via forceenter) or sell/exit/close (close via forceexit)"
    )]
    pub side: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Optional limit price for entries; market order when omitted")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Optional entry tag recorded on the trade")]
    pub enter_tag: Option<String>,

    /// Accepted for compatibility; sizing comes from the bot's own config.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Ignored. Position size is controlled by the Freqtrade configuration")]
    pub stake_amount: Option<f64>,
}

/// Arguments for the analyze_trade prompt
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeTradeArgs {
    #[schemars(description = "Trading pair to analyze (e.g., \"BTC/USDT\")")]
    pub pair: String,

    #[schemars(description = "Timeframe for the analysis (e.g., \"1h\")")]
    pub timeframe: String,
}
