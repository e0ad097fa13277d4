use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trading mode of the connected bot. Fixed for the process lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Spot,
    Futures,
}

impl TradingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingMode::Spot => "spot",
            TradingMode::Futures => "futures",
        }
    }

    pub fn other(&self) -> TradingMode {
        match self {
            TradingMode::Spot => TradingMode::Futures,
            TradingMode::Futures => TradingMode::Spot,
        }
    }
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spot" => Ok(TradingMode::Spot),
            // Freqtrade also knows "margin"; pair notation there matches futures.
            "futures" | "future" | "margin" => Ok(TradingMode::Futures),
            other => Err(format!("unknown trading mode '{}' (expected spot|futures)", other)),
        }
    }
}

/// Position side accepted by `forceenter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

/// What the `place_trade` tool was asked to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TradeAction {
    Enter(PositionSide),
    Exit,
}

impl TradeAction {
    /// Parses the loose side vocabulary agents tend to use.
    pub fn parse(side: &str) -> Option<TradeAction> {
        match side.trim().to_lowercase().as_str() {
            "buy" | "long" | "enter_long" => Some(TradeAction::Enter(PositionSide::Long)),
            "short" | "enter_short" => Some(TradeAction::Enter(PositionSide::Short)),
            "sell" | "exit" | "close" | "exit_long" | "exit_short" => Some(TradeAction::Exit),
            _ => None,
        }
    }
}

/// Body of `POST /api/v1/forceenter`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForceEnterRequest {
    pub pair: String,
    pub side: PositionSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_tag: Option<String>,
}

/// Which open position a `forceexit` call should close.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitTarget {
    TradeId(i64),
    Pair(String),
}

impl ExitTarget {
    /// Value of the `tradeid` field; Freqtrade takes it as a string.
    pub fn as_tradeid(&self) -> String {
        match self {
            ExitTarget::TradeId(id) => id.to_string(),
            ExitTarget::Pair(pair) => pair.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ExitTarget::TradeId(_) => "trade_id",
            ExitTarget::Pair(_) => "pair",
        }
    }
}

/// Body of `POST /api/v1/forceexit`.
#[derive(Clone, Debug, Serialize)]
pub struct ForceExitRequest {
    pub tradeid: String,
}

impl From<&ExitTarget> for ForceExitRequest {
    fn from(target: &ExitTarget) -> Self {
        Self { tradeid: target.as_tradeid() }
    }
}

/// The subset of a `/status` entry needed to pick a trade to close.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpenTradeRecord {
    pub trade_id: i64,
    pub pair: String,
    #[serde(default)]
    pub is_open: bool,
}

impl OpenTradeRecord {
    /// Extracts trade records from a raw `/status` payload, skipping
    /// entries that lack the required fields.
    pub fn from_status(payload: &serde_json::Value) -> Vec<OpenTradeRecord> {
        payload
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}
