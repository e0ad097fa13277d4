#[cfg(any(test, feature = "testing"))]
pub mod mock;
pub mod resolver;
pub mod rest;
pub mod symbols;
pub mod traits;
pub mod types;
pub mod whitelist;

pub use rest::FreqtradeClient;
pub use traits::{BotApi, BotResult};
pub use types::{ExitTarget, ForceEnterRequest, OpenTradeRecord, PositionSide, TradeAction, TradingMode};

#[cfg(test)]
mod types_tests;
