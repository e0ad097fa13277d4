//! Freqtrade MCP - exposes a Freqtrade bot to LLM agents as MCP tools
//!
//! This library provides the Freqtrade REST client, pair notation
//! handling, the tool catalog and the MCP transports.

pub mod config;
pub mod constants;
pub mod error;
pub mod freqtrade;
pub mod logging;
pub mod mcp;
pub mod tools;

// Re-export commonly used types
pub use config::{AppConfig, Transport};
pub use error::{ConfigError, DispatchError, FreqtradeError};
pub use freqtrade::{BotApi, FreqtradeClient, TradingMode};
pub use mcp::{McpServer, ServerInfo};
pub use tools::{ToolContext, ToolOutput};

#[cfg(test)]
mod config_tests;
