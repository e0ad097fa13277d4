//! Application-wide constants
//!
//! Defaults mirror what a stock Freqtrade install ships with so the
//! bridge works against a local bot without any configuration.

/// Pair notation
pub mod symbols {
    /// Quote (and futures settlement) currency assumed for bare tickers
    pub const QUOTE_CURRENCY: &str = "USDT";
}

/// Entry tags stamped on orders opened through the bridge
pub mod tags {
    pub const MARKET_ENTRY: &str = "mcp-market";
    pub const LIMIT_ENTRY: &str = "mcp-limit";
}

/// Configuration defaults
pub mod defaults {
    pub const API_URL: &str = "http://127.0.0.1:8080";
    pub const USERNAME: &str = "Freqtrader";
    pub const PASSWORD: &str = "SuperSecret1!";
    pub const TIMEOUT_SECS: u64 = 30;

    pub const SERVER_NAME: &str = "FreqtradeMCP";
    pub const HOST: &str = "localhost";
    pub const PORT: u16 = 8005;

    pub const LOG_LEVEL: &str = "INFO";
    pub const LOG_FILE_NAME: &str = "freqtrade-mcp.log";

    /// Picked up when present, never required
    pub const CONFIG_FILE: &str = "config.yaml";
}

/// Environment variable names
pub mod env {
    pub const API_URL: &str = "FREQTRADE_API_URL";
    pub const USERNAME: &str = "FREQTRADE_USERNAME";
    pub const PASSWORD: &str = "FREQTRADE_PASSWORD";
    pub const TRADING_MODE: &str = "FREQTRADE_TRADING_MODE";
    pub const TIMEOUT_SECS: &str = "FREQTRADE_TIMEOUT_SECS";
    pub const SERVER_NAME: &str = "MCP_SERVER_NAME";
    pub const SERVER_VERSION: &str = "MCP_SERVER_VERSION";
    pub const TRANSPORT: &str = "MCP_TRANSPORT";
    pub const HOST: &str = "MCP_HOST";
    pub const PORT: &str = "MCP_PORT";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const LOG_DIR: &str = "LOG_DIR";
}

/// MCP wire constants
pub mod mcp {
    pub const JSONRPC_VERSION: &str = "2.0";
    pub const LATEST_PROTOCOL_VERSION: &str = "2025-03-26";
    pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-03-26", "2024-11-05"];
    pub const SESSION_HEADER: &str = "mcp-session-id";
    /// HTTP sessions idle longer than this are dropped
    pub const SESSION_IDLE_TTL_SECS: i64 = 30 * 60;

    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
}

/// Fixed user-facing messages
pub mod messages {
    pub const NOT_CONNECTED: &str = "Freqtrade client not connected";
    pub const INVALID_SIDE: &str =
        "Invalid side. Use one of: buy/long/enter_long, short/enter_short, sell/exit/close";
    pub const INVALID_PRICE: &str = "price must be greater than 0";
    pub const SPURIOUS_EXIT_NOTE: &str =
        "Freqtrade reported 'invalid argument' but this response is known to accompany a successful exit";
    pub const ALREADY_OPEN_NOTE: &str = "A position for this pair is already open; no new entry was created";
}
