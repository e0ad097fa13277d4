//! In-memory `BotApi` used by the test suites.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::traits::{BotApi, BotResult};
use super::types::{ExitTarget, ForceEnterRequest, TradingMode};
use crate::error::FreqtradeError;

/// Cloneable description of a failure the mock should return.
#[derive(Clone, Debug)]
pub enum MockFailure {
    Connection(String),
    Timeout(String),
    Http(u16, String),
}

impl From<MockFailure> for FreqtradeError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::Connection(msg) => FreqtradeError::Connection(msg),
            MockFailure::Timeout(msg) => FreqtradeError::Timeout(msg),
            MockFailure::Http(status, message) => FreqtradeError::Http { status, message },
        }
    }
}

/// One recorded call: the endpoint and a short rendering of its argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockCall {
    pub endpoint: &'static str,
    pub arg: String,
}

pub struct MockBot {
    whitelist: Vec<String>,
    status: Value,
    trading_mode: TradingMode,
    failures: HashMap<&'static str, MockFailure>,
    enter_replies: Mutex<VecDeque<Result<Value, MockFailure>>>,
    exit_replies: Mutex<VecDeque<Result<Value, MockFailure>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl Default for MockBot {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBot {
    pub fn new() -> Self {
        Self {
            whitelist: Vec::new(),
            status: json!([]),
            trading_mode: TradingMode::Spot,
            failures: HashMap::new(),
            enter_replies: Mutex::new(VecDeque::new()),
            exit_replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_whitelist(mut self, pairs: &[&str]) -> Self {
        self.whitelist = pairs.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_status(mut self, status: Value) -> Self {
        self.status = status;
        self
    }

    pub fn with_trading_mode(mut self, mode: TradingMode) -> Self {
        self.trading_mode = mode;
        self
    }

    /// Makes every call to `endpoint` fail.
    pub fn failing(mut self, endpoint: &'static str, failure: MockFailure) -> Self {
        self.failures.insert(endpoint, failure);
        self
    }

    /// Scripted `forceenter` replies, consumed in order. Afterwards the
    /// mock echoes a generic success.
    pub fn with_enter_replies(self, replies: Vec<Result<Value, MockFailure>>) -> Self {
        *self.enter_replies.lock().unwrap() = replies.into();
        self
    }

    pub fn with_exit_replies(self, replies: Vec<Result<Value, MockFailure>>) -> Self {
        *self.exit_replies.lock().unwrap() = replies.into();
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == endpoint)
            .collect()
    }

    fn reply(&self, endpoint: &'static str, arg: impl Into<String>, ok: Value) -> BotResult<Value> {
        self.calls.lock().unwrap().push(MockCall { endpoint, arg: arg.into() });
        match self.failures.get(endpoint) {
            Some(failure) => Err(failure.clone().into()),
            None => Ok(ok),
        }
    }

    fn scripted(
        &self,
        endpoint: &'static str,
        arg: String,
        queue: &Mutex<VecDeque<Result<Value, MockFailure>>>,
        fallback: Value,
    ) -> BotResult<Value> {
        let next = queue.lock().unwrap().pop_front();
        let outcome = self.reply(endpoint, arg, fallback.clone());
        match next {
            Some(Ok(value)) => outcome.map(|_| value),
            Some(Err(failure)) => outcome.and(Err(failure.into())),
            None => outcome,
        }
    }
}

#[async_trait]
impl BotApi for MockBot {
    async fn ping(&self) -> BotResult<Value> {
        self.reply("ping", "", json!({ "status": "pong" }))
    }

    async fn status(&self) -> BotResult<Value> {
        self.reply("status", "", self.status.clone())
    }

    async fn balance(&self) -> BotResult<Value> {
        self.reply("balance", "", json!({ "currencies": [], "total": 1000.0, "stake": "USDT" }))
    }

    async fn profit(&self) -> BotResult<Value> {
        self.reply("profit", "", json!({ "profit_all_coin": 12.5, "trade_count": 4 }))
    }

    async fn performance(&self) -> BotResult<Value> {
        self.reply("performance", "", json!([{ "pair": "BTC/USDT", "profit": 1.2, "count": 2 }]))
    }

    async fn trades(&self, limit: Option<u32>, offset: Option<u32>) -> BotResult<Value> {
        let arg = format!("limit={:?} offset={:?}", limit, offset);
        self.reply("trades", arg, json!({ "trades": [], "trades_count": 0, "total_trades": 0 }))
    }

    async fn show_config(&self) -> BotResult<Value> {
        self.reply(
            "show_config",
            "",
            json!({ "trading_mode": self.trading_mode.as_str(), "stake_currency": "USDT" }),
        )
    }

    async fn pair_candles(&self, pair: &str, timeframe: &str, limit: Option<u32>) -> BotResult<Value> {
        let arg = format!("{} {} {:?}", pair, timeframe, limit);
        self.reply(
            "pair_candles",
            arg,
            json!({ "pair": pair, "timeframe": timeframe, "columns": ["date", "close"], "data": [] }),
        )
    }

    async fn whitelist(&self) -> BotResult<Value> {
        self.reply(
            "whitelist",
            "",
            json!({ "whitelist": self.whitelist, "length": self.whitelist.len(), "method": ["StaticPairList"] }),
        )
    }

    async fn blacklist(&self) -> BotResult<Value> {
        self.reply("blacklist", "", json!({ "blacklist": [], "length": 0 }))
    }

    async fn add_blacklist(&self, pair: &str) -> BotResult<Value> {
        self.reply("add_blacklist", pair, json!({ "blacklist": [pair], "length": 1 }))
    }

    async fn delete_blacklist(&self, pair: &str) -> BotResult<Value> {
        self.reply("delete_blacklist", pair, json!({ "blacklist": [], "length": 0 }))
    }

    async fn locks(&self) -> BotResult<Value> {
        self.reply("locks", "", json!({ "lock_count": 0, "locks": [] }))
    }

    async fn delete_lock(&self, lock_id: i64) -> BotResult<Value> {
        self.reply("delete_lock", lock_id.to_string(), json!({ "lock_count": 0, "locks": [] }))
    }

    async fn force_enter(&self, request: &ForceEnterRequest) -> BotResult<Value> {
        let arg = format!("{} {}", request.pair, request.side.as_str());
        let fallback = json!({ "trade_id": 1, "pair": request.pair, "is_open": true });
        self.scripted("force_enter", arg, &self.enter_replies, fallback)
    }

    async fn force_exit(&self, target: &ExitTarget) -> BotResult<Value> {
        self.scripted(
            "force_exit",
            target.as_tradeid(),
            &self.exit_replies,
            json!({ "result": format!("Created exit order for trade {}.", target.as_tradeid()) }),
        )
    }

    async fn start(&self) -> BotResult<Value> {
        self.reply("start", "", json!({ "status": "starting trader ..." }))
    }

    async fn stop(&self) -> BotResult<Value> {
        self.reply("stop", "", json!({ "status": "stopping trader ..." }))
    }

    async fn reload_config(&self) -> BotResult<Value> {
        self.reply("reload_config", "", json!({ "status": "Reloading config ..." }))
    }
}
