use async_trait::async_trait;
use serde_json::Value;

use crate::error::FreqtradeError;

use super::types::{ExitTarget, ForceEnterRequest};

pub type BotResult<T> = Result<T, FreqtradeError>;

/// Control surface of a running Freqtrade bot.
///
/// Payloads are returned as raw JSON: the tools pass them through to the
/// agent untouched, so there is nothing to gain from typing every shape.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn ping(&self) -> BotResult<Value>;

    async fn status(&self) -> BotResult<Value>;
    async fn balance(&self) -> BotResult<Value>;
    async fn profit(&self) -> BotResult<Value>;
    async fn performance(&self) -> BotResult<Value>;
    async fn trades(&self, limit: Option<u32>, offset: Option<u32>) -> BotResult<Value>;
    async fn show_config(&self) -> BotResult<Value>;
    async fn pair_candles(&self, pair: &str, timeframe: &str, limit: Option<u32>) -> BotResult<Value>;

    async fn whitelist(&self) -> BotResult<Value>;
    async fn blacklist(&self) -> BotResult<Value>;
    async fn add_blacklist(&self, pair: &str) -> BotResult<Value>;
    async fn delete_blacklist(&self, pair: &str) -> BotResult<Value>;

    async fn locks(&self) -> BotResult<Value>;
    async fn delete_lock(&self, lock_id: i64) -> BotResult<Value>;

    async fn force_enter(&self, request: &ForceEnterRequest) -> BotResult<Value>;
    async fn force_exit(&self, target: &ExitTarget) -> BotResult<Value>;

    async fn start(&self) -> BotResult<Value>;
    async fn stop(&self) -> BotResult<Value>;
    async fn reload_config(&self) -> BotResult<Value>;
}
