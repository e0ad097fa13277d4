//! Pair validation against the bot's live whitelist.
//!
//! The whitelist is advisory: when it cannot be fetched the symbol is
//! normalized and passed through as valid, and the bot has the final say.

use serde_json::Value;
use tracing::{debug, warn};

use super::symbols::{compact_base, compact_futures_pair, normalize_with_quote, pair_for};
use super::traits::BotApi;
use super::types::TradingMode;
use crate::constants::symbols::QUOTE_CURRENCY;

/// Outcome of a whitelist check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairCheck {
    /// Corrected symbol to send to the bot.
    pub pair: String,
    pub is_valid: bool,
}

impl PairCheck {
    fn new(pair: impl Into<String>, is_valid: bool) -> Self {
        Self { pair: pair.into(), is_valid }
    }
}

/// Pulls the pair list out of a `/whitelist` payload.
pub fn parse_whitelist(payload: &Value) -> Vec<String> {
    let list = payload.get("whitelist").unwrap_or(payload);
    list.as_array()
        .map(|pairs| {
            pairs
                .iter()
                .filter_map(|p| p.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

pub fn validate(candidate: &str, mode: TradingMode, whitelist: &[String]) -> PairCheck {
    validate_with_quote(candidate, mode, whitelist, QUOTE_CURRENCY)
}

pub fn validate_with_quote(
    candidate: &str,
    mode: TradingMode,
    whitelist: &[String],
    quote: &str,
) -> PairCheck {
    let candidate = candidate.trim();
    let listed = |pair: &str| whitelist.iter().any(|p| p == pair);

    if listed(candidate) {
        return PairCheck::new(candidate, true);
    }

    let upper = candidate.to_uppercase();
    if let Some(base) = compact_base(&upper, quote) {
        let primary = pair_for(base, quote, mode);
        // Order matters: it decides which symbol surfaces when several are listed.
        let fallbacks = [
            pair_for(base, quote, mode.other()),
            compact_futures_pair(base, quote),
        ];

        if let Some(found) = std::iter::once(&primary)
            .chain(fallbacks.iter())
            .find(|form| listed(form))
        {
            return PairCheck::new(found.as_str(), true);
        }
        return PairCheck::new(primary, whitelist.is_empty());
    }

    let normalized = normalize_with_quote(candidate, mode, quote);
    let is_valid = whitelist.is_empty() || listed(&normalized);
    PairCheck::new(normalized, is_valid)
}

/// Fetches the whitelist through `bot` and validates `candidate` against it.
/// A failed fetch degrades to the advisory pass.
pub async fn validate_with(bot: &dyn BotApi, candidate: &str, mode: TradingMode) -> PairCheck {
    let whitelist = match bot.whitelist().await {
        Ok(payload) => parse_whitelist(&payload),
        Err(e) => {
            warn!("⚠️ Whitelist unavailable, skipping pair validation: {}", e);
            Vec::new()
        }
    };
    let check = validate(candidate, mode, &whitelist);
    debug!(
        "Pair check {} -> {} (valid: {}, whitelist size: {})",
        candidate,
        check.pair,
        check.is_valid,
        whitelist.len()
    );
    check
}
