//! Picks which open trade a close request refers to.

use std::collections::HashSet;

use super::types::{ExitTarget, OpenTradeRecord};

const SETTLE_SUFFIX: &str = ":USDT";

/// Every notation the bot may have stored the position under.
pub fn pair_candidates(pair: &str) -> Vec<String> {
    let mut candidates = vec![pair.to_string()];

    if pair.contains("USDT") && !pair.contains(SETTLE_SUFFIX) {
        candidates.push(format!("{}{}", pair, SETTLE_SUFFIX));
    }
    if let Some(stripped) = pair.strip_suffix(SETTLE_SUFFIX) {
        candidates.push(format!("{}/USDT", stripped));
        candidates.push(stripped.to_string());
    }

    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.clone()));
    candidates
}

/// `trade_id` of the first open trade whose pair matches, in listing order.
pub fn resolve_trade_id(pair: &str, status: &[OpenTradeRecord]) -> Option<i64> {
    let candidates = pair_candidates(pair);
    status
        .iter()
        .find(|trade| trade.is_open && candidates.iter().any(|c| c == &trade.pair))
        .map(|trade| trade.trade_id)
}

/// Ordered close attempts. The first one the bot accepts wins.
pub fn close_strategies(trade_id: Option<i64>, corrected: &str, original: &str) -> Vec<ExitTarget> {
    let mut targets = Vec::with_capacity(3);
    if let Some(id) = trade_id {
        targets.push(ExitTarget::TradeId(id));
    }
    targets.push(ExitTarget::Pair(corrected.to_string()));

    let original = original.trim();
    if !original.is_empty() && original != corrected {
        targets.push(ExitTarget::Pair(original.to_string()));
    }
    targets
}
