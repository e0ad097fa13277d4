/// Pair notation helpers.
///
/// Canonical pairs (what Freqtrade expects):
/// - spot:    "BASE/QUOTE"       like "BTC/USDT"
/// - futures: "BASE/QUOTE:QUOTE" like "BTC/USDT:USDT" (settlement suffix)
///
/// Agents usually send exchange tickers ("KMNOUSDT"), so everything
/// funnels through `normalize` before it reaches the bot.
use super::types::TradingMode;
use crate::constants::symbols::QUOTE_CURRENCY;

pub fn normalize(symbol: &str, mode: TradingMode) -> String {
    normalize_with_quote(symbol, mode, QUOTE_CURRENCY)
}

/// First matching rule wins. Total: every input produces a pair string.
pub fn normalize_with_quote(symbol: &str, mode: TradingMode, quote: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    let slash_quote = format!("/{}", quote);
    let settle = format!(":{}", quote);
    let futures_tail = format!("{}{}", slash_quote, settle);

    if symbol.contains(&futures_tail) {
        return match mode {
            TradingMode::Spot => symbol.replacen(&futures_tail, &slash_quote, 1),
            TradingMode::Futures => symbol,
        };
    }

    if symbol.contains(&slash_quote) && !symbol.contains(&settle) {
        return match mode {
            TradingMode::Spot => symbol,
            TradingMode::Futures => format!("{}{}", symbol, settle),
        };
    }

    if let Some(base) = compact_base(&symbol, quote) {
        return pair_for(base, quote, mode);
    }

    if mode == TradingMode::Futures && !symbol.contains(&settle) {
        return format!("{}{}", symbol, settle);
    }
    symbol
}

/// Base asset of a separator-free ticker such as "BTCUSDT".
pub fn compact_base<'a>(symbol: &'a str, quote: &str) -> Option<&'a str> {
    if symbol.contains('/') || symbol.contains(':') {
        return None;
    }
    symbol.strip_suffix(quote).filter(|base| !base.is_empty())
}

pub fn pair_for(base: &str, quote: &str, mode: TradingMode) -> String {
    match mode {
        TradingMode::Spot => format!("{}/{}", base, quote),
        TradingMode::Futures => format!("{}/{}:{}", base, quote, quote),
    }
}

/// "BTCUSDT:USDT", a futures notation some exchanges list without the slash.
pub fn compact_futures_pair(base: &str, quote: &str) -> String {
    format!("{}{}:{}", base, quote, quote)
}
