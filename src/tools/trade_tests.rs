//! Unit tests for the place_trade tool.

#[cfg(test)]
mod trade_tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::freqtrade::mock::{MockBot, MockFailure};
    use crate::freqtrade::TradingMode;
    use crate::tools::params::PlaceTradeParams;
    use crate::tools::trade::place_trade;
    use crate::tools::ToolContext;

    fn params(pair: &str, side: &str) -> PlaceTradeParams {
        PlaceTradeParams {
            pair: pair.to_string(),
            side: side.to_string(),
            price: None,
            enter_tag: None,
            stake_amount: None,
        }
    }

    fn ctx(bot: &Arc<MockBot>, mode: TradingMode) -> ToolContext {
        ToolContext::connected(bot.clone(), mode)
    }

    // ============= Entry Tests =============

    #[tokio::test]
    async fn test_market_buy_on_futures_ticker() {
        let bot = Arc::new(MockBot::new());
        let out = place_trade(&ctx(&bot, TradingMode::Futures), params("KMNOUSDT", "buy")).await;

        assert!(!out.is_error, "{}", out.text);
        let body = out.json();
        assert_eq!(body["action"], "enter");
        assert_eq!(body["side"], "long");
        assert_eq!(body["pair"], "KMNO/USDT:USDT");
        assert_eq!(body["enter_tag"], "mcp-market");
        assert!(body["price"].is_null());
        assert_eq!(body["response"]["trade_id"], 1);

        let entries = bot.calls_to("force_enter");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].arg, "KMNO/USDT:USDT long");
    }

    #[tokio::test]
    async fn test_limit_short_uses_limit_tag() {
        let bot = Arc::new(MockBot::new().with_whitelist(&["ETH/USDT"]));
        let mut p = params("ETHUSDT", "enter_short");
        p.price = Some(2500.0);

        let body = place_trade(&ctx(&bot, TradingMode::Spot), p).await.json();
        assert_eq!(body["side"], "short");
        assert_eq!(body["pair"], "ETH/USDT");
        assert_eq!(body["enter_tag"], "mcp-limit");
        assert_eq!(body["price"], json!(2500.0));
    }

    #[tokio::test]
    async fn test_caller_tag_wins() {
        let bot = Arc::new(MockBot::new());
        let mut p = params("BTC/USDT", "long");
        p.enter_tag = Some("agent-breakout".into());
        p.stake_amount = Some(50.0);

        let body = place_trade(&ctx(&bot, TradingMode::Spot), p).await.json();
        assert_eq!(body["enter_tag"], "agent-breakout");
    }

    // ============= Validation Tests =============

    #[tokio::test]
    async fn test_invalid_side_rejected_before_remote_call() {
        let bot = Arc::new(MockBot::new());
        let out = place_trade(&ctx(&bot, TradingMode::Spot), params("BTC/USDT", "yolo")).await;

        assert!(out.is_error);
        assert!(out.json()["error"].as_str().unwrap().starts_with("Invalid side"));
        assert!(bot.calls().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_price_rejected() {
        let bot = Arc::new(MockBot::new());
        for price in [0.0, -1.0, f64::NAN] {
            let mut p = params("BTC/USDT", "buy");
            p.price = Some(price);
            let out = place_trade(&ctx(&bot, TradingMode::Spot), p).await;
            assert_eq!(out.json()["error"], "price must be greater than 0");
        }
        assert!(bot.calls_to("force_enter").is_empty());
    }

    #[tokio::test]
    async fn test_not_connected() {
        let out = place_trade(&ToolContext::disconnected(TradingMode::Spot), params("BTC/USDT", "buy")).await;
        assert!(out.is_error);
        assert_eq!(out.json(), json!({ "error": "Freqtrade client not connected" }));
    }

    #[tokio::test]
    async fn test_pair_not_in_whitelist() {
        let bot = Arc::new(MockBot::new().with_whitelist(&["BTC/USDT:USDT"]));
        let out = place_trade(&ctx(&bot, TradingMode::Futures), params("KMNOUSDT", "buy")).await;

        assert!(out.is_error);
        let body = out.json();
        assert_eq!(body["error"], "Pair KMNOUSDT not in whitelist");
        assert_eq!(body["suggested_pair"], "KMNO/USDT:USDT");
        assert!(bot.calls_to("force_enter").is_empty());
    }

    // ============= Entry Failure Tests =============

    #[tokio::test]
    async fn test_already_open_is_success_with_note() {
        let bot = Arc::new(MockBot::new().with_enter_replies(vec![Err(MockFailure::Http(
            400,
            "position for BTC/USDT already open - id: 3".into(),
        ))]));
        let out = place_trade(&ctx(&bot, TradingMode::Spot), params("BTC/USDT", "buy")).await;

        assert!(!out.is_error);
        let body = out.json();
        assert_eq!(body["action"], "enter");
        assert!(body["note"].as_str().unwrap().contains("already open"));
    }

    #[tokio::test]
    async fn test_entry_generic_failure() {
        let bot = Arc::new(
            MockBot::new().with_enter_replies(vec![Err(MockFailure::Http(500, "Internal Server Error".into()))]),
        );
        let out = place_trade(&ctx(&bot, TradingMode::Spot), params("BTC/USDT", "buy")).await;

        assert!(out.is_error);
        assert_eq!(out.json()["error"], "Failed to place trade: HTTP 500: Internal Server Error");
    }

    #[tokio::test]
    async fn test_entry_connection_failure() {
        let bot = Arc::new(MockBot::new().failing("force_enter", MockFailure::Connection("refused".into())));
        let out = place_trade(&ctx(&bot, TradingMode::Spot), params("BTC/USDT", "buy")).await;

        let error = out.json()["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Connection error placing trade:"), "{}", error);
    }

    // ============= Exit Tests =============

    #[tokio::test]
    async fn test_exit_by_resolved_trade_id() {
        let bot = Arc::new(
            MockBot::new().with_status(json!([{ "trade_id": 7, "pair": "BTC/USDT", "is_open": true }])),
        );
        let out = place_trade(&ctx(&bot, TradingMode::Spot), params("BTCUSDT", "sell")).await;

        let body = out.json();
        assert_eq!(body["action"], "exit");
        assert_eq!(body["pair"], "BTC/USDT");
        assert_eq!(body["trade_id"], 7);
        assert_eq!(body["exit_by"], "trade_id");

        let exits = bot.calls_to("force_exit");
        assert_eq!(exits.len(), 1);
        assert_eq!(exits[0].arg, "7");
    }

    #[tokio::test]
    async fn test_exit_ignores_whitelist() {
        let bot = Arc::new(
            MockBot::new()
                .with_whitelist(&["BTC/USDT:USDT"])
                .with_status(json!([{ "trade_id": 9, "pair": "DOGE/USDT:USDT", "is_open": true }])),
        );
        let out = place_trade(&ctx(&bot, TradingMode::Futures), params("DOGE/USDT:USDT", "close")).await;

        assert!(!out.is_error, "{}", out.text);
        let body = out.json();
        assert_eq!(body["action"], "exit");
        assert_eq!(body["trade_id"], 9);
        assert_eq!(body["exit_by"], "trade_id");

        let exits = bot.calls_to("force_exit");
        assert_eq!(exits.len(), 1);
        assert_eq!(exits[0].arg, "9");
    }

    #[tokio::test]
    async fn test_exit_off_whitelist_uses_corrected_pair() {
        let bot = Arc::new(MockBot::new().with_whitelist(&["BTC/USDT:USDT"]));
        let out = place_trade(&ctx(&bot, TradingMode::Futures), params("dogeusdt", "sell")).await;

        assert!(!out.is_error, "{}", out.text);
        assert_eq!(out.json()["pair"], "DOGE/USDT:USDT");
        assert_eq!(bot.calls_to("force_exit")[0].arg, "DOGE/USDT:USDT");
    }

    #[tokio::test]
    async fn test_exit_falls_through_to_pair() {
        let bot = Arc::new(
            MockBot::new()
                .with_status(json!([{ "trade_id": 7, "pair": "BTC/USDT", "is_open": true }]))
                .with_exit_replies(vec![
                    Err(MockFailure::Http(400, "trade not found".into())),
                    Ok(json!({ "result": "Created exit order for trade BTC/USDT:USDT." })),
                ]),
        );
        let out = place_trade(&ctx(&bot, TradingMode::Futures), params("BTC/USDT:USDT", "close")).await;

        let body = out.json();
        assert!(!out.is_error);
        assert_eq!(body["exit_by"], "pair");
        assert_eq!(body["trade_id"], 7);

        let args: Vec<String> = bot.calls_to("force_exit").into_iter().map(|c| c.arg).collect();
        assert_eq!(args, vec!["7", "BTC/USDT:USDT"]);
    }

    #[tokio::test]
    async fn test_exit_invalid_argument_is_success() {
        let bot = Arc::new(
            MockBot::new().with_exit_replies(vec![Err(MockFailure::Http(400, "Invalid argument.".into()))]),
        );
        let out = place_trade(&ctx(&bot, TradingMode::Spot), params("ETH/USDT", "exit")).await;

        assert!(!out.is_error);
        let body = out.json();
        assert!(body["trade_id"].is_null());
        assert_eq!(body["exit_by"], "pair");
        assert!(body["note"].as_str().unwrap().contains("invalid argument"));
    }

    #[tokio::test]
    async fn test_exit_without_status_closes_by_pair() {
        let bot = Arc::new(MockBot::new().failing("status", MockFailure::Timeout("30s".into())));
        let out = place_trade(&ctx(&bot, TradingMode::Spot), params("ETH/USDT", "exit")).await;

        assert!(!out.is_error);
        assert_eq!(bot.calls_to("force_exit")[0].arg, "ETH/USDT");
    }

    #[tokio::test]
    async fn test_exit_connection_failure_stops_early() {
        let bot = Arc::new(MockBot::new().failing("force_exit", MockFailure::Connection("refused".into())));
        let out = place_trade(&ctx(&bot, TradingMode::Futures), params("ETHUSDT", "sell")).await;

        assert!(out.is_error);
        assert!(out.json()["error"].as_str().unwrap().starts_with("Connection error placing trade"));
        assert_eq!(bot.calls_to("force_exit").len(), 1);
    }

    #[tokio::test]
    async fn test_exit_all_strategies_fail() {
        let bot = Arc::new(MockBot::new().failing("force_exit", MockFailure::Http(400, "no open trade".into())));
        let out = place_trade(&ctx(&bot, TradingMode::Futures), params("ETHUSDT", "sell")).await;

        assert!(out.is_error);
        assert_eq!(out.json()["error"], "Failed to place trade: HTTP 400: no open trade");
        // corrected pair, then the raw ticker
        assert_eq!(bot.calls_to("force_exit").len(), 2);
    }
}
