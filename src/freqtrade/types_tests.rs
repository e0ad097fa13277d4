//! Unit tests for Freqtrade wire types.

#[cfg(test)]
mod types_tests {
    use crate::freqtrade::types::*;
    use serde_json::json;

    #[test]
    fn test_trading_mode_parse() {
        assert_eq!("spot".parse::<TradingMode>().unwrap(), TradingMode::Spot);
        assert_eq!(" Futures ".parse::<TradingMode>().unwrap(), TradingMode::Futures);
        assert_eq!("margin".parse::<TradingMode>().unwrap(), TradingMode::Futures);
        assert!("perp".parse::<TradingMode>().is_err());
    }

    #[test]
    fn test_trading_mode_other() {
        assert_eq!(TradingMode::Spot.other(), TradingMode::Futures);
        assert_eq!(TradingMode::Futures.other(), TradingMode::Spot);
    }

    #[test]
    fn test_trade_action_aliases() {
        for side in ["buy", "LONG", " enter_long "] {
            assert_eq!(TradeAction::parse(side), Some(TradeAction::Enter(PositionSide::Long)));
        }
        for side in ["short", "Enter_Short"] {
            assert_eq!(TradeAction::parse(side), Some(TradeAction::Enter(PositionSide::Short)));
        }
        for side in ["sell", "exit", "close", "exit_long", "exit_short"] {
            assert_eq!(TradeAction::parse(side), Some(TradeAction::Exit));
        }
        assert_eq!(TradeAction::parse("hodl"), None);
        assert_eq!(TradeAction::parse(""), None);
    }

    #[test]
    fn test_force_enter_request_serialization() {
        let req = ForceEnterRequest {
            pair: "BTC/USDT".into(),
            side: PositionSide::Short,
            price: None,
            entry_tag: Some("mcp-market".into()),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({ "pair": "BTC/USDT", "side": "short", "entry_tag": "mcp-market" }));
    }

    #[test]
    fn test_force_enter_request_with_price() {
        let req = ForceEnterRequest {
            pair: "ETH/USDT:USDT".into(),
            side: PositionSide::Long,
            price: Some(2500.5),
            entry_tag: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["price"], json!(2500.5));
        assert!(value.get("entry_tag").is_none());
    }

    #[test]
    fn test_exit_target_tradeid() {
        assert_eq!(ExitTarget::TradeId(42).as_tradeid(), "42");
        assert_eq!(ExitTarget::Pair("BTC/USDT".into()).as_tradeid(), "BTC/USDT");
        let body = ForceExitRequest::from(&ExitTarget::TradeId(42));
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "tradeid": "42" }));
    }
}
