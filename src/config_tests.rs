//! Unit tests for configuration structures and parsing.

#[cfg(test)]
mod config_tests {
    use crate::config::*;
    use crate::error::ConfigError;
    use crate::freqtrade::TradingMode;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    // ============= Defaults Tests =============

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.freqtrade.api_url, "http://127.0.0.1:8080");
        assert_eq!(config.freqtrade.username, "Freqtrader");
        assert_eq!(config.freqtrade.password, "SuperSecret1!");
        assert_eq!(config.freqtrade.trading_mode, None);
        assert_eq!(config.freqtrade.timeout_secs, 30);
        assert_eq!(config.server.name, "FreqtradeMCP");
        assert_eq!(config.server.transport, Transport::Stdio);
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8005);
        assert_eq!(config.logging.log_level, "INFO");
        assert!(config.logging.log_dir.is_none());
    }

    // ============= YAML Tests =============

    #[test]
    fn test_yaml_full() {
        let yaml = r#"
freqtrade:
  api_url: "http://bot:8080"
  username: "alice"
  password: "hunter2"
  trading_mode: futures
  timeout_secs: 5
server:
  name: "Bridge"
  version: "9.9.9"
  transport: streamable-http
  host: "0.0.0.0"
  port: 9000
logging:
  log_level: debug
  log_dir: /tmp/ftmcp
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.freqtrade.api_url, "http://bot:8080");
        assert_eq!(config.freqtrade.trading_mode, Some(TradingMode::Futures));
        assert_eq!(config.freqtrade.timeout_secs, 5);
        assert_eq!(config.server.transport, Transport::StreamableHttp);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.logging.log_level, "debug");
        assert_eq!(config.logging.log_dir.unwrap().to_str(), Some("/tmp/ftmcp"));
    }

    #[test]
    fn test_yaml_partial_keeps_defaults() {
        let yaml = r#"
freqtrade:
  api_url: "http://bot:8080"
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.freqtrade.api_url, "http://bot:8080");
        assert_eq!(config.freqtrade.username, "Freqtrader");
        assert_eq!(config.server.port, 8005);
    }

    #[test]
    fn test_yaml_with_bom_and_empty() {
        let config = AppConfig::from_yaml_str("\u{feff}server:\n  port: 7000\n").unwrap();
        assert_eq!(config.server.port, 7000);

        let config = AppConfig::from_yaml_str("   \n").unwrap();
        assert_eq!(config.server.port, 8005);
    }

    #[test]
    fn test_yaml_invalid() {
        let result = AppConfig::from_yaml_str("server:\n  port: not-a-port\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "freqtrade:\n  username: bob").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.freqtrade.username, "bob");
    }

    #[test]
    fn test_from_missing_file() {
        let result = AppConfig::from_file(std::path::Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    // ============= Environment Tests =============

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(lookup(&[
                ("FREQTRADE_API_URL", "http://10.0.0.2:8080"),
                ("FREQTRADE_USERNAME", "ops"),
                ("FREQTRADE_PASSWORD", "pw"),
                ("FREQTRADE_TRADING_MODE", "futures"),
                ("MCP_TRANSPORT", "streamable-http"),
                ("MCP_HOST", "0.0.0.0"),
                ("MCP_PORT", "8123"),
                ("LOG_LEVEL", "DEBUG"),
                ("LOG_DIR", "/var/log/ftmcp"),
            ]))
            .unwrap();

        assert_eq!(config.freqtrade.api_url, "http://10.0.0.2:8080");
        assert_eq!(config.freqtrade.username, "ops");
        assert_eq!(config.freqtrade.password, "pw");
        assert_eq!(config.freqtrade.trading_mode, Some(TradingMode::Futures));
        assert_eq!(config.server.transport, Transport::StreamableHttp);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.logging.log_level, "DEBUG");
        assert!(config.logging.log_dir.is_some());
    }

    #[test]
    fn test_env_blank_values_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(lookup(&[("FREQTRADE_API_URL", "  ")])).unwrap();
        assert_eq!(config.freqtrade.api_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn test_env_invalid_port() {
        let mut config = AppConfig::default();
        let err = config.apply_env(lookup(&[("MCP_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "MCP_PORT", .. }));
    }

    #[test]
    fn test_env_invalid_trading_mode() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(lookup(&[("FREQTRADE_TRADING_MODE", "options")]))
            .unwrap_err();
        assert!(err.to_string().contains("options"));
    }

    #[test]
    fn test_env_zero_timeout_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(lookup(&[("FREQTRADE_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "FREQTRADE_TIMEOUT_SECS", .. }));
        assert_eq!(config.freqtrade.timeout_secs, 30);
    }

    #[test]
    fn test_yaml_zero_timeout_rejected() {
        let config = AppConfig::from_yaml_str("freqtrade:\n  timeout_secs: 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "freqtrade.timeout_secs", .. }));
        assert!(AppConfig::default().validate().is_ok());
    }

    // ============= Transport / Summary Tests =============

    #[test]
    fn test_transport_parse() {
        assert_eq!("stdio".parse::<Transport>().unwrap(), Transport::Stdio);
        assert_eq!("streamable-http".parse::<Transport>().unwrap(), Transport::StreamableHttp);
        assert!("grpc".parse::<Transport>().is_err());
    }

    #[test]
    fn test_summary_masks_password() {
        let mut config = AppConfig::default();
        config.server.transport = Transport::StreamableHttp;
        let summary = config.summary();

        assert!(!summary.contains("SuperSecret1!"));
        assert!(summary.contains("HTTP: localhost:8005"));
        assert!(summary.contains("Trading Mode: auto-detect"));
    }
}
