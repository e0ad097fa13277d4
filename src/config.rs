use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::{defaults, env};
use crate::error::ConfigError;
use crate::freqtrade::TradingMode;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FreqtradeConfig {
    pub api_url: String,
    pub username: String,
    pub password: String,
    /// `None` means "ask the bot at startup".
    pub trading_mode: Option<TradingMode>,
    pub timeout_secs: u64,
}

impl Default for FreqtradeConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::API_URL.to_string(),
            username: defaults::USERNAME.to_string(),
            password: defaults::PASSWORD.to_string(),
            trading_mode: None,
            timeout_secs: defaults::TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
pub enum Transport {
    #[default]
    #[serde(rename = "stdio")]
    #[value(name = "stdio")]
    Stdio,
    #[serde(rename = "streamable-http")]
    #[value(name = "streamable-http")]
    StreamableHttp,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => f.write_str("stdio"),
            Transport::StreamableHttp => f.write_str("streamable-http"),
        }
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "streamable-http" | "http" => Ok(Transport::StreamableHttp),
            other => Err(format!("unknown transport '{}' (expected stdio|streamable-http)", other)),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub transport: Transport,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: defaults::SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            transport: Transport::Stdio,
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_string(),
            log_dir: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub freqtrade: FreqtradeConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Builds the configuration: defaults, then the YAML file, then the
    /// process environment. An explicit `path` must exist; the default
    /// `config.yaml` is only read when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(defaults::CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overlays environment values. `lookup` is injected so tests do not
    /// have to mutate the real process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env::API_URL) {
            self.freqtrade.api_url = v;
        }
        if let Some(v) = get(env::USERNAME) {
            self.freqtrade.username = v;
        }
        if let Some(v) = get(env::PASSWORD) {
            self.freqtrade.password = v;
        }
        if let Some(v) = get(env::TRADING_MODE) {
            self.freqtrade.trading_mode = Some(parse_value(env::TRADING_MODE, &v)?);
        }
        if let Some(v) = get(env::TIMEOUT_SECS) {
            let secs: u64 = parse_value(env::TIMEOUT_SECS, &v)?;
            self.freqtrade.timeout_secs = require_positive(env::TIMEOUT_SECS, secs)?;
        }
        if let Some(v) = get(env::SERVER_NAME) {
            self.server.name = v;
        }
        if let Some(v) = get(env::SERVER_VERSION) {
            self.server.version = v;
        }
        if let Some(v) = get(env::TRANSPORT) {
            self.server.transport = parse_value(env::TRANSPORT, &v)?;
        }
        if let Some(v) = get(env::HOST) {
            self.server.host = v;
        }
        if let Some(v) = get(env::PORT) {
            self.server.port = parse_value(env::PORT, &v)?;
        }
        if let Some(v) = get(env::LOG_LEVEL) {
            self.logging.log_level = v;
        }
        if let Some(v) = get(env::LOG_DIR) {
            self.logging.log_dir = Some(PathBuf::from(v));
        }
        Ok(())
    }

    /// Rejects values that would only fail later, at connect time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("freqtrade.timeout_secs", self.freqtrade.timeout_secs)?;
        Ok(())
    }

    /// Human readable summary with the password masked.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "🔧 Freqtrade MCP Server Configuration:".to_string(),
            format!("   Server: {} v{}", self.server.name, self.server.version),
            format!("   Transport: {}", self.server.transport),
        ];
        if self.server.transport == Transport::StreamableHttp {
            lines.push(format!("   HTTP: {}:{}", self.server.host, self.server.port));
        }
        lines.push(format!("   Freqtrade API: {}", self.freqtrade.api_url));
        lines.push(format!("   Username: {}", self.freqtrade.username));
        lines.push(format!("   Password: {}", mask(&self.freqtrade.password)));
        lines.push(format!(
            "   Trading Mode: {}",
            self.freqtrade
                .trading_mode
                .map(|m| m.to_string())
                .unwrap_or_else(|| "auto-detect".to_string())
        ));
        lines.push(format!("   Log Level: {}", self.logging.log_level));
        if let Some(dir) = &self.logging.log_dir {
            lines.push(format!("   Log Dir: {}", dir.display()));
        }
        lines.join("\n")
    }
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// A zero timeout makes every request fail immediately.
fn require_positive(key: &'static str, secs: u64) -> Result<u64, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            value: secs.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(secs)
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(empty)".to_string()
    } else {
        "*".repeat(secret.chars().count().min(8))
    }
}
