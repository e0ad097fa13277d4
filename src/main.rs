use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use freqtrade_mcp::config::{AppConfig, Transport};
use freqtrade_mcp::mcp::{http, stdio, McpServer, ServerInfo};
use freqtrade_mcp::{logging, ToolContext};

/// MCP server exposing a Freqtrade bot's REST API as agent tools.
#[derive(Parser, Debug)]
#[command(name = "freqtrade-mcp", version, about)]
struct Cli {
    /// Transport to serve MCP on
    #[arg(long, value_enum)]
    transport: Option<Transport>,

    /// Bind host for the streamable-http transport
    #[arg(long)]
    host: Option<String>,

    /// Bind port for the streamable-http transport
    #[arg(long)]
    port: Option<u16>,

    /// YAML configuration file (defaults to ./config.yaml when present)
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Log level (DEBUG, INFO, WARNING, ERROR)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the effective configuration and exit
    #[arg(long)]
    show_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(transport) = self.transport {
            config.server.transport = transport;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = &self.log_level {
            config.logging.log_level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    // Load .env before reading the environment
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load(cli.config_file.as_deref())?;
    cli.apply(&mut config);

    if cli.show_config {
        println!("{}", config.summary());
        return Ok(());
    }

    // Setup Logging
    if let Some(path) = logging::init(&config.logging)? {
        info!("📝 Logging to {}", path.display());
    }

    info!("🚀 Starting {} v{}...", config.server.name, config.server.version);
    for line in config.summary().lines().skip(1) {
        info!("{}", line.trim());
    }

    let ctx = ToolContext::connect(&config.freqtrade).await;
    let server = McpServer::new(ctx, ServerInfo::from(&config.server));

    match config.server.transport {
        Transport::Stdio => stdio::serve(server).await?,
        Transport::StreamableHttp => http::serve(server, &config.server.host, config.server.port).await?,
    }

    Ok(())
}
