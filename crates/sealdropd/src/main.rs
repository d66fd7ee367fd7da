//! sealdropd: sealdrop relay daemon
//!
//! Usage:
//!   sealdropd [--config /etc/sealdrop/config.toml] [--listen 0.0.0.0:8080]
//!
//! Logging level and format come from the config file unless overridden by
//! `--log` / `--log-format` (or `SEALDROP_LOG` / `SEALDROP_LOG_FORMAT`).
//! `RUST_LOG` overrides both.

mod daemon;
mod disposition;
mod error;
mod routes;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "sealdropd", version, about = "sealdrop encrypted file relay")]
struct Cli {
    /// Path to sealdrop.toml configuration file
    #[arg(
        long,
        short = 'c',
        env = "SEALDROP_CONFIG",
        default_value = "/etc/sealdrop/config.toml"
    )]
    config: PathBuf,

    /// Listen address, overrides server.listen
    #[arg(long, env = "SEALDROP_LISTEN")]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SEALDROP_LOG")]
    log: Option<String>,

    /// Log format (json, text)
    #[arg(long, env = "SEALDROP_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first: it supplies the default log settings
    let mut config = sealdrop_core::load_config(&cli.config)?;

    let level = cli.log.unwrap_or_else(|| config.server.log_level.clone());
    let format = cli.log_format.unwrap_or_else(|| {
        LogFormat::from_str(&config.server.log_format, true).unwrap_or(LogFormat::Text)
    });
    init_logging(&level, &format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "sealdropd starting"
    );
    if !cli.config.exists() {
        warn!(
            "config file not found: {}  (using defaults)",
            cli.config.display()
        );
    }

    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }

    daemon::run(config).await
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}
