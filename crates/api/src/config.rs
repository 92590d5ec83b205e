//! Command-line / environment configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;

use chipledger_observability::LogFormat;
use chipledger_wallet::DEFAULT_STARTING_BALANCE;

/// Balance ledger HTTP service for the casino prototype.
#[derive(Debug, Clone, Parser)]
#[command(name = "chipledger-api", version, about)]
pub struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// JSON file holding every player's balance and history.
    #[arg(long, env = "DATA_FILE", default_value = "balances.json")]
    pub data_file: PathBuf,

    /// Directory served for any path that is not an API route.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Balance given to a player the first time they are seen.
    #[arg(
        long,
        env = "STARTING_BALANCE",
        default_value_t = DEFAULT_STARTING_BALANCE,
        allow_negative_numbers = true
    )]
    pub starting_balance: i64,

    /// Log output format: json or pretty.
    #[arg(long, env = "LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub data_file: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub starting_balance: i64,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        if args.starting_balance < 0 {
            bail!(
                "starting_balance must be non-negative (got {})",
                args.starting_balance
            );
        }

        Ok(Self {
            addr: SocketAddr::new(args.host, args.port),
            data_file: args.data_file.clone(),
            static_dir: Some(args.static_dir.clone()),
            starting_balance: args.starting_balance,
        })
    }
}
