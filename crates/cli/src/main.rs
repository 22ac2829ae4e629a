mod config;

use anyhow::Result;
use bgbridge_brokers_bitget::{BitgetClient, Credentials};
use bgbridge_core::{ExchangeResponse, FuturesExchange, PositionMode, Side};
use clap::{Parser, Subcommand};
use config::FileConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "bgbridge")]
#[command(about = "Signed Bitget futures client with a local HTTP proxy")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Exchange API key
    #[arg(long, env = "API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Exchange API secret
    #[arg(long, env = "API_SECRET", default_value = "", hide_env_values = true)]
    api_secret: String,

    /// Exchange API passphrase
    #[arg(long, env = "PASSPHRASE", default_value = "", hide_env_values = true)]
    passphrase: String,

    /// Exchange REST base URL
    #[arg(long, env = "BITGET_BASE_URL")]
    base_url: Option<String>,

    /// Optional TOML config file for non-secret settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP proxy
    Server {
        /// Bind address (default 0.0.0.0:8000)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List open USDT-margined futures positions
    Positions,

    /// Open a position (base asset only, e.g. "BTC")
    Open {
        symbol: String,
        /// Order size
        amount: String,
        #[arg(long, default_value = "buy")]
        side: Side,
        /// Limit price; market order when omitted
        #[arg(long)]
        price: Option<String>,
    },

    /// Close every position on a symbol (base asset only)
    Close { symbol: String },

    /// Switch between one_way_mode and hedge_mode
    PositionMode {
        mode: PositionMode,
        #[arg(long, default_value = "USDT-FUTURES")]
        product_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let credentials = Credentials::new(cli.api_key, cli.api_secret, cli.passphrase);
    for name in credentials.missing() {
        tracing::warn!(variable = name, "Credential not set, exchange calls will fail authentication");
    }

    let client = BitgetClient::new(credentials, file_config.exchange(cli.base_url));
    tracing::debug!(base_url = %client.config().base_url, "Exchange client ready");

    match cli.command {
        Commands::Server { bind } => {
            let bind = file_config.bind(bind);
            bgbridge_api::start_server(Arc::new(client), &bind).await?;
        }
        Commands::Positions => {
            print_response(&client.list_positions().await?)?;
        }
        Commands::Open {
            symbol,
            amount,
            side,
            price,
        } => {
            tracing::info!(symbol = %symbol, amount = %amount, side = %side, "Opening order");
            let resp = client
                .open_order(&symbol, &amount, side, price.as_deref())
                .await?;
            print_response(&resp)?;
        }
        Commands::Close { symbol } => {
            print_response(&client.close_order(&symbol).await?)?;
        }
        Commands::PositionMode { mode, product_type } => {
            print_response(&client.set_position_mode(&product_type, mode).await?)?;
        }
    }

    Ok(())
}

fn print_response(resp: &ExchangeResponse) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(resp)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_open_limit_order() {
        let cli = Cli::try_parse_from([
            "bgbridge", "open", "BTC", "10", "--side", "sell", "--price", "50000",
        ])
        .unwrap();
        match cli.command {
            Commands::Open {
                symbol,
                amount,
                side,
                price,
            } => {
                assert_eq!(symbol, "BTC");
                assert_eq!(amount, "10");
                assert_eq!(side, Side::Sell);
                assert_eq!(price.as_deref(), Some("50000"));
            }
            _ => panic!("Expected open command"),
        }
    }

    #[test]
    fn test_open_defaults_to_market_buy() {
        let cli = Cli::try_parse_from(["bgbridge", "open", "ETH", "1"]).unwrap();
        match cli.command {
            Commands::Open { side, price, .. } => {
                assert_eq!(side, Side::Buy);
                assert!(price.is_none());
            }
            _ => panic!("Expected open command"),
        }
    }

    #[test]
    fn test_parse_position_mode() {
        let cli = Cli::try_parse_from(["bgbridge", "position-mode", "hedge_mode"]).unwrap();
        match cli.command {
            Commands::PositionMode { mode, product_type } => {
                assert_eq!(mode, PositionMode::Hedge);
                assert_eq!(product_type, "USDT-FUTURES");
            }
            _ => panic!("Expected position-mode command"),
        }
    }

    #[test]
    fn test_rejects_unknown_side() {
        assert!(Cli::try_parse_from(["bgbridge", "open", "BTC", "1", "--side", "long"]).is_err());
    }
}
