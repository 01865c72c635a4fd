//! Command Line Interface for the impermanent loss tracker.
use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use il_tracker_data::providers::CoinGeckoProvider;
use il_tracker_data::{PriceFeedConfig, PriceProvider};
use il_tracker_domain::entities::TokenPosition;
use il_tracker_domain::enums::Network;
use il_tracker_domain::metrics::impermanent_loss::{
    calculate_il_constant_product, calculate_il_rebalanced,
};
use il_tracker_domain::networks;
use il_tracker_domain::value_objects::PricePoint;
use il_tracker_execution::tracking::TrackerConfig;
use il_tracker_execution::wallet::{EnvWalletConnector, WalletSession};
use prettytable::{Table, row};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod format;
mod track;

#[derive(Parser)]
#[command(name = "il-tracker")]
#[command(about = "Track impermanent loss of a two-token liquidity position", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct PositionArgs {
    /// Network the tokens are picked from
    #[arg(short, long, default_value = "ethereum")]
    network: Network,

    /// First token id (defaults to the network's first token)
    #[arg(long)]
    token1: Option<String>,

    /// Second token id (defaults to the network's second token)
    #[arg(long)]
    token2: Option<String>,

    /// Amount of the first token
    #[arg(long, default_value_t = 1.0)]
    amount1: f64,

    /// Amount of the second token
    #[arg(long, default_value_t = 1.0)]
    amount2: f64,

    /// Date liquidity was provided (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl PositionArgs {
    fn to_config(&self) -> Result<TrackerConfig> {
        let defaults = networks::default_pair(self.network);
        let token1 = self.token1.clone().unwrap_or(defaults.token1);
        let token2 = self.token2.clone().unwrap_or(defaults.token2);

        for token in [&token1, &token2] {
            if networks::find_token(self.network, token).is_none() {
                warn!(token = %token, network = %self.network, "Token is not listed for this network");
            }
        }

        Ok(TrackerConfig {
            network: self.network,
            position1: TokenPosition::new(token1, self.amount1)?,
            position2: TokenPosition::new(token2, self.amount2)?,
            reference_date: self.date.unwrap_or_else(|| Local::now().date_naive()),
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List supported networks and their tokens
    Networks,
    /// Search the price feed's coin list
    Coins {
        /// Case-insensitive text matched against id, symbol and name
        #[arg(short, long)]
        search: String,

        /// Maximum rows to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Calculate impermanent loss once at current prices
    Calculate {
        #[command(flatten)]
        position: PositionArgs,

        /// Use this USD price for token 1 instead of fetching
        #[arg(long, requires = "price2")]
        price1: Option<f64>,

        /// Use this USD price for token 2 instead of fetching
        #[arg(long, requires = "price1")]
        price2: Option<f64>,

        /// Token 1 price in token 2 when liquidity was provided
        #[arg(long)]
        entry_ratio: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Poll prices and record impermanent loss over time
    Track {
        #[command(flatten)]
        position: PositionArgs,

        /// Poll interval in minutes
        #[arg(short, long, default_value_t = 1)]
        interval: u32,

        /// Start in live mode (fixed 1 minute cadence)
        #[arg(long)]
        live: bool,

        /// Stop after this many samples
        #[arg(long)]
        max_samples: Option<usize>,

        /// Print the session history as JSON on exit
        #[arg(long)]
        json: bool,
    },
    /// Show the connected wallet
    Wallet,
}

fn price_provider() -> Result<CoinGeckoProvider> {
    CoinGeckoProvider::new(PriceFeedConfig::from_env()).context("building price feed client")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Networks => {
            let mut table = Table::new();
            table.add_row(row!["Network", "Token id", "Name"]);
            for network in Network::ALL {
                for token in networks::tokens(network) {
                    table.add_row(row![network.display_name(), token.id, token.name]);
                }
            }
            table.printstd();
        }
        Commands::Coins { search, limit } => {
            let provider = price_provider()?;
            let needle = search.to_lowercase();
            let coins = provider.list_coins().await?;

            let matches: Vec<_> = coins
                .iter()
                .filter(|c| {
                    c.id.to_lowercase().contains(&needle)
                        || c.symbol.to_lowercase().contains(&needle)
                        || c.name.to_lowercase().contains(&needle)
                })
                .take(limit)
                .collect();

            if matches.is_empty() {
                println!("No coins match '{search}'.");
                return Ok(());
            }

            let mut table = Table::new();
            table.add_row(row!["Id", "Symbol", "Name"]);
            for coin in matches {
                table.add_row(row![coin.id, coin.symbol.to_uppercase(), coin.name]);
            }
            table.printstd();
        }
        Commands::Calculate {
            position,
            price1,
            price2,
            entry_ratio,
            json,
        } => {
            let config = position.to_config()?;
            let pair = config.pair();

            let (point1, point2) = match (price1, price2) {
                (Some(p1), Some(p2)) => (
                    PricePoint::new(&pair.token1, Some(p1)),
                    PricePoint::new(&pair.token2, Some(p2)),
                ),
                _ => {
                    let provider = price_provider()?;
                    let quotes = provider.get_prices(&pair.ids()).await?;
                    (quotes.point(&pair.token1), quotes.point(&pair.token2))
                }
            };

            let result = calculate_il_rebalanced(
                config.position1.amount(),
                config.position2.amount(),
                point1.usd_price,
                point2.usd_price,
            );

            if json {
                let value = serde_json::json!({
                    "config": config,
                    "price1": point1.usd_price,
                    "price2": point2.usd_price,
                    "result": result.as_ref().ok(),
                    "error": result.as_ref().err().map(ToString::to_string),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }

            let mut table = Table::new();
            table.add_row(row![
                format!("{} price", pair.token1.to_uppercase()),
                format::price(&point1)
            ]);
            table.add_row(row![
                format!("{} price", pair.token2.to_uppercase()),
                format::price(&point2)
            ]);

            match result {
                Ok(il) => {
                    table.add_row(row!["Current LP Value", format::usd(il.lp_value)]);
                    table.add_row(row!["HODL Value", format::usd(il.hold_value)]);
                    table.add_row(row!["Impermanent Loss", format::percent(il.loss_fraction)]);
                    table.add_row(row!["Difference", format::usd(il.absolute_loss_usd())]);
                    table.add_row(row!["Constant k", format!("{:.8}", il.k)]);
                    table.add_row(row![
                        "Rebalanced amounts",
                        format!("{:.8} / {:.8}", il.new_amount1, il.new_amount2)
                    ]);

                    if let Some(entry) = entry_ratio {
                        let closed_form =
                            calculate_il_constant_product(entry, il.price_ratio)?;
                        table.add_row(row!["IL vs entry ratio", format::percent(closed_form)]);
                    }
                }
                Err(e) => {
                    table.add_row(row!["Impermanent Loss", format!("unavailable ({e})")]);
                }
            }
            table.printstd();
        }
        Commands::Track {
            position,
            interval,
            live,
            max_samples,
            json,
        } => {
            if interval == 0 {
                bail!("--interval must be at least 1 minute");
            }
            let config = position.to_config()?;
            let provider: Arc<dyn PriceProvider> = Arc::new(price_provider()?);

            let mut wallet = WalletSession::new(Arc::new(EnvWalletConnector::default()));
            if let Err(e) = wallet.connect().await {
                tracing::debug!(error = %e, "Tracking without a wallet");
            }

            track::run(
                provider,
                config,
                track::TrackOptions {
                    interval,
                    live,
                    max_samples,
                    json,
                    wallet: wallet.address().cloned(),
                },
            )
            .await?;
        }
        Commands::Wallet => {
            let mut wallet = WalletSession::new(Arc::new(EnvWalletConnector::default()));
            match wallet.connect().await {
                Ok(address) => println!("Connected: {} ({})", address.short(), address),
                Err(e) => println!("{e}"),
            }
            wallet.disconnect().await;
        }
    }

    Ok(())
}
