//! Interactive tracking session.

use crate::format;
use anyhow::Result;
use chrono::NaiveDate;
use il_tracker_data::PriceProvider;
use il_tracker_domain::entities::{LossSample, TokenPosition};
use il_tracker_domain::enums::Network;
use il_tracker_domain::networks;
use il_tracker_domain::value_objects::PollInterval;
use il_tracker_execution::chart::ChartData;
use il_tracker_execution::clock::SystemClock;
use il_tracker_execution::scheduler::{PollingScheduler, TokioTimer};
use il_tracker_execution::tracking::{LossTracker, TrackerConfig};
use il_tracker_execution::wallet::WalletAddress;
use prettytable::{Table, row};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Options of the `track` command.
pub struct TrackOptions {
    pub interval: u32,
    pub live: bool,
    pub max_samples: Option<usize>,
    pub json: bool,
    pub wallet: Option<WalletAddress>,
}

enum Command {
    ToggleLive,
    Interval(u32),
    Amounts(f64, f64),
    Network(Network),
    Pair(String, String),
    Date(NaiveDate),
    Now,
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let number = |s: Option<&&str>| -> Result<f64, String> {
        s.ok_or("missing value")?
            .parse::<f64>()
            .map_err(|e| e.to_string())
    };

    match parts.first().copied() {
        Some("live" | "l") => Ok(Command::ToggleLive),
        Some("interval" | "i") => parts
            .get(1)
            .ok_or("usage: interval <minutes>")?
            .parse::<u32>()
            .map(Command::Interval)
            .map_err(|e| e.to_string()),
        Some("amounts" | "a") => Ok(Command::Amounts(number(parts.get(1))?, number(parts.get(2))?)),
        Some("network" | "net") => parts
            .get(1)
            .ok_or("usage: network <ethereum|bitcoin|solana>")?
            .parse::<Network>()
            .map(Command::Network)
            .map_err(|e| e.to_string()),
        Some("pair" | "p") => match (parts.get(1), parts.get(2)) {
            (Some(token1), Some(token2)) => Ok(Command::Pair(token1.to_lowercase(), token2.to_lowercase())),
            _ => Err("usage: pair <token1> <token2>".to_string()),
        },
        Some("date" | "d") => parts
            .get(1)
            .ok_or("usage: date <YYYY-MM-DD>")?
            .parse::<NaiveDate>()
            .map(Command::Date)
            .map_err(|e| e.to_string()),
        Some("now" | "n") => Ok(Command::Now),
        Some("status" | "s") => Ok(Command::Status),
        Some("help" | "h" | "?") => Ok(Command::Help),
        Some("quit" | "q" | "exit") => Ok(Command::Quit),
        Some(other) => Err(format!("unknown command '{other}', type 'help'")),
        None => Err("empty command".to_string()),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  live | l                 toggle live tracking (1 min)");
    println!("  interval | i <minutes>   change the poll interval");
    println!("  amounts | a <a1> <a2>    change the token amounts");
    println!("  network | net <id>       switch network and its default pair");
    println!("  pair | p <t1> <t2>       change the token pair");
    println!("  date | d <YYYY-MM-DD>    change the liquidity date");
    println!("  now | n                  fetch prices now");
    println!("  status | s               show current metrics");
    println!("  quit | q                 stop tracking");
}

fn print_sample(sample: &LossSample) {
    println!(
        "[{}] LP {} | HODL {} | IL {}",
        sample.timestamp().format("%H:%M:%S"),
        format::usd(sample.lp_value()),
        format::usd(sample.hold_value()),
        format::percent(sample.impermanent_loss()),
    );
}

async fn print_status(tracker: &LossTracker, scheduler: &PollingScheduler) {
    let config = tracker.config().await;
    let state = scheduler.tracking_state();
    let pair = config.pair();

    let mut table = Table::new();
    table.add_row(row!["Network", config.network]);
    table.add_row(row![
        "Position",
        format!(
            "{} {} + {} {}",
            config.position1.amount(),
            pair.token1.to_uppercase(),
            config.position2.amount(),
            pair.token2.to_uppercase()
        )
    ]);
    table.add_row(row!["Liquidity date", config.reference_date]);
    table.add_row(row![
        "Cadence",
        if state.live_mode_enabled {
            "live, every 1 min".to_string()
        } else {
            format!("every {}", state.poll_interval)
        }
    ]);

    match tracker.latest_reading().await {
        Some(reading) => {
            table.add_row(row![
                format!("{} price", pair.token1.to_uppercase()),
                format::price(&reading.price1)
            ]);
            table.add_row(row![
                format!("{} price", pair.token2.to_uppercase()),
                format::price(&reading.price2)
            ]);
            match reading.loss {
                Some(loss) => {
                    table.add_row(row!["Current LP Value", format::usd(loss.lp_value)]);
                    table.add_row(row!["HODL Value", format::usd(loss.hold_value)]);
                    table.add_row(row!["Impermanent Loss", format::percent(loss.loss_fraction)]);
                }
                None => {
                    table.add_row(row!["Impermanent Loss", "unavailable"]);
                }
            }
        }
        None => {
            table.add_row(row!["Impermanent Loss", "Calculating..."]);
        }
    }
    table.add_row(row!["Samples", tracker.history().len().await]);
    table.printstd();
}

fn print_chart(samples: &[LossSample]) {
    let chart = ChartData::project(samples);
    if chart.is_empty() {
        println!("No price data was recorded.");
        return;
    }

    let mut table = Table::new();
    table.add_row(row![
        "Time",
        chart.impermanent_loss_pct.label,
        chart.lp_value.label,
        chart.hold_value.label
    ]);
    for (i, label) in chart.labels.iter().enumerate() {
        table.add_row(row![
            label,
            format!("{:.2}", chart.impermanent_loss_pct.data[i]),
            format::usd(chart.lp_value.data[i]),
            format::usd(chart.hold_value.data[i])
        ]);
    }
    table.printstd();
}

/// Applies a change on top of the current config and refreshes the reading.
async fn reconfigure(
    tracker: &Arc<LossTracker>,
    change: impl FnOnce(&mut TrackerConfig) -> Result<()>,
) -> Result<()> {
    let mut config = tracker.config().await;
    change(&mut config)?;
    tracker.reconfigure(config).await;
    Ok(())
}

/// Swaps the token ids of both positions, keeping their amounts.
fn set_pair(config: &mut TrackerConfig, token1: String, token2: String) -> Result<()> {
    for token in [&token1, &token2] {
        if networks::find_token(config.network, token).is_none() {
            warn!(token = %token, network = %config.network, "Token is not listed for this network");
        }
    }
    config.position1 = TokenPosition::new(token1, config.position1.amount())?;
    config.position2 = TokenPosition::new(token2, config.position2.amount())?;
    Ok(())
}

/// Runs a tracking session until `quit`, Ctrl-C or the sample limit.
pub async fn run(
    provider: Arc<dyn PriceProvider>,
    config: TrackerConfig,
    options: TrackOptions,
) -> Result<()> {
    let tracker = Arc::new(LossTracker::new(
        provider,
        Arc::new(SystemClock::new()),
        config,
    ));
    let timer = Arc::new(TokioTimer::try_current()?);
    let scheduler = PollingScheduler::new(
        timer,
        tracker.tick_fn(),
        PollInterval::from_minutes(options.interval)?,
    );

    if let Some(wallet) = &options.wallet {
        println!("Wallet: {}", wallet.short());
    }
    if options.live {
        scheduler.enable_live_mode();
    } else {
        scheduler.start();
    }
    println!("Tracking started, type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut refresh = tokio::time::interval(Duration::from_secs(1));
    let mut printed = 0usize;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            _ = refresh.tick() => {
                if tracker.history().len().await > printed {
                    let samples = tracker.history().snapshot().await;
                    for sample in &samples[printed..] {
                        print_sample(sample);
                    }
                    printed = samples.len();
                }
                if options.max_samples.is_some_and(|max| printed >= max) {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        stdin_open = false;
                        continue;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read command");
                        stdin_open = false;
                        continue;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                let result = match parse_command(&line) {
                    Err(msg) => {
                        println!("{msg}");
                        Ok(())
                    }
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => {
                        print_help();
                        Ok(())
                    }
                    Ok(Command::ToggleLive) => {
                        if scheduler.tracking_state().live_mode_enabled {
                            scheduler.disable_live_mode();
                            println!("Live tracking stopped.");
                        } else {
                            scheduler.enable_live_mode();
                            println!("Live tracking active - updating every 1 minute.");
                        }
                        Ok(())
                    }
                    Ok(Command::Interval(minutes)) => scheduler
                        .set_interval(minutes)
                        .map_err(anyhow::Error::from),
                    Ok(Command::Amounts(amount1, amount2)) => {
                        reconfigure(&tracker, |config| {
                            config.position1 =
                                TokenPosition::new(config.position1.token_id(), amount1)?;
                            config.position2 =
                                TokenPosition::new(config.position2.token_id(), amount2)?;
                            Ok(())
                        })
                        .await
                    }
                    Ok(Command::Network(network)) => {
                        reconfigure(&tracker, |config| {
                            config.network = network;
                            let pair = networks::default_pair(network);
                            set_pair(config, pair.token1, pair.token2)
                        })
                        .await
                    }
                    Ok(Command::Pair(token1, token2)) => {
                        reconfigure(&tracker, |config| set_pair(config, token1, token2)).await
                    }
                    Ok(Command::Date(date)) => {
                        reconfigure(&tracker, |config| {
                            config.reference_date = date;
                            Ok(())
                        })
                        .await
                    }
                    Ok(Command::Now) => {
                        (tracker.tick_fn())();
                        Ok(())
                    }
                    Ok(Command::Status) => {
                        print_status(&tracker, &scheduler).await;
                        Ok(())
                    }
                };

                if let Err(e) = result {
                    println!("{e}");
                }
            }
        }
    }

    scheduler.stop();

    let samples = tracker.history().snapshot().await;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&samples)?);
    } else {
        print_chart(&samples);
    }
    Ok(())
}
