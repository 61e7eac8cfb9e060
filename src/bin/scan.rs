//! One-shot scan: fetch the current window, evaluate it once and print the result.

use dotenvy::dotenv;
use emacross::config::EngineConfig;
use emacross::core::runtime::SignalRuntime;
use emacross::core::scheduler::CycleOutcome;
use emacross::logging;
use emacross::models::signal::SignalRecord;
use emacross::services::coingecko::{CoinGeckoConfig, CoinGeckoMarketDataProvider};
use emacross::services::notifier::LogNotifier;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = EngineConfig::from_env()?;
    let provider = Arc::new(CoinGeckoMarketDataProvider::new(CoinGeckoConfig::from_env()?)?);
    let runtime = SignalRuntime::new(config, provider, Arc::new(LogNotifier), None)?;

    let fast = runtime.config().indicators.fast_window;
    let slow = runtime.config().indicators.slow_window;

    match runtime.snapshot().await {
        Ok(snapshot) => {
            println!("Symbol: {}", snapshot.symbol);
            println!("  Price: ${:.2}", snapshot.price);
            if let Some(change) = snapshot.change_24h {
                println!("  24h change: {:+.2}%", change);
            }
            println!("  EMA {}: ${:.2}", fast, snapshot.fast_ema);
            println!("  EMA {}: ${:.2}", slow, snapshot.slow_ema);
            println!("  ATR: ${:.2}", snapshot.atr);
            println!("  Last bar: {}", snapshot.bar_timestamp);
        }
        Err(e) => println!("Snapshot unavailable: {}", e),
    }

    match runtime.run_once().await? {
        CycleOutcome::Signal { record, .. } => print_signal(&record),
        CycleOutcome::NoSignal | CycleOutcome::Duplicate(_) => println!("No crossover on the last bar"),
        CycleOutcome::InsufficientData { required, available } => {
            println!("Not enough history: {} of {} bars", available, required)
        }
        CycleOutcome::InvalidVolatility(event) => {
            println!("{} crossover with unusable ATR ({})", event.direction, event.atr)
        }
        CycleOutcome::FetchFailed(e) => {
            println!("Fetch failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_signal(record: &SignalRecord) {
    println!("Signal: {}", record.event.direction);
    println!("  Bar: {}", record.event.timestamp);
    println!("  Entry: ${:.2}", record.risk_band.entry);
    println!("  Stop loss: ${:.2}", record.risk_band.stop_loss);
    println!("  Take profit: ${:.2}", record.risk_band.take_profit);
    println!("  ATR: ${:.2}", record.event.atr);
}
