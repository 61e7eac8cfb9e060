//! emacross Signal Engine Server
//!
//! Starts the polling engine and the HTTP control/status API.

use dotenvy::dotenv;
use emacross::config::{get_port, EngineConfig};
use emacross::core::http::start_server;
use emacross::core::runtime::SignalRuntime;
use emacross::logging;
use emacross::metrics::Metrics;
use emacross::services::coingecko::{CoinGeckoConfig, CoinGeckoMarketDataProvider};
use emacross::services::market_data::MarketDataProvider;
use emacross::services::notifier::{LogNotifier, Notifier, TelegramConfig, TelegramNotifier};
use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = get_port();
    let autostart = env::var("AUTOSTART")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(true);

    // configuration errors are the only fatal ones
    let config = EngineConfig::from_env()?;
    let coingecko = CoinGeckoConfig::from_env()?;

    let env = emacross::config::get_environment();
    info!("Starting emacross Signal Engine Server");
    info!(environment = %env, "Environment");
    info!(
        symbol = %config.symbol,
        fast = config.indicators.fast_window,
        slow = config.indicators.slow_window,
        atr = config.indicators.atr_window,
        interval = config.poll_interval_seconds,
        source = ?coingecko.source,
        "EMA {}/{} crossover on {}, polling every {}s",
        config.indicators.fast_window,
        config.indicators.slow_window,
        config.symbol,
        config.poll_interval_seconds
    );
    if coingecko.api_key.is_none() {
        warn!("COINGECKO_API_KEY not set, using the public rate-limited tier");
    }

    let provider: Arc<dyn MarketDataProvider + Send + Sync> =
        Arc::new(CoinGeckoMarketDataProvider::new(coingecko)?);

    let notifier: Arc<dyn Notifier + Send + Sync> = match TelegramConfig::from_env()? {
        Some(telegram) => {
            info!(chat_id = %telegram.chat_id, "Telegram notifications enabled");
            Arc::new(TelegramNotifier::new(telegram)?)
        }
        None => {
            warn!("TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID not set, notifications go to the log only");
            Arc::new(LogNotifier)
        }
    };

    let metrics = Arc::new(Metrics::new()?);
    let runtime = Arc::new(SignalRuntime::new(
        config,
        provider,
        notifier,
        Some(metrics.clone()),
    )?);

    if autostart {
        runtime.start().await?;
    } else {
        info!("AUTOSTART=false, waiting for POST /api/start_bot");
    }

    let server_runtime = runtime.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, server_runtime, metrics).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    runtime.stop().await;
    info!("Signal engine stopped");
    Ok(())
}
