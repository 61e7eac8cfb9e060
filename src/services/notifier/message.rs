//! Human-readable (Telegram Markdown) message bodies.

use crate::config::EngineConfig;
use crate::models::signal::{SignalDirection, SignalRecord};

pub fn format_signal_message(record: &SignalRecord, fast_window: usize, slow_window: usize) -> String {
    let event = &record.event;
    let band = &record.risk_band;

    let (headline, cross) = match event.direction {
        SignalDirection::Long => ("📈 *LONG signal*", "crossed above"),
        SignalDirection::Short => ("📉 *SHORT signal*", "crossed below"),
    };

    let ratio = if band.risk() > 0.0 {
        band.reward() / band.risk()
    } else {
        0.0
    };

    format!(
        "{headline}\n\n\
         Price: ${price:.2}\n\
         EMA {fast}: ${fast_ema:.2}\n\
         EMA {slow}: ${slow_ema:.2}\n\
         ATR: ${atr:.2}\n\n\
         🎯 *Risk management*\n\
         Stop loss: ${sl:.2}\n\
         Take profit: ${tp:.2}\n\
         R/R ratio: 1:{ratio:.2}\n\n\
         EMA {fast} {cross} EMA {slow} (bar {bar})",
        headline = headline,
        price = event.price,
        fast = fast_window,
        slow = slow_window,
        fast_ema = event.fast_ema,
        slow_ema = event.slow_ema,
        atr = event.atr,
        sl = band.stop_loss,
        tp = band.take_profit,
        ratio = ratio,
        cross = cross,
        bar = event.timestamp.format("%Y-%m-%d %H:%M UTC"),
    )
}

pub fn format_startup_message(config: &EngineConfig) -> String {
    format!(
        "🤖 *Signal engine started*\n\nInstrument: {}\nStrategy: EMA {}/{} crossover\nRisk band: SL {}×ATR{} / TP {}×ATR (1:{:.2})\nPolling every {}s",
        config.symbol,
        config.indicators.fast_window,
        config.indicators.slow_window,
        config.risk.stop_loss_multiplier,
        config.indicators.atr_window,
        config.risk.take_profit_multiplier,
        config.risk.reward_ratio(),
        config.poll_interval_seconds,
    )
}

pub fn format_shutdown_message(config: &EngineConfig) -> String {
    format!(
        "🛑 *Signal engine stopped*\n\nMonitoring of {} paused",
        config.symbol
    )
}
