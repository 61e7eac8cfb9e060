//! Unit tests for notification message bodies

use crate::support::hour;
use emacross::config::EngineConfig;
use emacross::models::signal::{CrossoverEvent, RiskBand, SignalDirection, SignalRecord};
use emacross::services::notifier::{
    format_shutdown_message, format_signal_message, format_startup_message, LogNotifier, Notifier,
};

fn record(direction: SignalDirection) -> SignalRecord {
    let (stop_loss, take_profit) = match direction {
        SignalDirection::Long => (64_500.0, 66_000.0),
        SignalDirection::Short => (65_500.0, 64_000.0),
    };
    SignalRecord {
        event: CrossoverEvent {
            direction,
            timestamp: hour(5),
            previous_timestamp: hour(4),
            price: 65_000.0,
            fast_ema: 65_010.25,
            slow_ema: 64_990.5,
            atr: 500.0,
        },
        risk_band: RiskBand {
            entry: 65_000.0,
            stop_loss,
            take_profit,
        },
        emitted_at: hour(5),
    }
}

#[test]
fn test_long_message() {
    let text = format_signal_message(&record(SignalDirection::Long), 13, 55);
    assert!(text.starts_with("📈 *LONG signal*"));
    assert!(text.contains("Price: $65000.00"));
    assert!(text.contains("EMA 13: $65010.25"));
    assert!(text.contains("EMA 55: $64990.50"));
    assert!(text.contains("ATR: $500.00"));
    assert!(text.contains("Stop loss: $64500.00"));
    assert!(text.contains("Take profit: $66000.00"));
    assert!(text.contains("R/R ratio: 1:2.00"));
    assert!(text.contains("EMA 13 crossed above EMA 55 (bar 2024-01-01 05:00 UTC)"));
}

#[test]
fn test_short_message() {
    let text = format_signal_message(&record(SignalDirection::Short), 13, 55);
    assert!(text.starts_with("📉 *SHORT signal*"));
    assert!(text.contains("crossed below"));
    assert!(text.contains("Take profit: $64000.00"));
}

#[test]
fn test_lifecycle_messages_name_the_instrument() {
    let config = EngineConfig::default();
    let startup = format_startup_message(&config);
    assert!(startup.contains("Signal engine started"));
    assert!(startup.contains("bitcoin"));
    assert!(startup.contains("EMA 13/55"));

    let shutdown = format_shutdown_message(&config);
    assert!(shutdown.contains("Signal engine stopped"));
    assert!(shutdown.contains("bitcoin"));
}

#[tokio::test]
async fn test_log_notifier_always_succeeds() {
    assert!(LogNotifier.send("hello").await.is_ok());
}
