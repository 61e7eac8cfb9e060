//! Unit tests for single-window evaluation

use crate::support::{
    assert_close, candles_from_closes, constant_closes, drop_closes, flat_candles_from_closes,
    hour, rally_closes,
};
use emacross::config::{IndicatorConfig, RiskConfig};
use emacross::error::{InsufficientData, SignalError};
use emacross::models::signal::{CrossoverEvent, SignalDirection};
use emacross::signals::{Crossover, SignalEngine};

#[test]
fn test_flat_market_has_no_event() {
    let engine = SignalEngine::default();
    let candles = candles_from_closes(&constant_closes(100.0, 100));
    let evaluation = engine.evaluate(&candles).unwrap();
    assert_eq!(evaluation.crossover, Crossover::None);
    assert!(evaluation.event.is_none());
    assert_eq!(evaluation.last_state.timestamp, hour(99));
}

#[test]
fn test_insufficient_history_propagates() {
    let engine = SignalEngine::default();
    let candles = candles_from_closes(&constant_closes(100.0, 20));
    assert_eq!(
        engine.evaluate(&candles),
        Err(InsufficientData {
            required: 55,
            available: 20
        })
    );
}

#[test]
fn test_event_carries_last_bar_values() {
    let engine = SignalEngine::default();
    let candles = candles_from_closes(&drop_closes()[..63]);
    let evaluation = engine.evaluate(&candles).unwrap();

    let event = evaluation.event.expect("downward crossing on the last bar");
    assert_eq!(event.direction, SignalDirection::Short);
    assert_eq!(event.timestamp, hour(62));
    assert_eq!(event.previous_timestamp, hour(61));
    assert_eq!(evaluation.previous_state.map(|p| p.timestamp), Some(hour(61)));
    assert_eq!(event.price, 90.0);
    assert_eq!(event.fast_ema, evaluation.last_state.fast_ema);
    assert_eq!(event.slow_ema, evaluation.last_state.slow_ema);
    assert!(event.fast_ema < event.slow_ema);

    let band = engine.risk_band(&event).unwrap();
    assert_close(band.stop_loss, 90.0 + event.atr);
    assert_close(band.take_profit, 90.0 - 2.0 * event.atr);
}

#[test]
fn test_long_event_on_rally() {
    let engine = SignalEngine::default();
    let candles = candles_from_closes(&rally_closes()[..63]);
    let event = engine.evaluate(&candles).unwrap().event.unwrap();
    assert_eq!(event.direction, SignalDirection::Long);
    assert_eq!(event.price, 110.0);
}

#[test]
fn test_zero_atr_event_has_no_band() {
    let engine = SignalEngine::new(
        IndicatorConfig {
            fast_window: 2,
            slow_window: 4,
            atr_window: 1,
        },
        RiskConfig::default(),
    );
    let candles = flat_candles_from_closes(&[100.0, 100.0, 100.0, 100.0, 50.0, 90.0, 90.0]);
    let event = engine.evaluate(&candles).unwrap().event.unwrap();
    assert_eq!(event.direction, SignalDirection::Long);
    assert_eq!(event.atr, 0.0);
    assert_eq!(engine.risk_band(&event), Err(SignalError::InvalidVolatility(0.0)));
}

#[test]
fn test_single_state_has_no_previous() {
    let engine = SignalEngine::default();
    let candles = candles_from_closes(&constant_closes(100.0, 55));
    let evaluation = engine.evaluate(&candles).unwrap();
    assert!(evaluation.previous_state.is_none());
    assert!(evaluation.event.is_none());
}

fn crossing(direction: SignalDirection, from: usize, to: usize) -> CrossoverEvent {
    CrossoverEvent {
        direction,
        timestamp: hour(to),
        previous_timestamp: hour(from),
        price: 100.0,
        fast_ema: 100.0,
        slow_ema: 100.0,
        atr: 1.0,
    }
}

#[test]
fn test_repeat_detection() {
    let recorded = crossing(SignalDirection::Short, 61, 62);

    // same window re-fetched
    assert!(crossing(SignalDirection::Short, 61, 62).repeats(&recorded));
    // forming bar moved forward, crossing still measured from the same bar
    assert!(crossing(SignalDirection::Short, 61, 63).repeats(&recorded));
    // crossing back the other way from the same bar
    assert!(!crossing(SignalDirection::Long, 61, 63).repeats(&recorded));
    // a later crossing in the same direction
    assert!(!crossing(SignalDirection::Short, 70, 71).repeats(&recorded));
    // anything at or before the recorded bar
    assert!(crossing(SignalDirection::Long, 60, 61).repeats(&recorded));
}
