//! Unit tests for ATR indicator

use crate::support::{base_time, candles_from_closes, constant_closes};
use chrono::Duration;
use emacross::indicators::volatility::{calculate_atr, calculate_atr_series, true_range_series};
use emacross::models::indicators::Candle;

fn bar(i: i64, high: f64, low: f64, close: f64) -> Candle {
    Candle::new(close, high, low, close, 0.0, base_time() + Duration::hours(i))
}

#[test]
fn test_true_range_needs_previous_close() {
    let candles = candles_from_closes(&[100.0, 101.0]);
    let series = true_range_series(&candles);
    assert_eq!(series[0], None);
    assert_eq!(series[1], Some(1.5));
}

#[test]
fn test_atr_defined_from_period_index() {
    let candles = candles_from_closes(&constant_closes(100.0, 5));
    let series = calculate_atr_series(&candles, 3);
    assert_eq!(series[..3], [None, None, None]);
    // high - low = 1.0 on every bar
    assert_eq!(series[3], Some(1.0));
    assert_eq!(series[4], Some(1.0));
}

#[test]
fn test_atr_rolling_mean_of_true_range() {
    let candles = vec![
        bar(0, 10.0, 10.0, 10.0),
        bar(1, 13.0, 11.0, 12.0), // TR 3
        bar(2, 12.0, 9.0, 10.0),  // TR 3
        bar(3, 11.0, 10.0, 11.0), // TR 1
    ];
    let series = calculate_atr_series(&candles, 2);
    assert_eq!(series[2], Some(3.0));
    assert_eq!(series[3], Some(2.0));
    assert_eq!(calculate_atr(&candles, 2), Some(2.0));
}

#[test]
fn test_atr_insufficient_data() {
    let candles = candles_from_closes(&constant_closes(100.0, 14));
    assert!(calculate_atr(&candles, 14).is_none());
    let candles = candles_from_closes(&constant_closes(100.0, 15));
    assert!(calculate_atr(&candles, 14).is_some());
}
