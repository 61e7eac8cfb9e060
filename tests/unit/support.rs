//! Candle and state builders shared by the unit tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use emacross::models::indicators::{Candle, IndicatorState};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn hour(i: usize) -> DateTime<Utc> {
    base_time() + Duration::hours(i as i64)
}

/// Hourly candles with a one-unit high/low range around each close.
pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle::new(close, close + 0.5, close - 0.5, close, 1000.0, hour(i)))
        .collect()
}

/// Hourly candles where high and low equal the close.
pub fn flat_candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle::from_price(close, hour(i)))
        .collect()
}

pub fn constant_closes(price: f64, count: usize) -> Vec<f64> {
    vec![price; count]
}

/// 12 bars at 100, 50 at 101, then 10 at 90: one downward crossing on bar 62 (13/55).
pub fn drop_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 12];
    closes.extend(vec![101.0; 50]);
    closes.extend(vec![90.0; 10]);
    closes
}

/// Mirror of `drop_closes`: one upward crossing on bar 62 (13/55).
pub fn rally_closes() -> Vec<f64> {
    let mut closes = vec![100.0; 12];
    closes.extend(vec![99.0; 50]);
    closes.extend(vec![110.0; 10]);
    closes
}

pub fn state(fast_ema: f64, slow_ema: f64) -> IndicatorState {
    IndicatorState {
        timestamp: base_time(),
        close: 100.0,
        fast_ema,
        slow_ema,
        atr: 1.0,
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} to be close to {}",
        actual,
        expected
    );
}
