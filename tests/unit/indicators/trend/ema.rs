//! Unit tests for EMA indicator

use crate::support::{candles_from_closes, constant_closes};
use emacross::indicators::trend::{calculate_ema, calculate_ema_series, ema_series};

#[test]
fn test_ema_insufficient_data() {
    let candles = candles_from_closes(&constant_closes(100.0, 10));
    assert!(calculate_ema(&candles, 20).is_none());
    assert!(calculate_ema_series(&candles, 20).iter().all(Option::is_none));
}

#[test]
fn test_ema_seeded_with_simple_mean() {
    let series = ema_series(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
    assert_eq!(series.len(), 5);
    assert_eq!(series[0], None);
    assert_eq!(series[1], None);
    assert_eq!(series[2], Some(2.0));
    // k = 0.5
    assert_eq!(series[3], Some(3.0));
    assert_eq!(series[4], Some(4.0));
}

#[test]
fn test_ema_constant_series_equals_constant() {
    let candles = candles_from_closes(&constant_closes(42.5, 80));
    let series = calculate_ema_series(&candles, 13);
    for value in series.iter().skip(12) {
        let value = value.expect("defined once the window is filled");
        assert!((value - 42.5).abs() < 1e-9);
    }
}

#[test]
fn test_ema_follows_trend_with_lag() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let candles = candles_from_closes(&closes);
    let fast = calculate_ema(&candles, 13).unwrap();
    let slow = calculate_ema(&candles, 55).unwrap();
    assert!(fast < 159.0);
    assert!(fast > slow);
}

#[test]
fn test_zero_period_is_undefined() {
    assert!(ema_series(&[1.0, 2.0], 0).iter().all(Option::is_none));
}
