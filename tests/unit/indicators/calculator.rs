//! Unit tests for the indicator calculator

use crate::support::{candles_from_closes, constant_closes, hour};
use emacross::config::IndicatorConfig;
use emacross::error::InsufficientData;
use emacross::indicators::IndicatorCalculator;

#[test]
fn test_shorter_than_slow_window_is_insufficient() {
    let calculator = IndicatorCalculator::default();
    let candles = candles_from_closes(&constant_closes(100.0, 54));
    assert_eq!(
        calculator.compute(&candles),
        Err(InsufficientData {
            required: 55,
            available: 54
        })
    );
}

#[test]
fn test_one_state_per_bar_after_warmup() {
    let calculator = IndicatorCalculator::default();

    let candles = candles_from_closes(&constant_closes(100.0, 55));
    let states = calculator.compute(&candles).unwrap();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].timestamp, hour(54));

    let candles = candles_from_closes(&constant_closes(100.0, 60));
    let states = calculator.compute(&candles).unwrap();
    assert_eq!(states.len(), 6);
    let timestamps: Vec<_> = states.iter().map(|s| s.timestamp).collect();
    let expected: Vec<_> = (54..60).map(hour).collect();
    assert_eq!(timestamps, expected);
}

#[test]
fn test_constant_prices_converge() {
    let calculator = IndicatorCalculator::default();
    let candles = candles_from_closes(&constant_closes(250.0, 100));
    let last = calculator.latest(&candles).unwrap();
    assert!((last.fast_ema - 250.0).abs() < 1e-9);
    assert!((last.slow_ema - 250.0).abs() < 1e-9);
    assert!((last.atr - 1.0).abs() < 1e-9);
    assert_eq!(last.close, 250.0);
}

#[test]
fn test_atr_window_can_dominate_warmup() {
    let calculator = IndicatorCalculator::new(IndicatorConfig {
        fast_window: 3,
        slow_window: 5,
        atr_window: 10,
    });
    let candles = candles_from_closes(&constant_closes(100.0, 10));
    assert_eq!(
        calculator.compute(&candles),
        Err(InsufficientData {
            required: 11,
            available: 10
        })
    );
    let candles = candles_from_closes(&constant_closes(100.0, 11));
    assert_eq!(calculator.compute(&candles).unwrap().len(), 1);
}
