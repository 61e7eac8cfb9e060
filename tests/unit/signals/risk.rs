//! Unit tests for the ATR risk band

use crate::support::assert_close;
use emacross::config::RiskConfig;
use emacross::error::SignalError;
use emacross::models::signal::SignalDirection;
use emacross::signals::RiskBandCalculator;

#[test]
fn test_long_band() {
    let band = RiskBandCalculator::default()
        .compute(100.0, SignalDirection::Long, 2.0)
        .unwrap();
    assert_eq!(band.entry, 100.0);
    assert_close(band.stop_loss, 98.0);
    assert_close(band.take_profit, 104.0);
}

#[test]
fn test_short_band() {
    let band = RiskBandCalculator::default()
        .compute(100.0, SignalDirection::Short, 2.0)
        .unwrap();
    assert_close(band.stop_loss, 102.0);
    assert_close(band.take_profit, 96.0);
}

#[test]
fn test_band_ordering_and_ratio() {
    let calculator = RiskBandCalculator::new(RiskConfig {
        stop_loss_multiplier: 1.5,
        take_profit_multiplier: 3.0,
    });
    for &(entry, atr) in &[(0.5, 0.01), (100.0, 2.5), (65_000.0, 850.0)] {
        let long = calculator.compute(entry, SignalDirection::Long, atr).unwrap();
        assert!(long.stop_loss < long.entry && long.entry < long.take_profit);
        assert_close(long.reward() / long.risk(), 2.0);

        let short = calculator.compute(entry, SignalDirection::Short, atr).unwrap();
        assert!(short.take_profit < short.entry && short.entry < short.stop_loss);
        assert_close(short.reward() / short.risk(), 2.0);
    }
}

#[test]
fn test_unusable_atr_is_rejected() {
    let calculator = RiskBandCalculator::default();
    for atr in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let result = calculator.compute(100.0, SignalDirection::Long, atr);
        assert!(
            matches!(result, Err(SignalError::InvalidVolatility(_))),
            "atr {} should be rejected",
            atr
        );
    }
}
