//! Unit tests for numeric helpers

use emacross::common::math::{approx_eq, ema_alpha, sma, true_range};

#[test]
fn test_sma_uses_last_period_values() {
    let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(sma(&values, 2), Some(4.5));
    assert_eq!(sma(&values, 5), Some(3.0));
}

#[test]
fn test_sma_insufficient_data() {
    assert_eq!(sma(&[1.0, 2.0], 3), None);
    assert_eq!(sma(&[1.0, 2.0], 0), None);
}

#[test]
fn test_ema_alpha() {
    assert!(approx_eq(ema_alpha(13), 2.0 / 14.0, 1e-12));
    assert!(approx_eq(ema_alpha(1), 1.0, 1e-12));
}

#[test]
fn test_true_range_picks_largest_component() {
    // inside range
    assert_eq!(true_range(12.0, 10.0, 11.0), 2.0);
    // gap up
    assert_eq!(true_range(15.0, 14.0, 10.0), 5.0);
    // gap down
    assert_eq!(true_range(9.0, 8.0, 12.0), 4.0);
}
