//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::indicators::Candle;

/// EMA over raw values, aligned with the input.
///
/// The first defined value (index `period - 1`) is the simple mean of the first
/// `period` values; earlier positions are `None`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut series = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return series;
    }

    let k = math::ema_alpha(period);
    let mut ema = values[..period].iter().sum::<f64>() / period as f64;
    series[period - 1] = Some(ema);

    for (i, value) in values.iter().enumerate().skip(period) {
        ema = value * k + ema * (1.0 - k);
        series[i] = Some(ema);
    }

    series
}

/// EMA of closing prices, aligned with `candles`.
pub fn calculate_ema_series(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    ema_series(&closes, period)
}

/// Latest EMA of closing prices.
pub fn calculate_ema(candles: &[Candle], period: usize) -> Option<f64> {
    calculate_ema_series(candles, period).last().copied().flatten()
}
