//! ATR (Average True Range) indicator

use crate::common::math;
use crate::models::indicators::Candle;

/// True range per bar, aligned with `candles`. The first bar has no previous close.
pub fn true_range_series(candles: &[Candle]) -> Vec<Option<f64>> {
    let mut series = vec![None; candles.len()];
    for i in 1..candles.len() {
        series[i] = Some(math::true_range(
            candles[i].high,
            candles[i].low,
            candles[i - 1].close,
        ));
    }
    series
}

/// ATR aligned with `candles`: simple rolling mean of the last `period` true ranges.
///
/// Defined from index `period` onwards, since true range starts at index 1.
pub fn calculate_atr_series(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    let mut series = vec![None; candles.len()];
    if period == 0 || candles.len() < period + 1 {
        return series;
    }

    let tr_values: Vec<f64> = true_range_series(candles).into_iter().flatten().collect();

    // tr_values[j] belongs to candle j + 1
    for end in period..=tr_values.len() {
        series[end] = math::sma(&tr_values[..end], period);
    }

    series
}

/// Latest ATR.
pub fn calculate_atr(candles: &[Candle], period: usize) -> Option<f64> {
    calculate_atr_series(candles, period).last().copied().flatten()
}
