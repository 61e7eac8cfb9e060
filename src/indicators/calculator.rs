//! Combines the EMA pair and ATR into per-bar indicator states.

use crate::config::IndicatorConfig;
use crate::error::InsufficientData;
use crate::models::indicators::{Candle, IndicatorState};

use super::trend::calculate_ema_series;
use super::volatility::calculate_atr_series;

/// Recomputes every indicator from raw bars on each call; carries no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorCalculator {
    config: IndicatorConfig,
}

impl IndicatorCalculator {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Indicator states for every bar where the fast EMA, slow EMA and ATR are all defined.
    pub fn compute(&self, candles: &[Candle]) -> Result<Vec<IndicatorState>, InsufficientData> {
        let required = self.config.min_bars();
        if candles.len() < required {
            return Err(InsufficientData {
                required,
                available: candles.len(),
            });
        }

        let fast = calculate_ema_series(candles, self.config.fast_window);
        let slow = calculate_ema_series(candles, self.config.slow_window);
        let atr = calculate_atr_series(candles, self.config.atr_window);

        let states = candles
            .iter()
            .enumerate()
            .filter_map(|(i, candle)| {
                Some(IndicatorState {
                    timestamp: candle.timestamp,
                    close: candle.close,
                    fast_ema: fast[i]?,
                    slow_ema: slow[i]?,
                    atr: atr[i]?,
                })
            })
            .collect();

        Ok(states)
    }

    /// Only the last indicator state.
    pub fn latest(&self, candles: &[Candle]) -> Result<IndicatorState, InsufficientData> {
        let states = self.compute(candles)?;
        states
            .last()
            .copied()
            .ok_or(InsufficientData {
                required: self.config.min_bars(),
                available: candles.len(),
            })
    }
}

impl Default for IndicatorCalculator {
    fn default() -> Self {
        Self::new(IndicatorConfig::default())
    }
}
