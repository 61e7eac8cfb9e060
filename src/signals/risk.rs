//! ATR-scaled stop-loss / take-profit levels.

use crate::config::RiskConfig;
use crate::error::SignalError;
use crate::models::signal::{RiskBand, SignalDirection};

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskBandCalculator {
    config: RiskConfig,
}

impl RiskBandCalculator {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn compute(
        &self,
        entry: f64,
        direction: SignalDirection,
        atr: f64,
    ) -> Result<RiskBand, SignalError> {
        if !atr.is_finite() || atr <= 0.0 {
            return Err(SignalError::InvalidVolatility(atr));
        }

        let stop_distance = self.config.stop_loss_multiplier * atr;
        let target_distance = self.config.take_profit_multiplier * atr;

        let (stop_loss, take_profit) = match direction {
            SignalDirection::Long => (entry - stop_distance, entry + target_distance),
            SignalDirection::Short => (entry + stop_distance, entry - target_distance),
        };

        Ok(RiskBand {
            entry,
            stop_loss,
            take_profit,
        })
    }
}
