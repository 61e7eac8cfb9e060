//! Per-cycle evaluation: indicators → crossover → risk band.

use crate::config::{IndicatorConfig, RiskConfig};
use crate::error::{InsufficientData, SignalError};
use crate::indicators::IndicatorCalculator;
use crate::models::indicators::{Candle, IndicatorState};
use crate::models::signal::{CrossoverEvent, RiskBand};
use crate::signals::crossover::{detect_latest, Crossover};
use crate::signals::risk::RiskBandCalculator;

/// Result of evaluating one bar window.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// State the crossing is measured from; `None` when only one state exists.
    pub previous_state: Option<IndicatorState>,
    pub last_state: IndicatorState,
    pub crossover: Crossover,
    pub event: Option<CrossoverEvent>,
}

/// Stateless evaluation pipeline; safe to share across tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalEngine {
    calculator: IndicatorCalculator,
    risk: RiskBandCalculator,
}

impl SignalEngine {
    pub fn new(indicators: IndicatorConfig, risk: RiskConfig) -> Self {
        Self {
            calculator: IndicatorCalculator::new(indicators),
            risk: RiskBandCalculator::new(risk),
        }
    }

    pub fn calculator(&self) -> &IndicatorCalculator {
        &self.calculator
    }

    pub fn risk(&self) -> &RiskBandCalculator {
        &self.risk
    }

    /// Evaluate the window, detecting a crossover between its last two states.
    pub fn evaluate(&self, candles: &[Candle]) -> Result<Evaluation, InsufficientData> {
        let states = self.calculator.compute(candles)?;
        let (previous_state, last_state) = match states.as_slice() {
            [.., previous, last] => (Some(*previous), *last),
            [last] => (None, *last),
            [] => {
                return Err(InsufficientData {
                    required: self.calculator.config().min_bars(),
                    available: candles.len(),
                })
            }
        };

        let crossover = detect_latest(&states);
        let event = crossover
            .direction()
            .zip(previous_state)
            .map(|(direction, previous)| CrossoverEvent {
                direction,
                timestamp: last_state.timestamp,
                previous_timestamp: previous.timestamp,
                price: last_state.close,
                fast_ema: last_state.fast_ema,
                slow_ema: last_state.slow_ema,
                atr: last_state.atr,
            });

        Ok(Evaluation {
            previous_state,
            last_state,
            crossover,
            event,
        })
    }

    pub fn risk_band(&self, event: &CrossoverEvent) -> Result<RiskBand, SignalError> {
        self.risk.compute(event.price, event.direction, event.atr)
    }
}
