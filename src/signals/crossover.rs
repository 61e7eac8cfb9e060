//! Fast/slow EMA crossover detection.

use crate::models::indicators::IndicatorState;
use crate::models::signal::SignalDirection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crossover {
    Long,
    Short,
    None,
}

impl Crossover {
    pub fn direction(&self) -> Option<SignalDirection> {
        match self {
            Crossover::Long => Some(SignalDirection::Long),
            Crossover::Short => Some(SignalDirection::Short),
            Crossover::None => None,
        }
    }
}

/// Classify the transition between two consecutive states.
///
/// The far side must be reached strictly: equal EMAs on `last` never count as crossed.
pub fn detect_crossover(previous: &IndicatorState, last: &IndicatorState) -> Crossover {
    if previous.fast_ema <= previous.slow_ema && last.fast_ema > last.slow_ema {
        Crossover::Long
    } else if previous.fast_ema >= previous.slow_ema && last.fast_ema < last.slow_ema {
        Crossover::Short
    } else {
        Crossover::None
    }
}

/// Crossover between the last two states of a series, `None` with fewer than two.
pub fn detect_latest(states: &[IndicatorState]) -> Crossover {
    match states {
        [.., previous, last] => detect_crossover(previous, last),
        _ => Crossover::None,
    }
}
