use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalDirection {
    Long,
    Short,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Long => "LONG",
            SignalDirection::Short => "SHORT",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            SignalDirection::Long => SignalDirection::Short,
            SignalDirection::Short => SignalDirection::Long,
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fast/slow EMA crossing detected between the last two indicator states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossoverEvent {
    pub direction: SignalDirection,
    /// Timestamp of the bar on which the crossing completed.
    pub timestamp: DateTime<Utc>,
    /// Timestamp of the bar the crossing started from.
    pub previous_timestamp: DateTime<Utc>,
    pub price: f64,
    pub fast_ema: f64,
    pub slow_ema: f64,
    pub atr: f64,
}

impl CrossoverEvent {
    /// Whether this event re-reports the crossing `recorded` already covered.
    ///
    /// A still-forming last bar moves its timestamp on every fetch while the bar it
    /// crossed from stays put, so the starting bar identifies the crossing.
    pub fn repeats(&self, recorded: &CrossoverEvent) -> bool {
        self.timestamp <= recorded.timestamp
            || (self.direction == recorded.direction
                && self.previous_timestamp <= recorded.previous_timestamp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBand {
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl RiskBand {
    /// Distance from entry to the stop.
    pub fn risk(&self) -> f64 {
        (self.entry - self.stop_loss).abs()
    }

    /// Distance from entry to the target.
    pub fn reward(&self) -> f64 {
        (self.take_profit - self.entry).abs()
    }
}

/// An emitted signal. Built in full before it is published to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub event: CrossoverEvent,
    pub risk_band: RiskBand,
    pub emitted_at: DateTime<Utc>,
}
