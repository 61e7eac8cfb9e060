//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;

pub use indicators::{Candle, IndicatorState, MarketSnapshot, PriceQuote};
pub use signal::{CrossoverEvent, RiskBand, SignalDirection, SignalRecord};
