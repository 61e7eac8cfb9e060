//! Trend indicators.

pub mod ema;

pub use ema::*;
