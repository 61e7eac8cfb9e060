//! Volatility indicators.

pub mod atr;

pub use atr::*;
