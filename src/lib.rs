//! emacross: EMA crossover signal engine with ATR-based risk bands.
//!
//! The engine polls a market data provider, recomputes a fast/slow EMA pair and an
//! ATR over the fetched window, and records + announces every new crossover.

pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
