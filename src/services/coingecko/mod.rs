//! CoinGecko market data adapter.

pub mod client;
pub mod provider;

pub use client::CoinGeckoClient;
pub use provider::{CandleSource, CoinGeckoConfig, CoinGeckoMarketDataProvider, DEFAULT_BASE_URL};
