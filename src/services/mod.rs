//! External collaborators: market data in, notifications out.

pub mod coingecko;
pub mod market_data;
pub mod notifier;

pub use market_data::MarketDataProvider;
pub use notifier::Notifier;
