//! Market data provider interface.

use crate::error::ProviderError;
use crate::models::indicators::{Candle, PriceQuote};

#[async_trait::async_trait]
pub trait MarketDataProvider {
    /// Latest bars for a symbol, ordered by timestamp, at most `lookback` of them.
    async fn fetch_bars(&self, symbol: &str, lookback: usize)
        -> Result<Vec<Candle>, ProviderError>;

    /// Current spot price for a symbol, with 24h change and volume where available.
    async fn fetch_latest_price(&self, symbol: &str) -> Result<PriceQuote, ProviderError>;
}

/// Sort by timestamp, keep the last bar for each timestamp, and keep the newest `lookback`.
pub fn normalize_bars(mut candles: Vec<Candle>, lookback: usize) -> Vec<Candle> {
    // stable sort keeps arrival order within equal timestamps
    candles.sort_by_key(|c| c.timestamp);

    let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles {
        match deduped.last_mut() {
            Some(last) if last.timestamp == candle.timestamp => *last = candle,
            _ => deduped.push(candle),
        }
    }

    if deduped.len() > lookback {
        deduped.drain(..deduped.len() - lookback);
    }
    deduped
}
