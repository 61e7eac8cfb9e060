use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }

    /// Bar for sources that only report a single price per interval.
    pub fn from_price(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self::new(price, price, price, price, 0.0, timestamp)
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// All prices finite and strictly positive, with `low <= high`.
    pub fn is_well_formed(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
            && self.low <= self.high
    }
}

/// Indicator values at one bar, defined only once every window is filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorState {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub fast_ema: f64,
    pub slow_ema: f64,
    pub atr: f64,
}

/// Spot price with the provider's rolling 24h statistics, when it reports them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
    /// Percent change over the last 24h.
    pub change_24h: Option<f64>,
    pub volume_24h: Option<f64>,
}

impl PriceQuote {
    pub fn new(price: f64) -> Self {
        Self {
            price,
            change_24h: None,
            volume_24h: None,
        }
    }
}

/// Latest price plus the indicator values over the current window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub price: f64,
    pub change_24h: Option<f64>,
    pub volume_24h: Option<f64>,
    pub fast_ema: f64,
    pub slow_ema: f64,
    pub atr: f64,
    pub bar_timestamp: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}
