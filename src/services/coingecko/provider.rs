//! CoinGecko market data provider implementation

use crate::config::{parse_or, ConfigError};
use crate::error::ProviderError;
use crate::models::indicators::{Candle, PriceQuote};
use crate::services::market_data::{normalize_bars, MarketDataProvider};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use super::client::CoinGeckoClient;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Which endpoint bars are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleSource {
    /// Real OHLC bars.
    Ohlc,
    /// Hourly price points; high and low are set to the close.
    MarketChart,
}

impl FromStr for CandleSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ohlc" => Ok(CandleSource::Ohlc),
            "market_chart" | "market-chart" => Ok(CandleSource::MarketChart),
            other => Err(format!("unknown candle source '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub vs_currency: String,
    pub source: CandleSource,
    pub days: u32,
    pub request_timeout: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            vs_currency: "usd".to_string(),
            source: CandleSource::Ohlc,
            days: 30,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl CoinGeckoConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |key: &str| env::var(key).ok();
        let defaults = Self::default();
        Ok(Self {
            base_url: lookup("COINGECKO_BASE_URL").unwrap_or(defaults.base_url),
            api_key: lookup("COINGECKO_API_KEY")
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            vs_currency: lookup("VS_CURRENCY").unwrap_or(defaults.vs_currency),
            source: parse_or(&lookup, "CANDLE_SOURCE", defaults.source)?,
            days: parse_or(&lookup, "LOOKBACK_DAYS", defaults.days)?,
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "FETCH_TIMEOUT_SECONDS",
                defaults.request_timeout.as_secs(),
            )?),
        })
    }
}

pub struct CoinGeckoMarketDataProvider {
    client: CoinGeckoClient,
    config: CoinGeckoConfig,
}

impl CoinGeckoMarketDataProvider {
    pub fn new(config: CoinGeckoConfig) -> Result<Self, ConfigError> {
        let client = CoinGeckoClient::new(
            &config.base_url,
            config.api_key.clone(),
            config.request_timeout,
        )?;
        Ok(Self { client, config })
    }

    pub fn with_client(client: CoinGeckoClient, config: CoinGeckoConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &CoinGeckoConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for CoinGeckoMarketDataProvider {
    async fn fetch_bars(
        &self,
        symbol: &str,
        lookback: usize,
    ) -> Result<Vec<Candle>, ProviderError> {
        let raw = match self.config.source {
            CandleSource::Ohlc => {
                self.client
                    .ohlc(symbol, &self.config.vs_currency, self.config.days)
                    .await?
            }
            CandleSource::MarketChart => {
                self.client
                    .market_chart(symbol, &self.config.vs_currency, self.config.days)
                    .await?
            }
        };

        if let Some(bad) = raw.iter().find(|c| !c.is_well_formed()) {
            return Err(ProviderError::Malformed(format!(
                "non-positive or inconsistent prices in bar at {}",
                bad.timestamp
            )));
        }

        let candles = normalize_bars(raw, lookback);
        debug!(
            symbol = %symbol,
            count = candles.len(),
            source = ?self.config.source,
            "CoinGecko provider: normalized {} bars",
            candles.len()
        );
        Ok(candles)
    }

    async fn fetch_latest_price(&self, symbol: &str) -> Result<PriceQuote, ProviderError> {
        self.client
            .simple_price(symbol, &self.config.vs_currency)
            .await
    }
}
