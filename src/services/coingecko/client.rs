//! CoinGecko REST client

use crate::config::ConfigError;
use crate::error::ProviderError;
use crate::models::indicators::{Candle, PriceQuote};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<[f64; 2]>,
    #[serde(default)]
    total_volumes: Vec<[f64; 2]>,
}

pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Invalid(format!("cannot build HTTP client: {}", e)))?;
        Self::with_client(base_url, api_key, http)
    }

    /// Use a preconfigured reqwest client (tests point this at a mock server).
    pub fn with_client(
        base_url: &str,
        api_key: Option<String>,
        http: reqwest::Client,
    ) -> Result<Self, ConfigError> {
        // a trailing slash keeps the last path segment when joining
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| {
            ConfigError::Invalid(format!("invalid CoinGecko base URL '{}': {}", base_url, e))
        })?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ProviderError::Transport(format!("invalid request path {}: {}", path, e)))?;

        let mut request = self.http.get(url).query(query);
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key.trim());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(path = %path, "CoinGecko rate limit exceeded");
            return Err(ProviderError::RateLimited {
                message: truncate(&body),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: truncate(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))
    }

    /// `/coins/{id}/ohlc`: `[[timestamp_ms, open, high, low, close], ...]`.
    pub async fn ohlc(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<Vec<Candle>, ProviderError> {
        let rows: Vec<[f64; 5]> = self
            .get_json(
                &format!("coins/{}/ohlc", coin_id),
                &[
                    ("vs_currency", vs_currency.to_string()),
                    ("days", days.to_string()),
                ],
            )
            .await?;

        let candles = rows
            .iter()
            .map(|[ts, open, high, low, close]| {
                Ok(Candle::new(*open, *high, *low, *close, 0.0, timestamp_ms(*ts)?))
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;

        debug!(coin = %coin_id, count = candles.len(), "CoinGecko: fetched OHLC bars");
        Ok(candles)
    }

    /// `/coins/{id}/market_chart`: single prices, so every bar gets `high = low = close`.
    pub async fn market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<Vec<Candle>, ProviderError> {
        let chart: MarketChart = self
            .get_json(
                &format!("coins/{}/market_chart", coin_id),
                &[
                    ("vs_currency", vs_currency.to_string()),
                    ("days", days.to_string()),
                    ("interval", "hourly".to_string()),
                ],
            )
            .await?;

        let candles = chart
            .prices
            .iter()
            .enumerate()
            .map(|(i, [ts, price])| {
                let volume = chart.total_volumes.get(i).map(|v| v[1]).unwrap_or(0.0);
                Ok(Candle::from_price(*price, timestamp_ms(*ts)?).with_volume(volume))
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;

        debug!(coin = %coin_id, count = candles.len(), "CoinGecko: fetched market chart prices");
        Ok(candles)
    }

    /// `/simple/price`: spot price with 24h change (percent) and 24h volume.
    pub async fn simple_price(
        &self,
        coin_id: &str,
        vs_currency: &str,
    ) -> Result<PriceQuote, ProviderError> {
        // CoinGecko reports null statistics for thinly traded coins
        let prices: HashMap<String, HashMap<String, Option<f64>>> = self
            .get_json(
                "simple/price",
                &[
                    ("ids", coin_id.to_string()),
                    ("vs_currencies", vs_currency.to_string()),
                    ("include_24hr_change", "true".to_string()),
                    ("include_24hr_vol", "true".to_string()),
                ],
            )
            .await?;

        let fields = prices.get(coin_id).ok_or_else(|| {
            ProviderError::Malformed(format!("no quote for {}", coin_id))
        })?;
        let field = |suffix: &str| {
            fields
                .get(&format!("{}{}", vs_currency, suffix))
                .copied()
                .flatten()
        };

        let price = field("").ok_or_else(|| {
            ProviderError::Malformed(format!("no {} price for {}", vs_currency, coin_id))
        })?;

        Ok(PriceQuote {
            price,
            change_24h: field("_24h_change"),
            volume_24h: field("_24h_vol"),
        })
    }
}

fn timestamp_ms(ts: f64) -> Result<DateTime<Utc>, ProviderError> {
    if !ts.is_finite() {
        return Err(ProviderError::Malformed(format!("invalid timestamp {}", ts)));
    }
    DateTime::from_timestamp_millis(ts as i64)
        .ok_or_else(|| ProviderError::Malformed(format!("timestamp out of range: {}", ts)))
}

fn truncate(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}
