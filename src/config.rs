//! Environment-driven configuration.
//!
//! Every value has a default; `.env` files are loaded by the binaries through `dotenvy`
//! before anything here is read. Invalid values are the only fatal errors in the system.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("cannot parse {key}={value}")]
    Parse { key: String, value: String },
}

/// Deployment environment (`production`/`prod` switches logging to JSON).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}

/// Window lengths for the indicator pair and the volatility estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub fast_window: usize,
    pub slow_window: usize,
    pub atr_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            fast_window: 13,
            slow_window: 55,
            atr_window: 14,
        }
    }
}

impl IndicatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fast_window == 0 || self.slow_window == 0 || self.atr_window == 0 {
            return Err(ConfigError::Invalid(
                "indicator windows must be at least 1".to_string(),
            ));
        }
        if self.fast_window >= self.slow_window {
            return Err(ConfigError::Invalid(format!(
                "fast window ({}) must be shorter than slow window ({})",
                self.fast_window, self.slow_window
            )));
        }
        Ok(())
    }

    /// Bars needed before a single indicator state exists.
    pub fn min_bars(&self) -> usize {
        self.slow_window.max(self.atr_window + 1)
    }
}

/// ATR multipliers for the stop-loss / take-profit band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub stop_loss_multiplier: f64,
    pub take_profit_multiplier: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            stop_loss_multiplier: 1.0,
            take_profit_multiplier: 2.0,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("stop loss multiplier", self.stop_loss_multiplier),
            ("take profit multiplier", self.take_profit_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Reward-to-risk ratio implied by the multipliers.
    pub fn reward_ratio(&self) -> f64 {
        self.take_profit_multiplier / self.stop_loss_multiplier
    }
}

/// Configuration of one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub symbol: String,
    /// Maximum number of bars requested from the provider per cycle.
    pub lookback: usize,
    pub ledger_capacity: usize,
    pub poll_interval_seconds: u64,
    pub fetch_timeout_seconds: u64,
    pub notify_timeout_seconds: u64,
    pub announce_lifecycle: bool,
    pub indicators: IndicatorConfig,
    pub risk: RiskConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbol: "bitcoin".to_string(),
            lookback: 100,
            ledger_capacity: 10,
            poll_interval_seconds: 60,
            fetch_timeout_seconds: 10,
            notify_timeout_seconds: 10,
            announce_lifecycle: true,
            indicators: IndicatorConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Build from process environment, then validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, then validate.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            symbol: lookup("SYMBOL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.symbol),
            lookback: parse_or(&lookup, "LOOKBACK", defaults.lookback)?,
            ledger_capacity: parse_or(&lookup, "LEDGER_CAPACITY", defaults.ledger_capacity)?,
            poll_interval_seconds: parse_or(
                &lookup,
                "POLL_INTERVAL_SECONDS",
                defaults.poll_interval_seconds,
            )?,
            fetch_timeout_seconds: parse_or(
                &lookup,
                "FETCH_TIMEOUT_SECONDS",
                defaults.fetch_timeout_seconds,
            )?,
            notify_timeout_seconds: parse_or(
                &lookup,
                "NOTIFY_TIMEOUT_SECONDS",
                defaults.notify_timeout_seconds,
            )?,
            announce_lifecycle: parse_or(
                &lookup,
                "ANNOUNCE_LIFECYCLE",
                defaults.announce_lifecycle,
            )?,
            indicators: IndicatorConfig {
                fast_window: parse_or(&lookup, "EMA_FAST", defaults.indicators.fast_window)?,
                slow_window: parse_or(&lookup, "EMA_SLOW", defaults.indicators.slow_window)?,
                atr_window: parse_or(&lookup, "ATR_WINDOW", defaults.indicators.atr_window)?,
            },
            risk: RiskConfig {
                stop_loss_multiplier: parse_or(
                    &lookup,
                    "SL_ATR_MULTIPLIER",
                    defaults.risk.stop_loss_multiplier,
                )?,
                take_profit_multiplier: parse_or(
                    &lookup,
                    "TP_ATR_MULTIPLIER",
                    defaults.risk.take_profit_multiplier,
                )?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.risk.validate()?;
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::Invalid("symbol must not be empty".to_string()));
        }
        if self.ledger_capacity == 0 {
            return Err(ConfigError::Invalid(
                "ledger capacity must be at least 1".to_string(),
            ));
        }
        if self.poll_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "poll interval must be at least 1 second".to_string(),
            ));
        }
        if self.fetch_timeout_seconds == 0 || self.notify_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "collaborator timeouts must be at least 1 second".to_string(),
            ));
        }
        if self.lookback < self.indicators.min_bars() {
            return Err(ConfigError::Invalid(format!(
                "lookback ({}) cannot fill the indicator windows ({} bars needed)",
                self.lookback,
                self.indicators.min_bars()
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_seconds)
    }
}

pub(crate) fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::Parse {
                key: key.to_string(),
                value: raw,
            })
        }
        _ => Ok(default),
    }
}
