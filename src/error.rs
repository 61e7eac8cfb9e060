//! Error taxonomy for the signal engine and its collaborators.
//!
//! Everything except [`crate::config::ConfigError`] is contained inside the polling
//! driver: it is logged, counted, and the next cycle starts fresh.

use thiserror::Error;

/// Not enough bars to define a full indicator state. Expected while history warms up,
/// and the only way indicator evaluation can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient data: need {required} bars, have {available}")]
pub struct InsufficientData {
    pub required: usize,
    pub available: usize,
}

/// Failures of risk-band derivation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// ATR was zero, negative or not finite, so no risk band can be derived.
    #[error("invalid volatility: ATR = {0}")]
    InvalidVolatility(f64),
}

/// Upstream market data fetch failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("provider rate limit exceeded: {message}")]
    RateLimited { message: String },
    #[error("provider request timed out")]
    Timeout,
    #[error("provider transport error: {0}")]
    Transport(String),
    #[error("malformed provider payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

/// Notification delivery failures. Never roll back a recorded signal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotifyError {
    #[error("notifier returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("notifier transport error: {0}")]
    Transport(String),
    #[error("notifier request timed out")]
    Timeout,
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotifyError::Timeout
        } else {
            NotifyError::Transport(err.to_string())
        }
    }
}

/// Control-plane misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("signal engine is already running")]
    AlreadyRunning,
    #[error("signal engine is not running")]
    NotRunning,
}

/// Failures of the on-demand market snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    InsufficientData(#[from] InsufficientData),
}
