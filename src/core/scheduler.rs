//! Polling driver: fetch → evaluate → (record + notify) → sleep, one cycle at a time.

use crate::config::EngineConfig;
use crate::core::state::{DriverState, SharedState};
use crate::error::{InsufficientData, NotifyError, ProviderError, SnapshotError};
use crate::metrics::Metrics;
use crate::models::indicators::{Candle, MarketSnapshot};
use crate::models::signal::{CrossoverEvent, SignalRecord};
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::{format_signal_message, Notifier};
use crate::signals::engine::SignalEngine;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// What a single cycle ended with.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    FetchFailed(ProviderError),
    InsufficientData { required: usize, available: usize },
    NoSignal,
    /// Crossing already recorded, re-reported while the window has not moved past it.
    Duplicate(CrossoverEvent),
    InvalidVolatility(CrossoverEvent),
    Signal { record: SignalRecord, delivered: bool },
}

pub struct PollingDriver {
    config: EngineConfig,
    engine: SignalEngine,
    provider: Arc<dyn MarketDataProvider + Send + Sync>,
    notifier: Arc<dyn Notifier + Send + Sync>,
    state: SharedState,
    metrics: Option<Arc<Metrics>>,
}

impl PollingDriver {
    pub fn new(
        config: EngineConfig,
        provider: Arc<dyn MarketDataProvider + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        state: SharedState,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        let engine = SignalEngine::new(config.indicators, config.risk);
        Self {
            config,
            engine,
            provider,
            notifier,
            state,
            metrics,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn transition(&self, next: DriverState) {
        let mut state = self.state.write().await;
        if state.state != next {
            debug!(from = ?state.state, to = ?next, "PollingDriver: state transition");
            state.state = next;
        }
    }

    async fn fetch(&self) -> Result<Vec<Candle>, ProviderError> {
        timeout(
            self.config.fetch_timeout(),
            self.provider.fetch_bars(&self.config.symbol, self.config.lookback),
        )
        .await
        .map_err(|_| ProviderError::Timeout)?
    }

    /// Run one complete cycle and leave the driver in `Sleeping`.
    pub async fn run_cycle(&self) -> CycleOutcome {
        {
            let mut state = self.state.write().await;
            state.cycles += 1;
            state.state = DriverState::Fetching;
        }
        if let Some(ref m) = self.metrics {
            m.cycles_total.inc();
        }

        let candles = match self.fetch().await {
            Ok(candles) => candles,
            Err(e) => {
                warn!(symbol = %self.config.symbol, error = %e, "PollingDriver: fetch failed, skipping cycle");
                {
                    let mut state = self.state.write().await;
                    state.record_error();
                    state.state = DriverState::Sleeping;
                }
                if let Some(ref m) = self.metrics {
                    m.errors_total.inc();
                    m.fetch_failures_total.inc();
                }
                return CycleOutcome::FetchFailed(e);
            }
        };

        self.transition(DriverState::Evaluating).await;
        let checked_at = Utc::now();
        if let Some(ref m) = self.metrics {
            m.last_check_timestamp_seconds.set(checked_at.timestamp() as f64);
        }

        let evaluation = match self.engine.evaluate(&candles) {
            Ok(evaluation) => evaluation,
            Err(InsufficientData {
                required,
                available,
            }) => {
                info!(
                    symbol = %self.config.symbol,
                    required,
                    available,
                    "PollingDriver: not enough history yet ({} < {})",
                    available,
                    required
                );
                self.finish_check(checked_at).await;
                return CycleOutcome::InsufficientData { required, available };
            }
        };

        debug!(
            symbol = %self.config.symbol,
            price = evaluation.last_state.close,
            fast_ema = evaluation.last_state.fast_ema,
            slow_ema = evaluation.last_state.slow_ema,
            atr = evaluation.last_state.atr,
            "PollingDriver: evaluated {} bars",
            candles.len()
        );

        let Some(event) = evaluation.event else {
            info!(symbol = %self.config.symbol, "PollingDriver: no crossover");
            self.finish_check(checked_at).await;
            return CycleOutcome::NoSignal;
        };

        let already_recorded = {
            let state = self.state.read().await;
            state
                .last_signal
                .as_ref()
                .is_some_and(|last| event.repeats(last))
        };
        if already_recorded {
            debug!(
                direction = %event.direction,
                bar = %event.timestamp,
                from = %event.previous_timestamp,
                "PollingDriver: crossover already recorded"
            );
            self.finish_check(checked_at).await;
            return CycleOutcome::Duplicate(event);
        }

        let risk_band = match self.engine.risk_band(&event) {
            Ok(band) => band,
            Err(e) => {
                warn!(
                    direction = %event.direction,
                    atr = event.atr,
                    error = %e,
                    "PollingDriver: crossover detected but no risk band can be derived"
                );
                {
                    let mut state = self.state.write().await;
                    state.last_check = Some(checked_at);
                    state.record_error();
                    state.state = DriverState::Sleeping;
                }
                if let Some(ref m) = self.metrics {
                    m.errors_total.inc();
                }
                return CycleOutcome::InvalidVolatility(event);
            }
        };

        // publish record, last signal and check time under one guard
        let record = {
            let mut state = self.state.write().await;
            let record = state.ledger.record(event.clone(), risk_band);
            state.last_signal = Some(event);
            state.record_check(checked_at);
            state.state = DriverState::Notifying;
            record
        };
        if let Some(ref m) = self.metrics {
            m.signals_total
                .with_label_values(&[record.event.direction.as_str()])
                .inc();
        }

        info!(
            direction = %record.event.direction,
            price = record.event.price,
            stop_loss = record.risk_band.stop_loss,
            take_profit = record.risk_band.take_profit,
            "PollingDriver: {} signal recorded",
            record.event.direction
        );

        let message = format_signal_message(
            &record,
            self.config.indicators.fast_window,
            self.config.indicators.slow_window,
        );
        let delivered = self.notify(&message).await;

        self.transition(DriverState::Sleeping).await;
        CycleOutcome::Signal { record, delivered }
    }

    async fn finish_check(&self, checked_at: chrono::DateTime<Utc>) {
        let mut state = self.state.write().await;
        state.record_check(checked_at);
        state.state = DriverState::Sleeping;
    }

    /// Best-effort delivery; failures are logged and counted, never propagated.
    pub async fn notify(&self, text: &str) -> bool {
        let result = timeout(self.config.notify_timeout(), self.notifier.send(text))
            .await
            .unwrap_or(Err(NotifyError::Timeout));

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "PollingDriver: notification failed");
                self.state.write().await.record_error();
                if let Some(ref m) = self.metrics {
                    m.errors_total.inc();
                    m.notify_failures_total.inc();
                }
                false
            }
        }
    }

    /// Run cycles until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// Stop requests are honored between cycles; a running cycle always completes.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let interval = self.config.poll_interval();
        info!(
            symbol = %self.config.symbol,
            interval_seconds = interval.as_secs(),
            "PollingDriver: started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.run_cycle().await;

            let stop = tokio::select! {
                _ = tokio::time::sleep(interval) => false,
                changed = shutdown.changed() => changed.is_err() || *shutdown.borrow(),
            };
            if stop {
                break;
            }
        }

        {
            let mut state = self.state.write().await;
            state.state = DriverState::Stopped;
            state.running = false;
        }
        info!(symbol = %self.config.symbol, "PollingDriver: stopped");
    }

    /// Fetch the current window plus spot price and report the latest indicator values.
    pub async fn snapshot(&self) -> Result<MarketSnapshot, SnapshotError> {
        let candles = self.fetch().await?;
        let last = self.engine.calculator().latest(&candles)?;
        let quote = timeout(
            self.config.fetch_timeout(),
            self.provider.fetch_latest_price(&self.config.symbol),
        )
        .await
        .map_err(|_| ProviderError::Timeout)??;

        Ok(MarketSnapshot {
            symbol: self.config.symbol.clone(),
            price: quote.price,
            change_24h: quote.change_24h,
            volume_24h: quote.volume_24h,
            fast_ema: last.fast_ema,
            slow_ema: last.slow_ema,
            atr: last.atr,
            bar_timestamp: last.timestamp,
            timestamp: Utc::now(),
        })
    }
}
