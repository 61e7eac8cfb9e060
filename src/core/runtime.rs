//! Engine instance: owns the polling task and exposes start/stop and status.

use crate::config::{ConfigError, EngineConfig};
use crate::core::scheduler::{CycleOutcome, PollingDriver};
use crate::core::state::{shared_state, DriverState, EngineStatus, SharedState};
use crate::error::{ControlError, SnapshotError};
use crate::metrics::Metrics;
use crate::models::indicators::MarketSnapshot;
use crate::models::signal::SignalRecord;
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::{format_shutdown_message, format_startup_message, Notifier};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

struct RunHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// One engine per instrument, constructed with its collaborators injected.
pub struct SignalRuntime {
    driver: Arc<PollingDriver>,
    state: SharedState,
    metrics: Option<Arc<Metrics>>,
    handle: Mutex<Option<RunHandle>>,
}

impl SignalRuntime {
    /// Validates `config`; an invalid configuration never produces a runtime.
    pub fn new(
        config: EngineConfig,
        provider: Arc<dyn MarketDataProvider + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
        metrics: Option<Arc<Metrics>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = shared_state(config.ledger_capacity);
        let driver = Arc::new(PollingDriver::new(
            config,
            provider,
            notifier,
            state.clone(),
            metrics.clone(),
        ));
        Ok(Self {
            driver,
            state,
            metrics,
            handle: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        self.driver.config()
    }

    /// Spawn the polling loop. Fails with `AlreadyRunning` if a loop is active.
    pub async fn start(&self) -> Result<(), ControlError> {
        let mut handle = self.handle.lock().await;
        if handle.as_ref().is_some_and(|h| !h.task.is_finished()) {
            return Err(ControlError::AlreadyRunning);
        }

        {
            let mut state = self.state.write().await;
            state.running = true;
            state.state = DriverState::Idle;
        }
        if let Some(ref m) = self.metrics {
            m.engine_running.set(1);
        }

        let (shutdown, receiver) = watch::channel(false);
        let driver = self.driver.clone();
        let task = tokio::spawn(async move {
            if driver.config().announce_lifecycle {
                driver.notify(&format_startup_message(driver.config())).await;
            }
            driver.run(receiver).await;
        });

        *handle = Some(RunHandle { shutdown, task });
        info!(symbol = %self.config().symbol, "SignalRuntime: started");
        Ok(())
    }

    /// Request a cooperative stop and wait for the in-flight cycle to finish.
    ///
    /// Returns `false` (and does nothing) when no loop is running.
    pub async fn stop(&self) -> bool {
        let mut handle = self.handle.lock().await;
        let Some(h) = handle.take() else {
            debug!("SignalRuntime: stop requested but {}", ControlError::NotRunning);
            return false;
        };

        let _ = h.shutdown.send(true);
        if let Err(e) = h.task.await {
            error!(error = %e, "SignalRuntime: polling task ended abnormally");
        }

        {
            let mut state = self.state.write().await;
            state.running = false;
            state.state = DriverState::Stopped;
        }
        if let Some(ref m) = self.metrics {
            m.engine_running.set(0);
        }

        if self.config().announce_lifecycle {
            self.driver
                .notify(&format_shutdown_message(self.config()))
                .await;
        }
        info!(symbol = %self.config().symbol, "SignalRuntime: stopped");
        true
    }

    pub async fn is_running(&self) -> bool {
        self.state.read().await.running
    }

    pub async fn status(&self) -> EngineStatus {
        self.state.read().await.snapshot()
    }

    /// Up to `n` recorded signals, most recent first.
    pub async fn recent_signals(&self, n: usize) -> Vec<SignalRecord> {
        self.state.read().await.ledger.recent(n)
    }

    /// Run a single cycle outside the polling loop. Refused while the loop runs,
    /// so cycles never overlap.
    pub async fn run_once(&self) -> Result<CycleOutcome, ControlError> {
        let handle = self.handle.lock().await;
        if handle.as_ref().is_some_and(|h| !h.task.is_finished()) {
            return Err(ControlError::AlreadyRunning);
        }
        Ok(self.driver.run_cycle().await)
    }

    pub async fn snapshot(&self) -> Result<MarketSnapshot, SnapshotError> {
        self.driver.snapshot().await
    }
}
