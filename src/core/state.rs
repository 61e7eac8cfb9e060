//! State shared between the polling loop and status readers.

use crate::models::signal::{CrossoverEvent, SignalRecord};
use crate::signals::ledger::SignalLedger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Polling driver state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverState {
    Idle,
    Fetching,
    Evaluating,
    Notifying,
    Sleeping,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct EngineState {
    pub running: bool,
    pub state: DriverState,
    pub last_check: Option<DateTime<Utc>>,
    pub last_signal: Option<CrossoverEvent>,
    pub error_count: u64,
    pub consecutive_failures: u64,
    pub cycles: u64,
    pub ledger: SignalLedger,
}

impl EngineState {
    pub fn new(ledger_capacity: usize) -> Self {
        Self {
            running: false,
            state: DriverState::Idle,
            last_check: None,
            last_signal: None,
            error_count: 0,
            consecutive_failures: 0,
            cycles: 0,
            ledger: SignalLedger::new(ledger_capacity),
        }
    }

    pub fn record_error(&mut self) {
        self.error_count += 1;
        self.consecutive_failures += 1;
    }

    /// Mark a cycle that got past fetching.
    pub fn record_check(&mut self, at: DateTime<Utc>) {
        self.last_check = Some(at);
        self.consecutive_failures = 0;
    }

    pub fn snapshot(&self) -> EngineStatus {
        EngineStatus {
            running: self.running,
            state: self.state,
            last_check: self.last_check,
            last_signal: self.last_signal.clone(),
            error_count: self.error_count,
            consecutive_failures: self.consecutive_failures,
            cycles: self.cycles,
            recent_signals: self.ledger.recent(self.ledger.capacity()),
        }
    }
}

/// Read-only view for the front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub running: bool,
    pub state: DriverState,
    pub last_check: Option<DateTime<Utc>>,
    pub last_signal: Option<CrossoverEvent>,
    pub error_count: u64,
    pub consecutive_failures: u64,
    pub cycles: u64,
    /// Most recent first.
    pub recent_signals: Vec<SignalRecord>,
}

pub type SharedState = Arc<RwLock<EngineState>>;

pub fn shared_state(ledger_capacity: usize) -> SharedState {
    Arc::new(RwLock::new(EngineState::new(ledger_capacity)))
}
