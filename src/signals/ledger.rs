//! Bounded in-memory history of emitted signals.

use crate::models::signal::{CrossoverEvent, RiskBand, SignalRecord};
use chrono::Utc;
use std::collections::VecDeque;

/// Insertion-ordered and capacity-bounded: the oldest record is evicted first.
///
/// Not synchronized itself; the runtime keeps it behind the shared engine-state lock.
#[derive(Debug, Clone)]
pub struct SignalLedger {
    records: VecDeque<SignalRecord>,
    capacity: usize,
}

impl SignalLedger {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a fully built record stamped with the current time.
    pub fn record(&mut self, event: CrossoverEvent, risk_band: RiskBand) -> SignalRecord {
        let record = SignalRecord {
            event,
            risk_band,
            emitted_at: Utc::now(),
        };
        self.push(record.clone());
        record
    }

    fn push(&mut self, record: SignalRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Up to `n` records, most recent first.
    pub fn recent(&self, n: usize) -> Vec<SignalRecord> {
        self.records.iter().rev().take(n).cloned().collect()
    }

    pub fn latest(&self) -> Option<&SignalRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
