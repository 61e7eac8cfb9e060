//! Signal detection, risk bands and the signal history.

pub mod crossover;
pub mod engine;
pub mod ledger;
pub mod risk;

pub use crossover::{detect_crossover, detect_latest, Crossover};
pub use engine::{Evaluation, SignalEngine};
pub use ledger::SignalLedger;
pub use risk::RiskBandCalculator;
