//! Core application primitives (driver, runtime, HTTP front-end)

pub mod http;
pub mod runtime;
pub mod scheduler;
pub mod state;

pub use runtime::SignalRuntime;
pub use scheduler::{CycleOutcome, PollingDriver};
pub use state::{DriverState, EngineState, EngineStatus, SharedState};
