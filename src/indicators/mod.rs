pub mod calculator;

pub mod trend;
pub mod volatility;

pub use calculator::IndicatorCalculator;
