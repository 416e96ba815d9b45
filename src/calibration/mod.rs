pub mod runner;
pub mod tuning;

pub use runner::{CalibrationMetrics, CalibrationRunner, ThresholdSample};
pub use tuning::ThresholdTuner;
