use crate::calibration::runner::{CalibrationMetrics, CalibrationRunner, ThresholdSample};

pub struct ThresholdTuner {
    pub calibration_data: Vec<ThresholdSample>,
}

impl ThresholdTuner {
    pub fn new(calibration_data: Vec<ThresholdSample>) -> Self {
        Self { calibration_data }
    }

    /// Grid search over `[start, end]`. Highest F1 wins; on a tie the higher
    /// threshold is kept since it merges less.
    pub fn tune(&self, start: f64, end: f64, step: f64) -> CalibrationMetrics {
        let runner = CalibrationRunner::new(self.calibration_data.clone());
        runner
            .best_threshold(&threshold_grid(start, end, step))
            .unwrap_or_else(|| runner.evaluate(start))
    }
}

const MIN_GRID_STEP: f64 = 1e-4;
const MAX_GRID_STEPS: usize = 10_000;

/// Evenly spaced thresholds from `start` to `end`, rounded to 3 decimals.
/// Steps finer than `MIN_GRID_STEP` are widened and the grid never holds more
/// than `MAX_GRID_STEPS + 1` points.
pub fn threshold_grid(start: f64, end: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || end < start {
        return vec![start];
    }
    let step = step.max(MIN_GRID_STEP);
    let steps = (((end - start) / step).round() as usize).min(MAX_GRID_STEPS);
    (0..=steps)
        .map(|idx| ((start + idx as f64 * step) * 1000.0).round() / 1000.0)
        .collect()
}
