use serde::{Deserialize, Serialize};

use crate::text::phrase_similarity;

/// A hand-labelled pair of problem phrases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdSample {
    pub left: String,
    pub right: String,
    pub same_theme: bool,
}

impl ThresholdSample {
    pub fn similarity(&self) -> f64 {
        phrase_similarity(&self.left.to_lowercase(), &self.right.to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalibrationMetrics {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy: f64,
    pub sample_count: usize,
}

pub struct CalibrationRunner {
    pub samples: Vec<ThresholdSample>,
}

impl CalibrationRunner {
    pub fn new(samples: Vec<ThresholdSample>) -> Self {
        Self { samples }
    }

    /// Scores the merge rule at `threshold`: a pair is predicted to merge when
    /// its similarity reaches the threshold.
    pub fn evaluate(&self, threshold: f64) -> CalibrationMetrics {
        if self.samples.is_empty() {
            return CalibrationMetrics {
                threshold,
                ..CalibrationMetrics::default()
            };
        }

        let mut true_positive = 0usize;
        let mut false_positive = 0usize;
        let mut false_negative = 0usize;
        let mut correct = 0usize;

        for sample in &self.samples {
            let predicted = sample.similarity() >= threshold;
            match (predicted, sample.same_theme) {
                (true, true) => true_positive += 1,
                (true, false) => false_positive += 1,
                (false, true) => false_negative += 1,
                (false, false) => {}
            }
            if predicted == sample.same_theme {
                correct += 1;
            }
        }

        let precision = ratio(true_positive, true_positive + false_positive);
        let recall = ratio(true_positive, true_positive + false_negative);
        let f1 = if precision + recall <= 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        CalibrationMetrics {
            threshold,
            precision,
            recall,
            f1,
            accuracy: ratio(correct, self.samples.len()),
            sample_count: self.samples.len(),
        }
    }

    pub fn sweep(&self, thresholds: &[f64]) -> Vec<CalibrationMetrics> {
        thresholds
            .iter()
            .map(|threshold| self.evaluate(*threshold))
            .collect()
    }

    /// Highest F1 over `thresholds`; on a tie the later threshold wins.
    pub fn best_threshold(&self, thresholds: &[f64]) -> Option<CalibrationMetrics> {
        let mut best: Option<CalibrationMetrics> = None;
        for metrics in self.sweep(thresholds) {
            if best.as_ref().map_or(true, |current| metrics.f1 >= current.f1) {
                best = Some(metrics);
            }
        }
        best
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
