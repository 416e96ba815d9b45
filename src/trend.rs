use serde::{Deserialize, Serialize};

use crate::age_days;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Weekly post counts, oldest week first.
    pub bins: Vec<u32>,
    pub slope: f64,
}

pub fn week_count(window_days: u32) -> usize {
    ((window_days as usize + 6) / 7).max(1)
}

pub fn compute_trend<I>(created_utcs: I, window_days: u32, now: i64) -> Trend
where
    I: IntoIterator<Item = i64>,
{
    let weeks = week_count(window_days);
    let mut bins = vec![0u32; weeks];

    for created in created_utcs {
        let age = age_days(created, now);
        if age > window_days as f64 {
            continue;
        }
        let weeks_ago = (age / 7.0).floor() as usize;
        let index = (weeks - 1).saturating_sub(weeks_ago);
        bins[index] += 1;
    }

    let slope = least_squares_slope(&bins);
    Trend { bins, slope }
}

/// OLS slope of `values[x]` against `x`; 0 when the x variance is 0.
pub fn least_squares_slope(values: &[u32]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = values.iter().map(|value| *value as f64).sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (x, y) in values.iter().enumerate() {
        let dx = x as f64 - mean_x;
        numerator += dx * (*y as f64 - mean_y);
        denominator += dx * dx;
    }

    if denominator <= 0.0 {
        return 0.0;
    }
    numerator / denominator
}
