//! Summary statistics over a scenario's measurements.

use std::fmt;

use serde::Serialize;

use crate::runner::Measurement;

/// Aggregated timings for one scenario, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioStats {
    pub iterations: usize,
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
    pub p99: f64,
    /// Percentage of runs that exited successfully
    pub success_rate: f64,
    /// Mean CPU time over the runs that were sampled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_cpu_time_ms: Option<f64>,
    /// Largest resident set over all sampled runs, in KiB
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_memory_kb: Option<u64>,
}

impl ScenarioStats {
    /// Statistics for `measurements`, or `None` when there are none.
    pub fn from_measurements(measurements: &[Measurement]) -> Option<Self> {
        if measurements.is_empty() {
            return None;
        }

        let mut times: Vec<f64> = measurements.iter().map(Measurement::millis).collect();
        times.sort_by(f64::total_cmp);

        let n = times.len();
        let successes = measurements.iter().filter(|m| m.success).count();

        let sampled: Vec<_> = measurements.iter().filter_map(|m| m.resources).collect();
        let avg_cpu_time_ms = (!sampled.is_empty())
            .then(|| sampled.iter().map(|r| r.cpu_time_ms).sum::<f64>() / sampled.len() as f64);
        let peak_memory_kb = sampled.iter().map(|r| r.peak_memory_kb).max();

        Some(Self {
            iterations: n,
            average: times.iter().sum::<f64>() / n as f64,
            median: median(&times),
            min: times[0],
            max: times[n - 1],
            p95: percentile(&times, 95.0),
            p99: percentile(&times, 99.0),
            success_rate: successes as f64 * 100.0 / n as f64,
            avg_cpu_time_ms,
            peak_memory_kb,
        })
    }
}

/// Median of an ascending, non-empty slice.
pub fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Nearest-rank percentile of an ascending, non-empty slice.
///
/// Uses index `ceil(p / 100 * n) - 1`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100.0 * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

/// How a scenario's average compares with its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Acceptable,
    Slow,
    TooSlow,
}

impl Rating {
    /// Rating for an average time against an expected time.
    pub fn from_times(average_ms: f64, expected_ms: f64) -> Self {
        let ratio = average_ms / expected_ms;
        if ratio < 0.5 {
            Rating::Excellent
        } else if ratio < 0.8 {
            Rating::Good
        } else if ratio < 1.0 {
            Rating::Acceptable
        } else if ratio < 1.5 {
            Rating::Slow
        } else {
            Rating::TooSlow
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "🚀 Excellent",
            Rating::Good => "✅ Good",
            Rating::Acceptable => "👍 Acceptable",
            Rating::Slow => "⚠️  Slow",
            Rating::TooSlow => "🔴 Too Slow",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
