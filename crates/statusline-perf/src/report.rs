//! Exportable benchmark reports.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::{PerfError, Result};
use crate::runner::{Measurement, ScenarioResult};
use crate::stats::ScenarioStats;

/// Scenarios averaging above this get a recommendation.
pub const SLOW_AVERAGE_MS: f64 = 500.0;

/// Full results of a benchmark session.
#[derive(Debug, Clone, Serialize)]
pub struct PerfReport {
    pub timestamp: DateTime<Utc>,
    pub results: BTreeMap<String, Vec<Measurement>>,
    pub summary: BTreeMap<String, ScenarioStats>,
}

impl PerfReport {
    pub fn from_results(results: &[ScenarioResult]) -> Self {
        Self {
            timestamp: Utc::now(),
            results: results
                .iter()
                .map(|r| (r.name.clone(), r.measurements.clone()))
                .collect(),
            summary: results
                .iter()
                .filter_map(|r| r.stats.clone().map(|s| (r.name.clone(), s)))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report as pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json().map_err(|e| PerfError::WriteReport {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        std::fs::write(path, json).map_err(|e| PerfError::WriteReport {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!(path = %path.display(), scenarios = self.summary.len(), "wrote perf report");
        Ok(())
    }
}

/// Fixed-width table of every scenario's headline numbers.
pub fn format_summary_table(results: &[ScenarioResult]) -> String {
    let mut out = format!(
        "{:<22} {:>10} {:>12} {:>10} {:>10} {:>10} {:>10}\n",
        "Scenario", "Avg (ms)", "Median (ms)", "P95 (ms)", "CPU (ms)", "Peak (MB)", "Success %"
    );
    for result in results {
        let Some(stats) = &result.stats else { continue };
        let cpu = stats
            .avg_cpu_time_ms
            .map_or_else(|| "-".to_string(), |ms| format!("{ms:.2}"));
        let memory = stats
            .peak_memory_kb
            .map_or_else(|| "-".to_string(), |kb| format!("{:.1}", kb as f64 / 1024.0));
        out.push_str(&format!(
            "{:<22} {:>10.2} {:>12.2} {:>10.2} {:>10} {:>10} {:>10.0}\n",
            result.name, stats.average, stats.median, stats.p95, cpu, memory, stats.success_rate
        ));
    }
    out
}

/// Bar chart of `values`, `height` rows tall and at most `width` columns wide.
///
/// Each row is labelled with its threshold; a column is filled when its value
/// reaches the row's threshold.
pub fn ascii_chart(values: &[f64], width: usize, height: usize, label: Option<&str>) -> String {
    if values.is_empty() || width == 0 {
        return "No data".to_string();
    }
    let height = height.max(2);
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let min = values.iter().copied().fold(f64::MAX, f64::min);
    let range = if max > min { max - min } else { 1.0 };

    let mut lines = Vec::with_capacity(height + 3);
    if let Some(label) = label {
        lines.push(label.to_string());
        lines.push("─".repeat(width));
    }

    let columns = width.min(values.len());
    for row in (0..height).rev() {
        let threshold = min + range * row as f64 / (height - 1) as f64;
        let bars: String = (0..columns)
            .map(|col| values[col * values.len() / width])
            .map(|v| if v >= threshold { '█' } else { ' ' })
            .collect();
        lines.push(format!("{threshold:>6.1} │{bars}"));
    }
    lines.push(format!("       └{}", "─".repeat(width)));
    lines.join("\n")
}

/// Advice lines for scenarios averaging above [`SLOW_AVERAGE_MS`].
pub fn recommendations(results: &[ScenarioResult]) -> Vec<String> {
    results
        .iter()
        .filter_map(|r| {
            let stats = r.stats.as_ref()?;
            (stats.average > SLOW_AVERAGE_MS).then(|| {
                format!(
                    "{}: Consider optimizing or reducing features ({:.0}ms avg)",
                    r.name, stats.average
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceUsage;
    use std::time::Duration;
    use tempfile::TempDir;

    fn result(name: &str, millis: &[u64]) -> ScenarioResult {
        let measurements: Vec<Measurement> = millis
            .iter()
            .map(|m| Measurement::completed(Duration::from_millis(*m), true, "out".into(), None))
            .collect();
        ScenarioResult {
            name: name.into(),
            description: String::new(),
            expected_ms: 100,
            stats: ScenarioStats::from_measurements(&measurements),
            measurements,
        }
    }

    #[test]
    fn test_report_json_shape() {
        let report = PerfReport::from_results(&[result("Minimal", &[10, 20]), result("Empty", &[])]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        let timestamp = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
        assert_eq!(json["results"]["Minimal"].as_array().unwrap().len(), 2);
        assert_eq!(json["summary"]["Minimal"]["average"], 15.0);
        assert_eq!(json["summary"]["Minimal"]["successRate"], 100.0);
        assert!(json["summary"].get("Empty").is_none());
    }

    #[test]
    fn test_write_report() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.json");
        PerfReport::from_results(&[result("Standard", &[5])]).write(&path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"Standard\""));
    }

    #[test]
    fn test_write_report_to_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("report.json");
        let err = PerfReport::from_results(&[]).write(&path).unwrap_err();
        assert!(matches!(err, PerfError::WriteReport { .. }));
    }

    #[test]
    fn test_recommendations_only_for_slow() {
        let results = [result("Fast", &[10]), result("Slow", &[700, 900])];
        assert_eq!(
            recommendations(&results),
            vec!["Slow: Consider optimizing or reducing features (800ms avg)".to_string()]
        );
    }

    #[test]
    fn test_summary_table_shows_resources() {
        let mut sampled = result("Sampled", &[10]);
        sampled.measurements[0].resources = Some(ResourceUsage {
            cpu_time_ms: 3.5,
            peak_memory_kb: 2048,
        });
        sampled.stats = ScenarioStats::from_measurements(&sampled.measurements);

        let table = format_summary_table(&[sampled, result("Unsampled", &[10])]);
        assert!(table.contains("CPU (ms)"));
        let sampled_row = table.lines().find(|l| l.starts_with("Sampled")).unwrap();
        assert!(sampled_row.contains("3.50"));
        assert!(sampled_row.contains("2.0"));
        let unsampled_row = table.lines().find(|l| l.starts_with("Unsampled")).unwrap();
        assert!(unsampled_row.contains(" - "));

        let report = PerfReport::from_results(&[result("Plain", &[1])]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert!(json["summary"]["Plain"].get("peakMemoryKb").is_none());
    }

    #[test]
    fn test_ascii_chart_shape() {
        let chart = ascii_chart(&[1.0, 2.0, 3.0], 3, 3, Some("Times"));
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Times",
                "───",
                "   3.0 │  █",
                "   2.0 │ ██",
                "   1.0 │███",
                "       └───",
            ]
        );
    }

    #[test]
    fn test_ascii_chart_flat_and_empty() {
        assert_eq!(ascii_chart(&[], 10, 5, None), "No data");
        let flat = ascii_chart(&[4.0, 4.0], 10, 2, None);
        assert_eq!(flat.lines().next(), Some("   5.0 │  "));
        assert_eq!(flat.lines().nth(1), Some("   4.0 │██"));
    }

    #[test]
    fn test_summary_table_lists_scenarios() {
        let table = format_summary_table(&[result("Minimal", &[10]), result("Skipped", &[])]);
        assert!(table.starts_with("Scenario"));
        assert!(table.contains("Minimal"));
        assert!(!table.contains("Skipped"));
    }
}
