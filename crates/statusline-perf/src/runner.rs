//! Runs generated scripts and records their timings.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use statusline_init::generate_bash_statusline;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{PerfError, Result};
use crate::resources::{ResourceUsage, sample_process_tree};
use crate::scenarios::Scenario;
use crate::stats::{Rating, ScenarioStats};

/// A run is killed after this long.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(2);

/// How often a running script is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(2);

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// Outcome of a single script execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(rename = "executionTimeMs", serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// Exit status was zero and the run finished in time
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// CPU time and peak memory, when the run was sampled at least once
    #[serde(flatten)]
    pub resources: Option<ResourceUsage>,
}

impl Measurement {
    pub fn completed(duration: Duration, success: bool, output: String, error: Option<String>) -> Self {
        Self {
            duration,
            success,
            output,
            error,
            resources: None,
        }
    }

    pub fn failed(duration: Duration, error: impl Into<String>) -> Self {
        Self {
            duration,
            success: false,
            output: String::new(),
            error: Some(error.into()),
            resources: None,
        }
    }

    pub fn with_resources(mut self, resources: Option<ResourceUsage>) -> Self {
        self.resources = resources;
        self
    }

    pub fn millis(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Every measurement for one scenario plus its summary.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub name: String,
    pub description: String,
    pub expected_ms: u64,
    pub measurements: Vec<Measurement>,
    pub stats: Option<ScenarioStats>,
}

impl ScenarioResult {
    pub fn rating(&self) -> Option<Rating> {
        self.stats
            .as_ref()
            .map(|s| Rating::from_times(s.average, self.expected_ms as f64))
    }

    /// Multi-line human readable summary.
    pub fn summary(&self) -> String {
        let Some(stats) = &self.stats else {
            return format!("🧪 {}\n   no measurements\n", self.name);
        };

        let mut out = format!("🧪 {}\n   {}\n", self.name, self.description);
        out.push_str(&format!("   ✅ Success Rate: {:.1}%\n", stats.success_rate));
        out.push_str(&format!(
            "   ⏱️  Average: {:.2}ms {}\n",
            stats.average,
            Rating::from_times(stats.average, self.expected_ms as f64)
        ));
        out.push_str(&format!("   📊 Median:  {:.2}ms\n", stats.median));
        out.push_str(&format!("   🚀 Min:     {:.2}ms\n", stats.min));
        out.push_str(&format!("   🐌 Max:     {:.2}ms\n", stats.max));
        out.push_str(&format!("   📈 P95:     {:.2}ms\n", stats.p95));
        if let Some(cpu) = stats.avg_cpu_time_ms {
            out.push_str(&format!("   🧮 CPU:     {:.2}ms avg\n", cpu));
        }
        if let Some(kb) = stats.peak_memory_kb {
            out.push_str(&format!("   💾 Memory:  {:.1}MB peak\n", kb as f64 / 1024.0));
        }
        if stats.average > self.expected_ms as f64 {
            out.push_str(&format!(
                "   ⚠️  Performance below expectations (expected <{}ms)\n",
                self.expected_ms
            ));
        }
        out
    }
}

/// Executes scenarios sequentially in a scratch directory.
pub struct PerfRunner {
    scratch: TempDir,
    timeout: Duration,
    results: Vec<ScenarioResult>,
}

impl PerfRunner {
    pub fn new() -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("cc-statusline-perf")
            .tempdir()
            .map_err(|e| PerfError::Scratch { source: e })?;
        Ok(Self {
            scratch,
            timeout: RUN_TIMEOUT,
            results: Vec::new(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Results of every scenario run so far, in run order.
    pub fn results(&self) -> &[ScenarioResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ScenarioResult> {
        self.results
    }

    /// Generate the scenario's script once and run it `iterations` times.
    pub fn run_scenario(&mut self, scenario: &Scenario, iterations: usize) -> Result<&ScenarioResult> {
        info!(scenario = %scenario.name, iterations, "running scenario");

        let script_path = self.write_script(scenario)?;
        let input = serde_json::to_vec(&scenario.input).map_err(|e| PerfError::Input {
            scenario: scenario.name.clone(),
            source: e,
        })?;

        let mut measurements = Vec::with_capacity(iterations);
        for i in 0..iterations {
            let measurement = self.measure(&script_path, &input);
            debug!(
                scenario = %scenario.name,
                iteration = i + 1,
                ms = measurement.millis(),
                success = measurement.success,
                "iteration finished"
            );
            measurements.push(measurement);
        }

        if let Err(e) = std::fs::remove_file(&script_path) {
            debug!(path = %script_path.display(), error = %e, "failed to remove script");
        }

        let stats = ScenarioStats::from_measurements(&measurements);
        if let Some(stats) = &stats {
            info!(
                scenario = %scenario.name,
                average_ms = stats.average,
                p95_ms = stats.p95,
                success_rate = stats.success_rate,
                "scenario complete"
            );
        }

        self.results.push(ScenarioResult {
            name: scenario.name.clone(),
            description: scenario.description.clone(),
            expected_ms: scenario.expected_ms,
            measurements,
            stats,
        });
        let index = self.results.len() - 1;
        Ok(&self.results[index])
    }

    fn write_script(&self, scenario: &Scenario) -> Result<PathBuf> {
        let slug: String = scenario
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        let path = self
            .scratch
            .path()
            .join(format!("test-{slug}-{}.sh", self.results.len()));

        let script = generate_bash_statusline(&scenario.config);
        std::fs::write(&path, script).map_err(|e| PerfError::WriteScript {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    fn measure(&self, script_path: &Path, input: &[u8]) -> Measurement {
        let start = Instant::now();

        let mut child = match Command::new("bash")
            .arg(script_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return Measurement::failed(start.elapsed(), e.to_string()),
        };

        // Large inputs and outputs exceed the pipe buffer, so every pipe is
        // serviced from its own thread.
        if let Some(mut stdin) = child.stdin.take() {
            let input = input.to_vec();
            thread::spawn(move || {
                let _ = stdin.write_all(&input);
            });
        }
        let stdout = child.stdout.take().map(drain_pipe);
        let stderr = child.stderr.take().map(drain_pipe);

        let pid = child.id();
        let mut resources: Option<ResourceUsage> = None;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let duration = start.elapsed();
                    let output = join_pipe(stdout);
                    let stderr = join_pipe(stderr);
                    let error = (!stderr.trim().is_empty()).then(|| stderr.trim().to_string());
                    return Measurement::completed(
                        duration,
                        status.success(),
                        output.trim().to_string(),
                        error,
                    )
                    .with_resources(resources);
                }
                Ok(None) if start.elapsed() >= self.timeout => {
                    return kill_after_timeout(child, start, self.timeout).with_resources(resources);
                }
                Ok(None) => {
                    if let Some(sample) = sample_process_tree(pid) {
                        resources = Some(resources.map_or(sample, |r| r.merge(sample)));
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Measurement::failed(start.elapsed(), e.to_string()),
            }
        }
    }
}

/// Kill a script that overran. Its output is discarded, since a descendant
/// may still hold the pipes open.
fn kill_after_timeout(mut child: Child, start: Instant, timeout: Duration) -> Measurement {
    if let Err(e) = child.kill() {
        warn!(error = %e, "failed to kill timed out script");
    }
    let _ = child.wait();
    Measurement::failed(
        start.elapsed(),
        format!("Timeout ({}s)", timeout.as_secs_f64()),
    )
}

fn drain_pipe(mut pipe: impl Read + Send + 'static) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        let _ = pipe.read_to_string(&mut buf);
        buf
    })
}

fn join_pipe(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{InputSize, mock_claude_input};
    use statusline_core::{Feature, StatuslineConfig};

    fn bash_available() -> bool {
        Command::new("bash")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn model_only() -> Scenario {
        Scenario::new(
            "Model",
            "model segment only",
            StatuslineConfig::default()
                .with_features(vec![Feature::Model])
                .with_colors(false)
                .with_ccusage(false)
                .with_icon_style(None),
            mock_claude_input(InputSize::Medium),
            500,
        )
    }

    #[test]
    fn test_run_scenario_records_every_iteration() {
        if !bash_available() {
            return;
        }
        let mut runner = PerfRunner::new().unwrap();
        let result = runner.run_scenario(&model_only(), 3).unwrap();

        assert_eq!(result.measurements.len(), 3);
        for m in &result.measurements {
            assert!(m.success, "{:?}", m.error);
            assert_eq!(m.output, "model: Opus 4.1");
        }
        let stats = result.stats.as_ref().unwrap();
        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.success_rate, 100.0);
        assert_eq!(runner.results().len(), 1);
    }

    #[test]
    fn test_large_input_does_not_block() {
        if !bash_available() {
            return;
        }
        let mut scenario = model_only();
        scenario.input = mock_claude_input(InputSize::Large);

        let mut runner = PerfRunner::new().unwrap();
        let result = runner.run_scenario(&scenario, 1).unwrap();
        assert!(result.measurements[0].success);
    }

    #[test]
    fn test_slow_script_times_out() {
        if !bash_available() {
            return;
        }
        let runner = PerfRunner::new()
            .unwrap()
            .with_timeout(Duration::from_millis(200));
        let script = runner.scratch.path().join("slow.sh");
        std::fs::write(&script, "sleep 5\n").unwrap();

        let measurement = runner.measure(&script, b"{}");
        assert!(!measurement.success);
        assert_eq!(measurement.error.as_deref(), Some("Timeout (0.2s)"));
        assert!(measurement.duration < Duration::from_secs(5));
    }

    #[test]
    fn test_failing_script_is_unsuccessful() {
        if !bash_available() {
            return;
        }
        let runner = PerfRunner::new().unwrap();
        let script = runner.scratch.path().join("fail.sh");
        std::fs::write(&script, "echo oops >&2\nexit 3\n").unwrap();

        let measurement = runner.measure(&script, b"{}");
        assert!(!measurement.success);
        assert_eq!(measurement.error.as_deref(), Some("oops"));
    }

    #[test]
    fn test_large_output_does_not_block() {
        if !bash_available() {
            return;
        }
        let runner = PerfRunner::new().unwrap();
        let script = runner.scratch.path().join("loud.sh");
        std::fs::write(&script, "head -c 200000 /dev/zero | tr '\\0' x\nhead -c 100000 /dev/zero >&2\n").unwrap();

        let measurement = runner.measure(&script, b"{}");
        assert!(measurement.success, "{:?}", measurement.error);
        assert_eq!(measurement.output.len(), 200_000);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_long_run_records_resources() {
        if !bash_available() {
            return;
        }
        let runner = PerfRunner::new().unwrap();
        let script = runner.scratch.path().join("busy.sh");
        std::fs::write(&script, "sleep 0.2\necho done\n").unwrap();

        let measurement = runner.measure(&script, b"{}");
        assert!(measurement.success);
        let resources = measurement.resources.unwrap();
        assert!(resources.peak_memory_kb > 0);
        assert!(resources.cpu_time_ms >= 0.0);

        let json = serde_json::to_value(&measurement).unwrap();
        assert!(json["peakMemoryKb"].as_u64().unwrap() > 0);
        assert!(json.get("cpuTimeMs").is_some());
    }

    #[test]
    fn test_measurement_serializes_millis() {
        let m = Measurement::completed(Duration::from_millis(12), true, "ok".into(), None);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["executionTimeMs"], 12.0);
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
        assert!(json.get("peakMemoryKb").is_none());
    }

    #[test]
    fn test_summary_flags_slow_scenarios() {
        let result = ScenarioResult {
            name: "Slow".into(),
            description: "d".into(),
            expected_ms: 10,
            measurements: vec![],
            stats: ScenarioStats::from_measurements(&[Measurement::completed(
                Duration::from_millis(40),
                true,
                String::new(),
                None,
            )]),
        };
        assert_eq!(result.rating(), Some(Rating::TooSlow));
        assert!(result.summary().contains("expected <10ms"));
    }
}
