//! Benchmark harness for generated statusline scripts.
//!
//! Each [`Scenario`] pairs a configuration with mock Claude Code input. The
//! [`PerfRunner`] generates the script once, runs it under `bash` repeatedly
//! and records wall-clock timings alongside sampled CPU time and peak memory,
//! which [`ScenarioStats`] summarises and [`PerfReport`] exports as JSON.
//!
//! ```no_run
//! use statusline_perf::{PerfRunner, default_scenarios};
//!
//! fn main() -> statusline_perf::Result<()> {
//!     let mut runner = PerfRunner::new()?;
//!     for scenario in default_scenarios() {
//!         let result = runner.run_scenario(&scenario, 10)?;
//!         print!("{}", result.summary());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod report;
pub mod resources;
pub mod runner;
pub mod scenarios;
pub mod stats;

pub use error::{PerfError, Result};
pub use report::{PerfReport, ascii_chart, format_summary_table, recommendations};
pub use resources::{ResourceUsage, sample_process_tree};
pub use runner::{Measurement, PerfRunner, RUN_TIMEOUT, ScenarioResult};
pub use scenarios::{InputSize, Scenario, default_scenarios, filter_scenarios, mock_claude_input};
pub use stats::{Rating, ScenarioStats};
