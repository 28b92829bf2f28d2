//! Benchmark scenarios and mock Claude Code input.

use serde_json::{Value, json};
use statusline_core::{Feature, IconStyle, StatuslineConfig};

/// Size of the generated stdin document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSize {
    Small,
    Medium,
    /// Adds a thousand-entry payload to stress JSON parsing
    Large,
}

/// Number of filler records in [`InputSize::Large`] input.
pub const LARGE_INPUT_RECORDS: usize = 1000;

/// Statusline input as Claude Code would send it.
pub fn mock_claude_input(size: InputSize) -> Value {
    let mut input = json!({
        "session_id": "test-session-123",
        "transcript_path": "/home/user/.claude/conversations/test.jsonl",
        "version": "1.3.2",
        "cwd": "/home/user/projects/my-project",
        "workspace": {
            "current_dir": "/home/user/projects/my-project"
        },
        "model": {
            "id": "claude-opus-4-1-20250805",
            "display_name": "Opus 4.1",
            "version": "20250805"
        },
        "output_style": {
            "name": "detailed"
        },
        "cost": {
            "total_cost_usd": 3.42,
            "total_duration_ms": 987654
        }
    });

    if size == InputSize::Large {
        let records: Vec<Value> = (0..LARGE_INPUT_RECORDS)
            .map(|i| {
                json!({
                    "id": i,
                    "data": format!("Large data string {i}").repeat(10),
                    "nested": { "deep": { "value": i as f64 / LARGE_INPUT_RECORDS as f64 } }
                })
            })
            .collect();
        input["largeData"] = Value::Array(records);
    }

    input
}

/// One benchmark case.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub config: StatuslineConfig,
    /// Document written to the script's stdin
    pub input: Value,
    /// Average run time the scenario is expected to stay under
    pub expected_ms: u64,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        config: StatuslineConfig,
        input: Value,
        expected_ms: u64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            config,
            input,
            expected_ms,
        }
    }
}

fn standard_features() -> Vec<Feature> {
    vec![Feature::Directory, Feature::Git, Feature::Model]
}

/// The built-in scenario suite.
pub fn default_scenarios() -> Vec<Scenario> {
    let base = StatuslineConfig::default()
        .with_ccusage(false)
        .with_logging(false)
        .with_icon_style(Some(IconStyle::Emoji));

    vec![
        Scenario::new(
            "Minimal",
            "Directory only - baseline performance",
            base.clone()
                .with_features(vec![Feature::Directory])
                .with_theme("minimal")
                .with_colors(false),
            mock_claude_input(InputSize::Small),
            50,
        ),
        Scenario::new(
            "Standard",
            "Directory + Git + Model - typical usage",
            base.clone().with_features(standard_features()),
            mock_claude_input(InputSize::Medium),
            100,
        ),
        Scenario::new(
            "Full (no ccusage)",
            "All features except ccusage integration",
            base.clone()
                .with_features(Feature::ALL.to_vec())
                .with_icon_style(Some(IconStyle::NerdFont)),
            mock_claude_input(InputSize::Medium),
            150,
        ),
        Scenario::new(
            "Full (with ccusage)",
            "All features with ccusage integration",
            base.clone()
                .with_features(Feature::ALL.to_vec())
                .with_icon_style(Some(IconStyle::NerdFont))
                .with_ccusage(true),
            mock_claude_input(InputSize::Medium),
            300,
        ),
        Scenario::new(
            "Large Input",
            "Standard config with large JSON input",
            base.clone().with_features(standard_features()),
            mock_claude_input(InputSize::Large),
            200,
        ),
        Scenario::new(
            "With Logging",
            "Standard config with logging enabled",
            base.clone()
                .with_features(standard_features())
                .with_logging(true),
            mock_claude_input(InputSize::Medium),
            150,
        ),
        Scenario::new(
            "Compact Theme",
            "Compact theme with moderate features",
            base.with_features(vec![
                Feature::Directory,
                Feature::Git,
                Feature::Model,
                Feature::Usage,
            ])
            .with_theme("compact")
            .with_icon_style(Some(IconStyle::Unicode)),
            mock_claude_input(InputSize::Medium),
            100,
        ),
    ]
}

/// Scenarios whose name contains `filter`, ignoring case.
pub fn filter_scenarios(scenarios: Vec<Scenario>, filter: Option<&str>) -> Vec<Scenario> {
    match filter {
        None => scenarios,
        Some(filter) => {
            let needle = filter.to_lowercase();
            scenarios
                .into_iter()
                .filter(|s| s.name.to_lowercase().contains(&needle))
                .collect()
        }
    }
}
