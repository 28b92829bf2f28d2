//! Errors raised by the benchmark harness.

use std::path::PathBuf;

use statusline_core::StatuslineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PerfError {
    #[error("Failed to create scratch directory")]
    Scratch {
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write script {path}")]
    WriteScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode input for scenario {scenario}")]
    Input {
        scenario: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write report {path}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No scenarios match filter: {0}")]
    NoMatchingScenario(String),
}

pub type Result<T> = std::result::Result<T, PerfError>;

impl From<PerfError> for StatuslineError {
    fn from(err: PerfError) -> Self {
        match err {
            PerfError::Scratch { source } => StatuslineError::DirectoryCreation {
                path: std::env::temp_dir(),
                source,
            },
            PerfError::WriteScript { path, source } | PerfError::WriteReport { path, source } => {
                StatuslineError::io("writing", path, source)
            }
            PerfError::Input { scenario, source } => {
                StatuslineError::json_parse(format!("scenario {scenario}"), source)
            }
            PerfError::NoMatchingScenario(filter) => {
                StatuslineError::internal(format!("No scenarios match filter: {filter}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_keeps_path() {
        let err: StatuslineError = PerfError::WriteReport {
            path: PathBuf::from("/tmp/report.json"),
            source: std::io::Error::other("disk full"),
        }
        .into();
        assert!(err.to_string().contains("/tmp/report.json"));
    }
}
