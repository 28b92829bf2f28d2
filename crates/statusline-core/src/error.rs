//! Error types for cc-statusline operations.
//!
//! [`StatuslineError`] covers every fallible operation outside the validator
//! and the composer, which report diagnostics as data instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`StatuslineError`].
pub type Result<T> = std::result::Result<T, StatuslineError>;

/// Error type for cc-statusline operations.
#[derive(Debug, Error)]
pub enum StatuslineError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Preset file not found or unreadable
    #[error("Configuration not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Preset file could not be parsed
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Configuration rejected by the validator
    #[error("Configuration validation failed: {}", errors.join("; "))]
    ConfigValidation { errors: Vec<String> },

    /// No script generator exists for the runtime
    #[error("No script generator for runtime: {runtime}")]
    UnsupportedRuntime { runtime: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Refused to overwrite an existing statusline script
    #[error("Statusline script already exists: {path}")]
    InstallTargetExists { path: PathBuf },

    /// Home directory could not be determined
    #[error("Could not determine home directory")]
    HomeNotFound,

    // =========================================================================
    // Parsing Errors
    // =========================================================================
    /// JSON parsing error
    #[error("JSON parse error in {context}: {message}")]
    JsonParse {
        context: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // =========================================================================
    // Interaction Errors
    // =========================================================================
    /// User left the wizard before finishing
    #[error("Setup cancelled")]
    UserCancelled,

    /// Terminal setup or rendering failed
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in cc-statusline)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl StatuslineError {
    /// Create a ConfigNotFound error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a ConfigNotFound error with source
    pub fn config_not_found_with_source(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: Some(source),
        }
    }

    /// Create a ConfigInvalid error
    pub fn config_invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a JSON parse error
    pub fn json_parse(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParse {
            context: context.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigInvalid { .. }
                | Self::ConfigValidation { .. }
                | Self::UnsupportedRuntime { .. }
        )
    }

    /// Returns actionable guidance for the user
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => Some("Check the preset path passed with --preset"),
            Self::ConfigInvalid { .. } => {
                Some("Check YAML/JSON syntax - try 'cc-statusline validate <file>'")
            }
            Self::ConfigValidation { .. } => {
                Some("Select at least one feature and use a supported runtime and theme")
            }
            Self::UnsupportedRuntime { .. } => Some("Set runtime to 'bash'"),
            Self::InstallTargetExists { .. } => Some("Re-run with --force to overwrite it"),
            Self::HomeNotFound => Some("Set the HOME environment variable"),
            Self::JsonParse { .. } => {
                Some("Fix or remove the malformed settings.json and run again")
            }
            Self::Terminal { .. } => Some("Try a different terminal, or pass --preset"),
            _ => None,
        }
    }
}
