//! Non-interactive configuration from preset files.
//!
//! A preset is a YAML or JSON document using the same camelCase keys as the
//! serialized [`StatuslineConfig`]. Missing keys take the wizard defaults.

use std::path::Path;

use statusline_core::{Result, StatuslineConfig, StatuslineError};
use tracing::{debug, info};

/// Document format of a preset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetFormat {
    Yaml,
    Json,
}

impl PresetFormat {
    /// Format implied by the file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse preset text in the given format.
pub fn parse_preset(content: &str, format: PresetFormat) -> std::result::Result<StatuslineConfig, String> {
    if content.trim().is_empty() {
        return Ok(StatuslineConfig::default());
    }

    match format {
        PresetFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        PresetFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Load a preset file.
///
/// # Errors
///
/// * [`StatuslineError::ConfigNotFound`] if the file cannot be read
/// * [`StatuslineError::ConfigInvalid`] if it does not parse
pub fn load_preset(path: &Path) -> Result<StatuslineConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| StatuslineError::config_not_found_with_source(path, e))?;

    let format = PresetFormat::from_path(path);
    debug!(path = %path.display(), ?format, "parsing preset");

    let config = parse_preset(&content, format)
        .map_err(|message| StatuslineError::config_invalid(path, message))?;

    info!(
        path = %path.display(),
        features = config.features.len(),
        runtime = %config.runtime,
        "loaded preset"
    );
    Ok(config)
}
