//! Configuration validation.
//!
//! Every rule runs on every call; the caller gets all errors and warnings
//! from a single pass. Only errors make a configuration invalid.

use statusline_core::{Feature, StatuslineConfig};
use tracing::debug;

/// Selecting this many features or more triggers a performance warning.
pub const MANY_FEATURES_THRESHOLD: usize = 6;

pub const NO_FEATURES_ERROR: &str = "At least one display feature must be selected";
pub const MANY_FEATURES_WARNING: &str =
    "Many features selected. This may impact statusline performance.";
pub const CCUSAGE_DISABLED_WARNING: &str = "Usage features selected but ccusage integration is disabled. Some features may not work properly.";
pub const EMOJI_WITHOUT_COLOR_WARNING: &str =
    "Custom emojis enabled but colors disabled. Visual distinction may be limited.";

/// Diagnostics produced by [`validate_config`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// Problems that make the configuration unusable
    pub errors: Vec<String>,
    /// Advisory notes that never block generation
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// True iff there are no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Validate a statusline configuration.
///
/// Rules:
/// - at least one feature (error)
/// - runtime is bash, python or node (error)
/// - theme is minimal, detailed or compact (error)
/// - [`MANY_FEATURES_THRESHOLD`] or more features (warning)
/// - usage or session without ccusage integration (warning)
/// - custom emojis without colors (warning)
pub fn validate_config(config: &StatuslineConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if config.features.is_empty() {
        result.add_error(NO_FEATURES_ERROR);
    }

    if !config.runtime.is_known() {
        result.add_error(format!("Invalid runtime: {}", config.runtime));
    }

    if !config.theme.is_known() {
        result.add_error(format!("Invalid theme: {}", config.theme));
    }

    if config.features.len() >= MANY_FEATURES_THRESHOLD {
        result.add_warning(MANY_FEATURES_WARNING);
    }

    if config.has_any(&[Feature::Usage, Feature::Session]) && !config.ccusage_integration {
        result.add_warning(CCUSAGE_DISABLED_WARNING);
    }

    if config.custom_emojis && !config.colors {
        result.add_warning(EMOJI_WITHOUT_COLOR_WARNING);
    }

    debug!(
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "validated configuration"
    );

    result
}
