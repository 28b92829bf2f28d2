//! Statusline configuration model shared by every cc-statusline crate.
//!
//! A [`StatuslineConfig`] is produced once (by the wizard or a preset file),
//! read by the validator and the script composer, and then dropped.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A statusline segment the user can enable.
///
/// The order of [`Feature::ALL`] is the order the wizard offers them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Working directory
    Directory,
    /// Current git branch
    Git,
    /// Model display name
    Model,
    /// Context window remaining
    Context,
    /// Session cost and cost per hour
    Usage,
    /// Time remaining in the current usage block
    Session,
    /// Token totals from ccusage
    Tokens,
    /// Tokens per minute from ccusage
    #[serde(rename = "burnrate")]
    BurnRate,
}

impl Feature {
    /// Every feature, in wizard order.
    pub const ALL: [Feature; 8] = [
        Feature::Directory,
        Feature::Git,
        Feature::Model,
        Feature::Context,
        Feature::Usage,
        Feature::Session,
        Feature::Tokens,
        Feature::BurnRate,
    ];

    /// Identifier used in preset files and generated script comments.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Git => "git",
            Self::Model => "model",
            Self::Context => "context",
            Self::Usage => "usage",
            Self::Session => "session",
            Self::Tokens => "tokens",
            Self::BurnRate => "burnrate",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interpreter targeted by the generated script.
///
/// Unrecognised values are kept verbatim in [`Runtime::Other`] so that
/// validation can report them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Runtime {
    #[default]
    Bash,
    Python,
    Node,
    Other(String),
}

impl Runtime {
    /// Whether this is one of the runtimes the validator accepts.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Bash => "bash",
            Self::Python => "python",
            Self::Node => "node",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for Runtime {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bash" => Self::Bash,
            "python" => Self::Python,
            "node" => Self::Node,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Runtime {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Runtime> for String {
    fn from(runtime: Runtime) -> Self {
        runtime.as_str().to_string()
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verbosity preset for rendered segments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    Minimal,
    #[default]
    Detailed,
    Compact,
    Other(String),
}

impl Theme {
    /// Whether this is one of the themes the validator accepts.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Minimal => "minimal",
            Self::Detailed => "detailed",
            Self::Compact => "compact",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        match value.as_str() {
            "minimal" => Self::Minimal,
            "detailed" => Self::Detailed,
            "compact" => Self::Compact,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Theme {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.as_str().to_string()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Glyph set used for segment labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconStyle {
    Emoji,
    #[default]
    NerdFont,
    Unicode,
    Ascii,
}

impl IconStyle {
    pub const ALL: [IconStyle; 4] = [
        IconStyle::NerdFont,
        IconStyle::Emoji,
        IconStyle::Unicode,
        IconStyle::Ascii,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Emoji => "emoji",
            Self::NerdFont => "nerd-font",
            Self::Unicode => "unicode",
            Self::Ascii => "ascii",
        }
    }
}

impl fmt::Display for IconStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the generated script is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallLocation {
    /// `~/.claude`, shared by every project
    Global,
    /// `./.claude` in the current project
    #[default]
    Project,
}

impl InstallLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for InstallLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full set of choices collected by the wizard.
///
/// Field names serialise in camelCase (`ccusageIntegration`, `iconStyle`, ...)
/// and missing keys fall back to [`StatuslineConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatuslineConfig {
    /// Enabled segments; declared order is display order.
    pub features: Vec<Feature>,
    pub runtime: Runtime,
    pub colors: bool,
    pub theme: Theme,
    pub ccusage_integration: bool,
    pub logging: bool,
    pub custom_emojis: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_style: Option<IconStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_location: Option<InstallLocation>,
}

impl Default for StatuslineConfig {
    fn default() -> Self {
        Self {
            features: Feature::ALL.to_vec(),
            runtime: Runtime::Bash,
            colors: true,
            theme: Theme::Detailed,
            ccusage_integration: true,
            logging: false,
            custom_emojis: false,
            icon_style: Some(IconStyle::NerdFont),
            install_location: Some(InstallLocation::Project),
        }
    }
}

impl StatuslineConfig {
    /// Whether `feature` is selected.
    pub fn has(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Whether any of `features` is selected.
    pub fn has_any(&self, features: &[Feature]) -> bool {
        features.iter().any(|f| self.has(*f))
    }

    /// Selected features in display order with duplicates removed.
    pub fn display_order(&self) -> Vec<Feature> {
        let mut seen = Vec::with_capacity(self.features.len());
        for feature in &self.features {
            if !seen.contains(feature) {
                seen.push(*feature);
            }
        }
        seen
    }

    /// Set the feature list.
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    /// Set the runtime.
    pub fn with_runtime(mut self, runtime: impl Into<Runtime>) -> Self {
        self.runtime = runtime.into();
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: impl Into<Theme>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Enable or disable ANSI colors.
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Enable or disable the ccusage integration.
    pub fn with_ccusage(mut self, enabled: bool) -> Self {
        self.ccusage_integration = enabled;
        self
    }

    /// Enable or disable debug logging in the generated script.
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging = enabled;
        self
    }

    /// Enable or disable emoji labels.
    pub fn with_custom_emojis(mut self, enabled: bool) -> Self {
        self.custom_emojis = enabled;
        self
    }

    /// Set (or clear) the icon style.
    pub fn with_icon_style(mut self, style: Option<IconStyle>) -> Self {
        self.icon_style = style;
        self
    }

    /// Set (or clear) the install location.
    pub fn with_install_location(mut self, location: Option<InstallLocation>) -> Self {
        self.install_location = location;
        self
    }
}
