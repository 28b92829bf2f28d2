//! cc-statusline setup.
//!
//! This crate turns user choices into an installed statusline: the wizard
//! and preset loader produce a [`StatuslineConfig`](statusline_core::StatuslineConfig),
//! the validator checks it, the composer emits the script and the installer
//! writes it into a `.claude` directory.

pub mod composer;
pub mod icons;
pub mod installer;
pub mod preset;
pub mod validator;
pub mod wizard;

pub use composer::{ScriptComposer, compose_script, composer_for, generate_bash_statusline};
pub use installer::{InstallOptions, InstallOutcome, install, install_dir};
pub use preset::load_preset;
pub use validator::{ValidationResult, validate_config};
pub use wizard::{ConfigSummary, WizardError, run_wizard};
