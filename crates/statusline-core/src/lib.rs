//! # statusline-core
//!
//! Core types, errors, and utilities for cc-statusline.
//!
//! This crate provides:
//! - [`StatuslineConfig`] - The configuration collected by the wizard
//! - [`StatuslineError`] - Error type for every fallible operation
//! - [`logging`] - Tracing setup
//! - [`deps`] - Probe for the tools generated scripts rely on
//!
//! ## Example
//!
//! ```no_run
//! use statusline_core::{Feature, StatuslineConfig, logging};
//!
//! fn main() -> statusline_core::Result<()> {
//!     let _guard = logging::init_logging(None, false)?;
//!
//!     let config = StatuslineConfig::default().with_features(vec![Feature::Directory]);
//!     tracing::info!(features = ?config.features, "configuration ready");
//!     Ok(())
//! }
//! ```

pub mod deps;
pub mod error;
pub mod logging;
pub mod types;

pub use deps::{DependencyReport, validate_dependencies};
pub use error::{Result, StatuslineError};
pub use logging::{LogGuard, init_logging};
pub use types::{Feature, IconStyle, InstallLocation, Runtime, StatuslineConfig, Theme};
