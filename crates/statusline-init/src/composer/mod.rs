//! Statusline script generation.
//!
//! A [`ScriptComposer`] turns a [`StatuslineConfig`] into the text of an
//! executable script. Only bash has a composer today; python and node
//! configurations validate but [`composer_for`] returns `None` for them.

pub mod bash;
pub mod segments;

use statusline_core::{Runtime, StatuslineConfig, StatuslineError};
use tracing::{debug, warn};

pub use bash::{BashComposer, Fragment, Layout, RenderContext};

/// Produces the script for one runtime.
pub trait ScriptComposer {
    /// Runtime the emitted script targets.
    fn runtime(&self) -> Runtime;

    /// Emit the script. Never fails for a valid configuration.
    fn compose(&self, config: &StatuslineConfig) -> String;
}

/// Composer for `runtime`, if one exists.
pub fn composer_for(runtime: &Runtime) -> Option<Box<dyn ScriptComposer>> {
    match runtime {
        Runtime::Bash => Some(Box::new(BashComposer::new())),
        Runtime::Python | Runtime::Node | Runtime::Other(_) => None,
    }
}

/// Generate a bash statusline script for `config`.
///
/// The runtime field is ignored; the output is always bash.
pub fn generate_bash_statusline(config: &StatuslineConfig) -> String {
    BashComposer::new().compose(config)
}

/// Generate the script for the configured runtime.
///
/// `created` stamps the header with a creation time; without it the output
/// depends only on `config`.
pub fn compose_script(
    config: &StatuslineConfig,
    created: Option<&str>,
) -> Result<String, StatuslineError> {
    let script = match (&config.runtime, created) {
        (Runtime::Bash, Some(created)) => BashComposer::new().with_created(created).compose(config),
        (runtime, _) => {
            let Some(composer) = composer_for(runtime) else {
                warn!(runtime = %runtime, "no script generator for runtime");
                return Err(StatuslineError::UnsupportedRuntime {
                    runtime: runtime.to_string(),
                });
            };
            composer.compose(config)
        }
    };

    debug!(
        runtime = %config.runtime,
        features = config.features.len(),
        bytes = script.len(),
        "composed statusline script"
    );
    Ok(script)
}
