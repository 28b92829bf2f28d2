//! Dependency probe for the tools a generated statusline script calls.
//!
//! The generated script degrades gracefully when any of these are missing,
//! so every dependency here is optional; the probe only tells the user which
//! segments will stay empty.
//!
//! ## Example
//!
//! ```no_run
//! use statusline_core::deps::validate_dependencies;
//!
//! let report = validate_dependencies();
//! if !report.is_available("jq") {
//!     eprintln!("{}", report.format_missing());
//! }
//! ```

use std::collections::BTreeMap;

use tracing::debug;

/// An external executable the generated script may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Key reported by the probe
    pub name: &'static str,
    /// Executable names tried in order
    pub binaries: &'static [&'static str],
    /// What the generated script uses it for
    pub purpose: &'static str,
    /// Installation instructions
    pub install_instructions: &'static str,
}

/// The fixed set of probed dependencies.
pub const DEPENDENCIES: &[Dependency] = &[
    Dependency {
        name: "jq",
        binaries: &["jq"],
        purpose: "Fast JSON parsing of the statusline input",
        install_instructions: "apt install jq  |  brew install jq  |  pacman -S jq",
    },
    Dependency {
        name: "git",
        binaries: &["git"],
        purpose: "Git branch segment",
        install_instructions: "apt install git  |  brew install git  |  pacman -S git",
    },
    Dependency {
        name: "ccusage",
        binaries: &["ccusage"],
        purpose: "Session time, token and burn rate segments",
        install_instructions: "npm install -g ccusage",
    },
    Dependency {
        name: "python",
        binaries: &["python3", "python"],
        purpose: "Timestamp parsing fallback when date cannot parse ISO-8601",
        install_instructions: "apt install python3  |  brew install python",
    },
    Dependency {
        name: "node",
        binaries: &["node"],
        purpose: "Running ccusage through npx",
        install_instructions: "apt install nodejs  |  brew install node",
    },
];

/// Result of probing one dependency.
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    pub dep: Dependency,
    pub found: bool,
}

/// Result of probing every dependency in [`DEPENDENCIES`].
#[derive(Debug, Clone)]
pub struct DependencyReport {
    pub statuses: Vec<DependencyStatus>,
}

impl DependencyReport {
    /// Whether the named dependency resolved on `PATH`.
    ///
    /// Unknown names report `false`.
    pub fn is_available(&self, name: &str) -> bool {
        self.statuses
            .iter()
            .any(|s| s.dep.name == name && s.found)
    }

    /// The probe as a name to availability map.
    pub fn as_map(&self) -> BTreeMap<&'static str, bool> {
        self.statuses.iter().map(|s| (s.dep.name, s.found)).collect()
    }

    /// Dependencies that were not found.
    pub fn missing(&self) -> Vec<&DependencyStatus> {
        self.statuses.iter().filter(|s| !s.found).collect()
    }

    /// One line per dependency, for the `deps` command.
    pub fn format_table(&self) -> String {
        let mut output = String::new();
        for status in &self.statuses {
            let mark = if status.found { "✅" } else { "❌" };
            output.push_str(&format!(
                "  {} {:<8} {}\n",
                mark, status.dep.name, status.dep.purpose
            ));
        }
        output
    }

    /// Install hints for every missing dependency.
    pub fn format_missing(&self) -> String {
        let missing = self.missing();
        if missing.is_empty() {
            return String::new();
        }

        let mut output =
            String::from("⚠️  Missing optional dependencies (some segments will stay empty):\n\n");
        for status in missing {
            output.push_str(&format!(
                "  • {} - {}\n    Install: {}\n\n",
                status.dep.name, status.dep.purpose, status.dep.install_instructions
            ));
        }
        output
    }

    /// Compact one-line summary.
    pub fn format_summary(&self) -> String {
        let found = self.statuses.iter().filter(|s| s.found).count();
        let total = self.statuses.len();
        if found == total {
            format!("✅ All {} dependencies found", total)
        } else {
            format!("⚠️  {}/{} dependencies found", found, total)
        }
    }
}

/// Whether any of `binaries` resolves on `PATH`.
fn resolve(binaries: &[&str]) -> bool {
    binaries.iter().any(|bin| match which::which(bin) {
        Ok(path) => {
            debug!(binary = *bin, path = %path.display(), "dependency found");
            true
        }
        Err(_) => false,
    })
}

/// Probe `PATH` for every dependency the generated script can use.
pub fn validate_dependencies() -> DependencyReport {
    let statuses = DEPENDENCIES
        .iter()
        .map(|dep| DependencyStatus {
            dep: dep.clone(),
            found: resolve(dep.binaries),
        })
        .collect();

    DependencyReport { statuses }
}
