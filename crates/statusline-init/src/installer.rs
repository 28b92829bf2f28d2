//! Installation of a generated script into a `.claude` directory.
//!
//! Writes `statusline.sh` and points the `statusLine` entry of the sibling
//! `settings.json` at it, keeping every other setting intact.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use statusline_core::{InstallLocation, Result, StatuslineError};
use tracing::{debug, info, warn};

pub const SCRIPT_NAME: &str = "statusline.sh";
pub const SETTINGS_NAME: &str = "settings.json";

/// `.claude` directory for an install location.
pub fn install_dir(location: InstallLocation, project_root: &Path, home: &Path) -> PathBuf {
    match location {
        InstallLocation::Global => home.join(".claude"),
        InstallLocation::Project => project_root.join(".claude"),
    }
}

/// Command string written to `settings.json`.
pub fn settings_command(location: InstallLocation) -> String {
    match location {
        InstallLocation::Global => format!("~/.claude/{SCRIPT_NAME}"),
        InstallLocation::Project => format!(".claude/{SCRIPT_NAME}"),
    }
}

/// Where and how to install.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub location: InstallLocation,
    /// Root of the current project
    pub project_root: PathBuf,
    /// User home directory
    pub home: PathBuf,
    /// Replace an existing script
    pub force: bool,
}

impl InstallOptions {
    pub fn new(location: InstallLocation, project_root: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            location,
            project_root: project_root.into(),
            home: home.into(),
            force: false,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn target_dir(&self) -> PathBuf {
        install_dir(self.location, &self.project_root, &self.home)
    }
}

/// What [`install`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub script_path: PathBuf,
    pub settings_path: PathBuf,
    /// Command registered in settings
    pub command: String,
    /// An existing script was replaced
    pub replaced: bool,
}

/// Write `script` and register it in `settings.json`.
///
/// The settings file is parsed before anything is written, so a malformed
/// one aborts the install and is left untouched. A newly written script is
/// removed again if the settings cannot be saved.
pub fn install(script: &str, options: &InstallOptions) -> Result<InstallOutcome> {
    let dir = options.target_dir();
    let script_path = dir.join(SCRIPT_NAME);
    let settings_path = dir.join(SETTINGS_NAME);

    let replaced = script_path.exists();
    if replaced && !options.force {
        return Err(StatuslineError::InstallTargetExists { path: script_path });
    }

    let mut settings = read_settings(&settings_path)?;

    fs::create_dir_all(&dir).map_err(|e| StatuslineError::DirectoryCreation {
        path: dir.clone(),
        source: e,
    })?;

    write_script(&script_path, script)?;
    if replaced {
        warn!(path = %script_path.display(), "replaced existing statusline script");
    }

    let command = settings_command(options.location);
    settings.insert(
        "statusLine".to_string(),
        json!({
            "type": "command",
            "command": command,
            "padding": 0,
        }),
    );
    if let Err(e) = write_settings(&settings_path, &settings) {
        // A fresh script without its settings entry would block a retry.
        if !replaced && let Err(cleanup) = fs::remove_file(&script_path) {
            warn!(path = %script_path.display(), error = %cleanup, "failed to remove script");
        }
        return Err(e);
    }

    info!(
        script = %script_path.display(),
        settings = %settings_path.display(),
        location = %options.location,
        "installed statusline"
    );

    Ok(InstallOutcome {
        script_path,
        settings_path,
        command,
        replaced,
    })
}

fn write_script(path: &Path, script: &str) -> Result<()> {
    fs::write(path, script).map_err(|e| StatuslineError::io("writing", path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .map_err(|e| StatuslineError::io("setting permissions on", path, e))?;
    }

    debug!(path = %path.display(), bytes = script.len(), "wrote statusline script");
    Ok(())
}

/// Existing settings as a JSON object; empty when the file is absent.
fn read_settings(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }

    let content =
        fs::read_to_string(path).map_err(|e| StatuslineError::io("reading", path, e))?;
    if content.trim().is_empty() {
        return Ok(Map::new());
    }

    let context = path.display().to_string();
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(StatuslineError::JsonParse {
            context,
            message: "expected a JSON object".to_string(),
            source: None,
        }),
        Err(e) => Err(StatuslineError::json_parse(context, e)),
    }
}

fn write_settings(path: &Path, settings: &Map<String, Value>) -> Result<()> {
    let mut json = serde_json::to_string_pretty(settings)
        .map_err(|e| StatuslineError::json_parse(path.display().to_string(), e))?;
    json.push('\n');
    fs::write(path, json).map_err(|e| StatuslineError::io("writing", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCRIPT: &str = "#!/usr/bin/env bash\necho hi\n";

    fn options(temp: &TempDir, location: InstallLocation) -> InstallOptions {
        InstallOptions::new(
            location,
            temp.path().join("project"),
            temp.path().join("home"),
        )
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_install_dir() {
        let root = Path::new("/work/app");
        let home = Path::new("/home/me");
        assert_eq!(
            install_dir(InstallLocation::Global, root, home),
            PathBuf::from("/home/me/.claude")
        );
        assert_eq!(
            install_dir(InstallLocation::Project, root, home),
            PathBuf::from("/work/app/.claude")
        );
    }

    #[test]
    fn test_project_install_writes_script_and_settings() {
        let temp = TempDir::new().unwrap();
        let outcome = install(SCRIPT, &options(&temp, InstallLocation::Project)).unwrap();

        assert_eq!(outcome.script_path, temp.path().join("project/.claude/statusline.sh"));
        assert_eq!(fs::read_to_string(&outcome.script_path).unwrap(), SCRIPT);
        assert!(!outcome.replaced);

        let settings = read_json(&outcome.settings_path);
        assert_eq!(
            settings["statusLine"],
            json!({"type": "command", "command": ".claude/statusline.sh", "padding": 0})
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let outcome = install(SCRIPT, &options(&temp, InstallLocation::Global)).unwrap();
        let mode = fs::metadata(&outcome.script_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert_eq!(outcome.command, "~/.claude/statusline.sh");
    }

    #[test]
    fn test_merge_preserves_other_settings() {
        let temp = TempDir::new().unwrap();
        let opts = options(&temp, InstallLocation::Global);
        let dir = opts.target_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(SETTINGS_NAME),
            r#"{"model": "opus", "statusLine": {"type": "command", "command": "old.sh"}}"#,
        )
        .unwrap();

        install(SCRIPT, &opts).unwrap();

        let settings = read_json(&dir.join(SETTINGS_NAME));
        assert_eq!(settings["model"], "opus");
        assert_eq!(settings["statusLine"]["command"], "~/.claude/statusline.sh");
        assert_eq!(settings["statusLine"]["padding"], 0);
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let opts = options(&temp, InstallLocation::Project);
        install(SCRIPT, &opts).unwrap();

        let err = install("#!/usr/bin/env bash\n", &opts).unwrap_err();
        assert!(matches!(err, StatuslineError::InstallTargetExists { .. }));
        assert_eq!(
            fs::read_to_string(opts.target_dir().join(SCRIPT_NAME)).unwrap(),
            SCRIPT
        );

        let outcome = install("#!/usr/bin/env bash\n", &opts.clone().with_force(true)).unwrap();
        assert!(outcome.replaced);
        assert_eq!(
            fs::read_to_string(outcome.script_path).unwrap(),
            "#!/usr/bin/env bash\n"
        );
    }

    #[test]
    fn test_malformed_settings_is_left_alone() {
        let temp = TempDir::new().unwrap();
        let opts = options(&temp, InstallLocation::Project);
        let dir = opts.target_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SETTINGS_NAME), "{ not json").unwrap();

        let err = install(SCRIPT, &opts).unwrap_err();
        assert!(matches!(err, StatuslineError::JsonParse { .. }));
        assert_eq!(
            fs::read_to_string(dir.join(SETTINGS_NAME)).unwrap(),
            "{ not json"
        );
        assert!(!dir.join(SCRIPT_NAME).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_settings_write_removes_new_script() {
        let temp = TempDir::new().unwrap();
        let opts = options(&temp, InstallLocation::Project);
        let dir = opts.target_dir();
        fs::create_dir_all(&dir).unwrap();
        // Dangling link: reads as absent, but writing through it fails.
        std::os::unix::fs::symlink(temp.path().join("gone/settings.json"), dir.join(SETTINGS_NAME))
            .unwrap();

        let err = install(SCRIPT, &opts).unwrap_err();
        assert!(matches!(err, StatuslineError::Io { .. }));
        assert!(!dir.join(SCRIPT_NAME).exists());

        fs::remove_file(dir.join(SETTINGS_NAME)).unwrap();
        let outcome = install(SCRIPT, &opts).unwrap();
        assert!(!outcome.replaced);
    }

    #[test]
    fn test_non_object_settings_rejected() {
        let temp = TempDir::new().unwrap();
        let opts = options(&temp, InstallLocation::Project);
        let dir = opts.target_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SETTINGS_NAME), "[1, 2]").unwrap();

        assert!(matches!(
            install(SCRIPT, &opts),
            Err(StatuslineError::JsonParse { source: None, .. })
        ));
    }
}
