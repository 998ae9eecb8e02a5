//! Settings parser for psidb-client/config.toml

use std::path::{Path, PathBuf};

use psidb_core::prelude::*;

use super::types::Settings;

pub const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "psidb-client";

/// Per-user configuration directory, `None` when the platform has none
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Load settings from `path`
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Parse the contents of a config file
pub fn parse_settings(content: &str) -> Result<Settings> {
    Ok(toml::from_str(content)?)
}

/// Create `dir` and a commented default config file inside it
///
/// An existing config file is left alone. Returns the config file path.
pub fn init_config_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, generate_default_config())
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Wrote default config to {:?}", config_path);
    }

    Ok(config_path)
}

fn generate_default_config() -> String {
    r#"# psidb client configuration

[backend]
# Bridge executable, looked up in PATH
command = "psidb-backend"
args = []

[database]
# Directory used by `psidb init` / `psidb load` when none is given.
# Leave unset to use the backend default ($HOME/.psidb)
# default_dir = "/path/to/db"

[behavior]
assume_yes = false      # Headless mode: answer every confirmation with yes
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_missing_file() {
        let temp = tempdir().unwrap();
        let settings = load_settings(&temp.path().join(CONFIG_FILENAME));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_custom() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);

        let config = r#"
[backend]
command = "/opt/psidb/bridge"
args = ["--db-log", "off"]

[database]
default_dir = "/srv/psidb"

[behavior]
assume_yes = true
"#;
        std::fs::write(&path, config).unwrap();

        let settings = load_settings(&path);

        assert_eq!(settings.backend.command, "/opt/psidb/bridge");
        assert_eq!(settings.backend.args, vec!["--db-log", "off"]);
        assert_eq!(settings.database.default_dir.as_deref(), Some("/srv/psidb"));
        assert!(settings.behavior.assume_yes);
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "not valid toml {{{{").unwrap();

        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn test_parse_settings_error() {
        assert!(matches!(parse_settings("[backend"), Err(Error::Toml(_))));
    }

    #[test]
    fn test_init_config_dir() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("psidb-client");

        let path = init_config_dir(&dir).unwrap();

        assert_eq!(path, dir.join(CONFIG_FILENAME));
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Settings = toml::from_str(&content).expect("default config should be valid TOML");
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_init_config_dir_idempotent() {
        let temp = tempdir().unwrap();

        let path = init_config_dir(temp.path()).unwrap();
        std::fs::write(&path, "[behavior]\nassume_yes = true\n").unwrap();

        init_config_dir(temp.path()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("assume_yes = true"));
    }
}
