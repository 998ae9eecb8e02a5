//! Configuration types for the psidb client
//!
//! Defines:
//! - `Settings` - everything read from `config.toml`
//! - `BackendSettings`, `DatabaseSettings`, `BehaviorSettings` - its sections

use serde::{Deserialize, Serialize};

/// Global client settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub behavior: BehaviorSettings,
}

/// How to start the backend bridge process
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackendSettings {
    /// Executable name or path, resolved through `PATH`
    #[serde(default = "default_backend_command")]
    pub command: String,

    /// Extra arguments passed to the executable
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            command: default_backend_command(),
            args: Vec::new(),
        }
    }
}

fn default_backend_command() -> String {
    "psidb-backend".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseSettings {
    /// Directory used by `init`/`load` when none is given
    #[serde(default)]
    pub default_dir: Option<String>,
}

impl DatabaseSettings {
    /// Directory for `init`/`load`: the one given on the command line,
    /// else the configured one, else `None` for the backend's default
    pub fn resolve_dir(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.default_dir.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BehaviorSettings {
    /// Answer to every confirmation when nobody can be asked
    #[serde(default)]
    pub assume_yes: bool,
}
