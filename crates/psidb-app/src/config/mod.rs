//! Configuration file parsing for the psidb client
//!
//! Supports `<config_dir>/psidb-client/config.toml`, or an explicit path.

pub mod settings;
pub mod types;

pub use settings::{
    default_config_dir, init_config_dir, load_settings, parse_settings, CONFIG_FILENAME,
};
pub use types::*;
