//! Command-line arguments
//!
//! Ids and metadata are taken as raw text: validation decides what is
//! acceptable, the same way it does for typed-in form fields.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use psidb_core::{Action, KeyValuePair};

/// psidb - register data, transforms and their provenance
#[derive(Parser, Debug)]
#[command(name = "psidb")]
#[command(about = "Command-line client for the psidb provenance database", long_about = None)]
pub struct Args {
    /// Config file (default: <config dir>/psidb-client/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Emit NDJSON events instead of prompting
    #[arg(long, global = true)]
    pub headless: bool,

    /// Answer every confirmation with yes
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show what can be done with the current database
    Home,

    /// Initialize a database (default: configured directory, else $HOME/.psidb)
    Init {
        #[arg(value_name = "DIR")]
        dir: Option<String>,
    },

    /// Load an existing database
    Load {
        #[arg(value_name = "DIR")]
        dir: Option<String>,
    },

    /// Print the directory of the current database
    Where,

    /// Register data files
    AddData {
        #[arg(value_name = "PATH")]
        paths: Vec<String>,

        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// Register transform scripts
    AddTransform {
        #[arg(value_name = "PATH")]
        paths: Vec<String>,

        /// Script argument, positionally matched to PATH (repeatable)
        #[arg(long = "arg", value_name = "TEXT", allow_hyphen_values = true)]
        args: Vec<String>,

        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// Chain transforms into a new transform
    Chain {
        #[arg(long = "transform-id", value_name = "ID")]
        transform_ids: Vec<String>,

        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// Apply a transform to data
    Apply {
        #[arg(long = "transform-id", value_name = "ID")]
        transform_ids: Vec<String>,

        #[arg(long = "data-id", value_name = "ID")]
        data_ids: Vec<String>,

        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// Link datasets into a new dataset
    Link {
        #[arg(long = "data-id", value_name = "ID")]
        data_ids: Vec<String>,

        #[command(flatten)]
        metadata: MetadataArgs,
    },

    /// Create a connection between entries
    Connect {
        #[arg(long)]
        action: Action,

        #[arg(long = "in-data-id", value_name = "ID")]
        in_data_ids: Vec<String>,

        #[arg(long = "out-data-id", value_name = "ID")]
        out_data_ids: Vec<String>,

        #[arg(long = "in-transform-id", value_name = "ID")]
        in_transform_ids: Vec<String>,

        #[arg(long = "out-transform-id", value_name = "ID")]
        out_transform_ids: Vec<String>,

        #[command(flatten)]
        metadata: MetadataArgs,
    },
}

impl Command {
    /// Subcommand name as typed
    pub fn name(&self) -> &'static str {
        match self {
            Command::Home => "home",
            Command::Init { .. } => "init",
            Command::Load { .. } => "load",
            Command::Where => "where",
            Command::AddData { .. } => "add-data",
            Command::AddTransform { .. } => "add-transform",
            Command::Chain { .. } => "chain",
            Command::Apply { .. } => "apply",
            Command::Link { .. } => "link",
            Command::Connect { .. } => "connect",
        }
    }
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataArgs {
    /// Metadata pair (repeatable)
    #[arg(long = "md", value_name = "KEY=VALUE")]
    pub pairs: Vec<String>,
}

impl MetadataArgs {
    /// Split each `KEY=VALUE` at the first `=`; text without `=` is a key
    /// with an empty value
    pub fn to_pairs(&self) -> Vec<KeyValuePair> {
        self.pairs
            .iter()
            .map(|raw| match raw.split_once('=') {
                Some((key, value)) => KeyValuePair::new(key, value),
                None => KeyValuePair::new(raw.as_str(), ""),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_data() {
        let args = Args::parse_from([
            "psidb",
            "add-data",
            "/data/x.csv",
            "/data/y.csv",
            "--md",
            "source=lab",
        ]);

        assert!(!args.headless);
        match args.command {
            Command::AddData { paths, metadata } => {
                assert_eq!(paths, vec!["/data/x.csv", "/data/y.csv"]);
                assert_eq!(metadata.to_pairs(), vec![KeyValuePair::new("source", "lab")]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args = Args::parse_from(["psidb", "link", "--data-id", "1", "--headless", "-y"]);
        assert!(args.headless);
        assert!(args.yes);
        assert_eq!(args.command.name(), "link");
    }

    #[test]
    fn test_ids_kept_as_raw_text() {
        let args = Args::parse_from(["psidb", "chain", "--transform-id", "abc", "--transform-id", ""]);
        match args.command {
            Command::Chain { transform_ids, .. } => assert_eq!(transform_ids, vec!["abc", ""]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_connect_action() {
        let args = Args::parse_from(["psidb", "connect", "--action", "Chain", "--in-transform-id", "4"]);
        match args.command {
            Command::Connect {
                action,
                in_transform_ids,
                ..
            } => {
                assert_eq!(action, Action::Chain);
                assert_eq!(in_transform_ids, vec!["4"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Args::try_parse_from(["psidb", "connect", "--action", "merge"]).is_err());
    }

    #[test]
    fn test_metadata_pairs_split_on_first_equals() {
        let md = MetadataArgs {
            pairs: vec![
                "a=1".to_string(),
                "expr=x=y".to_string(),
                "flag".to_string(),
                "=v".to_string(),
            ],
        };
        assert_eq!(
            md.to_pairs(),
            vec![
                KeyValuePair::new("a", "1"),
                KeyValuePair::new("expr", "x=y"),
                KeyValuePair::new("flag", ""),
                KeyValuePair::new("", "v"),
            ]
        );
    }
}
