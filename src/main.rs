//! psidb - command-line client for the psidb provenance database
//!
//! This is the binary entry point. All logic lives in the library.

use clap::Parser;
use psidb_client::cli::Args;
use psidb_core::logging;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: file logging unavailable: {}", e);
    }

    let succeeded = match psidb_client::run(args).await {
        Ok(succeeded) => succeeded,
        Err(e) => {
            if let Ok(log_file) = logging::get_current_log_file() {
                eprintln!("See {} for details", log_file.display());
            }
            return Err(e.into());
        }
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
