//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `ns_checker` library that handles:
//! - Environment variable loading (.env file)
//! - Command-line argument parsing
//! - Logger initialization
//! - Exit codes
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use ns_checker::initialization::init_logger_with;
use ns_checker::{run_check, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional .env next to the working directory (e.g. RUST_LOG)
    let _ = dotenvy::dotenv();

    let config = Config::from(Opt::parse());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let fail_on = config.fail_on;
    match run_check(config).await {
        Ok(report) => {
            let code = report.exit_code(fail_on);
            if code != 0 {
                process::exit(code);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("ns_checker error: {:#}", e);
            process::exit(1);
        }
    }
}
