//! # TRIO Stress
//!
//! Runs one stress workload and exits non-zero if verification fails.
//!
//! ```bash
//! # Defaults: lock-free backend, counter workload
//! trio_stress
//!
//! # From a config file
//! trio_stress stress.toml
//!
//! # More logging
//! RUST_LOG=trio_stress=debug,trio_core=trace trio_stress
//! ```

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use trio_stress::{run, StressConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trio_stress=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match StressConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(%path, error = %err, "cannot load config");
                return ExitCode::FAILURE;
            }
        },
        None => StressConfig::default(),
    };

    match run(&config) {
        Ok(report) => {
            println!("Success. {report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("Failure. {err}");
            ExitCode::FAILURE
        }
    }
}
