//! Job Search Engine Server
//!
//! Indexes `data/jobs.json` and answers searches on ws://127.0.0.1:8080/search

use std::process::ExitCode;

use server::config::Settings;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    fmt().with_env_filter(filter).init();

    info!("Starting Job Search Engine Server...");

    match server::start_server(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
