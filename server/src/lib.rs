//! Job Search Engine Server
//!
//! Provides full-text search over scraped job listings using Tantivy and
//! streams matching offers over a WebSocket using Axum.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::{Router, routing::get};
use common::Job;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

pub mod config;
pub mod error;
pub mod index;
pub mod routes;
pub mod search;

use crate::config::Settings;
use crate::error::Result;
use crate::index::JobIndex;
use crate::routes::{AppState, root_handler, search_handler};

/// Loads jobs from a JSON array file. A missing file yields no jobs.
pub fn load_jobs(path: &Path) -> Result<Vec<Job>> {
    if !path.exists() {
        warn!("No jobs file at {:?}, serving an empty index", path);
        return Ok(vec![]);
    }

    info!("Loading jobs from {:?}", path);
    let content = fs::read_to_string(path)?;
    let jobs: Vec<Job> = serde_json::from_str(&content)?;
    info!("Loaded {} jobs", jobs.len());

    Ok(jobs)
}

/// Build router
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/search", get(search_handler))
        .with_state(state)
}

/// Indexes the configured jobs file and serves until Ctrl+C / SIGTERM.
pub async fn start_server(settings: Settings) -> Result<()> {
    let jobs = load_jobs(&settings.index.jobs_path)?;

    let index = match &settings.index.path {
        Some(path) => JobIndex::create_in_dir(path, &jobs)?,
        None => JobIndex::create_in_ram(&jobs)?,
    };

    let state = Arc::new(AppState {
        index,
        settings: settings.index.clone(),
    });

    let address = settings.address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server running at ws://{}/search", address);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
