//! Job Search Client
//!
//! Sends a query to the search server and prints the offers it streams
//! back, highest salary first.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use client::config::Settings;
use client::{Result, SearchSession, TerminalView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "client", about = "Search job offers over WebSocket")]
struct Cli {
    /// Keywords to search for
    #[arg(required_unless_present = "interactive")]
    query: Option<String>,

    /// Location filter, "London" when left blank
    #[arg(short, long, default_value = "")]
    location: String,

    /// Search endpoint, overrides the configured one
    #[arg(long, env = "JOBSEARCH_URL")]
    url: Option<String>,

    /// Read `query[@location]` lines from stdin; each line starts a new search
    #[arg(short, long)]
    interactive: bool,

    /// Disable colours and screen clearing
    #[arg(long)]
    no_ansi: bool,

    /// Configuration file to load instead of config/client.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&settings.logging.level);

    match run(cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli, settings: Settings) -> Result<()> {
    let url = cli.url.clone().unwrap_or_else(|| settings.url.clone());
    let view = TerminalView::new(io::stdout(), settings.ansi && !cli.no_ansi);
    let mut session = SearchSession::new(url, view).with_loader_timeout(settings.loader_timeout());

    if cli.interactive {
        return interactive(&mut session).await;
    }

    let query = cli.query.unwrap_or_default();
    session.search(&query, &cli.location).await?;
    session.run_until_closed().await;

    Ok(())
}

async fn interactive(session: &mut SearchSession<TerminalView<io::Stdout>>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let Some((query, location)) = parse_input(&line) else {
                    continue;
                };
                if let Err(e) = session.search(query, location).await {
                    // Already shown by the view
                    warn!("{}", e);
                }
            }
            Some(event) = session.next_event() => {
                session.handle_event(event);
            }
        }
    }

    Ok(())
}

/// Splits `query@location`. Blank lines yield `None`.
fn parse_input(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    match line.split_once('@') {
        Some((query, location)) => Some((query.trim(), location.trim())),
        None => Some((line, "")),
    }
}
