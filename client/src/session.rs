//! Drives a [`ResultsView`] from a single owned connection.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, info, warn};

use crate::connection::{Connection, ConnectionEvent, Generation};
use crate::error::Result;
use crate::results_view::{Loader, ResultsView};
use crate::view::View;

pub struct SearchSession<V: View> {
    url: String,
    results: ResultsView<V>,
    connection: Option<Connection>,
    generation: Generation,
    loader_timeout: Option<Duration>,
    loader_deadline: Option<Instant>,
    events_tx: mpsc::UnboundedSender<ConnectionEvent>,
    events_rx: mpsc::UnboundedReceiver<ConnectionEvent>,
}

impl<V: View> SearchSession<V> {
    pub fn new(url: impl Into<String>, view: V) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            url: url.into(),
            results: ResultsView::new(view),
            connection: None,
            generation: 0,
            loader_timeout: None,
            loader_deadline: None,
            events_tx,
            events_rx,
        }
    }

    pub fn with_loader_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.loader_timeout = timeout;
        self
    }

    /// Starts a new search cycle, closing the previous connection first.
    ///
    /// A connection failure is reported to the view and returned; there is
    /// no retry.
    pub async fn search(&mut self, query: &str, location: &str) -> Result<()> {
        if let Some(previous) = self.connection.take() {
            debug!(generation = previous.generation(), "Superseding previous search");
            previous.close();
        }

        self.generation += 1;
        let request = self.results.start_search(query, location);
        self.loader_deadline = self.loader_timeout.map(|t| Instant::now() + t);
        info!(query = %request.query, location = %request.location, "Starting search");

        match Connection::open(&self.url, &request, self.generation, self.events_tx.clone()).await {
            Ok(connection) => {
                self.connection = Some(connection);
                Ok(())
            }
            Err(e) => {
                error!("{}", e);
                self.results.report_error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Waits for the next connection event.
    ///
    /// Cancel safe. Applies the loader timeout while the loader is visible.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent> {
        loop {
            let deadline = match self.loader_deadline {
                Some(deadline) if self.results.loader() == Loader::Visible => deadline,
                _ => return self.events_rx.recv().await,
            };

            match timeout_at(deadline, self.events_rx.recv()).await {
                Ok(event) => return event,
                Err(_) => {
                    self.loader_deadline = None;
                    warn!("No offers received before the loader timeout");
                    self.results.report_error("No results received yet");
                }
            }
        }
    }

    /// Applies one event to the view. Returns true when it ended the
    /// current search.
    pub fn handle_event(&mut self, event: ConnectionEvent) -> bool {
        if event.generation() != self.generation {
            debug!(generation = event.generation(), "Dropping event from superseded connection");
            return false;
        }

        match event {
            ConnectionEvent::Message { text, .. } => {
                if let Err(e) = self.results.on_offer_received(&text) {
                    warn!("Skipping message: {}", e);
                }
                false
            }
            ConnectionEvent::Closed { .. } => {
                info!(offers = self.results.results().len(), "Search complete");
                self.connection = None;
                true
            }
            ConnectionEvent::Failed { error, .. } => {
                error!("Connection failed: {}", error);
                self.results.report_error(&error);
                self.connection = None;
                true
            }
        }
    }

    /// Processes events until the current connection closes or fails.
    pub async fn run_until_closed(&mut self) {
        while self.connection.is_some() {
            let Some(event) = self.next_event().await else {
                break;
            };
            self.handle_event(event);
        }
    }

    pub fn is_active(&self) -> bool {
        self.connection.is_some()
    }

    pub fn results(&self) -> &ResultsView<V> {
        &self.results
    }

    pub fn into_view(self) -> V {
        self.results.into_view()
    }
}
