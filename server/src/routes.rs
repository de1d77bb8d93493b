use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use common::SearchRequest;
use tracing::{debug, info, warn};

use crate::config::IndexSettings;
use crate::error::{Result, ServerError};
use crate::index::JobIndex;
use crate::search::find_offers;

/// Shared application state
pub struct AppState {
    pub index: JobIndex,
    pub settings: IndexSettings,
}

/// Handler for GET / (root)
pub async fn root_handler() -> &'static str {
    "Job Search Engine API\n\nEndpoints:\n  GET /search (WebSocket) - send {\"query\": ..., \"location\": ...}, receive one offer per message"
}

/// Handler for GET /search, upgraded to a WebSocket
pub async fn search_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_search(socket, state))
}

/// One request in, zero or more offers out, then close.
async fn handle_search(mut socket: WebSocket, state: Arc<AppState>) {
    match read_request(&mut socket).await {
        Ok(request) => {
            info!(query = %request.query, location = %request.location, "Search request");
            if let Err(e) = stream_offers(&mut socket, &state, &request).await {
                warn!("Search failed: {}", e);
            }
        }
        Err(e) => warn!("Rejected search request: {}", e),
    }

    if let Err(e) = socket.send(Message::Close(None)).await {
        debug!("Close frame not sent: {}", e);
    }
}

async fn read_request(socket: &mut WebSocket) -> Result<SearchRequest> {
    loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(text.as_str())?),
            Some(Ok(Message::Close(_))) | None => return Err(ServerError::ClientClosed),
            // Pings are answered by axum
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

async fn stream_offers(
    socket: &mut WebSocket,
    state: &AppState,
    request: &SearchRequest,
) -> Result<()> {
    let offers = find_offers(&state.index, request, &state.settings)?;
    let count = offers.len();

    for offer in offers {
        let payload = serde_json::to_string(&offer)?;
        socket.send(Message::Text(payload.into())).await?;
    }

    info!(offers = count, "Search streamed");
    Ok(())
}
