use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    #[error("Invalid query: {0}")]
    Query(#[from] tantivy::query::QueryParserError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] axum::Error),

    #[error("Client closed the connection before sending a request")]
    ClientClosed,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
