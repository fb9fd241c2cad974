//! Error types for the Gremlin client

use thiserror::Error;

/// Errors that can occur when talking to a Gremlin server
#[derive(Error, Debug)]
pub enum GremlinError {
    /// Connection could not be established or was lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server rejected or failed the request
    #[error("Server error {code}: {message}")]
    Server { code: u16, message: String },

    /// Response did not follow the Gremlin Server protocol
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GremlinResult<T> = Result<T, GremlinError>;
