//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Request could not be sent or the response body could not be read.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server answered with a status outside `[200, 400)`.
    ///
    /// The body is kept so callers can still look at what the server said.
    #[error("Failed to request: {status_line}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Status line, e.g. `409 Conflict`.
        status_line: String,
        /// Raw response body.
        body: String,
    },

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Gzip payload could not be decompressed.
    #[error("Decompression error: {0}")]
    Decompress(#[source] std::io::Error),

    /// The server answered, but the expected resource was not in the result.
    #[error("{0}")]
    NotFound(String),

    /// Caller input was rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// A task was found but did not finish successfully.
    #[error("task `{task}` state is {state}")]
    TaskState {
        /// Full task name.
        task: String,
        /// Reported state (`error`, `group_error`, `running`, ...).
        state: String,
    },
}

impl Error {
    /// HTTP status of a server error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if a lookup by name or ID matched nothing.
    ///
    /// A server answering 404 is an [`Error::Server`]; check
    /// [`status`](Self::status) for that.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if the server reported a conflict (409).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Server { status: 409, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Server { status, .. } if *status >= 500)
    }

    /// Check if the client was misconfigured.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::InvalidUrl(_) | Error::Config(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
