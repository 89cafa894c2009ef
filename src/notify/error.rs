//! Ping failure types.

/// Why a ping that was attempted did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PingError {
    /// The request did not complete within the timeout.
    #[error("Ping timed out")]
    Timeout,

    /// Connection, TLS or protocol failure.
    #[error("Ping transport error: {0}")]
    Transport(String),

    /// The API answered with something other than 200.
    #[error("Ping rejected with status {0}")]
    UnexpectedStatus(u16),

    /// The request URL could not be encoded.
    #[error("Failed to encode ping request: {0}")]
    Encode(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl PingError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport",
            Self::UnexpectedStatus(_) => "status",
            Self::Encode(_) => "encode",
            Self::Client(_) => "client",
        }
    }
}
