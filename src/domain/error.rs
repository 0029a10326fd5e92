use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API returned {status}: {body}")]
    RemoteRejected { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DomainError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn remote_rejected(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteRejected {
            status,
            body: body.into(),
        }
    }

    pub fn malformed_response(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_remote_rejected(&self) -> bool {
        matches!(self, Self::RemoteRejected { .. })
    }

    pub fn is_malformed_response(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }

    /// Whether the loop may keep running after reporting this error.
    ///
    /// Only configuration failures are fatal; every per-turn error leaves the
    /// loop ready to accept the next input.
    pub fn is_recoverable(&self) -> bool {
        !self.is_configuration()
    }
}
