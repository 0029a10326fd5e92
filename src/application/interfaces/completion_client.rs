use async_trait::async_trait;

use crate::domain::{CompletionRequest, DomainError};

/// An interface for sending one chat-completion request to an LLM endpoint
/// and receiving the assistant's reply text.
///
/// Implementors encapsulate transport, serialization, and vendor-specific
/// API details.  Consumers (e.g. [`crate::application::ChatTurnUseCase`])
/// remain decoupled from any particular provider or HTTP client library.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the request and return the reply content of the first choice,
    /// trimmed of leading and trailing whitespace.
    ///
    /// Exactly one outbound call per invocation; no retry, no caching.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError>;
}
