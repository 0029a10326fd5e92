use std::sync::Arc;

use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{
    ChatMessage, CompletionRequest, DomainError, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};

/// Literal console input that ends the loop, matched case-insensitively.
const EXIT_SENTINEL: &str = "exit";

/// Result of handing one console line to the use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant's reply, ready for display.
    Reply(String),
    /// The input was the exit sentinel; no request was made.
    Exit,
}

/// Runs one turn of the interactive loop: decides whether the input is the
/// exit sentinel, otherwise builds a single-message request and sends it
/// through the configured [`CompletionClient`].
///
/// Holds no per-turn state; each request/response pair lives and dies within
/// one `execute` call.
pub struct ChatTurnUseCase {
    client: Arc<dyn CompletionClient>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatTurnUseCase {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build the request for one user input.
    ///
    /// The input is carried verbatim — an empty or whitespace-only line is
    /// still a valid (if useless) message, not an error.
    pub fn build_request(&self, input: &str) -> CompletionRequest {
        CompletionRequest::new(&self.model, ChatMessage::user(input))
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }

    pub async fn execute(&self, input: &str) -> Result<TurnOutcome, DomainError> {
        if input.eq_ignore_ascii_case(EXIT_SENTINEL) {
            debug!("Exit sentinel received");
            return Ok(TurnOutcome::Exit);
        }

        let request = self.build_request(input);
        let reply = self.client.complete(&request).await?;
        Ok(TurnOutcome::Reply(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    struct CountingClient {
        calls: AtomicUsize,
        reply: String,
    }

    impl CountingClient {
        fn new(reply: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for CountingClient {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn exit_sentinel_is_case_insensitive_and_makes_no_call() {
        let client = Arc::new(CountingClient::new("unused"));
        let use_case = ChatTurnUseCase::new(client.clone());

        for input in ["exit", "Exit", "EXIT", "eXiT"] {
            let outcome = use_case.execute(input).await.unwrap();
            assert_eq!(outcome, TurnOutcome::Exit);
        }
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn padded_exit_is_sent_as_a_turn() {
        let client = Arc::new(CountingClient::new("ok"));
        let use_case = ChatTurnUseCase::new(client.clone());

        let outcome = use_case.execute("  exit  ").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Reply("ok".to_string()));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_input_is_sent_as_a_turn() {
        let client = Arc::new(CountingClient::new("ok"));
        let use_case = ChatTurnUseCase::new(client.clone());

        let outcome = use_case.execute("").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Reply("ok".to_string()));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn request_carries_input_verbatim_with_configured_parameters() {
        let use_case = ChatTurnUseCase::new(Arc::new(CountingClient::new("unused")))
            .with_model("gpt-4o")
            .with_max_tokens(512)
            .with_temperature(1.2);

        let request = use_case.build_request("what \"is\" this?\n");
        assert_eq!(request.model(), "gpt-4o");
        assert_eq!(request.max_tokens(), 512);
        assert!((request.temperature() - 1.2).abs() < f32::EPSILON);
        assert_eq!(request.messages().len(), 1);
        assert_eq!(request.messages()[0].content(), "what \"is\" this?\n");
    }
}
