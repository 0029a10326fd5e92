pub mod application;
pub mod connector;
pub mod domain;

pub use application::{ChatTurnUseCase, CompletionClient, TurnOutcome};

pub use connector::{OpenAiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

pub use domain::{
    ChatMessage, CompletionRequest, CompletionResponse, DomainError, Role, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
