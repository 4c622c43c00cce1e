//! Conversational product assistant.
//!
//! A chat turn flows through four stages:
//! 1. **Context** (`context`) - catalog search produces a digest for the model
//!    and a separate list of products for the shopper
//! 2. **Window** (`conversation`) - only the most recent turns are replayed
//! 3. **Gateway** (`gateway`, `llm`, `prompt`) - a bounded call to an
//!    OpenAI-compatible completion endpoint
//! 4. **Cleanup** (`answer`) - reasoning blocks and answer labels are removed
//!
//! `ShoppingAssistant` ties the stages together and turns any failure along the
//! way into an unsuccessful `ChatResult`, so provider errors never reach the
//! shopper.

pub mod answer;
pub mod assistant;
pub mod context;
pub mod conversation;
pub mod gateway;
pub mod llm;
pub mod prompt;

pub use answer::{AnswerExtractor, ReasoningAnswerExtractor, VerbatimAnswerExtractor};
pub use assistant::{AssistantSettings, ShoppingAssistant};
pub use context::{ContextBuilder, ProductContext};
pub use gateway::LlmGateway;
pub use llm::{
    CompletionMessage, CompletionRequest, LlmClient, MessageRole, OpenAiCompatibleClient,
    ProviderError, SamplingParams,
};
