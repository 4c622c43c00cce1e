use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use shopwise_core::config::LlmConfig;
use shopwise_core::domain::conversation::ConversationTurn;

use crate::answer::{AnswerExtractor, ReasoningAnswerExtractor};
use crate::conversation::to_messages;
use crate::llm::{CompletionMessage, CompletionRequest, LlmClient, ProviderError, SamplingParams};
use crate::prompt::system_prompt;

/// Prompt assembly, the bounded provider call and answer cleanup.
pub struct LlmGateway {
    client: Arc<dyn LlmClient>,
    extractor: Arc<dyn AnswerExtractor>,
    model: String,
    sampling: SamplingParams,
    timeout: Duration,
}

impl LlmGateway {
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        sampling: SamplingParams,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            extractor: Arc::new(ReasoningAnswerExtractor),
            model: model.into(),
            sampling,
            timeout,
        }
    }

    pub fn from_config(client: Arc<dyn LlmClient>, config: &LlmConfig) -> Self {
        Self::new(
            client,
            config.model.clone(),
            SamplingParams::from(config),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn AnswerExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// System block, then prior turns, then the new message last.
    pub fn build_request(
        &self,
        user_message: &str,
        context_text: &str,
        history: &[ConversationTurn],
    ) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(CompletionMessage::system(system_prompt(context_text)));
        messages.extend(to_messages(history));
        messages.push(CompletionMessage::user(user_message));

        CompletionRequest { model: self.model.clone(), messages, sampling: self.sampling }
    }

    pub async fn complete(
        &self,
        user_message: &str,
        context_text: &str,
        history: &[ConversationTurn],
    ) -> Result<String, ProviderError> {
        let request = self.build_request(user_message, context_text, history);

        let raw = match tokio::time::timeout(self.timeout, self.client.complete(&request)).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    event_name = "llm.request.timeout",
                    timeout_ms = self.timeout.as_millis() as u64,
                    "completion call exceeded its deadline"
                );
                return Err(ProviderError::Timeout(self.timeout));
            }
        };

        Ok(self.extractor.extract(&raw))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use shopwise_core::domain::conversation::ConversationTurn;

    use super::LlmGateway;
    use crate::answer::VerbatimAnswerExtractor;
    use crate::llm::{CompletionRequest, LlmClient, MessageRole, ProviderError, SamplingParams};

    struct EchoClient {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl LlmClient for EchoClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
            self.seen.lock().expect("lock").push(request.clone());
            Ok(self.reply.clone())
        }
    }

    struct StalledClient;

    #[async_trait]
    impl LlmClient for StalledClient {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".to_string())
        }
    }

    fn echo(reply: &str) -> Arc<EchoClient> {
        Arc::new(EchoClient { reply: reply.to_string(), seen: Mutex::new(Vec::new()) })
    }

    #[test]
    fn request_orders_system_history_then_new_message() {
        let gateway = LlmGateway::new(echo(""), "test-model", SamplingParams::default(), Duration::from_secs(5));
        let history = vec![ConversationTurn::user("hi"), ConversationTurn::assistant("hello!")];

        let request = gateway.build_request("any laptops?", "CONTEXT", &history);
        let roles = request.messages.iter().map(|m| m.role).collect::<Vec<_>>();

        assert_eq!(
            roles,
            vec![MessageRole::System, MessageRole::User, MessageRole::Assistant, MessageRole::User]
        );
        assert!(request.messages[0].content.contains("CONTEXT"));
        assert_eq!(request.messages[3].content, "any laptops?");
        assert_eq!(request.model, "test-model");
        assert_eq!(request.sampling.max_completion_tokens, 4096);
    }

    #[tokio::test]
    async fn completion_is_cleaned_before_returning() {
        let client = echo("<think>hmm</think>Answer: The Dell XPS 13.");
        let gateway = LlmGateway::new(client.clone(), "m", SamplingParams::default(), Duration::from_secs(5));

        let answer = gateway.complete("laptop?", "ctx", &[]).await.expect("answer");
        assert_eq!(answer, "The Dell XPS 13.");
        assert_eq!(client.seen.lock().expect("lock").len(), 1);
    }

    #[tokio::test]
    async fn extractor_can_be_swapped() {
        let gateway = LlmGateway::new(echo(" Answer: raw "), "m", SamplingParams::default(), Duration::from_secs(5))
            .with_extractor(Arc::new(VerbatimAnswerExtractor));

        assert_eq!(gateway.complete("q", "ctx", &[]).await.expect("answer"), "Answer: raw");
    }

    #[tokio::test]
    async fn stalled_provider_times_out() {
        let timeout = Duration::from_millis(20);
        let gateway = LlmGateway::new(Arc::new(StalledClient), "m", SamplingParams::default(), timeout);

        let error = gateway.complete("q", "ctx", &[]).await.expect_err("timeout");
        assert_eq!(error, ProviderError::Timeout(timeout));
    }
}
