use std::sync::Arc;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{info, warn};

use shopwise_core::catalog::{CatalogStore, SearchQuery};
use shopwise_core::config::{AppConfig, ChatConfig};
use shopwise_core::domain::chat::ChatResult;
use shopwise_core::domain::conversation::ConversationTurn;
use shopwise_core::domain::product::{Category, Product, ProductId};
use shopwise_core::errors::{ApplicationError, DomainError};

use crate::context::ContextBuilder;
use crate::conversation::window;
use crate::gateway::LlmGateway;
use crate::llm::LlmClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssistantSettings {
    pub history_window: usize,
    pub context_product_limit: i64,
    pub display_product_limit: i64,
    pub recommendation_limit: i64,
    pub search_default_limit: i64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            history_window: 10,
            context_product_limit: 5,
            display_product_limit: 6,
            recommendation_limit: 8,
            search_default_limit: 20,
        }
    }
}

impl From<&ChatConfig> for AssistantSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            history_window: config.history_window,
            context_product_limit: config.context_product_limit,
            display_product_limit: config.display_product_limit,
            recommendation_limit: config.recommendation_limit,
            search_default_limit: config.search_default_limit,
        }
    }
}

/// Caller-facing product assistant: the chat pipeline plus direct catalog
/// reads.
pub struct ShoppingAssistant {
    store: Arc<dyn CatalogStore>,
    context: ContextBuilder,
    gateway: LlmGateway,
    settings: AssistantSettings,
}

impl ShoppingAssistant {
    pub fn new(store: Arc<dyn CatalogStore>, gateway: LlmGateway, settings: AssistantSettings) -> Self {
        let context = ContextBuilder::new(
            store.clone(),
            settings.context_product_limit,
            settings.display_product_limit,
        );
        Self { store, context, gateway, settings }
    }

    pub fn from_config(
        store: Arc<dyn CatalogStore>,
        client: Arc<dyn LlmClient>,
        config: &AppConfig,
    ) -> Self {
        let gateway = LlmGateway::from_config(client, &config.llm);
        Self::new(store, gateway, AssistantSettings::from(&config.chat))
    }

    pub fn settings(&self) -> AssistantSettings {
        self.settings
    }

    /// Runs one chat turn. Only a blank message is an error; store and provider
    /// failures come back as an unsuccessful `ChatResult`.
    pub async fn process_message(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<ChatResult, DomainError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(DomainError::Validation("message is required".to_string()));
        }

        let started = Instant::now();
        let result = self.answer(message, history).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        Ok(match result {
            Ok((answer, products)) => {
                info!(
                    event_name = "chat.message.answered",
                    product_count = products.len(),
                    history_turns = history.len(),
                    elapsed_ms,
                    "assistant answered chat message"
                );
                ChatResult::answered(answer, products)
            }
            Err(error) => {
                warn!(
                    event_name = "chat.message.failed",
                    error = %error,
                    elapsed_ms,
                    "assistant could not answer chat message"
                );
                ChatResult::failed(error.to_string())
            }
        })
    }

    async fn answer(
        &self,
        message: &str,
        history: &[ConversationTurn],
    ) -> Result<(String, Vec<Product>), ApplicationError> {
        let context = self.context.build_context(message).await?;
        let recent = window(history, self.settings.history_window);
        let answer = self.gateway.complete(message, &context.digest, recent).await?;
        Ok((answer, context.products))
    }

    pub async fn search_products(
        &self,
        text: &str,
        category: Option<Category>,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
        limit: Option<i64>,
    ) -> Result<Vec<Product>, ApplicationError> {
        let query = SearchQuery::new(text)
            .with_category(category)
            .with_price_range(min_price, max_price)
            .with_limit(limit.unwrap_or(self.settings.search_default_limit));
        self.store.search(&query).await
    }

    pub async fn get_product_by_id(&self, id: ProductId) -> Result<Product, ApplicationError> {
        self.store.get_by_id(id).await?.ok_or(DomainError::ProductNotFound(id).into())
    }

    pub async fn list_categories(&self) -> Result<Vec<String>, ApplicationError> {
        self.store.list_categories().await
    }

    /// Best-rated products, optionally within one department.
    pub async fn get_recommendations(
        &self,
        category: Option<Category>,
        limit: Option<i64>,
    ) -> Result<Vec<Product>, ApplicationError> {
        let query = SearchQuery::new("")
            .with_category(category)
            .with_limit(limit.unwrap_or(self.settings.recommendation_limit));
        self.store.search(&query).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use shopwise_core::catalog::{Catalog, CatalogStore, SearchQuery};
    use shopwise_core::domain::conversation::ConversationTurn;
    use shopwise_core::domain::product::{Category, Product, ProductId, Specifications};
    use shopwise_core::errors::{ApplicationError, DomainError};

    use super::{AssistantSettings, ShoppingAssistant};
    use crate::gateway::LlmGateway;
    use crate::llm::{CompletionRequest, LlmClient, MessageRole, ProviderError, SamplingParams};

    #[derive(Default)]
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedClient {
        fn replying(reply: Result<String, ProviderError>) -> Arc<Self> {
            let client = Self::default();
            client.replies.lock().expect("lock").push_back(reply);
            Arc::new(client)
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
            self.requests.lock().expect("lock").push(request.clone());
            self.replies
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::MalformedResponse("script exhausted".into())))
        }
    }

    struct FailingStore;

    #[async_trait]
    impl CatalogStore for FailingStore {
        async fn search(&self, _query: &SearchQuery) -> Result<Vec<Product>, ApplicationError> {
            Err(ApplicationError::Store("database is locked".to_string()))
        }

        async fn get_by_id(&self, _id: ProductId) -> Result<Option<Product>, ApplicationError> {
            Err(ApplicationError::Store("database is locked".to_string()))
        }

        async fn list_categories(&self) -> Result<Vec<String>, ApplicationError> {
            Err(ApplicationError::Store("database is locked".to_string()))
        }
    }

    fn product(id: i64, name: &str, brand: &str, category: Category, rating: i64) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            category,
            price: Decimal::new(9_999, 2),
            description: format!("{name} by {brand}"),
            stock_quantity: 12,
            brand: brand.to_string(),
            rating: Decimal::new(rating, 1),
            image_url: String::new(),
            specifications: Specifications::new(),
        }
    }

    fn catalog() -> Arc<Catalog> {
        let mut products = vec![
            product(1, "Sony WH-1000XM5", "Sony", Category::Electronics, 46),
            product(2, "Atomic Habits", "Avery", Category::Books, 48),
            product(3, "The Psychology of Money", "Harriman House", Category::Books, 47),
        ];
        products.extend((4..=12).map(|id| {
            product(id, &format!("Trail Runner {id}"), "Puma", Category::SportsAndOutdoors, 40 + id % 8)
        }));
        Arc::new(Catalog::new(products))
    }

    fn assistant(store: Arc<dyn CatalogStore>, client: Arc<ScriptedClient>) -> ShoppingAssistant {
        let gateway =
            LlmGateway::new(client, "test-model", SamplingParams::default(), Duration::from_secs(5));
        ShoppingAssistant::new(store, gateway, AssistantSettings::default())
    }

    #[tokio::test]
    async fn answer_is_paired_with_display_products() {
        let client = ScriptedClient::replying(Ok(
            "<think>they want audio</think>Answer: The Sony WH-1000XM5 is a great pick.".to_string(),
        ));
        let assistant = assistant(catalog(), client.clone());

        let result = assistant.process_message("sony", &[]).await.expect("result");

        assert!(result.success);
        assert_eq!(result.answer.as_deref(), Some("The Sony WH-1000XM5 is a great pick."));
        assert_eq!(result.products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ProductId(1)]);

        let requests = client.requests.lock().expect("lock");
        assert!(requests[0].messages[0].content.contains("- Sony WH-1000XM5 by Sony: $99.99"));
    }

    #[tokio::test]
    async fn provider_failure_becomes_unsuccessful_result() {
        let client = ScriptedClient::replying(Err(ProviderError::RateLimited("slow down".into())));
        let assistant = assistant(catalog(), client);

        let result = assistant.process_message("books", &[]).await.expect("never raises");

        assert!(!result.success);
        assert!(result.products.is_empty());
        assert!(result.answer.is_none());
        assert!(result.error.as_deref().is_some_and(|error| error.contains("slow down")));
    }

    #[tokio::test]
    async fn store_failure_becomes_unsuccessful_result() {
        let client = ScriptedClient::replying(Ok("unused".to_string()));
        let assistant = assistant(Arc::new(FailingStore), client.clone());

        let result = assistant.process_message("anything", &[]).await.expect("never raises");

        assert!(!result.success);
        assert!(client.requests.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn only_the_last_ten_turns_reach_the_provider() {
        let client = ScriptedClient::replying(Ok("ok".to_string()));
        let assistant = assistant(catalog(), client.clone());
        let history = (0..12)
            .map(|index| {
                if index % 2 == 0 {
                    ConversationTurn::user(format!("question {index}"))
                } else {
                    ConversationTurn::assistant(format!("reply {index}"))
                }
            })
            .collect::<Vec<_>>();

        assistant.process_message("and now?", &history).await.expect("result");

        let requests = client.requests.lock().expect("lock");
        let messages = &requests[0].messages;
        // system + 10 windowed turns + new message
        assert_eq!(messages.len(), 12);
        assert_eq!(messages[1].content, "question 2");
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[10].content, "reply 11");
        assert_eq!(messages[11].content, "and now?");
    }

    #[tokio::test]
    async fn blank_message_is_a_validation_error() {
        let assistant = assistant(catalog(), ScriptedClient::replying(Ok("x".into())));
        let error = assistant.process_message("   ", &[]).await.expect_err("blank");
        assert!(matches!(error, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_product_id_is_not_found() {
        let assistant = assistant(catalog(), Arc::new(ScriptedClient::default()));

        let found = assistant.get_product_by_id(ProductId(2)).await.expect("found");
        assert_eq!(found.name, "Atomic Habits");

        let error = assistant.get_product_by_id(ProductId(999)).await.expect_err("missing");
        assert_eq!(error, ApplicationError::Domain(DomainError::ProductNotFound(ProductId(999))));
    }

    #[tokio::test]
    async fn recommendations_use_blank_query_with_category_filter() {
        let assistant = assistant(catalog(), Arc::new(ScriptedClient::default()));

        let books = assistant.get_recommendations(Some(Category::Books), None).await.expect("books");
        assert_eq!(
            books.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["Atomic Habits", "The Psychology of Money"]
        );

        let top = assistant.get_recommendations(None, None).await.expect("top");
        assert_eq!(top.len(), 8);
        assert_eq!(top[0].name, "Atomic Habits");
    }

    #[tokio::test]
    async fn search_applies_default_limit_and_filters() {
        let assistant = assistant(catalog(), Arc::new(ScriptedClient::default()));

        let all = assistant.search_products("", None, None, None, None).await.expect("all");
        assert_eq!(all.len(), 12);

        let error = assistant
            .search_products("", None, Some(Decimal::new(-1, 0)), None, None)
            .await
            .expect_err("negative bound");
        assert!(matches!(error, ApplicationError::Domain(DomainError::Validation(_))));

        let categories = assistant.list_categories().await.expect("categories");
        assert_eq!(categories, vec!["Books", "Electronics", "Sports & Outdoors"]);
    }
}
