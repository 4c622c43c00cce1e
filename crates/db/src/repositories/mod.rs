use async_trait::async_trait;
use thiserror::Error;

use shopwise_core::domain::conversation::{ConversationTurn, SessionId, TurnRole};
use shopwise_core::errors::ApplicationError;

pub mod chat;
pub mod memory;
pub mod product;

pub use chat::SqlChatSessionRepository;
pub use memory::InMemoryChatSessionRepository;
pub use product::SqlCatalogStore;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Database(_) => Self::Store(value.to_string()),
            // retrying cannot fix a row that does not decode
            RepositoryError::Decode(_) => Self::Data(value.to_string()),
        }
    }
}

/// Append-only per-session turn log.
#[async_trait]
pub trait ChatSessionRepository: Send + Sync {
    async fn create_session(&self, user_id: Option<&str>) -> Result<SessionId, RepositoryError>;

    /// Appends a turn. Session ids that were never created are registered on
    /// first write.
    async fn save_message(
        &self,
        session_id: &SessionId,
        role: TurnRole,
        content: &str,
    ) -> Result<ConversationTurn, RepositoryError>;

    /// Every turn of the session, oldest first.
    async fn get_chat_history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<ConversationTurn>, RepositoryError>;
}
