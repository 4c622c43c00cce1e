use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use shopwise_core::domain::conversation::{ConversationTurn, SessionId, TurnRole};

use super::{ChatSessionRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryChatSessionRepository {
    sessions: RwLock<HashMap<String, Vec<ConversationTurn>>>,
}

#[async_trait::async_trait]
impl ChatSessionRepository for InMemoryChatSessionRepository {
    async fn create_session(&self, _user_id: Option<&str>) -> Result<SessionId, RepositoryError> {
        let session_id = SessionId::generate();
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id.0.clone(), Vec::new());
        Ok(session_id)
    }

    async fn save_message(
        &self,
        session_id: &SessionId,
        role: TurnRole,
        content: &str,
    ) -> Result<ConversationTurn, RepositoryError> {
        let turn = ConversationTurn { role, content: content.to_string(), created_at: Utc::now() };
        let mut sessions = self.sessions.write().await;
        sessions.entry(session_id.0.clone()).or_default().push(turn.clone());
        Ok(turn)
    }

    async fn get_chat_history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<ConversationTurn>, RepositoryError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&session_id.0).cloned().unwrap_or_default())
    }
}
