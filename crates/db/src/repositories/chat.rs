use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use shopwise_core::domain::conversation::{ConversationTurn, SessionId, TurnRole};

use super::{ChatSessionRepository, RepositoryError};
use crate::DbPool;

pub struct SqlChatSessionRepository {
    pool: DbPool,
}

impl SqlChatSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatSessionRepository for SqlChatSessionRepository {
    async fn create_session(&self, user_id: Option<&str>) -> Result<SessionId, RepositoryError> {
        let session_id = SessionId::generate();
        sqlx::query("INSERT INTO chat_session (session_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&session_id.0)
            .bind(user_id)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(session_id)
    }

    async fn save_message(
        &self,
        session_id: &SessionId,
        role: TurnRole,
        content: &str,
    ) -> Result<ConversationTurn, RepositoryError> {
        let turn = ConversationTurn { role, content: content.to_string(), created_at: Utc::now() };
        let created_at = turn.created_at.to_rfc3339();

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT OR IGNORE INTO chat_session (session_id, user_id, created_at) VALUES (?, NULL, ?)",
        )
        .bind(&session_id.0)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO chat_message (session_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session_id.0)
        .bind(role.as_str())
        .bind(content)
        .bind(&created_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(turn)
    }

    async fn get_chat_history(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<ConversationTurn>, RepositoryError> {
        // insertion id keeps chronological order stable for equal timestamps
        let rows = sqlx::query(
            "SELECT role, content, created_at FROM chat_message WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(&session_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let role: String =
                    row.try_get("role").map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let created_at: String = row
                    .try_get("created_at")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;

                Ok(ConversationTurn {
                    role: role.parse().map_err(|e| RepositoryError::Decode(format!("{e}")))?,
                    content: row
                        .try_get("content")
                        .map_err(|e| RepositoryError::Decode(e.to_string()))?,
                    created_at: DateTime::parse_from_rfc3339(&created_at)
                        .map(|value| value.with_timezone(&Utc))
                        .map_err(|e| RepositoryError::Decode(e.to_string()))?,
                })
            })
            .collect()
    }
}
