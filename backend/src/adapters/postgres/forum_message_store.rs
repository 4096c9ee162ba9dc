//! PostgreSQL implementation of ForumMessageStore.

use async_trait::async_trait;
use sqlx::PgPool;

use super::column;
use crate::domain::forum::{ForumMessage, MessageCursor};
use crate::domain::foundation::{
    DomainError, ErrorCode, ForumId, ForumMessageId, Timestamp, UserId,
};
use crate::ports::ForumMessageStore;

#[derive(Clone)]
pub struct PostgresForumMessageStore {
    pool: PgPool,
}

impl PostgresForumMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForumMessageStore for PostgresForumMessageStore {
    async fn append(&self, message: &ForumMessage) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO forum_messages (id, forum_id, author_id, author_name, body, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(message.forum_id.as_uuid())
        .bind(message.author_id.as_str())
        .bind(&message.author_name)
        .bind(&message.body)
        .bind(message.sent_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert forum message: {}", e),
            )
        })?;

        Ok(())
    }

    async fn list_since(
        &self,
        forum_id: &ForumId,
        after: Option<MessageCursor>,
        limit: usize,
    ) -> Result<Vec<ForumMessage>, DomainError> {
        let after_sent_at = after.map(|c| *c.sent_at.as_datetime());
        let after_id = after.map(|c| *c.id.as_uuid());
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(
            r#"
            SELECT id, forum_id, author_id, author_name, body, sent_at
            FROM forum_messages
            WHERE forum_id = $1
              AND ($2::timestamptz IS NULL OR (sent_at, id) > ($2, $3::uuid))
            ORDER BY sent_at ASC, id ASC
            LIMIT $4
            "#,
        )
        .bind(forum_id.as_uuid())
        .bind(after_sent_at)
        .bind(after_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch forum messages: {}", e),
            )
        })?;

        rows.iter().map(row_to_message).collect()
    }
}

fn row_to_message(row: &sqlx::postgres::PgRow) -> Result<ForumMessage, DomainError> {
    let id: uuid::Uuid = column(row, "id")?;
    let forum_id: uuid::Uuid = column(row, "forum_id")?;
    let author_id: String = column(row, "author_id")?;
    let sent_at: chrono::DateTime<chrono::Utc> = column(row, "sent_at")?;

    Ok(ForumMessage {
        id: ForumMessageId::from_uuid(id),
        forum_id: ForumId::from_uuid(forum_id),
        author_id: UserId::new(author_id)?,
        author_name: column(row, "author_name")?,
        body: column(row, "body")?,
        sent_at: Timestamp::from_datetime(sent_at),
    })
}
