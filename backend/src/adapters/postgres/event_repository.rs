//! PostgreSQL implementation of EventRepository.
//!
//! Events live in `events`; their sessions in `event_sessions`. Session
//! changes are applied as diffs inside one transaction so a failed update
//! leaves the stored sessions untouched.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::column;
use crate::domain::event::{Event, EventSession, SessionDiff};
use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, EventSessionId, Timestamp, UserId,
};
use crate::ports::EventRepository;

#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

fn capacity_to_db(capacity: u32) -> Result<i32, DomainError> {
    i32::try_from(capacity).map_err(|_| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            format!("Capacity {} is too large to store", capacity),
        )
    })
}

async fn insert_session(
    tx: &mut Transaction<'_, Postgres>,
    event_id: &EventId,
    session: &EventSession,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        INSERT INTO event_sessions (id, event_id, title, description, capacity, starts_at, ends_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(session.id.as_uuid())
    .bind(event_id.as_uuid())
    .bind(&session.title)
    .bind(&session.description)
    .bind(capacity_to_db(session.capacity)?)
    .bind(session.start.as_datetime())
    .bind(session.end.as_datetime())
    .execute(&mut **tx)
    .await
    .map_err(|e| db_error("insert event session", e))?;

    Ok(())
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn create_event(&self, event: &Event) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("start transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO events (id, organizer_id, title, description, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.id().as_uuid())
        .bind(event.organizer_id().as_str())
        .bind(event.title())
        .bind(event.description())
        .bind(event.location())
        .bind(event.created_at().as_datetime())
        .bind(event.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("insert event", e))?;

        for session in event.sessions() {
            insert_session(&mut tx, event.id(), session).await?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("commit transaction", e))?;

        Ok(())
    }

    async fn update_event_sessions(
        &self,
        event_id: &EventId,
        diffs: &[SessionDiff],
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("start transaction", e))?;

        let touched = sqlx::query("UPDATE events SET updated_at = $2 WHERE id = $1")
            .bind(event_id.as_uuid())
            .bind(Timestamp::now().as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("update event", e))?;
        if touched.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::EventNotFound,
                format!("Event not found: {}", event_id),
            ));
        }

        for diff in diffs {
            match diff {
                SessionDiff::Removed(session_id) => {
                    sqlx::query("DELETE FROM event_sessions WHERE id = $1 AND event_id = $2")
                        .bind(session_id.as_uuid())
                        .bind(event_id.as_uuid())
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| db_error("delete event session", e))?;
                }
                SessionDiff::Updated(session) => {
                    let result = sqlx::query(
                        r#"
                        UPDATE event_sessions SET
                            title = $3,
                            description = $4,
                            capacity = $5,
                            starts_at = $6,
                            ends_at = $7
                        WHERE id = $1 AND event_id = $2
                        "#,
                    )
                    .bind(session.id.as_uuid())
                    .bind(event_id.as_uuid())
                    .bind(&session.title)
                    .bind(&session.description)
                    .bind(capacity_to_db(session.capacity)?)
                    .bind(session.start.as_datetime())
                    .bind(session.end.as_datetime())
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| db_error("update event session", e))?;

                    if result.rows_affected() == 0 {
                        return Err(DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Session {} does not exist", session.id),
                        ));
                    }
                }
                SessionDiff::Added(session) => insert_session(&mut tx, event_id, session).await?,
            }
        }

        tx.commit()
            .await
            .map_err(|e| db_error("commit transaction", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, organizer_id, title, description, location, created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch event", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let session_rows = sqlx::query(
            r#"
            SELECT id, title, description, capacity, starts_at, ends_at
            FROM event_sessions
            WHERE event_id = $1
            ORDER BY starts_at ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch event sessions", e))?;

        let sessions = session_rows
            .iter()
            .map(row_to_session)
            .collect::<Result<Vec<_>, _>>()?;

        row_to_event(&row, sessions).map(Some)
    }
}

fn row_to_event(
    row: &sqlx::postgres::PgRow,
    sessions: Vec<EventSession>,
) -> Result<Event, DomainError> {
    let id: uuid::Uuid = column(row, "id")?;
    let organizer_id: String = column(row, "organizer_id")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = column(row, "updated_at")?;

    Ok(Event::reconstitute(
        EventId::from_uuid(id),
        UserId::new(organizer_id)?,
        column(row, "title")?,
        column(row, "description")?,
        column(row, "location")?,
        sessions,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn row_to_session(row: &sqlx::postgres::PgRow) -> Result<EventSession, DomainError> {
    let id: uuid::Uuid = column(row, "id")?;
    let capacity: i32 = column(row, "capacity")?;
    let starts_at: chrono::DateTime<chrono::Utc> = column(row, "starts_at")?;
    let ends_at: chrono::DateTime<chrono::Utc> = column(row, "ends_at")?;

    Ok(EventSession {
        id: EventSessionId::from_uuid(id),
        title: column(row, "title")?,
        description: column(row, "description")?,
        capacity: u32::try_from(capacity).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Stored capacity {} is negative", capacity),
            )
        })?,
        start: Timestamp::from_datetime(starts_at),
        end: Timestamp::from_datetime(ends_at),
    })
}
