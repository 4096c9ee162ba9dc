//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use super::column;
use crate::domain::foundation::{DomainError, ErrorCode, Role, UserId};
use crate::domain::user::UserRecord;
use crate::ports::UserRepository;

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, role, name, email, affiliation, bio
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch user: {}", e),
            )
        })?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, role, name, email, affiliation, bio
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch user by email: {}", e),
            )
        })?;

        row.map(|row| row_to_user(&row)).transpose()
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<UserRecord, DomainError> {
    let id: String = column(row, "id")?;
    let role: String = column(row, "role")?;

    Ok(UserRecord {
        id: UserId::new(id)?,
        role: role.parse::<Role>()?,
        name: column(row, "name")?,
        email: column(row, "email")?,
        affiliation: column(row, "affiliation")?,
        bio: column(row, "bio")?,
    })
}
