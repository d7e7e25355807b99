use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use crate::models::announcement::{Announcement, AnnouncementInput};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no announcement with id {0}")]
    NotFound(i64),
    /// The write went through but the confirming read found nothing.
    #[error("announcement {0} could not be read back after the write")]
    ReadBack(i64),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Data access for the `announcements` table.
#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Announcement>, StoreError>;

    /// Insert, then re-read the row under its new id.
    async fn create(&self, input: &AnnouncementInput) -> Result<Announcement, StoreError>;

    /// Replace every mutable field, then re-read the row.
    async fn update(&self, id: i64, input: &AnnouncementInput) -> Result<Announcement, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Current database clock; doubles as a connectivity check.
    async fn ping(&self) -> Result<DateTime<Utc>, StoreError>;
}

/// Postgres-backed store. The write and the read-back in `create`/`update`
/// are separate statements, not one transaction.
#[derive(Clone)]
pub struct AnnouncementService {
    pool: PgPool,
}

impl AnnouncementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: i64) -> Result<Announcement, StoreError> {
        sqlx::query_as::<_, Announcement>(
            "SELECT id, title, description, date FROM announcements WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::ReadBack(id))
    }
}

#[async_trait]
impl AnnouncementStore for AnnouncementService {
    async fn list(&self) -> Result<Vec<Announcement>, StoreError> {
        let rows = sqlx::query_as::<_, Announcement>(
            "SELECT id, title, description, date FROM announcements",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, input: &AnnouncementInput) -> Result<Announcement, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO announcements (title, description, date)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.date)
        .fetch_one(&self.pool)
        .await?;

        self.fetch(id).await
    }

    async fn update(&self, id: i64, input: &AnnouncementInput) -> Result<Announcement, StoreError> {
        let result = sqlx::query(
            "UPDATE announcements
             SET title = $1, description = $2, date = $3
             WHERE id = $4",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.fetch(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<DateTime<Utc>, StoreError> {
        let now: DateTime<Utc> = sqlx::query_scalar("SELECT NOW()")
            .fetch_one(&self.pool)
            .await?;
        Ok(now)
    }
}
