//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{StoreError, map_insert_error};

/// PostgreSQL repository for short link storage and retrieval.
///
/// Uses SQLx prepared statements for SQL injection protection. Uniqueness of
/// `code` is enforced by the `short_links_code_key` constraint.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Total number of stored links.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, StoreError> {
        sqlx::query_as::<_, ShortLink>(
            r#"
            INSERT INTO short_links (code, long_url)
            VALUES ($1, $2)
            RETURNING id, code, long_url, created_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.long_url)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_insert_error(e, &new_link.code))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, StoreError> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, code, long_url, created_at
            FROM short_links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<ShortLink>, StoreError> {
        let links = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, code, long_url, created_at
            FROM short_links
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
