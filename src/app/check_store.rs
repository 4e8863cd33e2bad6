use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::app::model::{NewCheck, UrlCheck};
use crate::error::Result;

#[async_trait]
pub trait CheckStore: Send + Sync {
    async fn save(&self, check: NewCheck) -> Result<UrlCheck>;
    /// Newest first; checks sharing a timestamp fall back to insertion order.
    async fn list_by_url_id(&self, url_id: i64) -> Result<Vec<UrlCheck>>;
    async fn count_by_url_id(&self, url_id: i64) -> Result<i64>;
}

#[derive(Debug, Clone)]
pub struct SqliteCheckStore {
    pool: SqlitePool,
}

impl SqliteCheckStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckStore for SqliteCheckStore {
    async fn save(&self, check: NewCheck) -> Result<UrlCheck> {
        let created_at = Utc::now();
        let NewCheck {
            url_id,
            status_code,
            markup,
        } = check;

        let id = sqlx::query(
            r#"
            INSERT INTO url_checks (url_id, status_code, title, h1, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(url_id)
        .bind(status_code)
        .bind(&markup.title)
        .bind(&markup.h1)
        .bind(&markup.description)
        .bind(created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        tracing::debug!(id, url_id, status_code, "saved check");
        Ok(UrlCheck {
            id,
            url_id,
            status_code,
            title: markup.title,
            h1: markup.h1,
            description: markup.description,
            created_at,
        })
    }

    async fn list_by_url_id(&self, url_id: i64) -> Result<Vec<UrlCheck>> {
        let checks = sqlx::query_as::<_, UrlCheck>(
            r#"
            SELECT id, url_id, status_code, title, h1, description, created_at
            FROM url_checks
            WHERE url_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(url_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(checks)
    }

    async fn count_by_url_id(&self, url_id: i64) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM url_checks WHERE url_id = ?")
            .bind(url_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
