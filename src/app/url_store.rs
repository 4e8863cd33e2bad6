use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::app::model::{LatestCheck, Url, UrlSummary};
use crate::error::Result;
use crate::normalize::CanonicalUrl;

#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Inserts a new url. Uniqueness is the caller's job; a duplicate name trips the
    /// unique constraint and comes back as a storage error.
    async fn save(&self, name: &CanonicalUrl) -> Result<Url>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Url>>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Url>>;
    /// Oldest first, each with its newest check if any.
    async fn list_all(&self) -> Result<Vec<UrlSummary>>;
    async fn count(&self) -> Result<i64>;
}

#[derive(Debug, Clone)]
pub struct SqliteUrlStore {
    pool: SqlitePool,
}

impl SqliteUrlStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UrlSummaryRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    latest_status_code: Option<u16>,
    latest_checked_at: Option<DateTime<Utc>>,
}

impl From<UrlSummaryRow> for UrlSummary {
    fn from(row: UrlSummaryRow) -> Self {
        let latest_check = match (row.latest_status_code, row.latest_checked_at) {
            (Some(status_code), Some(created_at)) => Some(LatestCheck {
                status_code,
                created_at,
            }),
            _ => None,
        };
        Self {
            url: Url {
                id: row.id,
                name: row.name,
                created_at: row.created_at,
            },
            latest_check,
        }
    }
}

#[async_trait]
impl UrlStore for SqliteUrlStore {
    async fn save(&self, name: &CanonicalUrl) -> Result<Url> {
        let created_at = Utc::now();
        let id = sqlx::query("INSERT INTO urls (name, created_at) VALUES (?, ?)")
            .bind(name.as_str())
            .bind(created_at)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        tracing::debug!(id, name = %name, "saved url");
        Ok(Url {
            id,
            name: name.as_str().to_owned(),
            created_at,
        })
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Url>> {
        let url = sqlx::query_as::<_, Url>("SELECT id, name, created_at FROM urls WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(url)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Url>> {
        let url = sqlx::query_as::<_, Url>("SELECT id, name, created_at FROM urls WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(url)
    }

    async fn list_all(&self) -> Result<Vec<UrlSummary>> {
        let rows = sqlx::query_as::<_, UrlSummaryRow>(
            r#"
            SELECT
              u.id,
              u.name,
              u.created_at,
              c.status_code AS latest_status_code,
              c.created_at  AS latest_checked_at
            FROM urls u
            LEFT JOIN url_checks c ON c.id = (
              SELECT id FROM url_checks
              WHERE url_id = u.id
              ORDER BY created_at DESC, id DESC
              LIMIT 1
            )
            ORDER BY u.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UrlSummary::from).collect())
    }

    async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM urls")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
