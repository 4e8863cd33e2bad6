use std::sync::Arc;

use sqlx::SqlitePool;

use crate::app::check_store::{CheckStore, SqliteCheckStore};
use crate::app::model::{NewCheck, Url, UrlCheck, UrlDetails, UrlSummary};
use crate::app::url_store::{SqliteUrlStore, UrlStore};
use crate::error::{Error, Result};
use crate::extract::extract;
use crate::fetch::PageFetcher;
use crate::normalize::{CanonicalUrl, normalize};

/// Operation surface used by the CLI and the HTTP service.
///
/// Every call is an independent unit of work. Nothing is cached between calls and
/// concurrent checks of the same url are allowed; each produces its own row.
#[derive(Clone)]
pub struct Analyzer {
    urls: Arc<dyn UrlStore>,
    checks: Arc<dyn CheckStore>,
    fetcher: Arc<dyn PageFetcher>,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer").finish_non_exhaustive()
    }
}

impl Analyzer {
    pub fn new(
        urls: Arc<dyn UrlStore>,
        checks: Arc<dyn CheckStore>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            urls,
            checks,
            fetcher,
        }
    }

    pub fn with_pool(pool: SqlitePool, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::new(
            Arc::new(SqliteUrlStore::new(pool.clone())),
            Arc::new(SqliteCheckStore::new(pool)),
            fetcher,
        )
    }

    pub fn normalize_url(&self, raw: &str) -> Result<CanonicalUrl> {
        normalize(raw)
    }

    /// Stores a new url, or reports [`Error::Duplicate`] if the name is taken.
    ///
    /// The lookup and the insert are separate statements; a concurrent registration
    /// that slips between them is caught by the unique constraint and reported the
    /// same way.
    pub async fn register_url(&self, name: &CanonicalUrl) -> Result<Url> {
        let existing = self
            .urls
            .find_by_name(name.as_str())
            .await
            .inspect_err(log_storage)?;
        if let Some(existing) = existing {
            tracing::info!(id = existing.id, name = %name, "url already registered");
            return Err(Error::Duplicate {
                name: name.as_str().to_owned(),
            });
        }

        match self.urls.save(name).await {
            Ok(url) => {
                tracing::info!(id = url.id, name = %url.name, "registered url");
                Ok(url)
            }
            Err(err) if err.is_unique_violation() => {
                tracing::info!(name = %name, "url registered concurrently");
                Err(Error::Duplicate {
                    name: name.as_str().to_owned(),
                })
            }
            Err(err) => {
                log_storage(&err);
                Err(err)
            }
        }
    }

    /// Normalizes raw input and registers it.
    pub async fn add_url(&self, raw: &str) -> Result<Url> {
        let name = self.normalize_url(raw).inspect_err(|err| {
            tracing::debug!(%err, "rejected url input");
        })?;
        self.register_url(&name).await
    }

    pub async fn get_url(&self, id: i64) -> Result<Url> {
        self.urls
            .find_by_id(id)
            .await
            .inspect_err(log_storage)?
            .ok_or(Error::NotFound { id })
    }

    pub async fn show_url(&self, id: i64) -> Result<UrlDetails> {
        let url = self.get_url(id).await?;
        let checks = self.list_checks(id).await?;
        Ok(UrlDetails { url, checks })
    }

    pub async fn list_urls(&self) -> Result<Vec<UrlSummary>> {
        self.urls.list_all().await.inspect_err(log_storage)
    }

    /// Fetches the url, extracts its markup and records a check.
    ///
    /// Nothing is written unless the fetch produced a response. Stored names are
    /// fetched as they are; they were normalized on the way in.
    pub async fn run_check(&self, url_id: i64) -> Result<UrlCheck> {
        let url = self.get_url(url_id).await?;
        let canonical = CanonicalUrl::from_stored(url.name);

        let page = self.fetcher.fetch(&canonical).await.inspect_err(|err| {
            tracing::warn!(url_id, url = %canonical, %err, "page fetch failed");
        })?;
        let markup = extract(&page.body);

        let check = self
            .checks
            .save(NewCheck {
                url_id,
                status_code: page.status_code,
                markup,
            })
            .await
            .inspect_err(log_storage)?;

        tracing::info!(
            url_id,
            check_id = check.id,
            status_code = check.status_code,
            "recorded check"
        );
        Ok(check)
    }

    /// Checks for a url, newest first. Unknown ids have no checks.
    pub async fn list_checks(&self, url_id: i64) -> Result<Vec<UrlCheck>> {
        self.checks
            .list_by_url_id(url_id)
            .await
            .inspect_err(log_storage)
    }

    pub async fn count_urls(&self) -> Result<i64> {
        self.urls.count().await.inspect_err(log_storage)
    }

    pub async fn count_checks(&self, url_id: i64) -> Result<i64> {
        self.checks
            .count_by_url_id(url_id)
            .await
            .inspect_err(log_storage)
    }
}

fn log_storage(err: &Error) {
    if let Error::Storage(source) = err {
        tracing::error!(error = %source, "storage failure");
    }
}
