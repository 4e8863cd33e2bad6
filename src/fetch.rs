use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Serialize;

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::normalize::CanonicalUrl;

/// Final response after redirects have been followed.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub status_code: u16,
    pub final_url: String,
    pub body: String,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Any HTTP status is a successful fetch; only transport failures are errors.
    async fn fetch(&self, url: &CanonicalUrl) -> Result<FetchResult>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .context("build page fetch http client")?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &CanonicalUrl) -> Result<FetchResult> {
        let response = self
            .client
            .get(url.as_str())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|err| Error::fetch(url.as_str(), err))?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        if final_url.trim_end_matches('/') != url.as_str() {
            tracing::debug!(url = %url, %final_url, "followed redirects");
        }

        let body = response
            .text()
            .await
            .map_err(|err| Error::fetch(url.as_str(), err))?;

        tracing::debug!(url = %url, status_code, bytes = body.len(), "fetched page");
        Ok(FetchResult {
            status_code,
            final_url,
            body,
        })
    }
}
