use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::PageMarkup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Url {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UrlCheck {
    pub id: i64,
    pub url_id: i64,
    pub status_code: u16,
    pub title: String,
    pub h1: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A check waiting to be persisted.
#[derive(Debug, Clone)]
pub struct NewCheck {
    pub url_id: i64,
    pub status_code: u16,
    pub markup: PageMarkup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestCheck {
    pub status_code: u16,
    pub created_at: DateTime<Utc>,
}

/// Row of the url listing: the url and, if it was ever checked, its newest check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlSummary {
    #[serde(flatten)]
    pub url: Url,
    pub latest_check: Option<LatestCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlDetails {
    #[serde(flatten)]
    pub url: Url,
    /// Most recent first.
    pub checks: Vec<UrlCheck>,
}
