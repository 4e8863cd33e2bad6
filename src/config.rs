use std::time::Duration;

use crate::cli::{FetchArgs, StoreArgs};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://page-analyzer.db";
pub const DEFAULT_USER_AGENT: &str = concat!("page-analyzer/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    /// `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: None,
            max_redirects: 10,
        }
    }
}

impl Config {
    pub fn from_args(store: &StoreArgs, fetch: &FetchArgs) -> Self {
        Self {
            database_url: store.database_url.trim().to_owned(),
            max_connections: store.max_connections.max(1),
            fetch: FetchConfig {
                user_agent: fetch.user_agent.clone(),
                timeout: fetch.fetch_timeout_secs.map(Duration::from_secs),
                max_redirects: fetch.max_redirects,
            },
        }
    }
}
