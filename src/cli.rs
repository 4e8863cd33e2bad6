use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_USER_AGENT;
use crate::logging::LogFormat;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Log output format (written to stderr).
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a url (normalized to scheme://host[:port]).
    Add(AddArgs),
    /// List registered urls with their latest check.
    List,
    /// Show a url and its checks.
    Show(UrlIdArgs),
    /// Fetch a url now and record a check.
    Check(UrlIdArgs),
    /// List checks for a url, newest first.
    Checks(UrlIdArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Url to register (must be absolute http/https).
    #[arg(long)]
    pub url: String,
}

#[derive(Debug, Args)]
pub struct UrlIdArgs {
    /// Registered url id.
    #[arg(long)]
    pub id: i64,
}

#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// SQLite database url.
    #[arg(
        long,
        env = "PAGE_ANALYZER_DATABASE_URL",
        default_value = crate::config::DEFAULT_DATABASE_URL,
        global = true
    )]
    pub database_url: String,

    /// Maximum pooled database connections.
    #[arg(long, default_value_t = 5, global = true)]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Overall timeout for a page fetch (default: none).
    #[arg(long, env = "PAGE_ANALYZER_FETCH_TIMEOUT_SECS", global = true)]
    pub fetch_timeout_secs: Option<u64>,

    /// User-Agent sent with page fetches.
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    pub user_agent: String,

    /// Maximum redirects to follow per fetch.
    #[arg(long, default_value_t = 10, global = true)]
    pub max_redirects: usize,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "HTTP service for page-analyzer")]
pub struct AppArgs {
    #[arg(long, env = "PAGE_ANALYZER_ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub fetch: FetchArgs,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "page-analyzer",
            "check",
            "--id",
            "3",
            "--database-url",
            "sqlite::memory:",
            "--fetch-timeout-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.store.database_url, "sqlite::memory:");
        assert_eq!(cli.fetch.fetch_timeout_secs, Some(5));
        assert!(matches!(cli.command, Command::Check(UrlIdArgs { id: 3 })));
    }

    #[test]
    fn fetch_defaults() {
        let cli = Cli::try_parse_from(["page-analyzer", "list"]).unwrap();
        assert_eq!(cli.fetch.max_redirects, 10);
        assert_eq!(cli.fetch.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(cli.log_format, LogFormat::Text);
    }
}
