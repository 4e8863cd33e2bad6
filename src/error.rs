pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the analyzer operations.
///
/// Everything except [`Error::Storage`] is an expected outcome that adapters map to
/// a user-facing status; storage failures are unexpected and logged as such.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid url {input:?}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("url already registered: {name}")]
    Duplicate { name: String },

    #[error("url not found: id={id}")]
    NotFound { id: i64 },

    #[error("fetch {url}: {source}")]
    Fetch {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("storage: {0}")]
    Storage(#[from] sqlx::Error),
}

impl Error {
    pub(crate) fn invalid_url(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn fetch(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Whether this is an expected, recoverable condition rather than a storage fault.
    #[must_use]
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }

    pub(crate) fn is_unique_violation(&self) -> bool {
        match self {
            Self::Storage(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_is_the_only_non_domain_error() {
        assert!(Error::NotFound { id: 1 }.is_domain());
        assert!(
            Error::Duplicate {
                name: "https://example.com".to_owned()
            }
            .is_domain()
        );
        assert!(Error::fetch("http://127.0.0.1:1", "connection refused").is_domain());
        assert!(!Error::Storage(sqlx::Error::PoolClosed).is_domain());
    }

    #[test]
    fn fetch_error_message_names_url() {
        let err = Error::fetch("https://example.com", "timed out");
        assert_eq!(err.to_string(), "fetch https://example.com: timed out");
    }
}
