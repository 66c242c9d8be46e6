//! Error type for remote service calls
//!
//! Every request the client makes (search, summary lookup, suggestion titles)
//! fails with a [`FetchError`]. Callers decide whether the failure is surfaced
//! to the user or degraded silently.

/// Error returned by remote service calls
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("{service} error {status}: {body}")]
    Status {
        service: String,
        status: u16,
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("invalid response: {0}")]
    Decode(String),

    /// A request URL could not be built
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Service is not configured or not reachable
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Result type for remote service calls
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = FetchError::Status {
            service: "search".into(),
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "search error 502: bad gateway");
    }

    #[test]
    fn test_url_error_converts() {
        let err: FetchError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_json_error_converts() {
        let err: FetchError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("invalid response"));
    }
}
