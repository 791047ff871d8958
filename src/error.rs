use thiserror::Error;

/// Errors surfaced by the PokeAPI client.
///
/// `Transport` and `Status` cover network failures and non-success
/// responses; `NotFound` specializes the single-item lookup; `Parse` marks
/// a payload we could not decode. None of these are retried — each fails
/// the whole in-flight operation and is reported to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("no pokemon matching \"{identifier}\"")]
    NotFound { identifier: String },

    #[error("malformed response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// True when the error is the not-found case rather than a transport
    /// or server problem, so the UI can say "not found" instead of
    /// "failed to load".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
