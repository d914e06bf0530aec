//! Fetch error types.

/// Broad classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum FetchErrorKind {
    /// The client is missing configuration (no API token).
    Configuration,
    /// The request itself failed (transport, HTTP status, or body decoding).
    Request,
}

/// Error returned by [`MovieSearchApi`](super::MovieSearchApi) calls.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::module_name_repetitions)]
pub enum FetchError {
    /// No bearer token was configured for the client.
    #[error("TMDB API token is not configured (set TMDB_API_TOKEN)")]
    MissingCredential,
    /// The request URL could not be built.
    #[error("failed to build request URL: {0}")]
    Url(#[from] url::ParseError),
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// TMDB answered with a non-success status.
    #[error("TMDB API error (HTTP {status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// TMDB `status_message`, or the raw body when it is not a TMDB error.
        message: String,
    },
    /// The response body was not a valid result envelope.
    #[error("failed to decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Returns the broad error kind.
    #[must_use]
    pub const fn kind(&self) -> FetchErrorKind {
        match self {
            Self::MissingCredential => FetchErrorKind::Configuration,
            Self::Url(_) | Self::Transport(_) | Self::Status { .. } | Self::Decode(_) => {
                FetchErrorKind::Request
            }
        }
    }
}

/// Error returned by [`TmdbClientBuilder::build`](super::TmdbClientBuilder::build).
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// `user_agent` was never set.
    #[error("user_agent is required")]
    MissingUserAgent,
    /// The default base URL failed to parse.
    #[error("invalid default base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
