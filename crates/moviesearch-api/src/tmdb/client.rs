//! `TmdbClient` - TMDB API client implementation.

use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::MovieSearchApi;
use super::error::{BuildError, FetchError};
use super::types::{MoviePage, SearchMovieParams, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Base URL for TMDB poster and backdrop images.
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Builds a full image URL from a TMDB `poster_path` and a size such as `w500`.
#[must_use]
pub fn poster_url(path: &str, size: &str) -> String {
    format!("{IMAGE_BASE_URL}{size}/{}", path.trim_start_matches('/'))
}

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token. `None` surfaces as a configuration error on first use.
    api_token: Option<String>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token.
    ///
    /// Blank tokens are treated as missing.
    #[must_use]
    pub fn api_token(mut self, token: Option<impl Into<String>>) -> Self {
        self.api_token = token
            .map(Into::into)
            .filter(|token: &String| !token.trim().is_empty());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the client.
    ///
    /// A missing API token is not a build error; it is reported by the
    /// first request instead.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient, BuildError> {
        let user_agent = self.user_agent.ok_or(BuildError::MissingUserAgent)?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let http_client = Client::builder().user_agent(&user_agent).gzip(true).build()?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token: self.api_token,
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Returns `true` when a bearer token is configured.
    #[must_use]
    pub const fn has_credential(&self) -> bool {
        self.api_token.is_some()
    }

    /// Sends a GET request with Bearer auth and query params, then decodes
    /// the JSON body.
    #[instrument(skip_all, fields(path = path))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let api_token = self
            .api_token
            .as_deref()
            .ok_or(FetchError::MissingCredential)?;

        let url = self.base_url.join(path)?;

        let request = self
            .http_client
            .get(url)
            .bearer_auth(api_token)
            .query(query)
            .build()?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let response = self.http_client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = serde_json::from_str::<TmdbErrorResponse>(&body)
                .map_or(body, |error_response| {
                    format!(
                        "code={}, message={}",
                        error_response.status_code, error_response.status_message
                    )
                });
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

impl MovieSearchApi for TmdbClient {
    #[instrument(skip_all, fields(query = %params.query, page = params.page))]
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<MoviePage, FetchError> {
        let query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("page", params.page.to_string()),
            ("language", params.language.clone()),
            ("include_adult", params.include_adult.to_string()),
        ];

        let page: MoviePage = self.get_json("search/movie", &query).await?;
        tracing::debug!(
            results = page.results.len(),
            total_pages = page.total_pages,
            total_results = page.total_results,
            "TMDB search/movie response"
        );
        Ok(page)
    }
}
