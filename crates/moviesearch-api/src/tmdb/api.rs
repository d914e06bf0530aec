//! `MovieSearchApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::FetchError;
use super::types::{MoviePage, SearchMovieParams};

/// Movie search API trait.
///
/// Abstracts the catalog call for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieSearchApi: Send)]
pub trait LocalMovieSearchApi {
    /// Searches for movies and returns one page of results.
    ///
    /// # Errors
    ///
    /// - [`FetchError::MissingCredential`] if no API token is configured.
    /// - Any other [`FetchError`] if the HTTP request or JSON parsing fails.
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<MoviePage, FetchError>;
}
