//! TMDB API client module.
//!
//! Issues bearer-authenticated requests to the TMDB API v3 `search/movie`
//! endpoint and decodes the paginated result envelope.

mod api;
mod client;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieSearchApi, MovieSearchApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder, poster_url};
pub use error::{BuildError, FetchError, FetchErrorKind};
#[allow(clippy::module_name_repetitions)]
pub use types::{MoviePage, SearchMovieParams, TmdbErrorResponse, TmdbMovie};
