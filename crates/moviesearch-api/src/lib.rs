//! API client library for moviesearch.
//!
//! Provides the TMDB `search/movie` client used by the terminal UI.

/// TMDB API client.
pub mod tmdb;
