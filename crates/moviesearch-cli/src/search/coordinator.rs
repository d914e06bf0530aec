//! `SearchCoordinator` - query/page/selection state machine.
//!
//! Render state is derived on demand from three pieces of data:
//!
//! - `placeholder`: the envelope that was on screen when the current key was
//!   requested (kept visible while the new key loads),
//! - `in_flight`: keys whose fetch has been issued but not resolved,
//! - `resolved`: envelopes keyed by the key that produced them.
//!
//! Late responses for superseded keys only ever land in `resolved`, so they
//! can never change what is displayed for the current key.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use moviesearch_api::tmdb::{FetchError, MoviePage, TmdbMovie};

use super::effect::{
    EMPTY_QUERY_MESSAGE, Effect, FETCH_FAILED_MESSAGE, NO_RESULTS_MESSAGE, Notification, QueryKey,
};

/// Highest page TMDB will serve for a search.
pub const MAX_PAGE: u32 = 500;

/// What the results area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderState {
    /// No query submitted yet.
    Idle,
    /// The current key is being fetched. `placeholder` is the previously
    /// displayed envelope, if any.
    Loading {
        /// Envelope kept on screen while loading.
        placeholder: Option<Arc<MoviePage>>,
    },
    /// The current key failed.
    Failed {
        /// Error description (for logs and the status line).
        message: String,
    },
    /// The current key resolved with no results.
    Empty(Arc<MoviePage>),
    /// The current key resolved with at least one result.
    Populated(Arc<MoviePage>),
}

impl RenderState {
    /// Returns the envelope currently on screen, including a placeholder.
    #[must_use]
    pub const fn data(&self) -> Option<&Arc<MoviePage>> {
        match self {
            Self::Loading { placeholder } => placeholder.as_ref(),
            Self::Empty(page) | Self::Populated(page) => Some(page),
            Self::Idle | Self::Failed { .. } => None,
        }
    }

    /// Returns the envelope the grid should render: on-screen data with at
    /// least one result.
    #[must_use]
    pub fn grid(&self) -> Option<&MoviePage> {
        let page: &MoviePage = self.data()?;
        (!page.is_empty()).then_some(page)
    }

    /// Returns `true` while the current key is being fetched.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    fn into_data(self) -> Option<Arc<MoviePage>> {
        match self {
            Self::Loading { placeholder } => placeholder,
            Self::Empty(page) | Self::Populated(page) => Some(page),
            Self::Idle | Self::Failed { .. } => None,
        }
    }
}

/// Owns the search state and decides which fetches to issue.
///
/// Every mutating operation returns the [`Effect`]s produced by the state it
/// enters; the caller is responsible for running them.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct SearchCoordinator {
    /// Current `(query, page)`; `None` while no query has been submitted.
    key: Option<QueryKey>,
    /// Movie shown in the detail overlay.
    selected: Option<TmdbMovie>,
    /// Envelope on screen when `key` was requested.
    placeholder: Option<Arc<MoviePage>>,
    /// Keys with an outstanding fetch.
    in_flight: HashSet<QueryKey>,
    /// Envelopes by the key that produced them.
    resolved: HashMap<QueryKey, Arc<MoviePage>>,
    /// Last failure, with the key it belongs to.
    failure: Option<(QueryKey, String)>,
}

impl SearchCoordinator {
    /// Creates an idle coordinator (empty query, page 1, no selection).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current query text (empty while idle).
    #[must_use]
    pub fn query(&self) -> &str {
        self.key.as_ref().map_or("", |key| key.query.as_str())
    }

    /// Returns the current page (1 while idle).
    #[must_use]
    pub fn page(&self) -> u32 {
        self.key.as_ref().map_or(1, |key| key.page)
    }

    /// Returns the movie shown in the detail overlay.
    #[must_use]
    pub const fn selected(&self) -> Option<&TmdbMovie> {
        self.selected.as_ref()
    }

    /// Derives what the results area should show.
    #[must_use]
    pub fn render_state(&self) -> RenderState {
        let Some(key) = &self.key else {
            return RenderState::Idle;
        };

        if let Some(page) = self.resolved.get(key) {
            return if page.is_empty() {
                RenderState::Empty(Arc::clone(page))
            } else {
                RenderState::Populated(Arc::clone(page))
            };
        }

        if let Some((failed_key, message)) = &self.failure
            && failed_key == key
        {
            return RenderState::Failed {
                message: message.clone(),
            };
        }

        RenderState::Loading {
            placeholder: self.placeholder.clone(),
        }
    }

    /// Submits a search phrase.
    ///
    /// A blank phrase only produces a warning. Otherwise the page resets to 1
    /// and the key `(query, 1)` is requested.
    pub fn submit(&mut self, text: &str) -> Vec<Effect> {
        let query = text.trim();
        if query.is_empty() {
            return vec![Effect::Notify(Notification::warning(EMPTY_QUERY_MESSAGE))];
        }

        tracing::info!(query, "search submitted");
        self.request(QueryKey::new(query, 1))
    }

    /// Moves to another page of the current query.
    ///
    /// Only acts when the on-screen grid spans more than one page; an empty
    /// envelope has no pagination whatever its `total_pages`. The target is
    /// clamped to the pages TMDB can serve.
    pub fn change_page(&mut self, page: u32) -> Vec<Effect> {
        let Some(query) = self.key.as_ref().map(|key| key.query.clone()) else {
            return Vec::new();
        };
        let Some(total_pages) = self.render_state().grid().map(|data| data.total_pages) else {
            return Vec::new();
        };
        if total_pages <= 1 {
            return Vec::new();
        }

        let target = page.clamp(1, total_pages.min(MAX_PAGE));
        tracing::debug!(query, page = target, "page change");
        self.request(QueryKey::new(query, target))
    }

    /// Moves to the next page, if any.
    pub fn next_page(&mut self) -> Vec<Effect> {
        self.change_page(self.page().saturating_add(1))
    }

    /// Moves to the previous page, if any.
    pub fn prev_page(&mut self) -> Vec<Effect> {
        self.change_page(self.page().saturating_sub(1))
    }

    /// Applies the outcome of a fetch issued for `key`.
    ///
    /// Outcomes for keys other than the current one are cached (success) or
    /// dropped (failure) without touching the display.
    pub fn resolve(&mut self, key: QueryKey, result: Result<MoviePage, FetchError>) -> Vec<Effect> {
        self.in_flight.remove(&key);
        let is_current = self.key.as_ref() == Some(&key);

        match result {
            Ok(page) => {
                let empty = page.is_empty();
                tracing::debug!(
                    query = key.query,
                    page = key.page,
                    results = page.results.len(),
                    current = is_current,
                    "search resolved"
                );
                self.resolved.insert(key, Arc::new(page));
                if is_current && empty {
                    vec![Effect::Notify(Notification::info(NO_RESULTS_MESSAGE))]
                } else {
                    Vec::new()
                }
            }
            Err(err) if is_current => {
                tracing::error!(
                    query = key.query,
                    page = key.page,
                    kind = ?err.kind(),
                    error = %err,
                    "movie search failed"
                );
                self.failure = Some((key, err.to_string()));
                vec![Effect::Notify(Notification::error(FETCH_FAILED_MESSAGE))]
            }
            Err(err) => {
                tracing::debug!(
                    query = key.query,
                    page = key.page,
                    error = %err,
                    "discarding failure for superseded search"
                );
                Vec::new()
            }
        }
    }

    /// Selects the movie at `index` of the on-screen envelope.
    ///
    /// Returns `false` if there is no such movie.
    pub fn select(&mut self, index: usize) -> bool {
        let movie = self
            .render_state()
            .grid()
            .and_then(|page| page.results.get(index))
            .cloned();
        match movie {
            Some(movie) => {
                tracing::debug!(id = movie.id, title = movie.title, "movie selected");
                self.selected = Some(movie);
                true
            }
            None => false,
        }
    }

    /// Closes the detail overlay.
    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    /// Makes `key` current, issuing a fetch only when nothing usable exists.
    fn request(&mut self, key: QueryKey) -> Vec<Effect> {
        let state = self.render_state();
        let retrying = matches!(state, RenderState::Failed { .. });
        if self.key.as_ref() == Some(&key) && !retrying {
            return Vec::new();
        }

        self.placeholder = state.into_data();
        if self
            .failure
            .as_ref()
            .is_some_and(|(failed_key, _)| *failed_key == key)
        {
            self.failure = None;
        }
        self.key = Some(key.clone());

        if let Some(page) = self.resolved.get(&key) {
            return if page.is_empty() {
                vec![Effect::Notify(Notification::info(NO_RESULTS_MESSAGE))]
            } else {
                Vec::new()
            };
        }

        if self.in_flight.insert(key.clone()) {
            vec![Effect::Fetch(key)]
        } else {
            tracing::debug!(query = key.query, page = key.page, "fetch already in flight");
            Vec::new()
        }
    }
}
