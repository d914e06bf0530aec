//! Runs coordinator effects: spawns fetches and shows toasts.

use std::sync::Arc;

use moviesearch_api::tmdb::{FetchError, MoviePage, MovieSearchApi, SearchMovieParams};
use tokio::sync::mpsc;

use super::toast::Toasts;
use crate::search::{Effect, QueryKey};

/// Request settings applied to every search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDefaults {
    /// Response language.
    pub language: String,
    /// Include adult titles.
    pub include_adult: bool,
}

/// A finished fetch, delivered back to the event loop.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Key the fetch was issued for.
    pub key: QueryKey,
    /// Envelope or error.
    pub result: Result<MoviePage, FetchError>,
}

/// Executes [`Effect`]s on behalf of the event loop.
#[derive(Debug)]
pub struct EffectRunner<C> {
    client: Arc<C>,
    defaults: SearchDefaults,
    tx: mpsc::UnboundedSender<FetchOutcome>,
}

impl<C> EffectRunner<C>
where
    C: MovieSearchApi + Send + Sync + 'static,
{
    /// Creates a runner that reports finished fetches on `tx`.
    pub const fn new(
        client: Arc<C>,
        defaults: SearchDefaults,
        tx: mpsc::UnboundedSender<FetchOutcome>,
    ) -> Self {
        Self {
            client,
            defaults,
            tx,
        }
    }

    /// Runs every effect in order.
    pub fn run(&self, effects: Vec<Effect>, toasts: &mut Toasts) {
        for effect in effects {
            match effect {
                Effect::Fetch(key) => self.spawn_fetch(key),
                Effect::Notify(notification) => toasts.push(notification),
            }
        }
    }

    fn spawn_fetch(&self, key: QueryKey) {
        let params = SearchMovieParams::new(key.query.clone())
            .page(key.page)
            .language(self.defaults.language.clone())
            .include_adult(self.defaults.include_adult);
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();

        tracing::debug!(query = key.query, page = key.page, "spawning fetch");
        tokio::spawn(async move {
            let result = client.search_movie(&params).await;
            if tx.send(FetchOutcome { key, result }).is_err() {
                tracing::debug!("browser closed before fetch finished");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::search::Notification;

    /// Records requests and answers with an empty envelope.
    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<SearchMovieParams>>,
    }

    impl MovieSearchApi for RecordingApi {
        async fn search_movie(&self, params: &SearchMovieParams) -> Result<MoviePage, FetchError> {
            self.calls.lock().unwrap().push(params.clone());
            Ok(MoviePage {
                page: params.page,
                ..MoviePage::default()
            })
        }
    }

    fn make_runner() -> (
        Arc<RecordingApi>,
        EffectRunner<RecordingApi>,
        mpsc::UnboundedReceiver<FetchOutcome>,
    ) {
        let api = Arc::new(RecordingApi::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = EffectRunner::new(
            Arc::clone(&api),
            SearchDefaults {
                language: String::from("ja-JP"),
                include_adult: true,
            },
            tx,
        );
        (api, runner, rx)
    }

    #[tokio::test]
    async fn test_fetch_effect_reports_outcome() {
        // Arrange
        let (api, runner, mut rx) = make_runner();
        let mut toasts = Toasts::new(Duration::from_secs(4));

        // Act
        runner.run(
            vec![Effect::Fetch(QueryKey::new("batman", 2))],
            &mut toasts,
        );
        let outcome = rx.recv().await.unwrap();

        // Assert
        assert_eq!(outcome.key, QueryKey::new("batman", 2));
        assert_eq!(outcome.result.unwrap().page, 2);
        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let params = calls.first().unwrap();
        assert_eq!(params.query, "batman");
        assert_eq!(params.language, "ja-JP");
        assert!(params.include_adult);
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn test_notify_effect_shows_toast() {
        // Arrange
        let (api, runner, _rx) = make_runner();
        let mut toasts = Toasts::new(Duration::from_secs(4));

        // Act
        runner.run(
            vec![Effect::Notify(Notification::info("No movies found"))],
            &mut toasts,
        );

        // Assert
        assert_eq!(toasts.iter().count(), 1);
        assert!(api.calls.lock().unwrap().is_empty());
    }
}
