//! Interactive movie browser.
//!
//! Uses `ratatui` + `crossterm` for rendering. Terminal events, finished
//! fetches, and the toast timer are multiplexed on one task with
//! `tokio::select!`; fetches run on spawned tasks.

mod pagination;
mod runtime;
/// Browser state types.
pub mod state;
mod toast;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use moviesearch_api::tmdb::{MovieSearchApi, TmdbMovie, poster_url};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Position;
use tokio::sync::mpsc;

pub use self::runtime::SearchDefaults;
use self::runtime::{EffectRunner, FetchOutcome};
use self::state::{BrowserState, InputMode};
use crate::search::{Effect, Notification};

/// How often expired toasts are swept.
const TICK: Duration = Duration::from_millis(250);

/// Runs the movie browser until the user quits.
///
/// When `initial_query` is given it is submitted before the first draw.
///
/// # Errors
///
/// Returns an error if terminal setup, drawing, or event reading fails.
pub async fn run_browser<C>(
    client: Arc<C>,
    defaults: SearchDefaults,
    toast_ttl: Duration,
    initial_query: Option<String>,
) -> Result<()>
where
    C: MovieSearchApi + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let runner = EffectRunner::new(client, defaults, tx);
    let mut state = BrowserState::new(toast_ttl);

    if let Some(query) = initial_query {
        state.input = query;
        let effects = state.submit();
        runner.run(effects, &mut state.toasts);
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &runner, rx).await;

    // Cleanup (always attempt even if event loop failed)
    restore_terminal([
        ("failed to disable raw mode", Box::new(disable_raw_mode)),
        (
            "failed to leave alternate screen",
            Box::new(|| {
                crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
            }),
        ),
        ("failed to show cursor", Box::new(|| terminal.show_cursor())),
    ])?;

    result
}

/// Terminal restore step with the context reported when it fails.
type CleanupStep<'a> = (&'static str, Box<dyn FnOnce() -> io::Result<()> + 'a>);

/// Runs every cleanup step, even after one fails.
///
/// # Errors
///
/// Returns the first failure, with its context.
fn restore_terminal<const N: usize>(steps: [CleanupStep<'_>; N]) -> Result<()> {
    let mut first_error = None;
    for (context, step) in steps {
        if let Err(err) = step() {
            tracing::error!(error = %err, "{context}");
            if first_error.is_none() {
                first_error = Some(anyhow::Error::new(err).context(context));
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Main event loop.
async fn run_event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    runner: &EffectRunner<C>,
    mut rx: mpsc::UnboundedReceiver<FetchOutcome>,
) -> Result<()>
where
    C: MovieSearchApi + Send + Sync + 'static,
{
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    loop {
        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if state.should_quit {
            return Ok(());
        }

        tokio::select! {
            event = events.next() => {
                let Some(event) = event else {
                    return Ok(());
                };
                let event = event.context("failed to read event")?;
                let effects = handle_event(state, &event);
                runner.run(effects, &mut state.toasts);
            }
            Some(outcome) = rx.recv() => {
                let effects = state.resolve(outcome.key, outcome.result);
                runner.run(effects, &mut state.toasts);
            }
            _ = tick.tick() => {
                state.toasts.expire(Instant::now());
            }
        }
    }
}

/// Dispatches one terminal event.
fn handle_event(state: &mut BrowserState, event: &Event) -> Vec<Effect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                state.should_quit = true;
                return Vec::new();
            }
            if state.coordinator.selected().is_some() {
                return handle_overlay_input(state, key.code);
            }
            match state.input_mode {
                InputMode::Search => handle_search_input(state, key.code),
                InputMode::Browse => handle_browse_input(state, key.code),
            }
        }
        Event::Mouse(mouse) => handle_mouse(state, mouse),
        _ => Vec::new(),
    }
}

/// Handles key input while typing a query.
fn handle_search_input(state: &mut BrowserState, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Enter => return state.submit(),
        KeyCode::Esc => state.input_mode = InputMode::Browse,
        KeyCode::Backspace => state.input_pop(),
        KeyCode::Char(c) => state.input_push(c),
        _ => {}
    }
    Vec::new()
}

/// Handles key input on the result grid.
fn handle_browse_input(state: &mut BrowserState, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Char('q') => state.should_quit = true,
        KeyCode::Char('/') => state.input_mode = InputMode::Search,
        KeyCode::Left | KeyCode::Char('h') => state.move_left(),
        KeyCode::Right | KeyCode::Char('l') => state.move_right(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Enter => {
            state.open_selected();
        }
        KeyCode::Char('n') | KeyCode::PageDown => return state.next_page(),
        KeyCode::Char('p') | KeyCode::PageUp => return state.prev_page(),
        _ => {}
    }
    Vec::new()
}

/// Handles key input while the detail overlay is open.
fn handle_overlay_input(state: &mut BrowserState, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => state.close_detail(),
        KeyCode::Char('o') => {
            if let Some(movie) = state.coordinator.selected() {
                return open_poster(movie);
            }
        }
        _ => {}
    }
    Vec::new()
}

/// Handles left clicks against the regions recorded by the last draw.
fn handle_mouse(state: &mut BrowserState, mouse: &MouseEvent) -> Vec<Effect> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return Vec::new();
    }
    let position = Position::new(mouse.column, mouse.row);

    if state.coordinator.selected().is_some() {
        if state
            .hits
            .overlay
            .is_none_or(|overlay| !overlay.contains(position))
        {
            state.close_detail();
        }
        return Vec::new();
    }

    if state.hits.search.contains(position) {
        state.input_mode = InputMode::Search;
    } else if let Some(index) = state.hits.card_at(position) {
        state.input_mode = InputMode::Browse;
        state.open_at(index);
    } else if let Some(page) = state.hits.page_at(position) {
        return state.go_to_page(page);
    }
    Vec::new()
}

/// Opens the poster of `movie` in the system browser.
fn open_poster(movie: &TmdbMovie) -> Vec<Effect> {
    let Some(path) = movie.poster_path.as_deref() else {
        return vec![Effect::Notify(Notification::info(
            "This movie has no poster.",
        ))];
    };
    let url = poster_url(path, ui::POSTER_SIZE);
    match open::that(&url) {
        Ok(()) => Vec::new(),
        Err(e) => {
            tracing::warn!(url, error = %e, "failed to open poster");
            vec![Effect::Notify(Notification::warning(
                "Could not open the poster in a browser.",
            ))]
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::{KeyEvent, KeyEventState};
    use moviesearch_api::tmdb::MoviePage;
    use ratatui::layout::Rect;

    use std::cell::Cell;

    use super::*;
    use crate::search::QueryKey;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn loaded_state() -> BrowserState {
        let mut state = BrowserState::new(Duration::from_secs(4));
        state.input = String::from("batman");
        state.submit();
        let page = MoviePage {
            page: 1,
            results: vec![
                TmdbMovie {
                    id: 1,
                    title: String::from("Batman"),
                    ..TmdbMovie::default()
                },
                TmdbMovie {
                    id: 2,
                    title: String::from("Batman Returns"),
                    ..TmdbMovie::default()
                },
            ],
            total_pages: 3,
            total_results: 42,
        };
        state.resolve(QueryKey::new("batman", 1), Ok(page));
        state
    }

    #[test]
    fn test_typing_and_enter_submits() {
        // Arrange
        let mut state = BrowserState::new(Duration::from_secs(4));

        // Act
        for c in "heat".chars() {
            handle_event(&mut state, &key(KeyCode::Char(c)));
        }
        let effects = handle_event(&mut state, &key(KeyCode::Enter));

        // Assert
        assert_eq!(effects, vec![Effect::Fetch(QueryKey::new("heat", 1))]);
        assert_eq!(state.input_mode, InputMode::Browse);
    }

    #[test]
    fn test_q_in_search_mode_is_text() {
        // Arrange
        let mut state = BrowserState::new(Duration::from_secs(4));

        // Act
        handle_event(&mut state, &key(KeyCode::Char('q')));

        // Assert
        assert_eq!(state.input, "q");
        assert!(!state.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_any_mode() {
        // Arrange
        let mut state = BrowserState::new(Duration::from_secs(4));
        let event = Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        });

        // Act
        handle_event(&mut state, &event);

        // Assert
        assert!(state.should_quit);
    }

    #[test]
    fn test_browse_keys_page_and_open() {
        // Arrange
        let mut state = loaded_state();

        // Act
        handle_event(&mut state, &key(KeyCode::Char('l')));
        handle_event(&mut state, &key(KeyCode::Enter));

        // Assert
        assert_eq!(state.coordinator.selected().map(|m| m.id), Some(2));
    }

    #[test]
    fn test_next_page_key_fetches() {
        // Arrange
        let mut state = loaded_state();

        // Act
        let effects = handle_event(&mut state, &key(KeyCode::Char('n')));

        // Assert
        assert_eq!(effects, vec![Effect::Fetch(QueryKey::new("batman", 2))]);
    }

    #[test]
    fn test_overlay_swallows_browse_keys() {
        // Arrange
        let mut state = loaded_state();
        state.open_at(0);

        // Act
        let effects = handle_event(&mut state, &key(KeyCode::Char('n')));
        handle_event(&mut state, &key(KeyCode::Esc));

        // Assert
        assert!(effects.is_empty());
        assert!(state.coordinator.selected().is_none());
        assert_eq!(state.coordinator.page(), 1);
    }

    #[test]
    fn test_click_outside_overlay_closes_it() {
        // Arrange
        let mut state = loaded_state();
        state.open_at(0);
        state.hits.overlay = Some(Rect::new(10, 5, 40, 10));

        // Act
        handle_event(&mut state, &click(20, 8));
        let still_open = state.coordinator.selected().is_some();
        handle_event(&mut state, &click(1, 1));

        // Assert
        assert!(still_open);
        assert!(state.coordinator.selected().is_none());
    }

    #[test]
    fn test_click_on_card_opens_detail() {
        // Arrange
        let mut state = loaded_state();
        state.hits.cards = vec![(0, Rect::new(0, 3, 30, 5)), (1, Rect::new(30, 3, 30, 5))];

        // Act
        handle_event(&mut state, &click(35, 4));

        // Assert
        assert_eq!(state.cursor, 1);
        assert_eq!(state.coordinator.selected().map(|m| m.id), Some(2));
    }

    #[test]
    fn test_click_on_page_number_fetches() {
        // Arrange
        let mut state = loaded_state();
        state.hits.pages = vec![(3, Rect::new(10, 25, 3, 1))];

        // Act
        let effects = handle_event(&mut state, &click(11, 25));

        // Assert
        assert_eq!(effects, vec![Effect::Fetch(QueryKey::new("batman", 3))]);
    }

    #[test]
    fn test_open_poster_without_path_notifies() {
        // Arrange
        let movie = TmdbMovie::default();

        // Act
        let effects = open_poster(&movie);

        // Assert
        assert!(matches!(effects.first(), Some(Effect::Notify(_))));
    }

    #[test]
    fn test_restore_terminal_runs_every_step_after_failure() {
        // Arrange
        let ran = Cell::new(0_u32);
        let count = || -> io::Result<()> {
            ran.set(ran.get() + 1);
            Ok(())
        };
        let fail_raw_mode = || -> io::Result<()> {
            ran.set(ran.get() + 1);
            Err(io::Error::other("not a tty"))
        };
        let fail_cursor = || -> io::Result<()> {
            ran.set(ran.get() + 1);
            Err(io::Error::other("closed"))
        };

        // Act
        let result = restore_terminal([
            ("failed to disable raw mode", Box::new(fail_raw_mode)),
            ("failed to leave alternate screen", Box::new(count)),
            ("failed to show cursor", Box::new(fail_cursor)),
        ]);

        // Assert
        let err = result.unwrap_err();
        assert_eq!(ran.get(), 3);
        assert_eq!(err.to_string(), "failed to disable raw mode");
        assert_eq!(err.root_cause().to_string(), "not a tty");
    }

    #[test]
    fn test_restore_terminal_succeeds_when_all_steps_do() {
        // Arrange
        let ran = Cell::new(0_u32);
        let count = || -> io::Result<()> {
            ran.set(ran.get() + 1);
            Ok(())
        };

        // Act
        let result = restore_terminal([
            ("first", Box::new(count)),
            ("second", Box::new(count)),
        ]);

        // Assert
        assert!(result.is_ok());
        assert_eq!(ran.get(), 2);
    }
}
