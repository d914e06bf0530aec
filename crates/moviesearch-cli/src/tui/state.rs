//! Movie browser state management.

use std::time::Duration;

use moviesearch_api::tmdb::{FetchError, MoviePage};
use ratatui::layout::{Position, Rect};

use super::toast::Toasts;
use crate::search::{Effect, QueryKey, SearchCoordinator};

/// Input mode for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Typing into the search box.
    Search,
    /// Navigating the result grid.
    Browse,
}

/// Screen regions recorded during the last draw, for mouse hit-testing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HitAreas {
    /// Search box.
    pub search: Rect,
    /// Movie cards by result index.
    pub cards: Vec<(usize, Rect)>,
    /// Pagination items by target page.
    pub pages: Vec<(u32, Rect)>,
    /// Detail overlay, when open.
    pub overlay: Option<Rect>,
}

impl HitAreas {
    /// Returns the result index of the card under `position`.
    #[must_use]
    pub fn card_at(&self, position: Position) -> Option<usize> {
        self.cards
            .iter()
            .find(|(_, rect)| rect.contains(position))
            .map(|&(index, _)| index)
    }

    /// Returns the target page of the pagination item under `position`.
    #[must_use]
    pub fn page_at(&self, position: Position) -> Option<u32> {
        self.pages
            .iter()
            .find(|(_, rect)| rect.contains(position))
            .map(|&(page, _)| page)
    }
}

/// State for the movie browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Query/page/selection state machine.
    pub coordinator: SearchCoordinator,
    /// Search box text.
    pub input: String,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Highlighted card (index into the displayed results).
    pub cursor: usize,
    /// Cards per grid row, as of the last draw.
    pub grid_columns: usize,
    /// Visible toasts.
    pub toasts: Toasts,
    /// Clickable regions from the last draw.
    pub hits: HitAreas,
    /// Set when the user asked to quit.
    pub should_quit: bool,
}

impl BrowserState {
    /// Creates an idle browser with the search box focused.
    #[must_use]
    pub fn new(toast_ttl: Duration) -> Self {
        Self {
            coordinator: SearchCoordinator::new(),
            input: String::new(),
            input_mode: InputMode::Search,
            cursor: 0,
            grid_columns: 1,
            toasts: Toasts::new(toast_ttl),
            hits: HitAreas::default(),
            should_quit: false,
        }
    }

    /// Appends a character to the search box.
    pub fn input_push(&mut self, c: char) {
        self.input.push(c);
    }

    /// Removes the last character from the search box.
    pub fn input_pop(&mut self) {
        self.input.pop();
    }

    /// Submits the search box text.
    ///
    /// Focus moves to the grid unless the text was blank.
    pub fn submit(&mut self) -> Vec<Effect> {
        if !self.input.trim().is_empty() {
            self.input_mode = InputMode::Browse;
            self.cursor = 0;
        }
        self.coordinator.submit(&self.input)
    }

    /// Moves to the next result page.
    pub fn next_page(&mut self) -> Vec<Effect> {
        let effects = self.coordinator.next_page();
        self.after_page_change();
        effects
    }

    /// Moves to the previous result page.
    pub fn prev_page(&mut self) -> Vec<Effect> {
        let effects = self.coordinator.prev_page();
        self.after_page_change();
        effects
    }

    /// Jumps to `page`.
    pub fn go_to_page(&mut self, page: u32) -> Vec<Effect> {
        let effects = self.coordinator.change_page(page);
        self.after_page_change();
        effects
    }

    /// Applies a finished fetch.
    pub fn resolve(&mut self, key: QueryKey, result: Result<MoviePage, FetchError>) -> Vec<Effect> {
        let effects = self.coordinator.resolve(key, result);
        self.clamp_cursor();
        effects
    }

    /// Returns the number of cards in the grid.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.coordinator
            .render_state()
            .grid()
            .map_or(0, |page| page.results.len())
    }

    /// Opens the detail overlay for the highlighted card.
    pub fn open_selected(&mut self) -> bool {
        self.coordinator.select(self.cursor)
    }

    /// Highlights and opens the card at `index`.
    pub fn open_at(&mut self, index: usize) -> bool {
        if index >= self.card_count() {
            return false;
        }
        self.cursor = index;
        self.open_selected()
    }

    /// Closes the detail overlay.
    pub fn close_detail(&mut self) {
        self.coordinator.close_detail();
    }

    /// Moves the highlight one card left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the highlight one card right.
    pub fn move_right(&mut self) {
        let next = self.cursor.saturating_add(1);
        if next < self.card_count() {
            self.cursor = next;
        }
    }

    /// Moves the highlight one row up.
    pub fn move_up(&mut self) {
        if self.cursor >= self.grid_columns {
            self.cursor = self.cursor.saturating_sub(self.grid_columns);
        }
    }

    /// Moves the highlight one row down, stopping at the last card.
    pub fn move_down(&mut self) {
        let count = self.card_count();
        if count == 0 {
            return;
        }
        let next = self.cursor.saturating_add(self.grid_columns);
        self.cursor = next.min(count.saturating_sub(1));
    }

    /// Keeps the highlight on an existing card.
    pub fn clamp_cursor(&mut self) {
        let count = self.card_count();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    fn after_page_change(&mut self) {
        self.cursor = 0;
    }
}
