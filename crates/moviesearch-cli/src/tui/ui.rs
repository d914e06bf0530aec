//! TUI rendering logic for the movie browser.

use moviesearch_api::tmdb::{MoviePage, TmdbMovie, poster_url};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::pagination::{self, PageItem};
use super::state::{BrowserState, HitAreas, InputMode};
use super::toast::Toasts;
use crate::search::{MAX_PAGE, NotificationLevel, RenderState};

/// Minimum card width; the grid fits as many columns as this allows.
const CARD_WIDTH: u16 = 30;

/// Card height including borders.
const CARD_HEIGHT: u16 = 5;

/// Toast width.
const TOAST_WIDTH: u16 = 44;

/// Poster size requested from the TMDB image CDN.
pub const POSTER_SIZE: &str = "w500";

/// Shown in place of the grid when the current search failed.
const ERROR_TEXT: &str = "Whoops, something went wrong! Please try again!";

/// Draws the movie browser UI and records clickable regions.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    let render = state.coordinator.render_state();
    let total_pages = render
        .grid()
        .map_or(0, |page| page.total_pages.min(MAX_PAGE));
    let pagination_height = if total_pages > 1 { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                 // search box
            Constraint::Min(5),                    // results
            Constraint::Length(pagination_height), // pagination
            Constraint::Length(3),                 // footer
        ])
        .split(frame.area());

    state.hits = HitAreas {
        search: chunks[0],
        ..HitAreas::default()
    };

    draw_search_box(frame, chunks[0], state);
    draw_results(frame, chunks[1], state, &render);
    if total_pages > 1 {
        draw_pagination(frame, chunks[2], state, total_pages);
    }
    draw_footer(frame, chunks[3], state);

    if let Some(movie) = state.coordinator.selected().cloned() {
        let area = centered_rect(frame.area(), 70, 70);
        draw_detail(frame, area, &movie);
        state.hits.overlay = Some(area);
    }

    draw_toasts(frame, chunks[1], &state.toasts);
}

/// Draws the search input.
fn draw_search_box(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let editing = state.input_mode == InputMode::Search;
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(state.input.as_str()).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search movies: / "),
    );
    frame.render_widget(input, area);

    if editing && state.coordinator.selected().is_none() {
        let typed = u16::try_from(state.input.chars().count()).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(typed)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position(Position::new(x, area.y.saturating_add(1)));
    }
}

/// Draws the results area for the current render state.
fn draw_results(frame: &mut Frame, area: Rect, state: &mut BrowserState, render: &RenderState) {
    match render {
        RenderState::Idle => draw_message(
            frame,
            area,
            vec![Line::from(
                "Type a title and press Enter to search TMDB.",
            )],
            Color::DarkGray,
        ),
        RenderState::Failed { message } => draw_message(
            frame,
            area,
            vec![
                Line::from(Span::styled(
                    ERROR_TEXT,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            Color::Red,
        ),
        RenderState::Empty(_) => draw_message(
            frame,
            area,
            vec![Line::from(format!(
                "No movies found for \"{}\".",
                state.coordinator.query()
            ))],
            Color::DarkGray,
        ),
        RenderState::Populated(_) | RenderState::Loading { .. } => match render.grid() {
            Some(page) => draw_grid(frame, area, state, page, render.is_loading()),
            None => draw_message(
                frame,
                area,
                vec![Line::from("Loading movies\u{2026}")],
                Color::Yellow,
            ),
        },
    }
}

/// Draws a centered message inside the results block.
fn draw_message(frame: &mut Frame, area: Rect, lines: Vec<Line<'_>>, color: Color) {
    let block = Block::default().borders(Borders::ALL).title(" Results ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let top = inner
        .y
        .saturating_add(inner.height.saturating_sub(height) / 2);
    let text_area = Rect::new(inner.x, top, inner.width, height).intersection(inner);
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, text_area);
}

/// Draws the card grid, scrolled so the highlighted card is visible.
#[allow(clippy::arithmetic_side_effects)]
fn draw_grid(
    frame: &mut Frame,
    area: Rect,
    state: &mut BrowserState,
    page: &MoviePage,
    refreshing: bool,
) {
    let mut title = format!(
        " Results: page {} of {} ({} movies) ",
        page.page, page.total_pages, page.total_results
    );
    if refreshing {
        title.push_str(" loading\u{2026} ");
    }
    let border_style = if refreshing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = (inner.width / CARD_WIDTH).max(1);
    let visible_rows = usize::from((inner.height / CARD_HEIGHT).max(1));
    let card_width = inner.width / columns;
    let columns = usize::from(columns);
    state.grid_columns = columns;

    let cursor_row = state.cursor / columns;
    let first_row = cursor_row.saturating_sub(visible_rows - 1);
    let first_index = first_row * columns;

    for (index, movie) in page
        .results
        .iter()
        .enumerate()
        .skip(first_index)
        .take(visible_rows * columns)
    {
        let offset = index - first_index;
        let col = u16::try_from(offset % columns).unwrap_or(0);
        let row = u16::try_from(offset / columns).unwrap_or(0);
        let rect = Rect::new(
            inner.x + col * card_width,
            inner.y + row * CARD_HEIGHT,
            card_width,
            CARD_HEIGHT,
        )
        .intersection(inner);

        draw_card(frame, rect, movie, index == state.cursor);
        state.hits.cards.push((index, rect));
    }
}

/// Draws one movie card.
fn draw_card(frame: &mut Frame, area: Rect, movie: &TmdbMovie, highlighted: bool) {
    let border_style = if highlighted {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let year = movie.release_year().unwrap_or("----");
    let poster = if movie.poster_path.is_some() {
        "poster"
    } else {
        "no poster"
    };
    let lines = vec![
        Line::from(Span::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw(format!("{year}  ")),
            Span::styled(
                format!("\u{2605} {:.1}", movie.vote_average),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(Span::styled(poster, Style::default().fg(Color::DarkGray))),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(card, area);
}

/// Draws the page-number bar and records its clickable items.
fn draw_pagination(frame: &mut Frame, area: Rect, state: &mut BrowserState, total_pages: u32) {
    let current = state.coordinator.page();
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);

    let mut spans = Vec::new();
    let mut x = inner.x;
    for item in pagination::items(current, total_pages) {
        let label = format!(" {} ", item.label());
        let width = u16::try_from(label.chars().count()).unwrap_or(u16::MAX);
        let target = item.target(current, total_pages);

        let style = match item {
            PageItem::Page(page) if page == current => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            _ if target.is_none() => Style::default().fg(Color::DarkGray),
            _ => Style::default(),
        };
        if let Some(page) = target {
            let rect = Rect::new(x, inner.y, width, 1).intersection(inner);
            state.hits.pages.push((page, rect));
        }

        spans.push(Span::styled(label, style));
        x = x.saturating_add(width);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = if state.coordinator.selected().is_some() {
        "Esc/q/Enter: close  o: open poster  click outside: close"
    } else if state.input_mode == InputMode::Search {
        "Type to search | Enter: search | Esc: back to results | Ctrl+C: quit"
    } else {
        "\u{2190}\u{2191}\u{2193}\u{2192}/hjkl: move  Enter: details  n/p: next/prev page  /: search  q: quit"
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draws the detail overlay for `movie`.
fn draw_detail(frame: &mut Frame, area: Rect, movie: &TmdbMovie) {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if let Some(original) = movie
        .original_title
        .as_deref()
        .filter(|original| *original != movie.title)
    {
        lines.push(Line::from(vec![
            Span::styled("Original title: ", label),
            Span::raw(original.to_owned()),
        ]));
    }
    let released = movie
        .release_date
        .as_deref()
        .filter(|date| !date.is_empty())
        .unwrap_or("Unknown");
    lines.push(Line::from(vec![
        Span::styled("Released:       ", label),
        Span::raw(released.to_owned()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Rating:         ", label),
        Span::styled(
            format!("\u{2605} {:.1} / 10", movie.vote_average),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(format!(" ({} votes)", movie.vote_count)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Popularity:     ", label),
        Span::raw(format!("{:.1}", movie.popularity)),
    ]));
    if let Some(language) = movie.original_language.as_deref() {
        lines.push(Line::from(vec![
            Span::styled("Language:       ", label),
            Span::raw(language.to_owned()),
        ]));
    }
    let poster = movie.poster_path.as_deref().map_or_else(
        || String::from("not available"),
        |path| poster_url(path, POSTER_SIZE),
    );
    lines.push(Line::from(vec![
        Span::styled("Poster:         ", label),
        Span::raw(poster),
    ]));
    lines.push(Line::from(""));
    let overview = movie
        .overview
        .as_deref()
        .filter(|text| !text.is_empty())
        .unwrap_or("No overview available.");
    lines.push(Line::from(overview.to_owned()));

    let title = match movie.release_year() {
        Some(year) => format!(" {} ({year}) ", movie.title),
        None => format!(" {} ", movie.title),
    };
    let detail = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(detail, area);
}

/// Stacks toasts in the top-right corner of `area`.
fn draw_toasts(frame: &mut Frame, area: Rect, toasts: &Toasts) {
    if toasts.is_empty() {
        return;
    }
    let width = TOAST_WIDTH.min(area.width);
    let x = area.right().saturating_sub(width);
    let mut y = area.y;

    for toast in toasts.iter() {
        let height = 3;
        if y.saturating_add(height) > area.bottom() {
            break;
        }
        let (color, title) = match toast.notification.level {
            NotificationLevel::Info => (Color::Cyan, " Info "),
            NotificationLevel::Warning => (Color::Yellow, " Warning "),
            NotificationLevel::Error => (Color::Red, " Error "),
        };
        let rect = Rect::new(x, y, width, height);
        let widget = Paragraph::new(toast.notification.message.as_str())
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(title),
            );

        frame.render_widget(Clear, rect);
        frame.render_widget(widget, rect);
        y = y.saturating_add(height);
    }
}

/// Returns a rectangle of the given percentage size centered in `area`.
#[allow(clippy::arithmetic_side_effects)]
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = u16::try_from(u32::from(area.width) * u32::from(percent_x) / 100).unwrap_or(area.width);
    let height =
        u16::try_from(u32::from(area.height) * u32::from(percent_y) / 100).unwrap_or(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use moviesearch_api::tmdb::FetchError;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::search::{Effect, QueryKey};

    fn render(state: &mut BrowserState) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn batman_state(total_pages: u32) -> BrowserState {
        let mut state = BrowserState::new(Duration::from_secs(4));
        state.input = String::from("batman");
        state.submit();
        let page = MoviePage {
            page: 1,
            results: vec![
                TmdbMovie {
                    id: 268,
                    title: String::from("Batman"),
                    release_date: Some(String::from("1989-06-21")),
                    vote_average: 7.2,
                    poster_path: Some(String::from("/kBf3g9crrADGMc2AMAMlLBgSm2h.jpg")),
                    overview: Some(String::from("The Dark Knight of Gotham City.")),
                    ..TmdbMovie::default()
                },
                TmdbMovie {
                    id: 414_906,
                    title: String::from("The Batman"),
                    ..TmdbMovie::default()
                },
            ],
            total_pages,
            total_results: 40,
        };
        state.resolve(QueryKey::new("batman", 1), Ok(page));
        state
    }

    #[test]
    fn test_idle_screen_shows_hint() {
        // Arrange
        let mut state = BrowserState::new(Duration::from_secs(4));

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("Type a title"));
        assert!(state.hits.cards.is_empty());
        assert!(state.hits.pages.is_empty());
    }

    #[test]
    fn test_grid_records_card_hit_areas() {
        // Arrange
        let mut state = batman_state(2);

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("The Batman"));
        assert!(screen.contains("page 1 of 2"));
        assert_eq!(state.hits.cards.len(), 2);
        assert_eq!(state.grid_columns, 3);
    }

    #[test]
    fn test_pagination_records_targets() {
        // Arrange
        let mut state = batman_state(2);

        // Act
        render(&mut state);

        // Assert
        let targets: Vec<u32> = state.hits.pages.iter().map(|&(page, _)| page).collect();
        assert_eq!(targets, vec![2, 2]);
    }

    #[test]
    fn test_single_page_hides_pagination() {
        // Arrange
        let mut state = batman_state(1);

        // Act
        render(&mut state);

        // Assert
        assert!(state.hits.pages.is_empty());
    }

    #[test]
    fn test_empty_page_hides_grid_and_pagination() {
        // Arrange
        let mut state = BrowserState::new(Duration::from_secs(4));
        state.input = String::from("batman");
        state.submit();
        let page = MoviePage {
            page: 1,
            results: Vec::new(),
            total_pages: 3,
            total_results: 0,
        };
        state.resolve(QueryKey::new("batman", 1), Ok(page));

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("No movies found"));
        assert!(!screen.contains("page 1 of 3"));
        assert!(state.hits.cards.is_empty());
        assert!(state.hits.pages.is_empty());
    }

    #[test]
    fn test_detail_overlay_is_drawn() {
        // Arrange
        let mut state = batman_state(1);
        state.open_at(0);

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("Batman (1989)"));
        assert!(screen.contains("Dark Knight"));
        assert!(state.hits.overlay.is_some());
    }

    #[test]
    fn test_failure_shows_error_text() {
        // Arrange
        let mut state = BrowserState::new(Duration::from_secs(4));
        state.input = String::from("batman");
        state.submit();
        let effects = state.resolve(QueryKey::new("batman", 1), Err(FetchError::MissingCredential));
        for effect in effects {
            if let Effect::Notify(notification) = effect {
                state.toasts.push(notification);
            }
        }

        // Act
        let screen = render(&mut state);

        // Assert
        assert!(screen.contains("Whoops, something went wrong!"));
        assert!(screen.contains("An error occurred while fetching movies."));
    }
}
