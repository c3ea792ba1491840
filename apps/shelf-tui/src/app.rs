//! Search page state and rendering

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use shelf_search::{Book, Bookshelf, SearchConfig, SearchController, SearchService, Shelf};
use tokio::sync::mpsc;

use crate::keybindings::{search_action, Action};
use crate::saver::{SaveOutcome, SaveRequest, ShelfSaver};
use crate::widgets::BookItem;

const PLACEHOLDER: &str = "Search books...";
const EMPTY_RESULTS: &str = "search for results.";
const SAVE_GRACE: Duration = Duration::from_secs(3);

/// Moves of one book that the server has not answered yet
struct UnsavedMoves {
    count: usize,
    /// Last shelf the server agreed to
    confirmed: Shelf,
}

/// Search page application state
pub struct App<S: SearchService> {
    /// Debounced search pipeline
    controller: SearchController<S>,
    /// The user's shelves; owned here, read by the controller
    bookshelf: Bookshelf,
    /// Shelf changes forwarded by the controller's callback
    shelf_changes: mpsc::UnboundedReceiver<(Book, Shelf)>,
    /// Ordered persistence of shelf moves
    saver: ShelfSaver,
    /// Per book id, moves still waiting on the server
    unsaved: HashMap<String, UnsavedMoves>,
    /// Query text as typed
    input: String,
    /// Selected result index
    selected: usize,
    /// Last status message
    status_message: Option<String>,
}

impl<S: SearchService> App<S> {
    /// Create the search page. Must be called inside a tokio runtime.
    pub fn new(service: S, saver: ShelfSaver, bookshelf: Bookshelf, config: SearchConfig) -> Self {
        let (tx, shelf_changes) = mpsc::unbounded_channel();
        let controller = SearchController::new(
            service,
            bookshelf.clone(),
            move |book: &Book, shelf| {
                // Receiver lives as long as the app
                let _ = tx.send((book.clone(), shelf));
            },
            config,
        );

        Self {
            controller,
            bookshelf,
            shelf_changes,
            saver,
            unsaved: HashMap::new(),
            input: String::new(),
            selected: 0,
            status_message: None,
        }
    }

    pub fn bookshelf(&self) -> &Bookshelf {
        &self.bookshelf
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Handle a key press. Returns true when the user navigates back.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let Some(action) = search_action(code, modifiers) else {
            return false;
        };

        match action {
            Action::Back => return true,
            Action::Insert(c) => {
                self.input.push(c);
                self.query_changed();
            }
            Action::Backspace => {
                if self.input.pop().is_some() {
                    self.query_changed();
                }
            }
            Action::ClearQuery => {
                self.input.clear();
                self.query_changed();
            }
            Action::MoveUp => {
                let len = self.controller.state().results.len();
                self.selected = self.selected_index(len).saturating_sub(1);
            }
            Action::MoveDown => {
                let len = self.controller.state().results.len();
                self.selected = self.selected_index(len);
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            Action::MoveToShelf(shelf) => {
                let state = self.controller.state();
                self.selected = self.selected_index(state.results.len());
                self.controller
                    .on_shelf_change(state.results.get(self.selected), shelf);
            }
        }
        false
    }

    /// Selection clamped to a list of `len` results.
    ///
    /// The result list can shrink under the selection when a bookshelf
    /// change re-runs the search.
    fn selected_index(&self, len: usize) -> usize {
        self.selected.min(len.saturating_sub(1))
    }

    /// Apply shelf changes the controller forwarded since the last call and
    /// queue them for saving.
    ///
    /// Returns the changes applied.
    pub fn process_shelf_changes(&mut self) -> Vec<(Book, Shelf)> {
        let mut moved = Vec::new();
        while let Ok((book, shelf)) = self.shelf_changes.try_recv() {
            let previous = self.bookshelf.shelf_of(&book.id);
            self.unsaved
                .entry(book.id.clone())
                .or_insert(UnsavedMoves {
                    count: 0,
                    confirmed: previous,
                })
                .count += 1;

            self.bookshelf.move_book(&book, shelf);
            self.status_message = Some(format!(
                "Moved \"{}\" to {}",
                book.title,
                shelf.display_name()
            ));
            self.saver.save(SaveRequest {
                book: book.clone(),
                shelf,
            });
            moved.push((book, shelf));
        }

        if !moved.is_empty() {
            self.controller.set_bookshelf(self.bookshelf.clone());
        }
        moved
    }

    /// Reconcile the bookshelf with saves the server has answered.
    ///
    /// Once the last queued move of a book is answered, the book goes to the
    /// last shelf the server agreed to. A failed move therefore falls back to
    /// where the book was before it.
    pub fn process_save_outcomes(&mut self) {
        let mut changed = false;

        while let Some(outcome) = self.saver.try_outcome() {
            let request = outcome.request().clone();
            let Some(unsaved) = self.unsaved.get_mut(&request.book.id) else {
                continue;
            };

            match &outcome {
                SaveOutcome::Saved { layout, .. } => {
                    unsaved.confirmed = layout.shelf_of(&request.book.id);
                }
                SaveOutcome::Failed { error, .. } => {
                    tracing::debug!("Save of {} failed: {}", request.book.id, error);
                    self.status_message = Some(format!(
                        "Could not move \"{}\" to {}",
                        request.book.title,
                        request.shelf.display_name()
                    ));
                }
            }

            unsaved.count -= 1;
            if unsaved.count > 0 {
                continue;
            }
            let confirmed = unsaved.confirmed;
            self.unsaved.remove(&request.book.id);

            if self.bookshelf.shelf_of(&request.book.id) != confirmed {
                self.bookshelf.move_book(&request.book, confirmed);
                changed = true;
            }
        }

        if changed {
            self.controller.set_bookshelf(self.bookshelf.clone());
        }
    }

    /// Give queued saves a short grace period to finish before exit
    pub async fn shutdown(self) {
        self.saver.shutdown(SAVE_GRACE).await;
    }

    fn query_changed(&mut self) {
        self.selected = 0;
        self.status_message = None;
        self.controller.on_query_change(self.input.clone());
    }

    /// Render the search page
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar
                Constraint::Length(1), // Error / progress
                Constraint::Min(0),    // Results
                Constraint::Length(1), // Status line
            ])
            .split(frame.area());

        self.render_search_bar(frame, chunks[0]);
        self.render_message(frame, chunks[1]);
        self.render_results(frame, chunks[2]);
        self.render_status_line(frame, chunks[3]);
    }

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let back = Span::styled("← ", Style::default().fg(Color::Cyan));
        let text = if self.input.is_empty() {
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.input.as_str())
        };

        let bar = Paragraph::new(Line::from(vec![back, text])).block(
            Block::default()
                .title(" Search books: ")
                .borders(Borders::ALL),
        );
        frame.render_widget(bar, area);

        // Border + back arrow
        let typed = u16::try_from(self.input.chars().count()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(3).saturating_add(typed);
        frame.set_cursor_position(Position::new(
            x.min(area.right().saturating_sub(2)),
            area.y.saturating_add(1),
        ));
    }

    fn render_message(&self, frame: &mut Frame, area: Rect) {
        let state = self.controller.state();
        let line = match state.error {
            Some(error) => Line::from(Span::styled(error, Style::default().fg(Color::Red))),
            None if self.controller.is_pending() => Line::from(Span::styled(
                "Searching...",
                Style::default().fg(Color::DarkGray),
            )),
            None => Line::default(),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let state = self.controller.state();

        if state.results.is_empty() {
            let empty = Paragraph::new(EMPTY_RESULTS)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = state
            .results
            .iter()
            .map(|book| BookItem::new(book).into_list_item())
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" Results ({}) ", state.results.len()))
                    .borders(Borders::ALL),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut list_state =
            ListState::default().with_selected(Some(self.selected_index(state.results.len())));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let text = match &self.status_message {
            Some(message) => message.clone(),
            None => format!(
                "Esc back | ↑↓ select | F1 {} | F2 {} | F3 {} | F4 {} | {} on shelves",
                Shelf::CurrentlyReading.display_name(),
                Shelf::WantToRead.display_name(),
                Shelf::Read.display_name(),
                Shelf::None.display_name(),
                self.bookshelf.len()
            ),
        };
        let status = Paragraph::new(text).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(status, area);
    }
}
