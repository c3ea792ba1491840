//! Keybinding definitions

use crossterm::event::{KeyCode, KeyModifiers};
use shelf_search::Shelf;

/// Keybinding action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the search page
    Back,
    /// Append a character to the query
    Insert(char),
    /// Delete the last query character
    Backspace,
    /// Clear the whole query
    ClearQuery,
    /// Move up in the result list
    MoveUp,
    /// Move down in the result list
    MoveDown,
    /// Put the selected book on a shelf
    MoveToShelf(Shelf),
}

/// Get the action for a key on the search page
pub fn search_action(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Back),
            KeyCode::Char('u') => Some(Action::ClearQuery),
            _ => None,
        };
    }

    match code {
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::F(1) => Some(Action::MoveToShelf(Shelf::CurrentlyReading)),
        KeyCode::F(2) => Some(Action::MoveToShelf(Shelf::WantToRead)),
        KeyCode::F(3) => Some(Action::MoveToShelf(Shelf::Read)),
        KeyCode::F(4) => Some(Action::MoveToShelf(Shelf::None)),
        KeyCode::Char(c) => Some(Action::Insert(c)),
        _ => None,
    }
}
