//! One row of the result list: title, authors and current shelf.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};
use shelf_search::{Book, Shelf};

pub struct BookItem<'a> {
    book: &'a Book,
}

impl<'a> BookItem<'a> {
    pub fn new(book: &'a Book) -> Self {
        Self { book }
    }

    /// Color used for the shelf badge
    pub fn shelf_color(shelf: Shelf) -> Color {
        match shelf {
            Shelf::CurrentlyReading => Color::Green,
            Shelf::WantToRead => Color::Yellow,
            Shelf::Read => Color::Blue,
            Shelf::None => Color::DarkGray,
        }
    }

    pub fn badge(shelf: Shelf) -> String {
        format!("[{}]", shelf.display_name())
    }

    pub fn into_list_item(self) -> ListItem<'a> {
        let shelf = self.book.shelf;
        let mut spans = vec![
            Span::styled(
                Self::badge(shelf),
                Style::default().fg(Self::shelf_color(shelf)),
            ),
            Span::raw(" "),
            Span::styled(
                self.book.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ];

        if !self.book.authors.is_empty() {
            spans.push(Span::styled(
                format!("  {}", self.book.author_line()),
                Style::default().fg(Color::Gray),
            ));
        }

        ListItem::new(Line::from(spans))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badges() {
        assert_eq!(BookItem::badge(Shelf::WantToRead), "[Want to Read]");
        assert_eq!(BookItem::badge(Shelf::None), "[None]");
    }

    #[test]
    fn test_shelf_colors() {
        assert_eq!(BookItem::shelf_color(Shelf::CurrentlyReading), Color::Green);
        assert_eq!(BookItem::shelf_color(Shelf::None), Color::DarkGray);
    }
}
