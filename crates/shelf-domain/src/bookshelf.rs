//! The user's shelf assignments
//!
//! A `Bookshelf` is the authoritative shelf per book id. The search
//! controller only reads it; the owner updates it when the user moves a book.

use serde::{Deserialize, Serialize};

use crate::book::Book;
use crate::shelf::Shelf;

/// Ordered collection of the books currently on some shelf
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bookshelf {
    books: Vec<Book>,
}

impl Bookshelf {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Shelf of the first entry with this id, `Shelf::None` if absent
    pub fn shelf_of(&self, id: &str) -> Shelf {
        self.find(id).map(|b| b.shelf).unwrap_or_default()
    }

    pub fn find(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn books_on(&self, shelf: Shelf) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(move |b| b.shelf == shelf)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Record a shelf change.
    ///
    /// Moving to `Shelf::None` takes the book off the shelves entirely.
    /// A book not yet shelved is appended.
    pub fn move_book(&mut self, book: &Book, shelf: Shelf) {
        if shelf == Shelf::None {
            self.books.retain(|b| b.id != book.id);
            return;
        }

        match self.books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => existing.shelf = shelf,
            None => self.books.push(book.clone().with_shelf(shelf)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Bookshelf {
        Bookshelf::new(vec![
            Book::new("1", "Dune").with_shelf(Shelf::Read),
            Book::new("2", "Hyperion").with_shelf(Shelf::WantToRead),
            Book::new("3", "Solaris").with_shelf(Shelf::CurrentlyReading),
        ])
    }

    #[test]
    fn test_shelf_of() {
        let shelf = sample();
        assert_eq!(shelf.shelf_of("1"), Shelf::Read);
        assert_eq!(shelf.shelf_of("42"), Shelf::None);
    }

    #[test]
    fn test_first_entry_wins() {
        let shelf = Bookshelf::new(vec![
            Book::new("1", "Dune").with_shelf(Shelf::Read),
            Book::new("1", "Dune").with_shelf(Shelf::WantToRead),
        ]);
        assert_eq!(shelf.shelf_of("1"), Shelf::Read);
    }

    #[test]
    fn test_move_existing_book() {
        let mut shelf = sample();
        shelf.move_book(&Book::new("2", "Hyperion"), Shelf::Read);
        assert_eq!(shelf.shelf_of("2"), Shelf::Read);
        assert_eq!(shelf.books_on(Shelf::Read).count(), 2);
        assert_eq!(shelf.len(), 3);
    }

    #[test]
    fn test_move_new_book_appends() {
        let mut shelf = sample();
        shelf.move_book(&Book::new("4", "Ubik"), Shelf::WantToRead);
        assert_eq!(shelf.len(), 4);
        assert_eq!(shelf.iter().last().map(|b| b.id.as_str()), Some("4"));
        assert_eq!(shelf.shelf_of("4"), Shelf::WantToRead);
    }

    #[test]
    fn test_move_to_none_removes() {
        let mut shelf = sample();
        shelf.move_book(&Book::new("1", "Dune"), Shelf::None);
        assert!(shelf.find("1").is_none());
        let ids: Vec<_> = shelf.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_serializes_as_list() {
        let shelf = Bookshelf::new(vec![Book::new("1", "Dune").with_shelf(Shelf::Read)]);
        let json = serde_json::to_value(&shelf).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["shelf"], "read");
    }
}
