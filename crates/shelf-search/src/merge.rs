//! Merge search hits with the user's shelf assignments.
//!
//! The service may return loose matches, so hits are re-filtered by title
//! before their shelf is looked up on the bookshelf.

use shelf_domain::{Book, Bookshelf};

/// Keep books whose title contains `query`, ignoring case
pub fn filter_by_title(books: Vec<Book>, query: &str) -> Vec<Book> {
    books.into_iter().filter(|b| b.title_contains(query)).collect()
}

/// Set each book's shelf from the bookshelf; unshelved books get `Shelf::None`
pub fn annotate_shelves(books: Vec<Book>, bookshelf: &Bookshelf) -> Vec<Book> {
    books
        .into_iter()
        .map(|book| {
            let shelf = bookshelf.shelf_of(&book.id);
            book.with_shelf(shelf)
        })
        .collect()
}

/// Filter then annotate, preserving service order
pub fn merge_results(books: Vec<Book>, query: &str, bookshelf: &Bookshelf) -> Vec<Book> {
    annotate_shelves(filter_by_title(books, query), bookshelf)
}
