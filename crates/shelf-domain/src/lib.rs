//! Domain types shared by the shelf-search crates
//!
//! - Book: a catalogue record as returned by the Books API
//! - Shelf: the bucket a user assigns a book to
//! - Bookshelf: the user's ordered shelf assignments

pub mod book;
pub mod bookshelf;
pub mod shelf;

pub use book::*;
pub use bookshelf::*;
pub use shelf::*;
