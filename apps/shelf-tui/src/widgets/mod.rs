//! Reusable TUI widgets

mod book_item;

pub use book_item::BookItem;
