//! shelf-search: debounced book search merged with the user's shelves
//!
//! This library provides:
//! - A search service contract and a Books API client implementing it
//! - A cancellable debouncer for query edits
//! - The merge rule that annotates hits with the user's shelf assignments
//! - `SearchController`, which ties these together behind a small state API

pub mod books_api;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod http;
pub mod merge;
pub mod service;

pub use books_api::{BooksApiClient, ShelfLayout};
pub use config::{ApiConfig, ConfigError, SearchConfig, ShelfSearchConfig};
pub use controller::{SearchController, SearchState, ShelfChangeCallback, NOT_FOUND_MESSAGE};
pub use debounce::{Debouncer, ScheduledTask};
pub use error::{Result, SearchError};
pub use http::HttpError;
pub use merge::{annotate_shelves, filter_by_title, merge_results};
pub use service::{SearchResponse, SearchService, ShelfStore};

pub use shelf_domain::{Book, Bookshelf, Shelf};
