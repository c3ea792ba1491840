//! Search service contract
//!
//! The controller talks to any backend implementing [`SearchService`]; shelf
//! moves are persisted through a [`ShelfStore`]. The Books API client is the
//! production implementation of both; tests supply mocks.

use std::future::Future;
use std::sync::Arc;

use shelf_domain::{Book, Shelf};

use crate::books_api::ShelfLayout;
use crate::error::SearchError;

/// Outcome of a search that reached the service
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    /// Books matching the query, in service order
    Books(Vec<Book>),
    /// The service signalled that nothing matched
    NotFound { reason: String },
}

/// A backend that can look up books by free-text query.
///
/// Implementations must be `Send + Sync` because searches run on spawned tasks.
pub trait SearchService: Send + Sync + 'static {
    /// Search for at most `limit` books matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on transport failure or a malformed response.
    fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<SearchResponse, SearchError>> + Send;
}

impl<S: SearchService> SearchService for Arc<S> {
    fn search(
        &self,
        query: &str,
        limit: u32,
    ) -> impl Future<Output = Result<SearchResponse, SearchError>> + Send {
        (**self).search(query, limit)
    }
}

/// A backend that records which shelf a book is on.
pub trait ShelfStore: Send + Sync + 'static {
    /// Move book `id` to `shelf`; `Shelf::None` removes it from every shelf.
    ///
    /// Returns the server's shelf layout after the move.
    fn update(
        &self,
        id: &str,
        shelf: Shelf,
    ) -> impl Future<Output = Result<ShelfLayout, SearchError>> + Send;
}

impl<S: ShelfStore> ShelfStore for Arc<S> {
    fn update(
        &self,
        id: &str,
        shelf: Shelf,
    ) -> impl Future<Output = Result<ShelfLayout, SearchError>> + Send {
        (**self).update(id, shelf)
    }
}
