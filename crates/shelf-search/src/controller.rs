//! Search controller
//!
//! Owns the query text, the annotated result list and the error message.
//! Each query edit (or bookshelf change) restarts a debounce timer; when it
//! fires the search service is called and its hits are merged with the
//! bookshelf.
//!
//! Every scheduled search carries the generation it was scheduled under.
//! Results land only if no newer edit has happened since, so a search that
//! was already in flight when superseded can never overwrite newer state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shelf_domain::{Book, Bookshelf, Shelf};
use tokio::sync::watch;

use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::error::SearchError;
use crate::merge::merge_results;
use crate::service::{SearchResponse, SearchService};

/// Message shown for both a not-found response and a failed search
pub const NOT_FOUND_MESSAGE: &str = "No books found.";

/// Snapshot of what the search view displays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    /// Hits annotated with the user's shelf for each book
    pub results: Vec<Book>,
    pub error: Option<String>,
}

/// Called when the user moves a search result to another shelf
pub type ShelfChangeCallback = Box<dyn Fn(&Book, Shelf) + Send + Sync>;

struct Shared {
    state: SearchState,
    bookshelf: Arc<Bookshelf>,
    generation: u64,
}

/// State shared with spawned search tasks
struct Core {
    shared: Mutex<Shared>,
    updates: watch::Sender<SearchState>,
}

impl Core {
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, shared: &Shared) {
        self.updates.send_replace(shared.state.clone());
    }

    fn apply(
        &self,
        generation: u64,
        query: &str,
        bookshelf: &Bookshelf,
        outcome: Result<SearchResponse, SearchError>,
    ) {
        let mut shared = self.lock();
        if shared.generation != generation {
            tracing::trace!(generation, current = shared.generation, "discarding stale search");
            return;
        }

        match outcome {
            Ok(SearchResponse::Books(books)) => {
                let results = merge_results(books, query, bookshelf);
                tracing::debug!(generation, results = results.len(), "search applied");
                shared.state.results = results;
                shared.state.error = None;
            }
            Ok(SearchResponse::NotFound { .. }) | Err(_) => {
                tracing::debug!(generation, "search found nothing");
                shared.state.results.clear();
                shared.state.error = Some(NOT_FOUND_MESSAGE.to_string());
            }
        }
        self.publish(&shared);
    }
}

/// Debounced search merged with the caller's bookshelf.
///
/// Must be created and driven inside a tokio runtime. Dropping the
/// controller cancels the pending timer and any search it started.
pub struct SearchController<S: SearchService> {
    service: Arc<S>,
    config: SearchConfig,
    core: Arc<Core>,
    // Held across each edit so that generation order matches schedule order
    debouncer: Mutex<Debouncer>,
    on_shelf_change: ShelfChangeCallback,
}

impl<S: SearchService> SearchController<S> {
    pub fn new<F>(service: S, bookshelf: Bookshelf, on_shelf_change: F, config: SearchConfig) -> Self
    where
        F: Fn(&Book, Shelf) + Send + Sync + 'static,
    {
        let (updates, _) = watch::channel(SearchState::default());
        Self {
            service: Arc::new(service),
            debouncer: Mutex::new(Debouncer::new(config.debounce())),
            config,
            core: Arc::new(Core {
                shared: Mutex::new(Shared {
                    state: SearchState::default(),
                    bookshelf: Arc::new(bookshelf),
                    generation: 0,
                }),
                updates,
            }),
            on_shelf_change: Box::new(on_shelf_change),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> SearchState {
        self.core.lock().state.clone()
    }

    /// Receive a new snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.core.updates.subscribe()
    }

    /// True while a search is waiting out the quiet period or in flight
    pub fn is_pending(&self) -> bool {
        self.lock_debouncer().is_pending()
    }

    /// Handle an edit of the query text.
    ///
    /// A blank query clears results and error at once and cancels any
    /// pending search. Otherwise the error is cleared and a search is
    /// scheduled after the quiet period.
    pub fn on_query_change(&self, query: impl Into<String>) {
        let mut debouncer = self.lock_debouncer();
        {
            let mut shared = self.core.lock();
            shared.state.query = query.into();
            shared.state.error = None;
        }
        self.rerun(&mut debouncer);
    }

    /// Replace the bookshelf. Re-runs the search so annotations follow the new assignments.
    pub fn set_bookshelf(&self, bookshelf: Bookshelf) {
        let mut debouncer = self.lock_debouncer();
        self.core.lock().bookshelf = Arc::new(bookshelf);
        self.rerun(&mut debouncer);
    }

    /// Move a displayed book to `shelf`.
    ///
    /// Forwards the change to the owner's callback and updates the shown
    /// result in place without searching again. No-op without a book.
    pub fn on_shelf_change(&self, book: Option<&Book>, shelf: Shelf) {
        let Some(book) = book else {
            return;
        };

        (self.on_shelf_change)(book, shelf);

        let mut shared = self.core.lock();
        for result in shared.state.results.iter_mut().filter(|b| b.id == book.id) {
            result.shelf = shelf;
        }
        self.core.publish(&shared);
    }

    fn lock_debouncer(&self) -> MutexGuard<'_, Debouncer> {
        self.debouncer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn rerun(&self, debouncer: &mut Debouncer) {
        let mut shared = self.core.lock();
        shared.generation += 1;
        let generation = shared.generation;
        let query = shared.state.query.trim().to_string();

        if query.is_empty() {
            shared.state.results.clear();
            shared.state.error = None;
            self.core.publish(&shared);
            drop(shared);
            debouncer.cancel();
            return;
        }

        self.core.publish(&shared);
        let bookshelf = Arc::clone(&shared.bookshelf);
        drop(shared);

        let service = Arc::clone(&self.service);
        let core = Arc::clone(&self.core);
        let limit = self.config.result_limit;

        tracing::debug!(generation, %query, "search scheduled");
        debouncer.schedule(async move {
            tracing::debug!(generation, %query, limit, "search dispatched");
            let outcome = service.search(&query, limit).await;
            core.apply(generation, &query, &bookshelf, outcome);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct StaticService(Vec<Book>);

    impl SearchService for StaticService {
        async fn search(&self, _query: &str, _limit: u32) -> Result<SearchResponse, SearchError> {
            Ok(SearchResponse::Books(self.0.clone()))
        }
    }

    fn controller(books: Vec<Book>) -> SearchController<StaticService> {
        SearchController::new(
            StaticService(books),
            Bookshelf::default(),
            |_, _| {},
            SearchConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_query_clears_immediately() {
        let controller = controller(vec![Book::new("1", "Dune")]);
        controller.on_query_change("dune");
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(controller.state().results.len(), 1);

        controller.on_query_change("   ");
        let state = controller.state();
        assert!(state.results.is_empty());
        assert!(state.error.is_none());
        assert!(!controller.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_results() {
        let controller = controller(vec![Book::new("1", "Dune")]);
        let mut updates = controller.subscribe();
        controller.on_query_change("dune");
        let _ = updates.borrow_and_update();

        updates.changed().await.unwrap();
        assert_eq!(updates.borrow().results.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shelf_change_without_book_is_noop() {
        let controller = controller(vec![]);
        controller.on_shelf_change(None, Shelf::Read);
        assert_eq!(controller.state(), SearchState::default());
    }
}
