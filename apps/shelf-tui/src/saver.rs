//! Ordered persistence of shelf moves
//!
//! Moves are queued on a single worker task that awaits each save before
//! starting the next, so the server sees them in the order they were made.

use std::time::Duration;

use shelf_search::{Book, SearchError, Shelf, ShelfLayout, ShelfStore};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A shelf move waiting to be saved
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub book: Book,
    pub shelf: Shelf,
}

/// Result of saving one move
#[derive(Debug)]
pub enum SaveOutcome {
    Saved {
        request: SaveRequest,
        layout: ShelfLayout,
    },
    Failed {
        request: SaveRequest,
        error: SearchError,
    },
}

impl SaveOutcome {
    pub fn request(&self) -> &SaveRequest {
        match self {
            SaveOutcome::Saved { request, .. } | SaveOutcome::Failed { request, .. } => request,
        }
    }
}

/// Handle to the save worker
pub struct ShelfSaver {
    requests: mpsc::UnboundedSender<SaveRequest>,
    outcomes: mpsc::UnboundedReceiver<SaveOutcome>,
    worker: JoinHandle<()>,
}

impl ShelfSaver {
    /// Spawn the worker. Must be called inside a tokio runtime.
    pub fn spawn<St: ShelfStore>(store: St) -> Self {
        let (requests, mut queue) = mpsc::unbounded_channel::<SaveRequest>();
        let (report, outcomes) = mpsc::unbounded_channel();

        let worker = tokio::spawn(async move {
            while let Some(request) = queue.recv().await {
                let outcome = match store.update(&request.book.id, request.shelf).await {
                    Ok(layout) => {
                        tracing::debug!("Moved {} to {}", request.book.id, request.shelf);
                        SaveOutcome::Saved { request, layout }
                    }
                    Err(error) => {
                        tracing::warn!(
                            "Failed to move {} to {}: {}",
                            request.book.id,
                            request.shelf,
                            error
                        );
                        SaveOutcome::Failed { request, error }
                    }
                };
                // Nobody listens once the UI has shut down
                let _ = report.send(outcome);
            }
        });

        Self {
            requests,
            outcomes,
            worker,
        }
    }

    /// Queue a move behind any moves already waiting
    pub fn save(&self, request: SaveRequest) {
        if self.requests.send(request).is_err() {
            tracing::warn!("Save worker has stopped, shelf move not saved");
        }
    }

    /// Next finished save, if any
    pub fn try_outcome(&mut self) -> Option<SaveOutcome> {
        self.outcomes.try_recv().ok()
    }

    /// Stop taking moves and give queued ones up to `grace` to finish
    pub async fn shutdown(self, grace: Duration) {
        let Self {
            requests, worker, ..
        } = self;
        drop(requests);

        let abort = worker.abort_handle();
        if tokio::time::timeout(grace, worker).await.is_err() {
            tracing::warn!("Unsaved shelf moves dropped on exit");
            abort.abort();
        }
    }
}
