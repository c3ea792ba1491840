//! Books API client
//!
//! REST endpoints:
//! - `POST /search` with `{"query", "maxResults"}`
//! - `GET /books` for the user's shelved books
//! - `GET /books/{id}`
//! - `PUT /books/{id}` with `{"shelf"}`
//!
//! A search with no hits comes back as `{"books": {"error": "...", "items": []}}`
//! rather than an empty array.

use serde::{Deserialize, Serialize};
use shelf_domain::{Book, Bookshelf, Shelf};

use crate::config::ApiConfig;
use crate::error::{Result, SearchError};
use crate::http::{HttpClient, HttpError};
use crate::service::{SearchResponse, SearchService, ShelfStore};

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    books: SearchPayload,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchPayload {
    Books(Vec<Book>),
    Error { error: String },
}

#[derive(Debug, Deserialize)]
struct BookEnvelope {
    book: Book,
}

#[derive(Debug, Deserialize)]
struct BooksEnvelope {
    books: Vec<Book>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: u32,
}

#[derive(Debug, Serialize)]
struct UpdateRequest {
    shelf: Shelf,
}

/// Book ids per shelf, as returned after a shelf update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShelfLayout {
    pub currently_reading: Vec<String>,
    pub want_to_read: Vec<String>,
    pub read: Vec<String>,
}

impl ShelfLayout {
    pub fn shelf_of(&self, id: &str) -> Shelf {
        let contains = |ids: &[String]| ids.iter().any(|i| i == id);
        if contains(&self.currently_reading) {
            Shelf::CurrentlyReading
        } else if contains(&self.want_to_read) {
            Shelf::WantToRead
        } else if contains(&self.read) {
            Shelf::Read
        } else {
            Shelf::None
        }
    }
}

pub struct BooksApiClient {
    http: HttpClient,
}

impl BooksApiClient {
    pub fn new(config: &ApiConfig) -> std::result::Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// Free-text search across the catalogue
    pub async fn search(&self, query: &str, max_results: u32) -> Result<SearchResponse> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("empty query".to_string()));
        }
        let body = SearchRequest { query, max_results };
        let response = self.http.post_json("/search", &body).await?;
        parse_search_response(&response.body)
    }

    /// Fetch a single book by id
    pub async fn get(&self, id: &str) -> Result<Book> {
        let response = self.http.get(&format!("/books/{}", id)).await?;
        parse_book_response(&response.body)
    }

    /// Fetch every book on the user's shelves
    pub async fn get_all(&self) -> Result<Bookshelf> {
        let response = self.http.get("/books").await?;
        parse_books_response(&response.body).map(Bookshelf::new)
    }

    /// Move a book to another shelf; `Shelf::None` removes it
    pub async fn update(&self, id: &str, shelf: Shelf) -> Result<ShelfLayout> {
        let response = self
            .http
            .put_json(&format!("/books/{}", id), &UpdateRequest { shelf })
            .await?;
        parse_shelf_layout(&response.body)
    }
}

impl SearchService for BooksApiClient {
    async fn search(&self, query: &str, limit: u32) -> Result<SearchResponse> {
        BooksApiClient::search(self, query, limit).await
    }
}

impl ShelfStore for BooksApiClient {
    async fn update(&self, id: &str, shelf: Shelf) -> Result<ShelfLayout> {
        BooksApiClient::update(self, id, shelf).await
    }
}

/// Parse a `POST /search` response body
pub fn parse_search_response(json: &str) -> Result<SearchResponse> {
    let envelope: SearchEnvelope = serde_json::from_str(json)
        .map_err(|e| SearchError::Parse(format!("Invalid search JSON: {}", e)))?;

    Ok(match envelope.books {
        SearchPayload::Books(books) => SearchResponse::Books(books),
        SearchPayload::Error { error } => SearchResponse::NotFound { reason: error },
    })
}

/// Parse a `GET /books/{id}` response body
pub fn parse_book_response(json: &str) -> Result<Book> {
    let envelope: BookEnvelope = serde_json::from_str(json)
        .map_err(|e| SearchError::Parse(format!("Invalid book JSON: {}", e)))?;
    Ok(envelope.book)
}

/// Parse a `GET /books` response body
pub fn parse_books_response(json: &str) -> Result<Vec<Book>> {
    let envelope: BooksEnvelope = serde_json::from_str(json)
        .map_err(|e| SearchError::Parse(format!("Invalid books JSON: {}", e)))?;
    Ok(envelope.books)
}

/// Parse a `PUT /books/{id}` response body
pub fn parse_shelf_layout(json: &str) -> Result<ShelfLayout> {
    serde_json::from_str(json)
        .map_err(|e| SearchError::Parse(format!("Invalid shelf layout JSON: {}", e)))
}
