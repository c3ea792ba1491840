//! Native HTTP client using reqwest

use super::{HttpError, HttpResponse};
use crate::config::ApiConfig;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use std::time::Duration;

pub struct HttpClient {
    client: Client,
    base_url: String,
    token: String,
    user_agent: String,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HttpError::ClientBuild {
                message: e.to_string(),
            })?;

        // Fail early on a bad base URL rather than on the first request
        Url::parse(&config.base_url).map_err(|_| HttpError::InvalidUrl {
            url: config.base_url.clone(),
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Resolve a path against the base URL, keeping any base path prefix
    pub fn url(&self, path: &str) -> Result<Url, HttpError> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|_| HttpError::InvalidUrl { url: joined })
    }

    pub async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        self.send(self.client.get(url)).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<HttpResponse, HttpError> {
        let url = self.url(path)?;
        tracing::debug!(%url, "POST");
        self.send(self.client.post(url).json(body)).await
    }

    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<HttpResponse, HttpError> {
        let url = self.url(path)?;
        tracing::debug!(%url, "PUT");
        self.send(self.client.put(url).json(body)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<HttpResponse, HttpError> {
        let response = request
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .header("Authorization", &self.token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout
                } else {
                    HttpError::RequestFailed {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(HttpError::RateLimited);
        }

        let body = response.text().await.map_err(|e| HttpError::ParseError {
            message: e.to_string(),
        })?;

        let response = HttpResponse { status, body };
        if !response.is_success() {
            return Err(HttpError::Status { status });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_url_join() {
        let client = HttpClient::new(&config("https://books.example.com/")).unwrap();
        assert_eq!(
            client.url("/search").unwrap().as_str(),
            "https://books.example.com/search"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client = HttpClient::new(&config("https://example.com/api/v1")).unwrap();
        assert_eq!(
            client.url("books/abc").unwrap().as_str(),
            "https://example.com/api/v1/books/abc"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpClient::new(&config("not a url")),
            Err(HttpError::InvalidUrl { .. })
        ));
    }
}
