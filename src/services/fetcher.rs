//! "URL -> rendered HTML" seam.
//!
//! The batch loop only consumes the HTML string of a student's score
//! page; how it gets rendered is a collaborator concern. The bundled
//! implementation is a plain HTTP GET, which is enough when the portal
//! serves score pages off a tokenized link; a browser-driving
//! implementation plugs into the same trait.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ScrapeError;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page. Failures are transient per student: the caller
    /// marks the row failed and moves on.
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Plain HTTP fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::transient_fetch(url, e))?
            .error_for_status()
            .map_err(|e| ScrapeError::transient_fetch(url, e))?;

        response
            .text()
            .await
            .map_err(|e| ScrapeError::transient_fetch(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn fetches_the_page_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/diem");
                then.status(200).body("<html>điểm</html>");
            })
            .await;

        let html = HttpFetcher::new()
            .fetch_page(&server.url("/diem"))
            .await
            .expect("page");

        mock.assert_async().await;
        assert_eq!(html, "<html>điểm</html>");
    }

    #[tokio::test]
    async fn http_errors_surface_as_transient_fetch() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/diem");
                then.status(503);
            })
            .await;

        let err = HttpFetcher::new()
            .fetch_page(&server.url("/diem"))
            .await
            .expect_err("should fail");

        assert!(matches!(err, ScrapeError::TransientFetch { .. }));
    }
}
