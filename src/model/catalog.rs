//! Catalog client: one GET, one JSON page, a list of clips

use anyhow::{Context, Result};
use reqwest::Client;

use super::clip::{Clip, SongsPage};
use crate::{log_fetch_request, log_fetch_result};

#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    url: String,
}

impl CatalogClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self { http, url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the first page of songs and flatten it into clips
    pub async fn fetch_clips(&self) -> Result<Vec<Clip>> {
        log_fetch_request!("fetch_clips", url = %self.url);

        let result = self.fetch_page().await;
        log_fetch_result!("fetch_clips", result);
        let page = result?;

        tracing::debug!(
            page = page.page,
            per_page = page.per_page,
            total_pages = page.total_pages,
            total_songs = page.total_songs,
            "Decoded songs page"
        );
        Ok(page.into_clips())
    }

    async fn fetch_page(&self) -> Result<SongsPage> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.url))?
            .error_for_status()
            .context("catalog returned an error status")?;

        let body = response.bytes().await.context("failed to read catalog body")?;
        decode_page(&body)
    }
}

/// Decode a raw catalog response
pub fn decode_page(body: &[u8]) -> Result<SongsPage> {
    serde_json::from_slice(body).context("catalog response is not a valid songs page")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn serve_once(status: u16, body: &'static str) -> String {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr();
        std::thread::spawn(move || {
            if let Ok(req) = server.recv() {
                let response = tiny_http::Response::from_string(body).with_status_code(status);
                let _ = req.respond(response);
            }
        });
        format!("http://{}/api/songs", addr)
    }

    fn client(url: String) -> CatalogClient {
        let http = Client::builder().timeout(Duration::from_secs(5)).build().unwrap();
        CatalogClient::new(http, url)
    }

    #[tokio::test]
    async fn test_fetch_clips_decodes_page() {
        let url = serve_once(
            200,
            r#"{"page":0,"per_page":1,"start":0,"end":1,"total_pages":1,"total_songs":1,
                "songs":[{"clip":{"id":"x1","title":"Hello","handle":"me",
                "image_large_url":"https://cdn/x1.png","is_liked":false,"upvote_count":3}}]}"#,
        );

        let clips = client(url).fetch_clips().await.unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].id, "x1");
        assert_eq!(clips[0].upvote_count, 3);
    }

    #[tokio::test]
    async fn test_fetch_clips_reports_bad_json() {
        let url = serve_once(200, "<html>maintenance</html>");
        let err = client(url).fetch_clips().await.unwrap_err();
        assert!(err.to_string().contains("not a valid songs page"));
    }

    #[tokio::test]
    async fn test_fetch_clips_reports_http_status() {
        let url = serve_once(503, "{}");
        let err = client(url).fetch_clips().await.unwrap_err();
        assert!(err.to_string().contains("error status"));
    }

    #[test]
    fn test_decode_empty_page() {
        let page = decode_page(
            br#"{"page":3,"per_page":20,"start":60,"end":60,"total_pages":3,"total_songs":60,"songs":[]}"#,
        )
        .unwrap();
        assert!(page.into_clips().is_empty());
    }
}
