use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::TransportError;
use crate::fetch::{DocumentFetcher, MediaLink};

/// Canned fetcher: pages keyed by URL, media links keyed by token.
/// Anything unknown behaves like an unreachable host.
#[derive(Default)]
pub(crate) struct StubFetcher {
    pages: HashMap<String, String>,
    media: HashMap<String, MediaLink>,
    html_calls: Arc<AtomicUsize>,
    media_call_count: Arc<AtomicUsize>,
}

impl StubFetcher {
    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn with_media(mut self, file_no: &str, link: MediaLink) -> Self {
        self.media.insert(file_no.to_string(), link);
        self
    }

    /// Handle that keeps counting after the fetcher moves into a client.
    pub fn html_call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.html_calls)
    }

    pub fn media_call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.media_call_count)
    }
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, TransportError> {
        self.html_calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or(TransportError::Status(reqwest::StatusCode::GATEWAY_TIMEOUT))
    }

    async fn resolve_media(&self, file_no: &str) -> Result<MediaLink, TransportError> {
        self.media_call_count.fetch_add(1, Ordering::SeqCst);
        self.media
            .get(file_no)
            .cloned()
            .ok_or(TransportError::Status(reqwest::StatusCode::NOT_FOUND))
    }
}
