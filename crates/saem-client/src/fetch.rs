use std::time::Duration;

use async_trait::async_trait;
use saem_config::network::NetworkConfig;
use serde::Deserialize;

use crate::error::TransportError;

/// Retrieves documents and resolves pronunciation-audio tokens.
///
/// The seam exists so extraction and search can run against canned
/// documents in tests.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch a page body. Only transport-level problems are errors;
    /// non-success statuses still deliver their body and the extraction
    /// layer decides whether the document is usable.
    async fn fetch_html(&self, url: &str) -> Result<String, TransportError>;

    /// Resolve one audio file token to its media link.
    async fn resolve_media(&self, file_no: &str) -> Result<MediaLink, TransportError>;
}

/// Wire envelope of the media endpoint: `{"json": [status, value]}`.
#[derive(Debug, Deserialize)]
struct MediaEnvelope {
    json: (String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLink {
    pub status: String,
    /// File URL on success, a reason string otherwise.
    pub value: String,
}

impl MediaLink {
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            status: "SUCCESS".to_string(),
            value: url.into(),
        }
    }

    pub fn url(&self) -> Option<&str> {
        (self.status == "SUCCESS").then_some(self.value.as_str())
    }
}

/// Live fetcher against the dictionary site.
pub struct HttpFetcher {
    client: reqwest::Client,
    media_url: String,
    delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &NetworkConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            media_url: config.media_link_url(),
            delay: Duration::from_millis(config.request_delay_ms),
        })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, TransportError> {
        let body = self.client.get(url).send().await?.text().await?;

        // Politeness pause, successful responses only.
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(body)
    }

    async fn resolve_media(&self, file_no: &str) -> Result<MediaLink, TransportError> {
        let response = self
            .client
            .post(&self.media_url)
            .form(&[("file_no", file_no), ("file_kind", "S")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status()));
        }

        let envelope: MediaEnvelope = response.json().await?;
        Ok(MediaLink {
            status: envelope.json.0,
            value: envelope.json.1,
        })
    }
}
