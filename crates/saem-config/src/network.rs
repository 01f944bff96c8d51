use std::env;

use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://opendict.korean.go.kr";

/// Transport settings for the dictionary endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Pause after each successful document fetch, to stay under the
    /// source's anti-scraping radar.
    pub request_delay_ms: u64,
    /// The source serves an incomplete certificate chain; verification is
    /// relaxed per client, never process-wide.
    pub accept_invalid_certs: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 20,
            request_delay_ms: 100,
            accept_invalid_certs: true,
        }
    }
}

impl NetworkConfig {
    pub fn from_env() -> Self {
        let base_url =
            env::var("SAEM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_seconds = env::var("SAEM_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20);

        let request_delay_ms = env::var("SAEM_REQUEST_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let accept_invalid_certs = env::var("SAEM_ACCEPT_INVALID_CERTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        Self {
            base_url,
            timeout_seconds,
            request_delay_ms,
            accept_invalid_certs,
        }
    }

    /// Entry page for one sense identifier.
    pub fn view_url(&self, sense_no: &str) -> String {
        format!("{}/dictionary/view?sense_no={}", self.base_url, sense_no)
    }

    /// Search endpoint, ready for query parameters to be appended.
    pub fn search_url(&self) -> String {
        format!("{}/search/searchResult?", self.base_url)
    }

    /// Media resolution endpoint for pronunciation audio.
    pub fn media_link_url(&self) -> String {
        format!("{}/files/link", self.base_url)
    }
}
