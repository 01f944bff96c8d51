#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A single unreachable page aborts the whole resolution; a partial
    /// identifier list would silently under-report matches.
    #[error("search page {page} could not be retrieved")]
    Page {
        page: u32,
        #[source]
        source: TransportError,
    },
}
