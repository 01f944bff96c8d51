use std::sync::LazyLock;

use saem_config::network::NetworkConfig;
use saem_types::{ContentOrigin, EntryKind, MatchMode, SearchQuery};
use scraper::{Html, Selector};

use crate::error::SearchError;
use crate::fetch::DocumentFetcher;
use crate::text::{first_digits, sel, strip_chars};

static PAGING: LazyLock<Selector> = LazyLock::new(|| sel("div.paging_area"));
static RESULTS: LazyLock<Selector> = LazyLock::new(|| sel("div.search_result"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| sel("a"));

/// Resolves text queries to lists of sense identifiers, page by page.
pub struct SearchClient<F> {
    fetcher: F,
    search_url: String,
}

impl<F: DocumentFetcher> SearchClient<F> {
    pub fn new(fetcher: F, network: &NetworkConfig) -> Self {
        Self {
            fetcher,
            search_url: network.search_url(),
        }
    }

    /// Resolve a query to the identifiers of every matching entry, in page
    /// order.
    ///
    /// [`ContentOrigin::All`] concatenates the expert-reviewed and the
    /// user-suggested resolutions; a failure in either half fails the call.
    pub async fn resolve(&self, query: &SearchQuery) -> Result<Vec<String>, SearchError> {
        match query.origin {
            ContentOrigin::All => {
                let mut sense_nos = self.resolve_origin(query, ContentOrigin::ExpertOnly).await?;
                sense_nos.extend(self.resolve_origin(query, ContentOrigin::UserOnly).await?);
                Ok(sense_nos)
            }
            origin => self.resolve_origin(query, origin).await,
        }
    }

    async fn resolve_origin(
        &self,
        query: &SearchQuery,
        origin: ContentOrigin,
    ) -> Result<Vec<String>, SearchError> {
        let first = self.fetch_page(query, origin, 1).await?;
        let pages = page_count(&first);
        tracing::debug!(query = %query.query, pages, "paging summary parsed");

        // Sequential by design: the page count is discovered, not known.
        let mut sense_nos = Vec::new();
        for page in 1..=pages {
            let html = self.fetch_page(query, origin, page).await?;
            sense_nos.extend(page_sense_nos(&html));
        }
        Ok(sense_nos)
    }

    async fn fetch_page(
        &self,
        query: &SearchQuery,
        origin: ContentOrigin,
        page: u32,
    ) -> Result<String, SearchError> {
        let url = self.page_url(query, origin, page);
        self.fetcher
            .fetch_html(&url)
            .await
            .map_err(|source| SearchError::Page { page, source })
    }

    fn page_url(&self, query: &SearchQuery, origin: ContentOrigin, page: u32) -> String {
        let mut url = format!(
            "{}query={}&dicType={}",
            self.search_url,
            query.query,
            query.kind.dic_type()
        );
        // Whole-word matching only exists for vocabulary queries.
        if query.match_mode == MatchMode::Exact && query.kind == EntryKind::Vocabulary {
            url.push_str("&wordMatch=Y");
        }
        url.push_str(&format!("&currentPage={page}&rowsperPage=50"));
        if let Some(info_type) = origin.info_type() {
            url.push_str(&format!("&infoType={info_type}"));
        }
        url
    }
}

/// Total page count from the paging summary; a missing or unreadable
/// summary means an empty result set, not a failure.
fn page_count(html: &str) -> u32 {
    let doc = Html::parse_document(html);
    let Some(paging) = doc.select(&PAGING).next() else {
        return 0;
    };
    let text: String = paging.text().collect();
    strip_chars(&text, 0, 2)
        .rsplit('\n')
        .next()
        .and_then(|line| line.trim().parse().ok())
        .unwrap_or(0)
}

/// Identifiers on one result page; a page without the result container
/// contributes nothing.
fn page_sense_nos(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let Some(results) = doc.select(&RESULTS).next() else {
        return Vec::new();
    };
    results
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href").and_then(first_digits))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StubFetcher;

    const SEARCH: &str = "https://opendict.korean.go.kr/search/searchResult?";

    fn expert_url(page: u32) -> String {
        format!("{SEARCH}query=누리&dicType=1&wordMatch=Y&currentPage={page}&rowsperPage=50&infoType=confirm")
    }

    fn suggest_url(page: u32) -> String {
        format!("{SEARCH}query=누리&dicType=1&wordMatch=Y&currentPage={page}&rowsperPage=50&infoType=suggest")
    }

    fn result_page(pages: u32, sense_nos: &[&str]) -> String {
        let anchors: String = sense_nos
            .iter()
            .map(|n| format!(r#"<a href="/dictionary/view?sense_no={n}&q=1">항목</a>"#))
            .collect();
        format!(
            "<html><body><div class=\"paging_area\">이전\n{pages} 쪽</div>\
             <div class=\"search_result\">{anchors}</div></body></html>"
        )
    }

    fn client(fetcher: StubFetcher) -> SearchClient<StubFetcher> {
        SearchClient::new(fetcher, &NetworkConfig::default())
    }

    #[tokio::test]
    async fn collects_identifiers_across_pages_in_order() {
        let fetcher = StubFetcher::default()
            .with_page(&expert_url(1), &result_page(2, &["11", "22"]))
            .with_page(&expert_url(2), &result_page(2, &["33"]));

        let mut query = SearchQuery::new("누리");
        query.origin = ContentOrigin::ExpertOnly;

        let sense_nos = client(fetcher).resolve(&query).await.unwrap();
        assert_eq!(sense_nos, ["11", "22", "33"]);
    }

    #[tokio::test]
    async fn missing_paging_summary_means_empty_result() {
        let fetcher = StubFetcher::default()
            .with_page(&expert_url(1), "<html><body><p>결과 없음</p></body></html>");

        let mut query = SearchQuery::new("누리");
        query.origin = ContentOrigin::ExpertOnly;

        let sense_nos = client(fetcher).resolve(&query).await.unwrap();
        assert!(sense_nos.is_empty());
    }

    #[tokio::test]
    async fn page_without_result_container_contributes_nothing() {
        let bare = "<html><body><div class=\"paging_area\">이전\n2 쪽</div></body></html>";
        let fetcher = StubFetcher::default()
            .with_page(&expert_url(1), &result_page(2, &["11"]))
            .with_page(&expert_url(2), bare);

        let mut query = SearchQuery::new("누리");
        query.origin = ContentOrigin::ExpertOnly;

        let sense_nos = client(fetcher).resolve(&query).await.unwrap();
        assert_eq!(sense_nos, ["11"]);
    }

    #[tokio::test]
    async fn unreachable_page_aborts_the_whole_resolution() {
        // Page 2 is missing from the stub and fails like a dead host.
        let fetcher = StubFetcher::default()
            .with_page(&expert_url(1), &result_page(3, &["11"]))
            .with_page(&expert_url(3), &result_page(3, &["33"]));

        let mut query = SearchQuery::new("누리");
        query.origin = ContentOrigin::ExpertOnly;

        let err = client(fetcher).resolve(&query).await.unwrap_err();
        assert!(matches!(err, SearchError::Page { page: 2, .. }));
    }

    #[tokio::test]
    async fn all_origins_concatenate_expert_then_user() {
        let fetcher = StubFetcher::default()
            .with_page(&expert_url(1), &result_page(1, &["11", "22"]))
            .with_page(&suggest_url(1), &result_page(1, &["22", "44"]));

        let sense_nos = client(fetcher).resolve(&SearchQuery::new("누리")).await.unwrap();
        // Order preserved, duplicates preserved.
        assert_eq!(sense_nos, ["11", "22", "22", "44"]);
    }

    #[tokio::test]
    async fn failing_half_fails_the_composed_resolution() {
        let fetcher =
            StubFetcher::default().with_page(&expert_url(1), &result_page(1, &["11"]));

        let err = client(fetcher)
            .resolve(&SearchQuery::new("누리"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Page { page: 1, .. }));
    }

    #[test]
    fn word_match_applies_to_exact_vocabulary_only() {
        let client = client(StubFetcher::default());

        let exact_vocab = SearchQuery::new("누리");
        let url = client.page_url(&exact_vocab, ContentOrigin::ExpertOnly, 1);
        assert!(url.contains("&wordMatch=Y"));
        assert!(url.contains("dicType=1"));
        assert!(url.contains("&infoType=confirm"));

        let mut partial = SearchQuery::new("누리");
        partial.match_mode = MatchMode::Partial;
        assert!(!client.page_url(&partial, ContentOrigin::UserOnly, 1).contains("wordMatch"));

        let mut idiom = SearchQuery::new("누리");
        idiom.kind = EntryKind::Idiom;
        let idiom_url = client.page_url(&idiom, ContentOrigin::ExpertOnly, 2);
        assert!(!idiom_url.contains("wordMatch"));
        assert!(idiom_url.contains("dicType=2"));
        assert!(idiom_url.contains("currentPage=2&rowsperPage=50"));
    }

    #[test]
    fn page_count_reads_the_last_line_of_the_summary() {
        assert_eq!(page_count(&result_page(12, &[])), 12);
        assert_eq!(page_count("<html><body></body></html>"), 0);
        // Unreadable counter degrades to zero pages.
        assert_eq!(
            page_count("<html><body><div class=\"paging_area\">없음</div></body></html>"),
            0
        );
    }
}
