use std::sync::LazyLock;

use regex::Regex;
use saem_config::network::NetworkConfig;
use saem_types::{FetchOutcome, FieldPolicy, RecordField, RelatedEntry, SenseRecord};
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::fetch::DocumentFetcher;
use crate::text::{first_digits, hangul_only, sel, strip_chars, text_of};

struct Css {
    word_head: Selector,
    edit_link: Selector,
    origin_button: Selector,
    origin_table: Selector,
    th: Selector,
    td: Selector,
    cell_div: Selector,
    hanja_glyphs: Selector,
    head_blocks: Selector,
    label: Selector,
    span: Selector,
    sub_span: Selector,
    audio_imgs: Selector,
    field_att: Selector,
    word_no: Selector,
    word_dis: Selector,
    example_items: Selector,
    hand_link: Selector,
    wordmap: Selector,
}

static CSS: LazyLock<Css> = LazyLock::new(|| Css {
    word_head: sel("span.word_head"),
    edit_link: sel("a.btn_edit"),
    origin_button: sel("button.chi_info.hanja_font"),
    origin_table: sel("table#orglang_tbl"),
    th: sel("th"),
    td: sel("td"),
    cell_div: sel("div"),
    hanja_glyphs: sel("dt.hanja_font"),
    head_blocks: sel("div.word_head_txt > dl"),
    label: sel("dt"),
    span: sel("span"),
    sub_span: sel("span.search_sub"),
    audio_imgs: sel("span.search_sub > img"),
    field_att: sel("span.word_att_type2"),
    word_no: sel("span.word_no"),
    word_dis: sel("span.word_dis"),
    example_items: sel("dl.cont_01.mt20 > dd"),
    hand_link: sel("a.floatR.btn_sm.btn_blank"),
    wordmap: sel("div#wordmap_json_str"),
});

static SCI_NAME_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[학과목강문]명").expect("valid pattern"));

/// Labeled blocks in the entry header, dispatched by label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadLabel {
    Pronunciation,
    Conjugation,
    Classification,
    FieldName,
    ClassField,
    Pos,
    PosPattern,
    SciName,
    Unrecognized,
}

impl HeadLabel {
    fn classify(label: &str) -> HeadLabel {
        match label {
            "발음" => HeadLabel::Pronunciation,
            "활용" => HeadLabel::Conjugation,
            "분류" => HeadLabel::Classification,
            "분야" => HeadLabel::FieldName,
            "분류/분야" => HeadLabel::ClassField,
            "품사" => HeadLabel::Pos,
            "품사/문형" => HeadLabel::PosPattern,
            other if SCI_NAME_LABEL.is_match(other) => HeadLabel::SciName,
            _ => HeadLabel::Unrecognized,
        }
    }
}

/// Related-word map as embedded in the page.
#[derive(Debug, Deserialize)]
struct WordMap {
    #[serde(default)]
    children: Vec<RelatedEntry>,
}

/// Extraction output before audio tokens are resolved.
struct ParsedSense {
    record: SenseRecord,
    audio_tokens: Vec<String>,
}

/// Fetches entry pages and extracts typed records from them.
pub struct SenseClient<F> {
    fetcher: F,
    network: NetworkConfig,
}

impl<F: DocumentFetcher> SenseClient<F> {
    pub fn new(fetcher: F, network: NetworkConfig) -> Self {
        Self { fetcher, network }
    }

    /// Retrieve and extract one entry. Failures are classified into the
    /// outcome, never propagated.
    pub async fn fetch_sense(&self, sense_no: &str, policy: &FieldPolicy) -> FetchOutcome {
        let url = self.network.view_url(sense_no);
        let html = match self.fetcher.fetch_html(&url).await {
            Ok(html) => html,
            Err(err) => {
                tracing::debug!(sense_no, %err, "document fetch failed");
                return FetchOutcome::Network(sense_no.to_string());
            }
        };

        let Some(parsed) = parse_sense_document(&html, sense_no, policy) else {
            tracing::debug!(sense_no, "page carries no headword");
            return FetchOutcome::Blank(sense_no.to_string());
        };

        let ParsedSense {
            mut record,
            audio_tokens,
        } = parsed;
        if policy.includes(RecordField::SoundUrl) {
            record.sound_url = self.resolve_audio(&audio_tokens).await;
        }

        FetchOutcome::Success(Box::new(record))
    }

    /// One media call per token; anything short of a SUCCESS status maps
    /// to an empty URL so a single broken file never sinks the record.
    async fn resolve_audio(&self, tokens: &[String]) -> Vec<String> {
        let mut urls = Vec::with_capacity(tokens.len());
        for token in tokens {
            let url = match self.fetcher.resolve_media(token).await {
                Ok(link) => link.url().unwrap_or_default().to_string(),
                Err(err) => {
                    tracing::warn!(file_no = %token, %err, "media resolution failed");
                    String::new()
                }
            };
            urls.push(url);
        }
        urls
    }
}

/// Parse an entry page into a record, minus audio resolution.
///
/// `None` means the page has no headword: the identifier addresses nothing.
/// Every other missing substructure degrades to that field's empty value.
fn parse_sense_document(html: &str, sense_no: &str, policy: &FieldPolicy) -> Option<ParsedSense> {
    let doc = Html::parse_document(html);

    let headword = doc.select(&CSS.word_head).next().map(text_of)?;
    if headword.is_empty() {
        return None;
    }
    let word = headword.replace('-', "");

    let mut record = SenseRecord::default();
    let mut audio_tokens = Vec::new();

    if policy.includes(RecordField::SenseNo) {
        record.sense_no = sense_no.to_string();
    }
    if policy.includes(RecordField::Word) {
        record.word = word.clone();
    }
    if policy.includes(RecordField::WordHyphen) {
        record.word_hyphen = headword.clone();
    }

    if policy.includes(RecordField::WordNo) {
        // Absent for entries outside the standard dictionary and for idioms.
        record.word_no = doc
            .select(&CSS.edit_link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(first_digits)
            .unwrap_or_default();
    }

    if policy.includes(RecordField::Origin) {
        let origin = doc
            .select(&CSS.origin_button)
            .next()
            .map(|button| strip_chars(&text_of(button), 1, 5))
            .unwrap_or_default();
        // Native words have no source-language form; the headword stands in.
        record.origin = if origin.is_empty() { word.clone() } else { origin };
    }

    if policy.includes(RecordField::OriginParts) {
        record.origin_parts = origin_parts(&doc);
    }

    for block in doc.select(&CSS.head_blocks) {
        let Some(label_el) = block.select(&CSS.label).next() else {
            continue;
        };
        let label = text_of(label_el);

        match HeadLabel::classify(&label) {
            HeadLabel::Pronunciation => {
                if policy.includes(RecordField::Sound) {
                    if let Some(span) = block.select(&CSS.span).next() {
                        record.sound = strip_chars(&text_of(span), 1, 1)
                            .split('/')
                            .map(str::to_string)
                            .collect();
                    }
                }
                if policy.includes(RecordField::SoundUrl) {
                    audio_tokens = block
                        .select(&CSS.audio_imgs)
                        .filter_map(|img| img.value().attr("data-file-no"))
                        .map(str::to_string)
                        .collect();
                }
            }
            HeadLabel::Conjugation => {
                if policy.includes(RecordField::ConjForm) {
                    if let Some(span) = block.select(&CSS.sub_span).next() {
                        record.conj_form = text_of(span);
                    }
                }
            }
            HeadLabel::Classification => {
                if policy.includes(RecordField::Class) {
                    if let Some(span) = block.select(&CSS.span).next() {
                        record.word_class = hangul_only(&text_of(span));
                    }
                }
            }
            HeadLabel::FieldName => {
                if policy.includes(RecordField::FieldName) {
                    if let Some(span) = block.select(&CSS.field_att).next() {
                        record.field = text_of(span).replace(['『', '』'], "");
                    }
                }
            }
            HeadLabel::ClassField => {
                // One block carries both values, bracketed, in order.
                let spans: Vec<String> = block.select(&CSS.span).map(text_of).collect();
                if policy.includes(RecordField::Class) {
                    if let Some(raw) = spans.first() {
                        record.word_class = strip_chars(raw, 1, 1);
                    }
                }
                if policy.includes(RecordField::FieldName) {
                    if let Some(raw) = spans.get(1) {
                        record.field = strip_chars(raw, 1, 1);
                    }
                }
            }
            HeadLabel::Pos => {
                if policy.includes(RecordField::Pos) {
                    if let Some(span) = block.select(&CSS.span).next() {
                        record.pos = hangul_only(&text_of(span));
                    }
                }
            }
            HeadLabel::PosPattern => {
                // "「품사」문형" splits on the closing bracket.
                if let Some(span) = block.select(&CSS.span).next() {
                    let raw = text_of(span);
                    let halves: Vec<&str> = raw.split('」').collect();
                    if policy.includes(RecordField::Pos) {
                        if let Some(head) = halves.first() {
                            record.pos = strip_chars(head, 1, 0);
                        }
                    }
                    if policy.includes(RecordField::Pattern) {
                        if let Some(tail) = halves.get(1) {
                            record.pattern = strip_chars(tail, 1, 0);
                        }
                    }
                }
            }
            HeadLabel::SciName => {
                if policy.includes(RecordField::SciName) {
                    if let Some(span) = block.select(&CSS.span).next() {
                        record.sci_name = text_of(span);
                    }
                }
            }
            HeadLabel::Unrecognized => {
                tracing::warn!(sense_no, label = %label, "unrecognized head info label");
            }
        }
    }

    if policy.includes(RecordField::HgWordNo) {
        if let Some(span) = doc.select(&CSS.word_no).next() {
            record.hg_word_no = strip_chars(&text_of(span), 1, 1);
        }
    }

    if policy.includes(RecordField::Def) {
        if let Some(span) = doc.select(&CSS.word_dis).next() {
            record.definition = text_of(span);
        }
    }

    if policy.includes(RecordField::Ex) {
        record.examples = doc
            .select(&CSS.example_items)
            .map(|dd| split_example(&text_of(dd)))
            .collect();
    }

    if policy.includes(RecordField::HandNo) {
        record.hand_no = doc
            .select(&CSS.hand_link)
            .next()
            .and_then(|a| a.value().attr("onclick"))
            .and_then(first_digits);
    }

    if policy.includes(RecordField::Related) {
        if let Some(div) = doc.select(&CSS.wordmap).next() {
            match serde_json::from_str::<WordMap>(&text_of(div)) {
                Ok(map) => record.related = RelatedEntry::group_categories(map.children),
                Err(err) => tracing::warn!(sense_no, %err, "related-word map did not parse"),
            }
        }
    }

    Some(ParsedSense {
        record,
        audio_tokens,
    })
}

/// Source-language breakdown rows: a label per row, hanja glyphs joined
/// when the cell is marked as such, plain cell text otherwise.
fn origin_parts(doc: &Html) -> Vec<(String, String)> {
    let Some(table) = doc.select(&CSS.origin_table).next() else {
        return Vec::new();
    };

    table
        .select(&CSS.th)
        .zip(table.select(&CSS.td))
        .map(|(th, td)| {
            let hanja = td
                .select(&CSS.cell_div)
                .next()
                .is_some_and(|div| div.value().classes().next() == Some("hanja"));
            let value = if hanja {
                td.select(&CSS.hanja_glyphs).map(text_of).collect()
            } else {
                text_of(td)
            };
            (text_of(th), value)
        })
        .collect()
}

/// "문장≪출처≫" becomes the sentence plus its citation; no marker means an
/// empty citation.
fn split_example(text: &str) -> (String, String) {
    let cleaned = text.replace('\n', "");
    let cleaned = cleaned.trim();
    let parts: Vec<&str> = cleaned.split('≪').collect();
    if parts.len() == 2 {
        (parts[0].to_string(), strip_chars(parts[1], 0, 1))
    } else {
        (parts[0].to_string(), String::new())
    }
}
