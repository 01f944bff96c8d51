use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One fully extracted dictionary entry.
///
/// Serialized field names match the keys of [`crate::RecordField`]. Every
/// field a policy deselects, or that the source document lacks, holds its
/// empty value; `hand_no` is the one field that may be genuinely absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SenseRecord {
    pub sense_no: String,
    pub word: String,
    pub word_hyphen: String,
    pub word_no: String,
    #[serde(rename = "org")]
    pub origin: String,
    #[serde(rename = "org_part")]
    pub origin_parts: Vec<(String, String)>,
    pub sound: Vec<String>,
    pub sound_url: Vec<String>,
    pub conj_form: String,
    #[serde(rename = "class")]
    pub word_class: String,
    pub field: String,
    pub pos: String,
    pub pattern: String,
    pub sci_name: String,
    pub hg_word_no: String,
    #[serde(rename = "def")]
    pub definition: String,
    #[serde(rename = "ex")]
    pub examples: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand_no: Option<String>,
    pub related: IndexMap<String, Vec<RelatedEntry>>,
}

/// Node of the related-words map shipped inside an entry page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sense_no: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RelatedEntry>,
}

impl RelatedEntry {
    /// Group top-level relation categories into a map, preserving document
    /// order.
    ///
    /// A child bucket literally named "전체" that carries no `sense_no` of
    /// its own is flattened: the children of its children are hoisted
    /// directly into the category. The match is on that literal name only.
    pub fn group_categories(categories: Vec<RelatedEntry>) -> IndexMap<String, Vec<RelatedEntry>> {
        let mut grouped = IndexMap::new();
        for category in categories {
            let mut entries: Vec<RelatedEntry> = Vec::new();
            for child in category.children {
                if child.name == "전체" && child.sense_no.is_none() {
                    for bucket in child.children {
                        entries.extend(bucket.children);
                    }
                } else {
                    entries.push(child);
                }
            }
            grouped.insert(category.name, entries);
        }
        grouped
    }
}

/// Result of fetching one identifier, classified for aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Box<SenseRecord>),
    /// Document retrieved but no headword found: the entry does not exist
    /// or the identifier is stale.
    Blank(String),
    /// Document could not be retrieved at all.
    Network(String),
}

impl FetchOutcome {
    pub fn sense_no(&self) -> &str {
        match self {
            FetchOutcome::Success(record) => &record.sense_no,
            FetchOutcome::Blank(sense_no) | FetchOutcome::Network(sense_no) => sense_no,
        }
    }
}
