/// Which part of the dictionary a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Vocabulary,
    Idiom,
    Definition,
    Usage,
}

impl EntryKind {
    /// `dicType` value on the wire.
    pub fn dic_type(self) -> u8 {
        match self {
            EntryKind::Vocabulary => 1,
            EntryKind::Idiom => 2,
            EntryKind::Definition => 3,
            EntryKind::Usage => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Only meaningful for [`EntryKind::Vocabulary`]; other kinds always
    /// match partially.
    Exact,
    Partial,
}

/// Whether results come from expert-reviewed content, user suggestions, or
/// both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    /// The union of the two modes below, resolved as two queries.
    All,
    ExpertOnly,
    UserOnly,
}

impl ContentOrigin {
    /// `infoType` value on the wire; `All` has no single-request form.
    pub fn info_type(self) -> Option<&'static str> {
        match self {
            ContentOrigin::All => None,
            ContentOrigin::ExpertOnly => Some("confirm"),
            ContentOrigin::UserOnly => Some("suggest"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub query: String,
    pub kind: EntryKind,
    pub match_mode: MatchMode,
    pub origin: ContentOrigin,
}

impl SearchQuery {
    /// Exact vocabulary search over both content origins.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind: EntryKind::Vocabulary,
            match_mode: MatchMode::Exact,
            origin: ContentOrigin::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dic_type_values() {
        assert_eq!(EntryKind::Vocabulary.dic_type(), 1);
        assert_eq!(EntryKind::Idiom.dic_type(), 2);
        assert_eq!(EntryKind::Definition.dic_type(), 3);
        assert_eq!(EntryKind::Usage.dic_type(), 4);
    }

    #[test]
    fn info_type_values() {
        assert_eq!(ContentOrigin::All.info_type(), None);
        assert_eq!(ContentOrigin::ExpertOnly.info_type(), Some("confirm"));
        assert_eq!(ContentOrigin::UserOnly.info_type(), Some("suggest"));
    }
}
