/// Closed enumeration of the fields an entry record can carry.
///
/// The discriminant doubles as the index into [`FieldPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    SenseNo,
    Word,
    WordHyphen,
    WordNo,
    Origin,
    OriginParts,
    Sound,
    SoundUrl,
    ConjForm,
    Class,
    FieldName,
    Pos,
    Pattern,
    SciName,
    HgWordNo,
    Def,
    Ex,
    HandNo,
    Related,
}

impl RecordField {
    pub const ALL: [RecordField; 19] = [
        RecordField::SenseNo,
        RecordField::Word,
        RecordField::WordHyphen,
        RecordField::WordNo,
        RecordField::Origin,
        RecordField::OriginParts,
        RecordField::Sound,
        RecordField::SoundUrl,
        RecordField::ConjForm,
        RecordField::Class,
        RecordField::FieldName,
        RecordField::Pos,
        RecordField::Pattern,
        RecordField::SciName,
        RecordField::HgWordNo,
        RecordField::Def,
        RecordField::Ex,
        RecordField::HandNo,
        RecordField::Related,
    ];

    /// Key used in caller-supplied policies and in serialized records.
    pub fn key(self) -> &'static str {
        match self {
            RecordField::SenseNo => "sense_no",
            RecordField::Word => "word",
            RecordField::WordHyphen => "word_hyphen",
            RecordField::WordNo => "word_no",
            RecordField::Origin => "org",
            RecordField::OriginParts => "org_part",
            RecordField::Sound => "sound",
            RecordField::SoundUrl => "sound_url",
            RecordField::ConjForm => "conj_form",
            RecordField::Class => "class",
            RecordField::FieldName => "field",
            RecordField::Pos => "pos",
            RecordField::Pattern => "pattern",
            RecordField::SciName => "sci_name",
            RecordField::HgWordNo => "hg_word_no",
            RecordField::Def => "def",
            RecordField::Ex => "ex",
            RecordField::HandNo => "hand_no",
            RecordField::Related => "related",
        }
    }

    pub fn from_key(key: &str) -> Option<RecordField> {
        RecordField::ALL.into_iter().find(|f| f.key() == key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("unknown field key: {0}")]
    UnknownField(String),
}

/// Which fields to extract from a retrieved entry.
///
/// Defaults to everything. Built from caller overrides with
/// [`FieldPolicy::from_overrides`], which rejects keys outside
/// [`RecordField::ALL`] before any network activity happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPolicy {
    included: [bool; RecordField::ALL.len()],
}

impl Default for FieldPolicy {
    fn default() -> Self {
        Self {
            included: [true; RecordField::ALL.len()],
        }
    }
}

impl FieldPolicy {
    /// Policy selecting every known field.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a policy from `(key, include)` overrides.
    ///
    /// Keys missing from `overrides` stay selected; an unknown key is an
    /// immediate error.
    pub fn from_overrides<I, K>(overrides: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        let mut policy = Self::default();
        for (key, include) in overrides {
            let field = RecordField::from_key(key.as_ref())
                .ok_or_else(|| PolicyError::UnknownField(key.as_ref().to_string()))?;
            policy.set(field, include);
        }
        Ok(policy)
    }

    pub fn includes(&self, field: RecordField) -> bool {
        self.included[field as usize]
    }

    pub fn set(&mut self, field: RecordField, include: bool) {
        self.included[field as usize] = include;
    }

    pub fn without(mut self, field: RecordField) -> Self {
        self.set(field, false);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip() {
        for field in RecordField::ALL {
            assert_eq!(RecordField::from_key(field.key()), Some(field));
        }
    }

    #[test]
    fn unknown_key_is_none() {
        assert_eq!(RecordField::from_key("word_number"), None);
    }

    #[test]
    fn default_policy_selects_everything() {
        let policy = FieldPolicy::default();
        for field in RecordField::ALL {
            assert!(policy.includes(field));
        }
    }

    #[test]
    fn overrides_back_fill_missing_keys() {
        let policy = FieldPolicy::from_overrides([("hand_no", false)]).unwrap();
        assert!(!policy.includes(RecordField::HandNo));
        for field in RecordField::ALL {
            if field != RecordField::HandNo {
                assert!(policy.includes(field), "{} should stay selected", field.key());
            }
        }
    }

    #[test]
    fn unknown_override_key_is_rejected() {
        let err = FieldPolicy::from_overrides([("frequency", true)]).unwrap_err();
        assert!(matches!(err, PolicyError::UnknownField(key) if key == "frequency"));
    }

    #[test]
    fn without_deselects() {
        let policy = FieldPolicy::all()
            .without(RecordField::Related)
            .without(RecordField::Ex);
        assert!(!policy.includes(RecordField::Related));
        assert!(!policy.includes(RecordField::Ex));
        assert!(policy.includes(RecordField::Word));
    }
}
