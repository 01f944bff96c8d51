use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid pattern"));

static NON_HANGUL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^ㄱ-ㅣ가-힣]+").expect("valid pattern"));

pub(crate) fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("statically valid selector")
}

/// All descendant text, concatenated.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Drop `front` chars from the start and `back` from the end.
///
/// Counted in chars, not bytes; the source text is Korean. Too-short input
/// collapses to an empty string.
pub(crate) fn strip_chars(s: &str, front: usize, back: usize) -> String {
    let total = s.chars().count();
    if total <= front + back {
        return String::new();
    }
    s.chars().skip(front).take(total - front - back).collect()
}

/// First run of ASCII digits, if any.
pub(crate) fn first_digits(s: &str) -> Option<String> {
    DIGITS.find(s).map(|m| m.as_str().to_string())
}

/// Strip everything that is not Hangul.
pub(crate) fn hangul_only(s: &str) -> String {
    NON_HANGUL.replace_all(s, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_chars_counts_chars_not_bytes() {
        assert_eq!(strip_chars("[누리]", 1, 1), "누리");
        assert_eq!(strip_chars("(世界 원어보기", 1, 5), "世界");
    }

    #[test]
    fn strip_chars_collapses_short_input() {
        assert_eq!(strip_chars("ab", 1, 1), "");
        assert_eq!(strip_chars("", 0, 2), "");
    }

    #[test]
    fn first_digits_takes_the_leading_run() {
        assert_eq!(
            first_digits("/dictionary/view?sense_no=12345&page=2"),
            Some("12345".to_string())
        );
        assert_eq!(first_digits("없음"), None);
    }

    #[test]
    fn hangul_only_drops_markup_and_latin() {
        assert_eq!(hangul_only("「명사」"), "명사");
        assert_eq!(hangul_only("abc 동사 01"), "동사");
    }
}
