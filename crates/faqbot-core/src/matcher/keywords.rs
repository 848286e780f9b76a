//! Keyword extraction: lowercase, split into alphanumeric runs, drop stopwords.

/// Default stopwords (English and German fragments).
pub const DEFAULT_STOPWORDS: [&str; 12] = [
    "i", "want", "do", "you", "is", "the", "a", "an", "und", "die", "das", "der",
];

/// Extracts keywords from a question.
///
/// The text is lowercased, then every maximal run of alphanumeric characters is a
/// token; everything else is discarded. Tokens equal to a stopword (compared
/// case-insensitively) are dropped. Order and duplicates are kept.
pub fn extract_keywords<S: AsRef<str>>(text: &str, stopwords: &[S]) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .filter(|token| !is_stopword(token, stopwords))
        .map(str::to_string)
        .collect()
}

fn is_stopword<S: AsRef<str>>(token: &str, stopwords: &[S]) -> bool {
    stopwords
        .iter()
        .any(|s| s.as_ref().chars().flat_map(char::to_lowercase).eq(token.chars()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        let keywords = extract_keywords("Wie sind eure Öffnungszeiten?", &DEFAULT_STOPWORDS);
        assert_eq!(keywords, vec!["wie", "sind", "eure", "öffnungszeiten"]);
    }

    #[test]
    fn drops_stopwords_in_both_languages() {
        let keywords = extract_keywords("I want the Preis und die Lieferung", &DEFAULT_STOPWORDS);
        assert_eq!(keywords, vec!["preis", "lieferung"]);
    }

    #[test]
    fn stopword_only_question_is_empty() {
        assert!(extract_keywords("und die das", &DEFAULT_STOPWORDS).is_empty());
        assert!(extract_keywords("Do YOU", &DEFAULT_STOPWORDS).is_empty());
    }

    #[test]
    fn empty_and_punctuation_only_input() {
        assert!(extract_keywords("", &DEFAULT_STOPWORDS).is_empty());
        assert!(extract_keywords("?!... --", &DEFAULT_STOPWORDS).is_empty());
    }

    #[test]
    fn splits_on_hyphens_and_keeps_digits_and_duplicates() {
        let keywords = extract_keywords("Mo-Fr 9-17 Uhr, Uhr", &DEFAULT_STOPWORDS);
        assert_eq!(keywords, vec!["mo", "fr", "9", "17", "uhr", "uhr"]);
    }

    #[test]
    fn stopwords_compare_case_insensitively() {
        let keywords = extract_keywords("Wie teuer ist der Versand", &["WIE", "Ist"]);
        assert_eq!(keywords, vec!["teuer", "der", "versand"]);
    }

    #[test]
    fn no_stopwords_keeps_everything() {
        let none: [&str; 0] = [];
        assert_eq!(extract_keywords("the a", &none), vec!["the", "a"]);
    }
}
