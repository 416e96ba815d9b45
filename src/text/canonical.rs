use crate::config::Vocabulary;

/// Ordered suffix rules; the first one whose stem keeps at least
/// `MIN_STEM_LEN` characters is applied.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("ings", "ing"),
    ("ing", ""),
    ("ed", ""),
    ("ers", "er"),
    ("er", ""),
    ("es", "e"),
    ("s", ""),
];

const MIN_STEM_LEN: usize = 3;

/// Reduces a phrase to its grouping key: stopword-free, stemmed, deduplicated
/// tokens in lexicographic order joined by `_`. Returns an empty string when
/// every token is a stopword.
pub fn canonicalize(phrase: &str, vocabulary: &Vocabulary) -> String {
    let mut tokens: Vec<String> = normalize_tokens(phrase)
        .into_iter()
        .filter(|token| !vocabulary.is_stopword(token))
        .map(|token| stem(&token))
        .collect();
    tokens.sort();
    tokens.dedup();
    tokens.join("_")
}

/// Lower-cases, keeps letters, digits, spaces, apostrophes and hyphens, and
/// splits on whitespace.
pub fn normalize_tokens(phrase: &str) -> Vec<String> {
    let cleaned: String = phrase
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '\'' || ch == '-' {
                ch
            } else if ch.is_whitespace() {
                ' '
            } else {
                '\0'
            }
        })
        .filter(|ch| *ch != '\0')
        .collect();

    cleaned
        .split_whitespace()
        .map(|token| token.to_string())
        .collect()
}

pub fn stem(word: &str) -> String {
    if word.chars().count() <= 2 {
        return word.to_string();
    }

    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(base) = word.strip_suffix(suffix) {
            let candidate = format!("{}{}", base, replacement);
            if candidate.chars().count() >= MIN_STEM_LEN {
                return candidate;
            }
        }
    }

    word.to_string()
}
