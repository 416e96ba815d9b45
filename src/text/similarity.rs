/// Sørensen–Dice coefficient over character bigrams, counted as a multiset.
/// Whitespace is ignored. Either side being blank scores 0.
pub fn dice(a: &str, b: &str) -> f64 {
    if is_blank(a) || is_blank(b) {
        return 0.0;
    }
    strsim::sorensen_dice(a, b)
}

pub fn jaro(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::jaro(a, b)
}

/// Jaro with the Winkler prefix boost (up to 4 chars, scale 0.1), applied
/// when the Jaro score is above 0.7.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::jaro_winkler(a, b)
}

/// Either metric signalling a strong match is enough to merge.
pub fn phrase_similarity(a: &str, b: &str) -> f64 {
    dice(a, b).max(jaro_winkler(a, b))
}

fn is_blank(value: &str) -> bool {
    value.chars().all(char::is_whitespace)
}
