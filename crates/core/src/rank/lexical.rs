/// Query words shorter than this are ignored.
pub const MIN_QUERY_WORD_CHARS: usize = 4;

/// Share of meaningful query words found in `text`, damped for long texts.
///
/// Each lowercase query word of four or more characters that occurs in the
/// lowercased text as a substring counts once. The count is divided by
/// `max(1, words / 10)` and capped at 1.
pub fn lexical_score(text: &str, query: &str) -> f64 {
    if text.trim().is_empty() || query.trim().is_empty() {
        return 0.0;
    }
    let haystack = text.to_lowercase();
    let query = query.to_lowercase();

    let hits = query
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_QUERY_WORD_CHARS)
        .filter(|w| haystack.contains(*w))
        .count() as f64;

    let words = haystack.split_whitespace().count() as f64;
    (hits / (words / 10.0).max(1.0)).min(1.0)
}
