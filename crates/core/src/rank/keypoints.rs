use super::segment::SentenceSegmenter;

/// Lowercase phrases that mark a sentence as a key point.
pub const INDICATORS: &[&str] = &[
    "important",
    "key",
    "significant",
    "essential",
    "critical",
    "results show",
    "we found",
    "demonstrates",
    "proves",
    "conclusion",
    "summary",
    "main",
    "primary",
];

const MIN_CHARS: usize = 20;
const MAX_CHARS: usize = 300;

fn is_key_point(sentence: &str) -> bool {
    let len = sentence.chars().count();
    if len <= MIN_CHARS || len >= MAX_CHARS {
        return false;
    }
    let lower = sentence.to_lowercase();
    INDICATORS.iter().any(|i| lower.contains(i))
}

/// Up to `limit` indicator sentences of `content`, in order.
pub fn extract_key_points(
    content: &str,
    segmenter: &dyn SentenceSegmenter,
    limit: usize,
) -> Vec<String> {
    segmenter
        .sentences(content)
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| is_key_point(s))
        .take(limit)
        .collect()
}
