use crate::types::{TextSpan, UNTITLED};

/// Spans within this many points of the page's largest size are candidates.
const SIZE_TOLERANCE: f32 = 1.0;

/// Document title: the metadata title when present, else the first
/// prominent first-page span of a plausible length, else [`UNTITLED`].
pub fn resolve_title(metadata_title: Option<&str>, first_page: &[TextSpan]) -> String {
    if let Some(title) = metadata_title.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    let max_size = first_page
        .iter()
        .map(|s| s.font_size)
        .fold(f32::NEG_INFINITY, f32::max);

    first_page
        .iter()
        .filter(|s| (s.font_size - max_size).abs() <= SIZE_TOLERANCE)
        .map(|s| s.text.trim())
        .find(|t| (6..100).contains(&t.chars().count()))
        .map(str::to_string)
        .unwrap_or_else(|| UNTITLED.to_string())
}
