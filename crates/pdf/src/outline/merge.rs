use crate::types::{BoundingBox, MergedSpan, TextSpan};

use super::MergeMode;

/// Sizes closer than this count as the same size.
const SIZE_TOLERANCE: f32 = 0.1;

/// Maximum vertical gap between fragments, as a multiple of the font size.
const MAX_GAP_RATIO: f32 = 1.5;

const TERMINAL_PUNCTUATION: [char; 5] = ['.', '!', '?', ':', ';'];

/// Whether `next` continues the logical line `current`.
fn continues(current: &MergedSpan, next: &TextSpan) -> bool {
    current.font_name == next.font_name
        && (current.font_size - next.font_size).abs() < SIZE_TOLERANCE
        && current.page == next.page
        && !current.text.trim_end().ends_with(&TERMINAL_PUNCTUATION[..])
        && (next.bbox.y0 - current.bbox.y1).abs() < MAX_GAP_RATIO * current.font_size
}

/// Joins `next` onto `current`. Style flags stay those of the first fragment.
fn absorb(current: &mut MergedSpan, next: TextSpan) {
    current.text = format!("{} {}", current.text, next.text);
    current.bbox = BoundingBox::new(
        current.bbox.x0.min(next.bbox.x0),
        current.bbox.y0,
        current.bbox.x1.max(next.bbox.x1),
        next.bbox.y1,
    );
    current.fragments += 1;
}

/// Coalesce heading fragments in one left-to-right pass.
///
/// In [`MergeMode::Pairwise`] a span absorbs at most its immediate successor
/// and the pass resumes after the pair. [`MergeMode::Chain`] keeps absorbing
/// while each following span still continues the line.
pub fn merge_spans(spans: Vec<TextSpan>, mode: MergeMode) -> Vec<MergedSpan> {
    let mut merged: Vec<MergedSpan> = Vec::with_capacity(spans.len());
    let mut iter = spans.into_iter().peekable();

    while let Some(span) = iter.next() {
        let mut current = MergedSpan::from(span);
        while let Some(next) = iter.next_if(|next| continues(&current, next)) {
            absorb(&mut current, next);
            if mode == MergeMode::Pairwise {
                break;
            }
        }
        merged.push(current);
    }

    merged
}
