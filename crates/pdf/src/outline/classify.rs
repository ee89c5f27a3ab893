//! Heading versus body text.
//!
//! A span is scored on independent typographic and textual signals; every
//! signal is evaluated even when it overlaps another. Spans that matched a
//! heading pattern need a score of [`PATTERN_MIN_SCORE`], the rest need
//! [`PLAIN_MIN_SCORE`].

use super::fonts::FontAnalysis;
use super::rules;
use crate::types::MergedSpan;

pub const MIN_TEXT_CHARS: usize = 3;
pub const MAX_TEXT_CHARS: usize = 200;

pub const PATTERN_MIN_SCORE: u32 = 4;
pub const PLAIN_MIN_SCORE: u32 = 5;

/// One inch, in points.
const LEFT_MARGIN: f32 = 72.0;
const CENTER_TOLERANCE: f32 = 20.0;

/// Signals that fired for one span, kept for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub size_points: u32,
    pub bold: bool,
    pub formatted: bool,
    pub uncommon_font: bool,
    pub general_pattern: bool,
    pub extra_pattern: bool,
    pub title_case: bool,
    pub positioned: bool,
    pub underlined: bool,
    pub colored: bool,
}

impl Signals {
    pub fn score(&self) -> u32 {
        let flags = [
            (self.bold, 2),
            (self.formatted, 1),
            (self.uncommon_font, 1),
            (self.general_pattern, 3),
            (self.extra_pattern, 2),
            (self.title_case, 1),
            (self.positioned, 1),
            (self.underlined, 1),
            (self.colored, 1),
        ];
        self.size_points
            + flags
                .iter()
                .filter(|(fired, _)| *fired)
                .map(|(_, points)| points)
                .sum::<u32>()
    }

    pub fn min_score(&self) -> u32 {
        if self.general_pattern || self.extra_pattern {
            PATTERN_MIN_SCORE
        } else {
            PLAIN_MIN_SCORE
        }
    }
}

fn size_points(ratio: f32) -> u32 {
    if ratio >= 2.0 {
        5
    } else if ratio >= 1.5 {
        4
    } else if ratio >= 1.17 {
        3
    } else if ratio >= 1.1 {
        1
    } else {
        0
    }
}

/// Evaluate the signals for `span`, or `None` when a hard filter rejects it
/// (length out of range, or too small without a strong pattern).
pub fn signals(span: &MergedSpan, analysis: &FontAnalysis) -> Option<Signals> {
    let text = span.text.trim();
    let chars = text.chars().count();
    if !(MIN_TEXT_CHARS..=MAX_TEXT_CHARS).contains(&chars) {
        return None;
    }

    if span.font_size < analysis.h3_threshold && !rules::is_strong(text) {
        return None;
    }

    let style = span.style;
    let centered = (span.bbox.center_x() - span.page_width / 2.0).abs() < CENTER_TOLERANCE;

    Some(Signals {
        size_points: size_points(analysis.size_ratio(span.font_size)),
        bold: style.is_bold(),
        formatted: style.any(),
        uncommon_font: !analysis.is_common_font(&span.font_name),
        general_pattern: rules::is_general(text),
        extra_pattern: rules::is_extra(text),
        title_case: rules::is_upper(text) || rules::is_title(text),
        positioned: centered || span.bbox.x0 < LEFT_MARGIN,
        underlined: style.is_underlined(),
        colored: style.has_fill_color(),
    })
}

/// The span's score when it is accepted as a heading.
pub fn heading_score(span: &MergedSpan, analysis: &FontAnalysis) -> Option<u32> {
    let signals = signals(span, analysis)?;
    let score = signals.score();
    (score >= signals.min_score()).then_some(score)
}
