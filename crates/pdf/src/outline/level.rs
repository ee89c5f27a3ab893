use log::trace;

use super::fonts::FontAnalysis;
use super::rules;
use crate::types::{HeadingLevel, MergedSpan};

/// Level for an accepted heading.
///
/// 1. The first rule in the table implying a level, H1 rows before H2 rows
///    before H3 rows.
/// 2. Absolute size thresholds.
/// 3. Rank of the size among the document's distinct sizes.
/// 4. H3.
pub fn assign_level(span: &MergedSpan, analysis: &FontAnalysis) -> HeadingLevel {
    let text = span.text.trim();

    if let Some((level, rule)) = rules::implied_level(text) {
        trace!("{text:?} -> {level} by rule {rule}");
        return level;
    }

    let size = span.font_size;
    if size >= analysis.h1_threshold {
        return HeadingLevel::H1;
    }
    if size >= analysis.h2_threshold {
        return HeadingLevel::H2;
    }
    if size >= analysis.h3_threshold {
        return HeadingLevel::H3;
    }

    match analysis.size_rank(size) {
        Some(0) => HeadingLevel::H1,
        Some(1) => HeadingLevel::H2,
        _ => HeadingLevel::H3,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::types::{BoundingBox, StyleFlags};

    fn analysis(base: f32, sizes: &[f32]) -> FontAnalysis {
        FontAnalysis {
            base_font_size: base,
            h1_threshold: base * 2.0,
            h2_threshold: base * 1.5,
            h3_threshold: base * 1.17,
            unique_sizes: sizes.to_vec(),
            common_fonts: BTreeSet::new(),
        }
    }

    fn span(text: &str, size: f32) -> MergedSpan {
        MergedSpan {
            text: text.to_string(),
            font_name: "F".to_string(),
            font_size: size,
            style: StyleFlags::BOLD,
            bbox: BoundingBox::default(),
            page: 1,
            page_width: 612.0,
            fragments: 1,
        }
    }

    #[test]
    fn test_pattern_overrides_size() {
        let a = analysis(12.0, &[30.0, 12.0]);
        assert_eq!(assign_level(&span("1.1 Overview of Methods", 30.0), &a), HeadingLevel::H2);
        assert_eq!(assign_level(&span("1.2.3 Detail", 30.0), &a), HeadingLevel::H3);
        assert_eq!(assign_level(&span("Chapter 2", 10.0), &a), HeadingLevel::H1);
    }

    #[test]
    fn test_size_thresholds() {
        let a = analysis(12.0, &[24.0, 18.0, 14.5, 12.0]);
        assert_eq!(assign_level(&span("Big plain heading", 24.0), &a), HeadingLevel::H1);
        assert_eq!(assign_level(&span("Medium plain heading", 18.0), &a), HeadingLevel::H2);
        assert_eq!(assign_level(&span("Small plain heading", 14.5), &a), HeadingLevel::H3);
    }

    #[test]
    fn test_rank_fallback_below_thresholds() {
        let a = analysis(12.0, &[11.0, 10.0, 9.0, 8.0]);
        assert_eq!(assign_level(&span("rank zero text", 11.0), &a), HeadingLevel::H1);
        assert_eq!(assign_level(&span("rank one text", 10.0), &a), HeadingLevel::H2);
        assert_eq!(assign_level(&span("rank two text", 9.0), &a), HeadingLevel::H3);
        assert_eq!(assign_level(&span("rank three text", 8.0), &a), HeadingLevel::H3);
    }

    #[test]
    fn test_unknown_size_defaults_to_h3() {
        let a = analysis(12.0, &[12.0]);
        assert_eq!(assign_level(&span("odd size text", 7.0), &a), HeadingLevel::H3);
    }
}
