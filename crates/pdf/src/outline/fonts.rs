use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;

use crate::types::MergedSpan;

pub const H1_RATIO: f32 = 2.0;
pub const H2_RATIO: f32 = 1.5;
pub const H3_RATIO: f32 = 1.17;

/// A font used by more than this share of spans is a body font.
const COMMON_FONT_SHARE: f32 = 0.10;

/// Sizes are bucketed to hundredths of a point.
fn size_key(size: f32) -> i32 {
    (size * 100.0).round() as i32
}

fn key_size(key: i32) -> f32 {
    key as f32 / 100.0
}

/// Document-wide font statistics, computed once per document.
#[derive(Debug, Clone, PartialEq)]
pub struct FontAnalysis {
    /// Most frequent span size; the larger size wins a frequency tie.
    pub base_font_size: f32,
    pub h1_threshold: f32,
    pub h2_threshold: f32,
    pub h3_threshold: f32,
    /// Distinct sizes, largest first.
    pub unique_sizes: Vec<f32>,
    /// Fonts carried by more than 10% of spans.
    pub common_fonts: BTreeSet<String>,
}

impl FontAnalysis {
    pub fn from_spans(spans: &[MergedSpan]) -> Self {
        let mut frequency: BTreeMap<i32, usize> = BTreeMap::new();
        let mut font_usage: HashMap<&str, usize> = HashMap::new();

        for span in spans {
            *frequency.entry(size_key(span.font_size)).or_insert(0) += 1;
            *font_usage.entry(span.font_name.as_str()).or_insert(0) += 1;
        }

        // Ascending keys with `>=` leave the largest size among equals.
        let mut base_key = 0;
        let mut base_count = 0;
        for (&key, &count) in &frequency {
            if count >= base_count {
                base_key = key;
                base_count = count;
            }
        }
        let base_font_size = key_size(base_key);

        let total = spans.len() as f32;
        let common_fonts = font_usage
            .into_iter()
            .filter(|(_, count)| *count as f32 / total > COMMON_FONT_SHARE)
            .map(|(font, _)| font.to_string())
            .collect();

        let analysis = FontAnalysis {
            base_font_size,
            h1_threshold: base_font_size * H1_RATIO,
            h2_threshold: base_font_size * H2_RATIO,
            h3_threshold: base_font_size * H3_RATIO,
            unique_sizes: frequency.keys().rev().map(|&k| key_size(k)).collect(),
            common_fonts,
        };
        debug!(
            "font analysis: base={:.2} h1={:.2} h2={:.2} h3={:.2} sizes={}",
            analysis.base_font_size,
            analysis.h1_threshold,
            analysis.h2_threshold,
            analysis.h3_threshold,
            analysis.unique_sizes.len()
        );
        analysis
    }

    /// `size / base`, or 1.0 when there is no base size.
    pub fn size_ratio(&self, size: f32) -> f32 {
        if self.base_font_size > 0.0 {
            size / self.base_font_size
        } else {
            1.0
        }
    }

    /// Position of `size` among the distinct sizes, 0 being the largest.
    pub fn size_rank(&self, size: f32) -> Option<usize> {
        let key = size_key(size);
        self.unique_sizes.iter().position(|&s| size_key(s) == key)
    }

    pub fn is_common_font(&self, font_name: &str) -> bool {
        self.common_fonts.contains(font_name)
    }
}
