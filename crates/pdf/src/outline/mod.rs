//! Heading detection and outline construction.
//!
//! ```text
//! pages (chunks of 5) -> spans -> merge -> ... early stop? ...
//!     -> FontAnalysis -> classify -> assign level -> sort by page
//! ```
//!
//! Font statistics are computed once, after the scan, over every merged
//! span collected. Merging never crosses a chunk boundary.

pub mod classify;
pub mod fonts;
pub mod level;
pub mod merge;
pub mod rules;
pub mod title;

use log::{debug, warn};

use crate::parser::backend::{PageId, PdfBackend};
use crate::parser::layout;
use crate::types::{DocumentResult, HeadingCandidate, MergedSpan, OutlineEntry, TextSpan};
use crate::PdfError;

pub use fonts::FontAnalysis;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// At most two spans per merged span.
    #[default]
    Pairwise,
    /// Greedily chain any number of fragments.
    Chain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineOptions {
    /// Pages extracted and merged together.
    pub chunk_size: usize,
    /// Scanning stops after the chunk in which the running count of
    /// heading-pattern matches exceeds this.
    pub early_stop_matches: usize,
    pub merge: MergeMode,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            chunk_size: 5,
            early_stop_matches: 30,
            merge: MergeMode::Pairwise,
        }
    }
}

// ---------------------------------------------------------------------------
// Span sources
// ---------------------------------------------------------------------------

/// Where the builder gets its spans from.
pub trait SpanSource {
    fn page_count(&self) -> usize;

    /// Spans of a 1-based page, in reading order.
    fn page_spans(&self, page: usize) -> Result<Vec<TextSpan>, PdfError>;

    fn metadata_title(&self) -> Option<String>;
}

/// A [`SpanSource`] reading through a [`PdfBackend`].
pub struct BackendSource<'a> {
    backend: &'a dyn PdfBackend,
    pages: Vec<PageId>,
}

impl<'a> BackendSource<'a> {
    pub fn new(backend: &'a dyn PdfBackend) -> Self {
        Self {
            pages: backend.pages().into_values().collect(),
            backend,
        }
    }
}

impl SpanSource for BackendSource<'_> {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_spans(&self, page: usize) -> Result<Vec<TextSpan>, PdfError> {
        let page_id = page
            .checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .ok_or_else(|| PdfError::Parse(format!("page {page} out of range")))?;
        layout::extract_page_spans(self.backend, page, *page_id)
    }

    fn metadata_title(&self) -> Option<String> {
        self.backend.title()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Everything the scan collected before font analysis.
#[derive(Debug, Default)]
struct Scan {
    merged: Vec<MergedSpan>,
    first_page: Vec<TextSpan>,
    pages_scanned: usize,
}

fn scan(source: &dyn SpanSource, options: &OutlineOptions) -> Scan {
    let page_count = source.page_count();
    let chunk_size = options.chunk_size.max(1);
    let mut scan = Scan::default();
    let mut pattern_matches = 0;

    for chunk_start in (1..=page_count).step_by(chunk_size) {
        let chunk_end = (chunk_start + chunk_size - 1).min(page_count);

        let mut chunk_spans: Vec<TextSpan> = Vec::new();
        for page in chunk_start..=chunk_end {
            match source.page_spans(page) {
                Ok(spans) => {
                    if page == 1 {
                        scan.first_page = spans.clone();
                    }
                    chunk_spans.extend(spans);
                }
                Err(e) => warn!("skipping page {page}: {e}"),
            }
        }
        scan.pages_scanned = chunk_end;

        let merged = merge::merge_spans(chunk_spans, options.merge);
        pattern_matches += merged
            .iter()
            .filter(|m| rules::is_general(m.text.trim()))
            .count();
        scan.merged.extend(merged);

        if pattern_matches > options.early_stop_matches {
            debug!(
                "early stop after page {chunk_end} of {page_count}: {pattern_matches} pattern matches"
            );
            break;
        }
    }

    scan
}

/// Classify and level every merged span, in detection order.
pub fn detect_headings(merged: Vec<MergedSpan>, analysis: &FontAnalysis) -> Vec<HeadingCandidate> {
    merged
        .into_iter()
        .filter_map(|span| {
            let score = classify::heading_score(&span, analysis)?;
            let level = level::assign_level(&span, analysis);
            Some(HeadingCandidate { span, level, score })
        })
        .collect()
}

/// Build the title and outline of one document.
///
/// Pages that fail to extract are skipped with a warning; nothing here
/// fails the document.
pub fn build_outline(source: &dyn SpanSource, options: &OutlineOptions) -> DocumentResult {
    let scan = scan(source, options);
    let analysis = FontAnalysis::from_spans(&scan.merged);

    let mut headings = detect_headings(scan.merged, &analysis);
    headings.sort_by_key(|h| h.span.page);
    debug!(
        "{} headings over {} scanned pages",
        headings.len(),
        scan.pages_scanned
    );

    let title = title::resolve_title(source.metadata_title().as_deref(), &scan.first_page);
    DocumentResult::new(title, headings.into_iter().map(OutlineEntry::from).collect())
}
