//! Persona-driven section relevance ranking.
//!
//! A document's page texts are segmented into sentences, chunked into
//! sections at heading-like sentences, scored against a query and sorted by
//! relevance. Everything here is pure; the caller supplies page text.
//!
//! ```text
//! pages -> sentences -> sections -> scores -> key points -> sorted sections
//! ```

pub mod cache;
pub mod keypoints;
pub mod lexical;
pub mod report;
pub mod sections;
pub mod segment;
pub mod tfidf;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cache::RunCache;
pub use report::{build_report, RankReport, RankedDocument};
pub use segment::{PunctuationSegmenter, SentenceSegmenter};

#[derive(Debug, Error)]
pub enum RankError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Empty vocabulary: no scorable terms remain")]
    EmptyVocabulary,
    #[error("Unknown strategy: {0} (expected tfidf or lexical)")]
    UnknownStrategy(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// TF-IDF vectors compared by cosine similarity.
    #[default]
    Tfidf,
    /// Query-term overlap normalised by section length.
    Lexical,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Tfidf => write!(f, "tfidf"),
            Strategy::Lexical => write!(f, "lexical"),
        }
    }
}

impl FromStr for Strategy {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tfidf" | "tf-idf" => Ok(Strategy::Tfidf),
            "lexical" => Ok(Strategy::Lexical),
            other => Err(RankError::UnknownStrategy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankOptions {
    pub strategy: Strategy,
    /// Pages read per document.
    pub max_pages: usize,
    /// Sections per document carried into the report.
    pub sections_per_document: usize,
    pub key_point_limit: usize,
    /// Characters of section content fed to the TF-IDF vectoriser.
    pub content_prefix: usize,
    /// Characters of section content searched for key points.
    pub key_point_window: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Tfidf,
            max_pages: 10,
            sections_per_document: 5,
            key_point_limit: 3,
            content_prefix: 500,
            key_point_window: 1000,
        }
    }
}

/// Extracted text of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub text: String,
}

impl Page {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Page {
            number,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
    pub page_number: usize,
    pub relevance_score: f64,
    pub key_points: Vec<String>,
    pub parent_section: Option<String>,
}

/// First `n` characters of `s`.
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Scores used when vectorisation is impossible: 0.5, 0.4, ... floored at 0.
pub fn fallback_scores(n: usize) -> Vec<f64> {
    (0..n).map(|i| (0.5 - 0.1 * i as f64).max(0.0)).collect()
}

/// Ranks the sections of one document at a time, memoising through a
/// run-scoped [`RunCache`].
pub struct Ranker<S: SentenceSegmenter = PunctuationSegmenter> {
    segmenter: S,
    options: RankOptions,
    cache: RunCache,
}

impl Ranker<PunctuationSegmenter> {
    pub fn new(options: RankOptions) -> Self {
        Ranker::with_segmenter(PunctuationSegmenter, options)
    }
}

impl<S: SentenceSegmenter> Ranker<S> {
    pub fn with_segmenter(segmenter: S, options: RankOptions) -> Self {
        Ranker {
            segmenter,
            options,
            cache: RunCache::default(),
        }
    }

    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    pub fn cache(&self) -> &RunCache {
        &self.cache
    }

    /// Sections of the document `key`, sorted by descending relevance to
    /// `query`. Ties keep document order.
    pub fn rank_document(&mut self, key: &str, pages: &[Page], query: &str) -> Vec<Section> {
        let mut sections = match self.cache.sections(key) {
            Some(cached) => cached.to_vec(),
            None => {
                let chunked = sections::chunk_sections(
                    pages,
                    self.options.max_pages,
                    &self.segmenter,
                    &mut self.cache,
                );
                self.cache.store_sections(key, chunked.clone());
                chunked
            }
        };

        let scores = self.score(&sections, query);
        for (section, score) in sections.iter_mut().zip(scores) {
            section.relevance_score = score;
            let window = char_prefix(&section.content, self.options.key_point_window);
            section.key_points = self.cache.key_points(window, |content| {
                keypoints::extract_key_points(content, &self.segmenter, self.options.key_point_limit)
            });
        }

        sections.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sections
    }

    fn score(&self, sections: &[Section], query: &str) -> Vec<f64> {
        match self.options.strategy {
            Strategy::Lexical => sections
                .iter()
                .map(|s| lexical::lexical_score(&format!("{} {}", s.title, s.content), query))
                .collect(),
            Strategy::Tfidf => {
                let texts: Vec<String> = sections
                    .iter()
                    .map(|s| {
                        format!(
                            "{} {}",
                            s.title,
                            char_prefix(&s.content, self.options.content_prefix)
                        )
                    })
                    .collect();
                tfidf::similarities(query, &texts).unwrap_or_else(|_| fallback_scores(sections.len()))
            }
        }
    }
}
