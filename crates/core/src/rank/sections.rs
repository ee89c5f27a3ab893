//! Sentence-level section chunking.
//!
//! Chunking is a two-state machine. A heading sentence flushes the open
//! section (when it has content) and opens a new one; a body sentence is
//! appended to the open section. A page that ends with no section open
//! becomes a generic `Content from Page N` section. The last open section is
//! flushed at the end of the document.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use super::cache::RunCache;
use super::segment::SentenceSegmenter;
use super::{Page, Section};

pub const MAX_HEADING_CHARS: usize = 200;
pub const MAX_COLON_HEADING_WORDS: usize = 6;

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(
            r"^(?:[0-9]+\.|(?:chapter|section|part)\s+[0-9]+|(?:abstract|introduction|conclusion|references|methodology|results|discussion|summary)$)",
        )
        .case_insensitive(true)
        .build()
        .unwrap()
    })
}

fn all_caps_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][A-Z\s]+$").unwrap())
}

fn sub_heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.[0-9]+").unwrap())
}

/// Whether a sentence reads as a section heading.
pub fn is_section_heading(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || text.chars().count() > MAX_HEADING_CHARS {
        return false;
    }
    if heading_regex().is_match(text) || all_caps_regex().is_match(text) {
        return true;
    }
    text.split_whitespace().count() <= MAX_COLON_HEADING_WORDS && text.ends_with(':')
}

/// Numbered sub-headings (`2.1 ...`) attach to the last top-level heading.
fn is_sub_heading(title: &str) -> bool {
    sub_heading_regex().is_match(title)
}

#[derive(Debug)]
enum ChunkState {
    NoOpenSection,
    AccumulatingSection(Section),
}

struct Chunker {
    state: ChunkState,
    sections: Vec<Section>,
    top_level: Option<String>,
}

impl Chunker {
    fn new() -> Self {
        Chunker {
            state: ChunkState::NoOpenSection,
            sections: Vec::new(),
            top_level: None,
        }
    }

    fn flush(&mut self) {
        if let ChunkState::AccumulatingSection(mut section) =
            std::mem::replace(&mut self.state, ChunkState::NoOpenSection)
        {
            section.content = section.content.trim().to_string();
            if !section.content.is_empty() {
                self.sections.push(section);
            }
        }
    }

    fn open(&mut self, title: String, page_number: usize, content: String, parent: Option<String>) {
        self.state = ChunkState::AccumulatingSection(Section {
            title,
            content,
            page_number,
            relevance_score: 0.0,
            key_points: Vec::new(),
            parent_section: parent,
        });
    }

    fn heading(&mut self, title: &str, page_number: usize) {
        self.flush();
        let parent = if is_sub_heading(title) {
            self.top_level.clone()
        } else {
            self.top_level = Some(title.to_string());
            None
        };
        self.open(title.to_string(), page_number, String::new(), parent);
    }

    fn body(&mut self, sentence: &str) {
        if let ChunkState::AccumulatingSection(section) = &mut self.state {
            section.content.push_str(sentence);
            section.content.push(' ');
        }
    }

    fn end_page(&mut self, page: &Page) {
        if matches!(self.state, ChunkState::NoOpenSection) {
            self.open(
                format!("Content from Page {}", page.number),
                page.number,
                format!("{} ", page.text.trim()),
                None,
            );
        }
    }

    fn finish(mut self) -> Vec<Section> {
        self.flush();
        self.sections
    }
}

/// Chunk the first `max_pages` pages into sections. Sections without
/// content are dropped.
pub fn chunk_sections(
    pages: &[Page],
    max_pages: usize,
    segmenter: &dyn SentenceSegmenter,
    cache: &mut RunCache,
) -> Vec<Section> {
    let mut chunker = Chunker::new();

    for page in pages.iter().take(max_pages) {
        if page.text.trim().is_empty() {
            continue;
        }
        for sentence in segmenter.sentences(&page.text) {
            if cache.is_heading(&sentence, is_section_heading) {
                chunker.heading(&sentence, page.number);
            } else {
                chunker.body(&sentence);
            }
        }
        chunker.end_page(page);
    }

    chunker.finish()
}
