use std::collections::HashMap;

use super::Section;

/// Run-scoped memo tables. One cache lives for one ranking run and is
/// dropped with it; nothing is shared across runs.
#[derive(Debug, Default)]
pub struct RunCache {
    sections: HashMap<String, Vec<Section>>,
    headings: HashMap<String, bool>,
    key_points: HashMap<String, Vec<String>>,
}

impl RunCache {
    /// Chunked sections of a document, by document key.
    pub fn sections(&self, key: &str) -> Option<&[Section]> {
        self.sections.get(key).map(Vec::as_slice)
    }

    pub fn store_sections(&mut self, key: &str, sections: Vec<Section>) {
        self.sections.insert(key.to_string(), sections);
    }

    /// Heading decision for `text`, computed with `decide` on first sight.
    pub fn is_heading(&mut self, text: &str, decide: impl FnOnce(&str) -> bool) -> bool {
        if let Some(known) = self.headings.get(text) {
            return *known;
        }
        let decision = decide(text);
        self.headings.insert(text.to_string(), decision);
        decision
    }

    /// Key points of `content`, computed with `extract` on first sight.
    pub fn key_points(
        &mut self,
        content: &str,
        extract: impl FnOnce(&str) -> Vec<String>,
    ) -> Vec<String> {
        if let Some(known) = self.key_points.get(content) {
            return known.clone();
        }
        let points = extract(content);
        self.key_points.insert(content.to_string(), points.clone());
        points
    }
}
