use log::{error, info, warn};
use thiserror::Error;

use parser::backend::{LopdfBackend, PdfBackend};

pub mod outline;
pub mod parser;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use outline::{MergeMode, OutlineOptions};
pub use types::*;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// A loaded PDF, ready for outline extraction or page-text reads without
/// re-parsing from bytes.
pub struct Document {
    backend: LopdfBackend,
}

impl Document {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        Ok(Document {
            backend: LopdfBackend::load_bytes(bytes)?,
        })
    }

    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }

    /// Title and heading outline.
    pub fn outline(&self, options: &OutlineOptions) -> DocumentResult {
        let source = outline::BackendSource::new(&self.backend);
        let result = outline::build_outline(&source, options);
        info!(
            "outlined {} pages: {} headings, title {:?}",
            self.page_count(),
            result.outline.len(),
            result.title
        );
        result
    }

    /// Cleaned plain text of the first `max_pages` pages. Pages that fail to
    /// extract are skipped.
    pub fn page_texts(&self, max_pages: usize) -> Vec<PageText> {
        self.backend
            .pages()
            .into_iter()
            .take(max_pages)
            .filter_map(|(page, page_id)| {
                match parser::layout::extract_page_text(&self.backend, page_id) {
                    Ok(text) => Some(PageText {
                        page: page as usize,
                        text: parser::cleanup::clean_page_text(&text),
                    }),
                    Err(e) => {
                        warn!("skipping page {page}: {e}");
                        None
                    }
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Convenience free functions
// ---------------------------------------------------------------------------

/// Outline with default options.
pub fn outline(bytes: &[u8]) -> DocumentResult {
    outline_with(bytes, &OutlineOptions::default())
}

/// Outline a PDF. Never fails: a document that cannot be loaded yields
/// [`DocumentResult::extraction_failed`].
pub fn outline_with(bytes: &[u8], options: &OutlineOptions) -> DocumentResult {
    match Document::from_bytes(bytes) {
        Ok(document) => document.outline(options),
        Err(e) => {
            error!("outline extraction failed: {e}");
            DocumentResult::extraction_failed()
        }
    }
}

pub fn page_texts(bytes: &[u8], max_pages: usize) -> Result<Vec<PageText>, PdfError> {
    Ok(Document::from_bytes(bytes)?.page_texts(max_pages))
}
