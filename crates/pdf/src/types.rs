use std::fmt;

use serde::{Deserialize, Serialize};

/// Style bits carried by a [`TextSpan`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleFlags(u8);

impl StyleFlags {
    pub const BOLD: Self = StyleFlags(1 << 0);
    pub const ITALIC: Self = StyleFlags(1 << 1);
    pub const UNDERLINE: Self = StyleFlags(1 << 2);
    pub const FILL_COLOR: Self = StyleFlags(1 << 3);

    pub const fn empty() -> Self {
        StyleFlags(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub const fn with(self, other: Self) -> Self {
        StyleFlags(self.0 | other.0)
    }

    pub fn is_bold(self) -> bool {
        self.contains(Self::BOLD)
    }

    pub fn is_italic(self) -> bool {
        self.contains(Self::ITALIC)
    }

    pub fn is_underlined(self) -> bool {
        self.contains(Self::UNDERLINE)
    }

    pub fn has_fill_color(self) -> bool {
        self.contains(Self::FILL_COLOR)
    }

    /// True when any of the four style bits is set.
    pub fn any(self) -> bool {
        self.0 != 0
    }
}

/// Axis-aligned box in top-down page coordinates: `y0` is the top edge,
/// `y1` the bottom edge, both measured from the top of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        BoundingBox { x0, y0, x1, y1 }
    }

    pub fn center_x(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// One contiguous run of uniformly-styled text on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub font_name: String,
    pub font_size: f32,
    pub style: StyleFlags,
    pub bbox: BoundingBox,
    /// 1-based page number.
    pub page: usize,
    /// Width of the page the span was found on, in points.
    pub page_width: f32,
}

/// A [`TextSpan`], or several consecutive spans judged to be one logical line.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSpan {
    pub text: String,
    pub font_name: String,
    pub font_size: f32,
    pub style: StyleFlags,
    pub bbox: BoundingBox,
    pub page: usize,
    pub page_width: f32,
    /// Number of source spans folded into this one.
    pub fragments: usize,
}

impl From<TextSpan> for MergedSpan {
    fn from(span: TextSpan) -> Self {
        MergedSpan {
            text: span.text,
            font_name: span.font_name,
            font_size: span.font_size,
            style: span.style,
            bbox: span.bbox,
            page: span.page,
            page_width: span.page_width,
            fragments: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn as_u8(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.as_u8())
    }
}

/// A merged span accepted as a heading, with its assigned level.
#[derive(Debug, Clone)]
pub struct HeadingCandidate {
    pub span: MergedSpan,
    pub level: HeadingLevel,
    pub score: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: usize,
}

impl From<HeadingCandidate> for OutlineEntry {
    fn from(candidate: HeadingCandidate) -> Self {
        OutlineEntry {
            level: candidate.level,
            text: candidate.span.text,
            page: candidate.span.page,
        }
    }
}

/// Title used when extraction of a document fails mid-pipeline.
pub const EXTRACTION_ERROR_TITLE: &str = "Error Processing Document";

/// Title used when a document could not be handed to the pipeline at all.
pub const PROCESSING_ERROR_TITLE: &str = "Processing Error";

/// Title used when neither metadata nor the first page yields one.
pub const UNTITLED: &str = "Untitled Document";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DocumentResult {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentResult {
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        DocumentResult {
            title: title.into(),
            outline,
            error: None,
        }
    }

    /// The fixed result for a document whose extraction failed.
    pub fn extraction_failed() -> Self {
        DocumentResult::new(EXTRACTION_ERROR_TITLE, Vec::new())
    }

    /// The result written for an input that never reached the pipeline
    /// (unreadable file and similar).
    pub fn processing_error(error: impl fmt::Display) -> Self {
        DocumentResult {
            title: PROCESSING_ERROR_TITLE.to_string(),
            outline: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.title == EXTRACTION_ERROR_TITLE
    }
}

/// Plain text of one page, one extracted line per `\n`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page: usize,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_display_and_order() {
        assert_eq!(format!("{}", HeadingLevel::H2), "H2");
        assert_eq!(HeadingLevel::H3.as_u8(), 3);
        assert!(HeadingLevel::H1 < HeadingLevel::H3);
    }

    #[test]
    fn test_heading_level_serializes_as_tag() {
        let entry = OutlineEntry {
            level: HeadingLevel::H1,
            text: "Introduction".to_string(),
            page: 1,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"level":"H1","text":"Introduction","page":1}"#);
    }

    #[test]
    fn test_style_flags() {
        let mut flags = StyleFlags::empty();
        assert!(!flags.any());
        flags.insert(StyleFlags::BOLD);
        assert!(flags.is_bold());
        assert!(!flags.is_italic());
        let flags = flags.with(StyleFlags::FILL_COLOR);
        assert!(flags.has_fill_color());
        assert!(flags.any());
    }

    #[test]
    fn test_document_result_error_shapes() {
        let failed = DocumentResult::extraction_failed();
        assert_eq!(failed.title, "Error Processing Document");
        assert!(failed.outline.is_empty());
        assert!(failed.is_error());
        let json = serde_json::to_string(&failed).unwrap();
        assert_eq!(json, r#"{"title":"Error Processing Document","outline":[]}"#);

        let processing = DocumentResult::processing_error("boom");
        let json = serde_json::to_string(&processing).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Processing Error","outline":[],"error":"boom"}"#
        );
    }

    #[test]
    fn test_bounding_box_helpers() {
        let bbox = BoundingBox::new(10.0, 20.0, 110.0, 32.0);
        assert!((bbox.center_x() - 60.0).abs() < f32::EPSILON);
    }
}
