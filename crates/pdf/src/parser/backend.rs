use std::collections::BTreeMap;

use lopdf::{self, content::Content};

use crate::PdfError;

/// Object id of a page: (object number, generation number).
pub type PageId = (u32, u16);

/// US Letter, used when a page carries no usable MediaBox.
pub const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Font entry from a page's resource dictionary.
#[derive(Debug, Clone)]
pub struct BackendFontInfo {
    /// Resource key, e.g. `b"F1"`.
    pub name: Vec<u8>,
    pub base_font: Option<String>,
    pub subtype: Option<String>,
    pub encoding: Option<String>,
}

/// Backend-neutral PDF value, so the span extractor never touches
/// `lopdf::Object` directly.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    Dict(Vec<(Vec<u8>, PdfValue)>),
    Reference(PageId),
}

/// One content-stream operation.
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

pub fn get_number_from_value(val: &PdfValue) -> Option<f32> {
    match val {
        PdfValue::Integer(i) => Some(*i as f32),
        PdfValue::Real(f) => Some(*f),
        _ => None,
    }
}

/// Convert a `lopdf::Object` into a [`PdfValue`]. Stream payloads are dropped;
/// only their dictionaries survive.
pub fn convert_object(obj: &lopdf::Object) -> PdfValue {
    match obj {
        lopdf::Object::Null => PdfValue::Null,
        lopdf::Object::Boolean(b) => PdfValue::Bool(*b),
        lopdf::Object::Integer(i) => PdfValue::Integer(*i),
        lopdf::Object::Real(f) => PdfValue::Real(*f),
        lopdf::Object::Name(n) => PdfValue::Name(n.clone()),
        lopdf::Object::String(s, _) => PdfValue::Str(s.clone()),
        lopdf::Object::Array(arr) => PdfValue::Array(arr.iter().map(convert_object).collect()),
        lopdf::Object::Dictionary(dict) => PdfValue::Dict(
            dict.iter()
                .map(|(k, v)| (k.clone(), convert_object(v)))
                .collect(),
        ),
        lopdf::Object::Stream(stream) => PdfValue::Dict(
            stream
                .dict
                .iter()
                .map(|(k, v)| (k.clone(), convert_object(v)))
                .collect(),
        ),
        lopdf::Object::Reference(id) => PdfValue::Reference(*id),
    }
}

/// Decode raw PDF string bytes: UTF-16BE with BOM, then UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let code_units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&code_units);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// PdfBackend trait
// ---------------------------------------------------------------------------

/// The seam between PDF parsing and the span extractor. Tests drive the
/// extractor through mock implementations.
pub trait PdfBackend {
    /// 1-based page number to [`PageId`].
    fn pages(&self) -> BTreeMap<u32, PageId>;

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>, PdfError>;

    /// Raw (decompressed) content stream bytes for a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError>;

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError>;

    /// Decode the bytes of a text-showing operand using whatever encoding
    /// information the font provides.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;

    /// `(width, height)` of the page in points.
    fn page_dimensions(&self, page: PageId) -> Result<(f32, f32), PdfError>;

    /// `Title` entry of the trailer Info dictionary.
    fn title(&self) -> Option<String>;

    fn page_count(&self) -> usize {
        self.pages().len()
    }
}

// ---------------------------------------------------------------------------
// LopdfBackend
// ---------------------------------------------------------------------------

pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        Ok(Self { doc })
    }

    /// Walk up the page tree until a MediaBox turns up.
    fn find_media_box(&self, dict: &lopdf::Dictionary) -> Option<Vec<lopdf::Object>> {
        if let Ok(obj) = dict.get(b"MediaBox") {
            if let Some(arr) = self.resolve_array(obj) {
                return Some(arr);
            }
        }

        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = self.doc.get_object(parent_id).ok()?.as_dict().ok()?;
        self.find_media_box(parent)
    }

    fn resolve_array(&self, obj: &lopdf::Object) -> Option<Vec<lopdf::Object>> {
        match obj {
            lopdf::Object::Array(arr) => Some(arr.clone()),
            lopdf::Object::Reference(id) => self
                .doc
                .get_object(*id)
                .ok()
                .and_then(|resolved| resolved.as_array().ok().cloned()),
            _ => None,
        }
    }

    fn array_to_f32s(&self, objects: &[lopdf::Object]) -> Result<Vec<f32>, PdfError> {
        objects
            .iter()
            .map(|obj| {
                let resolved = match obj {
                    lopdf::Object::Reference(id) => self
                        .doc
                        .get_object(*id)
                        .map_err(|e| PdfError::Parse(e.to_string()))?,
                    other => other,
                };
                match resolved {
                    lopdf::Object::Integer(i) => Ok(*i as f32),
                    lopdf::Object::Real(f) => Ok(*f),
                    _ => Err(PdfError::Parse(format!(
                        "expected number in MediaBox, got {:?}",
                        resolved
                    ))),
                }
            })
            .collect()
    }

    fn font_encoding_name(&self, page: PageId, font_name: &[u8]) -> Option<String> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        let font_dict = fonts.get(font_name)?;
        match font_dict.get(b"Encoding").ok()? {
            lopdf::Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }
    }

    fn info_dictionary(&self) -> Option<&lopdf::Dictionary> {
        match self.doc.trailer.get(b"Info").ok()? {
            lopdf::Object::Reference(id) => self.doc.get_object(*id).ok()?.as_dict().ok(),
            lopdf::Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<BackendFontInfo>, PdfError> {
        let fonts_map = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page fonts: {}", e)))?;

        let name_of = |dict: &lopdf::Dictionary, key: &[u8]| {
            dict.get(key)
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).into_owned())
        };

        Ok(fonts_map
            .iter()
            .map(|(name, dict)| BackendFontInfo {
                name: name.clone(),
                base_font: name_of(dict, b"BaseFont"),
                subtype: name_of(dict, b"Subtype"),
                encoding: name_of(dict, b"Encoding"),
            })
            .collect())
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>, PdfError> {
        self.doc
            .get_page_content(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page content: {}", e)))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
        let content = Content::decode(data)
            .map_err(|e| PdfError::Parse(format!("content stream decode error: {}", e)))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Some(enc_name) = self.font_encoding_name(page, font_name) {
            // Identity-H/V fonts carry 2-byte CIDs that usually map straight to UTF-16.
            if enc_name.contains("Identity") && bytes.len() >= 2 && bytes.len() % 2 == 0 {
                let code_units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                let decoded = String::from_utf16_lossy(&code_units);
                if !decoded.is_empty() && !decoded.chars().all(|c| c == '\u{FFFD}' || c == '\0') {
                    return decoded;
                }
            }
        }

        decode_text_simple(bytes)
    }

    fn page_dimensions(&self, page: PageId) -> Result<(f32, f32), PdfError> {
        let page_dict = self
            .doc
            .get_object(page)
            .and_then(|obj| obj.as_dict())
            .map_err(|e| PdfError::Parse(format!("cannot get page dictionary: {}", e)))?;

        let media_box = self
            .find_media_box(page_dict)
            .ok_or_else(|| PdfError::Parse("MediaBox not found for page".into()))?;

        let nums = self.array_to_f32s(&media_box)?;
        if nums.len() < 4 {
            return Err(PdfError::Parse(format!(
                "MediaBox has {} elements, expected 4",
                nums.len()
            )));
        }

        Ok((nums[2] - nums[0], nums[3] - nums[1]))
    }

    fn title(&self) -> Option<String> {
        match self.info_dictionary()?.get(b"Title") {
            Ok(lopdf::Object::String(bytes, _)) => Some(decode_text_simple(bytes)),
            Ok(lopdf::Object::Name(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{build_pdf, PageSpec, TextOp};

    #[test]
    fn decode_text_simple_utf8() {
        assert_eq!(decode_text_simple("caf\u{00E9}".as_bytes()), "caf\u{00E9}");
    }

    #[test]
    fn decode_text_simple_latin1() {
        let input: &[u8] = &[0x63, 0x61, 0x66, 0xE9];
        assert_eq!(decode_text_simple(input), "caf\u{00E9}");
    }

    #[test]
    fn decode_text_simple_utf16be() {
        let input: &[u8] = &[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42, 0x00];
        assert_eq!(decode_text_simple(input), "AB");
    }

    #[test]
    fn decode_text_simple_empty() {
        assert_eq!(decode_text_simple(&[]), "");
    }

    #[test]
    fn get_number_from_numeric_and_other_values() {
        assert_eq!(get_number_from_value(&PdfValue::Integer(-10)), Some(-10.0));
        assert_eq!(get_number_from_value(&PdfValue::Real(2.5)), Some(2.5));
        assert_eq!(get_number_from_value(&PdfValue::Name(b"F1".to_vec())), None);
        assert_eq!(get_number_from_value(&PdfValue::Null), None);
    }

    #[test]
    fn convert_nested_array_in_dict() {
        let mut dict = lopdf::Dictionary::new();
        dict.set(
            "MediaBox",
            lopdf::Object::Array(vec![
                lopdf::Object::Integer(0),
                lopdf::Object::Integer(0),
                lopdf::Object::Real(612.0),
                lopdf::Object::Real(792.0),
            ]),
        );

        match convert_object(&lopdf::Object::Dictionary(dict)) {
            PdfValue::Dict(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].0, b"MediaBox");
                assert_eq!(
                    entries[0].1,
                    PdfValue::Array(vec![
                        PdfValue::Integer(0),
                        PdfValue::Integer(0),
                        PdfValue::Real(612.0),
                        PdfValue::Real(792.0),
                    ])
                );
            }
            other => panic!("expected Dict, got {:?}", other),
        }
    }

    #[test]
    fn convert_reference_and_string() {
        assert_eq!(
            convert_object(&lopdf::Object::Reference((7, 0))),
            PdfValue::Reference((7, 0))
        );
        assert_eq!(
            convert_object(&lopdf::Object::String(
                b"hi".to_vec(),
                lopdf::StringFormat::Literal
            )),
            PdfValue::Str(b"hi".to_vec())
        );
    }

    #[test]
    fn load_bytes_rejects_garbage() {
        assert!(matches!(
            LopdfBackend::load_bytes(b"not a pdf"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn lopdf_backend_reads_pages_dimensions_and_title() {
        let bytes = build_pdf(
            Some("Annual Report 2024"),
            &[PageSpec::new(vec![TextOp::new("F1", 12.0, 72.0, 700.0, "Hello")])],
        );
        let backend = LopdfBackend::load_bytes(&bytes).unwrap();

        assert_eq!(backend.page_count(), 1);
        let page_id = backend.pages()[&1];
        let (w, h) = backend.page_dimensions(page_id).unwrap();
        assert!((w - 612.0).abs() < 0.01);
        assert!((h - 792.0).abs() < 0.01);
        assert_eq!(backend.title().as_deref(), Some("Annual Report 2024"));

        let fonts = backend.page_fonts(page_id).unwrap();
        assert!(fonts
            .iter()
            .any(|f| f.name == b"F1" && f.base_font.as_deref() == Some("Helvetica")));
    }
}
