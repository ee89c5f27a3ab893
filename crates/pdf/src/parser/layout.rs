//! Styled span extraction.
//!
//! Walks a page's content stream with a simplified text-rendering state
//! machine, groups the resulting glyph runs into lines and emits one
//! [`TextSpan`] per uniformly-styled run within a line.
//!
//! ```text
//! content ops  ->  GlyphRun[]  ->  TextLine[]  ->  TextSpan[]
//!   (per page)     extract_runs    group_runs      spans_from_lines
//! ```

use super::backend::{get_number_from_value, BackendFontInfo, PageId, PdfBackend, PdfValue};
use super::cleanup::clean_span_text;
use crate::types::{BoundingBox, StyleFlags, TextSpan};
use crate::PdfError;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A run of glyphs shown by a single text operator, in PDF user space
/// (origin bottom-left, `y` is the baseline).
#[derive(Debug, Clone)]
pub struct GlyphRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font_size: f32,
    pub font_name: String,
    pub style: StyleFlags,
}

/// Glyph runs sharing (approximately) one baseline, left to right.
#[derive(Debug, Clone, Default)]
pub struct TextLine {
    pub runs: Vec<GlyphRun>,
    pub y: f32,
    pub x: f32,
}

impl TextLine {
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Runs whose baselines differ by less than this share a line.
const Y_TOLERANCE: f32 = 1.0;

/// Glyph width as a fraction of font size; there are no width tables here.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Minimum horizontal gap (points) before a space is inserted between runs.
const MIN_WORD_GAP: f32 = 1.5;

/// Size tolerance for treating two runs as the same style.
const SAME_SIZE_TOLERANCE: f32 = 0.5;

/// Share of the font size above the baseline; the rest sits below it.
const ASCENT_RATIO: f32 = 0.8;

// ---------------------------------------------------------------------------
// CJK / spaceless-script helper
// ---------------------------------------------------------------------------

/// Returns `true` if `c` belongs to a script written without inter-word
/// spaces (CJK, kana, Hangul, Thai, Lao, Myanmar, Khmer, Tibetan).
pub fn is_spaceless_script_char(c: char) -> bool {
    matches!(
        c as u32,
        0x4E00..=0x9FFF
            | 0x3400..=0x4DBF
            | 0x20000..=0x2A6DF
            | 0xF900..=0xFAFF
            | 0x3040..=0x309F
            | 0x30A0..=0x30FF
            | 0x31F0..=0x31FF
            | 0xAC00..=0xD7AF
            | 0x1100..=0x11FF
            | 0x3130..=0x318F
            | 0x3000..=0x303F
            | 0xFF00..=0xFFEF
            | 0x0E00..=0x0E7F
            | 0x0E80..=0x0EFF
            | 0x1000..=0x109F
            | 0x1780..=0x17FF
            | 0x0F00..=0x0FFF
    )
}

// ---------------------------------------------------------------------------
// Internal: PDF text-state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TextState {
    /// Resource key of the current font (`/F1`), not its base name.
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    /// [a, b, c, d, tx, ty]
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
    is_bold: bool,
    is_italic: bool,
    /// Non-stroking colour is something other than black.
    fill_colored: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
            is_bold: false,
            is_italic: false,
            fill_colored: false,
        }
    }
}

const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

impl TextState {
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// `font_size * sqrt(b^2 + d^2)`
    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Td / TD: pre-multiply the line matrix by a translation.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    fn set_font(&mut self, key: Vec<u8>, base_font: &str, size: f32) {
        self.font_key = key;
        self.font_size = size;

        let upper = base_font.to_uppercase();
        self.is_bold = upper.contains("BOLD") || upper.contains("BLACK") || upper.contains("HEAVY");
        self.is_italic = upper.contains("ITALIC") || upper.contains("OBLIQUE");
        self.font_name = base_font.to_string();
    }

    fn style(&self) -> StyleFlags {
        let mut style = StyleFlags::empty();
        if self.is_bold {
            style.insert(StyleFlags::BOLD);
        }
        if self.is_italic {
            style.insert(StyleFlags::ITALIC);
        }
        if self.fill_colored {
            style.insert(StyleFlags::FILL_COLOR);
        }
        style
    }
}

fn resolve_font<'a>(key: &[u8], fonts: &'a [BackendFontInfo]) -> Option<&'a BackendFontInfo> {
    fonts.iter().find(|info| info.name == key)
}

fn estimate_text_width(text: &str, state: &TextState) -> f32 {
    let n = text.chars().count() as f32;
    n * state.effective_font_size() * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale
}

fn advance_after_show(text: &str, state: &mut TextState) {
    let mut total_dx: f32 = 0.0;
    for ch in text.chars() {
        total_dx += state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale + state.char_spacing;
        if ch == ' ' {
            total_dx += state.word_spacing;
        }
    }
    state.advance_x(total_dx);
}

fn decode_string(val: &PdfValue, backend: &dyn PdfBackend, page_id: PageId, font_key: &[u8]) -> String {
    match val {
        PdfValue::Str(bytes) => {
            let decoded = backend.decode_text(page_id, font_key, bytes);
            if decoded.is_empty() {
                super::backend::decode_text_simple(bytes)
            } else {
                decoded
            }
        }
        _ => String::new(),
    }
}

/// Whether a colour operand list describes black in its own colour space
/// (1 = gray, 3 = RGB, 4 = CMYK). Pattern or named operands count as black.
fn is_black(components: &[PdfValue]) -> bool {
    let nums: Vec<f32> = components.iter().filter_map(get_number_from_value).collect();
    if nums.len() != components.len() {
        return true;
    }
    match nums.as_slice() {
        [gray] => gray.abs() < f32::EPSILON,
        [r, g, b] => r.abs() < f32::EPSILON && g.abs() < f32::EPSILON && b.abs() < f32::EPSILON,
        [c, m, y, k] => {
            c.abs() < f32::EPSILON
                && m.abs() < f32::EPSILON
                && y.abs() < f32::EPSILON
                && (k - 1.0).abs() < f32::EPSILON
        }
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Public API: glyph-run extraction
// ---------------------------------------------------------------------------

/// Walk one page's content stream and collect its [`GlyphRun`]s.
///
/// | Operator | Action |
/// |----------|--------|
/// | `BT`/`ET` | Begin / end text object |
/// | `Tf` | Set font and size |
/// | `Tm`, `Td`, `TD`, `T*`, `TL` | Position and leading |
/// | `Tc`, `Tw`, `Tz`, `Ts` | Spacing, scaling, rise |
/// | `Tj`, `TJ`, `'`, `"` | Show text |
/// | `g`, `rg`, `k`, `sc`, `scn` | Non-stroking colour |
/// | `q`/`Q` | Save / restore the colour |
pub fn extract_page_runs(backend: &dyn PdfBackend, page_id: PageId) -> Result<Vec<GlyphRun>, PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;
    let fonts = backend.page_fonts(page_id).unwrap_or_default();

    let mut state = TextState::default();
    let mut color_stack: Vec<bool> = Vec::new();
    let mut runs: Vec<GlyphRun> = Vec::new();

    for op in &ops {
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "ET" => {}

            "q" => color_stack.push(state.fill_colored),
            "Q" => {
                if let Some(saved) = color_stack.pop() {
                    state.fill_colored = saved;
                }
            }
            "g" | "rg" | "k" | "sc" | "scn" => {
                state.fill_colored = !is_black(&op.operands);
            }

            "Tf" => handle_tf(&op.operands, &fonts, &mut state),
            "Tm" => handle_tm(&op.operands, &mut state),
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => state.translate_line(0.0, -state.leading),
            "TL" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.text_rise = v;
                }
            }

            "Tj" => {
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut runs);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    handle_tj_array(arr, backend, page_id, &mut state, &mut runs);
                }
            }
            "'" => {
                state.translate_line(0.0, -state.leading);
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut runs);
                }
            }
            "\"" => {
                if op.operands.len() >= 3 {
                    if let Some(aw) = get_number_from_value(&op.operands[0]) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = get_number_from_value(&op.operands[1]) {
                        state.char_spacing = ac;
                    }
                    state.translate_line(0.0, -state.leading);
                    emit_show_string(&op.operands[2], backend, page_id, &mut state, &mut runs);
                }
            }

            _ => {}
        }
    }

    Ok(runs)
}

fn handle_tf(operands: &[PdfValue], fonts: &[BackendFontInfo], state: &mut TextState) {
    if operands.len() < 2 {
        return;
    }
    let key = match &operands[0] {
        PdfValue::Name(n) => n.clone(),
        PdfValue::Str(s) => s.clone(),
        _ => return,
    };
    let size = get_number_from_value(&operands[1]).unwrap_or(0.0);
    match resolve_font(&key, fonts) {
        Some(info) => {
            let base = info.base_font.clone().unwrap_or_default();
            state.set_font(key, &base, size);
        }
        None => {
            let name = String::from_utf8_lossy(&key).to_string();
            state.set_font(key, &name, size);
        }
    }
}

fn handle_tm(operands: &[PdfValue], state: &mut TextState) {
    let vals: Vec<f32> = operands.iter().take(6).filter_map(get_number_from_value).collect();
    if let [a, b, c, d, e, f] = vals[..] {
        state.text_matrix = [a, b, c, d, e, f];
        state.line_matrix = state.text_matrix;
    }
}

fn emit_show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    runs: &mut Vec<GlyphRun>,
) {
    let text = decode_string(operand, backend, page_id, &state.font_key);
    if text.is_empty() {
        return;
    }
    runs.push(GlyphRun {
        width: estimate_text_width(&text, state),
        x: state.x(),
        y: state.y() + state.text_rise,
        font_size: state.effective_font_size(),
        font_name: state.font_name.clone(),
        style: state.style(),
        text: text.clone(),
    });
    advance_after_show(&text, state);
}

/// `TJ` arrays interleave strings with kerning adjustments (thousandths of a
/// text-space unit); large negative adjustments are treated as word gaps.
fn handle_tj_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    runs: &mut Vec<GlyphRun>,
) {
    let mut buf = String::new();
    let mut run_x = state.x();
    let run_y = state.y() + state.text_rise;

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, backend, page_id, &state.font_key);
                if buf.is_empty() {
                    run_x = state.x();
                }
                buf.push_str(&fragment);
                advance_after_show(&fragment, state);
            }
            val => {
                if let Some(adj) = get_number_from_value(val) {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                    let gap_threshold = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
                    if dx > gap_threshold && !buf.is_empty() {
                        buf.push(' ');
                    }
                    state.advance_x(dx);
                }
            }
        }
    }

    let trimmed = buf.trim_end();
    if trimmed.is_empty() {
        return;
    }
    runs.push(GlyphRun {
        text: trimmed.to_string(),
        x: run_x,
        y: run_y,
        width: estimate_text_width(trimmed, state),
        font_size: state.effective_font_size(),
        font_name: state.font_name.clone(),
        style: state.style(),
    });
}

// ---------------------------------------------------------------------------
// Public API: run -> line grouping
// ---------------------------------------------------------------------------

/// Group runs into lines, top of the page first. Runs on one line are sorted
/// left to right; adjacent runs of the same style are concatenated.
pub fn group_runs_into_lines(mut runs: Vec<GlyphRun>) -> Vec<TextLine> {
    if runs.is_empty() {
        return Vec::new();
    }

    runs.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<GlyphRun> = Vec::new();
    let mut current_y = runs[0].y;

    for run in runs {
        if !current.is_empty() && (run.y - current_y).abs() > Y_TOLERANCE {
            lines.push(assemble_line(std::mem::take(&mut current)));
            current_y = run.y;
        }
        current.push(run);
    }
    if !current.is_empty() {
        lines.push(assemble_line(current));
    }

    lines
}

fn same_style(a: &GlyphRun, b: &GlyphRun) -> bool {
    a.font_name == b.font_name
        && (a.font_size - b.font_size).abs() < SAME_SIZE_TOLERANCE
        && a.style == b.style
}

fn assemble_line(mut runs: Vec<GlyphRun>) -> TextLine {
    runs.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));

    let mut merged: Vec<GlyphRun> = Vec::with_capacity(runs.len());
    for run in runs {
        if let Some(prev) = merged.last_mut() {
            let gap = run.x - (prev.x + prev.width);
            if same_style(prev, &run) && gap > -prev.font_size && gap < prev.font_size * 2.0 {
                if gap >= MIN_WORD_GAP && !boundary_is_spaceless(prev, &run) {
                    prev.text.push(' ');
                }
                prev.text.push_str(&run.text);
                prev.width = (run.x + run.width) - prev.x;
                continue;
            }
        }
        merged.push(run);
    }

    TextLine {
        y: merged.first().map(|r| r.y).unwrap_or(0.0),
        x: merged.first().map(|r| r.x).unwrap_or(0.0),
        runs: merged,
    }
}

fn boundary_is_spaceless(prev: &GlyphRun, next: &GlyphRun) -> bool {
    match (prev.text.chars().next_back(), next.text.chars().next()) {
        (Some(l), Some(f)) => is_spaceless_script_char(l) && is_spaceless_script_char(f),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Public API: lines -> styled spans
// ---------------------------------------------------------------------------

/// Convert lines into [`TextSpan`]s with top-down bounding boxes. Runs whose
/// text is empty after cleanup, or whose size is not positive, are dropped.
pub fn spans_from_lines(lines: &[TextLine], page: usize, page_size: (f32, f32)) -> Vec<TextSpan> {
    let (page_width, page_height) = page_size;
    lines
        .iter()
        .flat_map(|line| line.runs.iter())
        .filter(|run| run.font_size > 0.0)
        .filter_map(|run| {
            let text = clean_span_text(&run.text);
            if text.is_empty() {
                return None;
            }
            let top = page_height - (run.y + run.font_size * ASCENT_RATIO);
            let bottom = page_height - (run.y - run.font_size * (1.0 - ASCENT_RATIO));
            Some(TextSpan {
                text,
                font_name: run.font_name.clone(),
                font_size: run.font_size,
                style: run.style,
                bbox: BoundingBox::new(run.x, top, run.x + run.width, bottom),
                page,
                page_width,
            })
        })
        .collect()
}

/// Extract the styled spans of one page.
pub fn extract_page_spans(
    backend: &dyn PdfBackend,
    page: usize,
    page_id: PageId,
) -> Result<Vec<TextSpan>, PdfError> {
    let page_size = backend.page_dimensions(page_id)?;
    let lines = group_runs_into_lines(extract_page_runs(backend, page_id)?);
    Ok(spans_from_lines(&lines, page, page_size))
}

/// Extract a page as plain text, one line per `\n`.
pub fn extract_page_text(backend: &dyn PdfBackend, page_id: PageId) -> Result<String, PdfError> {
    let lines = group_runs_into_lines(extract_page_runs(backend, page_id)?);
    Ok(lines
        .iter()
        .map(TextLine::text)
        .collect::<Vec<_>>()
        .join("\n"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::super::backend::ContentOp;
    use super::*;

    fn make_run(text: &str, x: f32, y: f32, font_size: f32) -> GlyphRun {
        GlyphRun {
            text: text.to_string(),
            x,
            y,
            width: text.chars().count() as f32 * font_size * APPROX_CHAR_WIDTH_RATIO,
            font_size,
            font_name: "TestFont".to_string(),
            style: StyleFlags::empty(),
        }
    }

    struct MockBackend {
        page_ids: BTreeMap<u32, PageId>,
        fonts: Vec<BackendFontInfo>,
        ops: Vec<ContentOp>,
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            self.page_ids.clone()
        }

        fn page_fonts(&self, _page_id: PageId) -> Result<Vec<BackendFontInfo>, PdfError> {
            Ok(self.fonts.clone())
        }

        fn page_content(&self, _page_id: PageId) -> Result<Vec<u8>, PdfError> {
            Ok(vec![])
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font_name: &[u8], data: &[u8]) -> String {
            super::super::backend::decode_text_simple(data)
        }

        fn page_dimensions(&self, _page: PageId) -> Result<(f32, f32), PdfError> {
            Ok((612.0, 792.0))
        }

        fn title(&self) -> Option<String> {
            None
        }
    }

    fn make_op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn fonts() -> Vec<BackendFontInfo> {
        vec![
            BackendFontInfo {
                name: b"F1".to_vec(),
                base_font: Some("Helvetica".to_string()),
                subtype: None,
                encoding: None,
            },
            BackendFontInfo {
                name: b"F2".to_vec(),
                base_font: Some("Helvetica-BoldOblique".to_string()),
                subtype: None,
                encoding: None,
            },
        ]
    }

    fn backend(ops: Vec<ContentOp>) -> MockBackend {
        MockBackend {
            page_ids: BTreeMap::from([(1, (1, 0))]),
            fonts: fonts(),
            ops,
        }
    }

    fn tf_op(font: &[u8], size: f32) -> ContentOp {
        make_op("Tf", vec![PdfValue::Name(font.to_vec()), PdfValue::Real(size)])
    }

    fn tm_op(tx: f32, ty: f32) -> ContentOp {
        make_op(
            "Tm",
            vec![
                PdfValue::Real(1.0),
                PdfValue::Real(0.0),
                PdfValue::Real(0.0),
                PdfValue::Real(1.0),
                PdfValue::Real(tx),
                PdfValue::Real(ty),
            ],
        )
    }

    fn tj_op(text: &[u8]) -> ContentOp {
        make_op("Tj", vec![PdfValue::Str(text.to_vec())])
    }

    #[test]
    fn test_extract_simple_tj() {
        let b = backend(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 12.0),
            tm_op(72.0, 700.0),
            tj_op(b"Hello World"),
            make_op("ET", vec![]),
        ]);

        let runs = extract_page_runs(&b, (1, 0)).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello World");
        assert!((runs[0].x - 72.0).abs() < 0.01);
        assert!((runs[0].y - 700.0).abs() < 0.01);
        assert!((runs[0].font_size - 12.0).abs() < 0.01);
        assert!(!runs[0].style.any());
    }

    #[test]
    fn test_extract_bold_italic_font() {
        let b = backend(vec![
            make_op("BT", vec![]),
            tf_op(b"F2", 14.0),
            tm_op(72.0, 750.0),
            tj_op(b"Bold Title"),
            make_op("ET", vec![]),
        ]);

        let runs = extract_page_runs(&b, (1, 0)).unwrap();
        assert!(runs[0].style.is_bold());
        assert!(runs[0].style.is_italic());
        assert_eq!(runs[0].font_name, "Helvetica-BoldOblique");
    }

    #[test]
    fn test_fill_color_tracked_and_restored() {
        let b = backend(vec![
            make_op("q", vec![]),
            make_op(
                "rg",
                vec![PdfValue::Real(0.8), PdfValue::Real(0.1), PdfValue::Real(0.1)],
            ),
            make_op("BT", vec![]),
            tf_op(b"F1", 12.0),
            tm_op(72.0, 700.0),
            tj_op(b"Red"),
            make_op("ET", vec![]),
            make_op("Q", vec![]),
            make_op("BT", vec![]),
            tf_op(b"F1", 12.0),
            tm_op(72.0, 680.0),
            tj_op(b"Black"),
            make_op("ET", vec![]),
        ]);

        let runs = extract_page_runs(&b, (1, 0)).unwrap();
        assert!(runs[0].style.has_fill_color());
        assert!(!runs[1].style.has_fill_color());
    }

    #[test]
    fn test_is_black_color_spaces() {
        assert!(is_black(&[PdfValue::Integer(0)]));
        assert!(!is_black(&[PdfValue::Real(0.5)]));
        assert!(is_black(&[
            PdfValue::Integer(0),
            PdfValue::Integer(0),
            PdfValue::Integer(0),
            PdfValue::Integer(1),
        ]));
        assert!(is_black(&[PdfValue::Name(b"P0".to_vec())]));
    }

    #[test]
    fn test_tj_array_inserts_word_gaps() {
        let b = backend(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 12.0),
            tm_op(72.0, 700.0),
            make_op(
                "TJ",
                vec![PdfValue::Array(vec![
                    PdfValue::Str(b"Hello".to_vec()),
                    PdfValue::Integer(-300),
                    PdfValue::Str(b"World".to_vec()),
                ])],
            ),
            make_op("ET", vec![]),
        ]);

        let runs = extract_page_runs(&b, (1, 0)).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello World");
    }

    #[test]
    fn test_td_and_tstar_move_lines() {
        let b = backend(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 12.0),
            make_op("TL", vec![PdfValue::Real(14.0)]),
            make_op("Td", vec![PdfValue::Real(72.0), PdfValue::Real(700.0)]),
            tj_op(b"First"),
            make_op("T*", vec![]),
            tj_op(b"Second"),
            make_op("ET", vec![]),
        ]);

        let runs = extract_page_runs(&b, (1, 0)).unwrap();
        assert_eq!(runs.len(), 2);
        assert!((runs[1].y - 686.0).abs() < 0.01);
        assert!((runs[1].x - 72.0).abs() < 0.01);
    }

    #[test]
    fn test_group_runs_into_lines_orders_top_to_bottom() {
        let lines = group_runs_into_lines(vec![
            make_run("Bottom", 0.0, 600.0, 12.0),
            make_run("Top", 0.0, 700.0, 12.0),
            make_run("Middle", 0.0, 650.0, 12.0),
        ]);
        let texts: Vec<String> = lines.iter().map(TextLine::text).collect();
        assert_eq!(texts, vec!["Top", "Middle", "Bottom"]);
    }

    #[test]
    fn test_group_runs_joins_same_style_with_space() {
        let lines = group_runs_into_lines(vec![
            make_run("World", 40.0, 700.0, 12.0),
            make_run("Hello", 0.0, 700.3, 12.0),
        ]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].runs.len(), 1);
        assert_eq!(lines[0].text(), "Hello World");
    }

    #[test]
    fn test_group_runs_keeps_style_changes_apart() {
        let mut bold = make_run("Bold:", 0.0, 700.0, 12.0);
        bold.style = StyleFlags::BOLD;
        let lines = group_runs_into_lines(vec![bold, make_run("plain", 32.0, 700.0, 12.0)]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].runs.len(), 2);
    }

    #[test]
    fn test_group_runs_no_space_between_cjk() {
        let lines = group_runs_into_lines(vec![
            make_run("第1", 0.0, 700.0, 12.0),
            make_run("章", 14.0, 700.0, 12.0),
        ]);
        assert_eq!(lines[0].text(), "第1章");
    }

    #[test]
    fn test_spans_from_lines_top_down_bbox() {
        let lines = group_runs_into_lines(vec![make_run("Heading", 72.0, 700.0, 20.0)]);
        let spans = spans_from_lines(&lines, 3, (612.0, 792.0));
        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.page, 3);
        assert!((span.bbox.y0 - 76.0).abs() < 0.01);
        assert!((span.bbox.y1 - 96.0).abs() < 0.01);
        assert!((span.bbox.x0 - 72.0).abs() < 0.01);
        assert!((span.page_width - 612.0).abs() < 0.01);
    }

    #[test]
    fn test_spans_from_lines_drops_blank_and_sizeless() {
        let lines = group_runs_into_lines(vec![
            make_run("   ", 0.0, 700.0, 12.0),
            make_run("ghost", 0.0, 650.0, 0.0),
        ]);
        assert!(spans_from_lines(&lines, 1, (612.0, 792.0)).is_empty());
    }

    #[test]
    fn test_extract_page_text_joins_lines() {
        let b = backend(vec![
            make_op("BT", vec![]),
            tf_op(b"F1", 12.0),
            tm_op(72.0, 700.0),
            tj_op(b"Line one"),
            tm_op(72.0, 680.0),
            tj_op(b"Line two"),
            make_op("ET", vec![]),
        ]);
        assert_eq!(extract_page_text(&b, (1, 0)).unwrap(), "Line one\nLine two");
    }

    #[test]
    fn test_is_spaceless_script_char() {
        assert!(is_spaceless_script_char('章'));
        assert!(is_spaceless_script_char('は'));
        assert!(!is_spaceless_script_char('a'));
        assert!(!is_spaceless_script_char('अ'));
    }
}
