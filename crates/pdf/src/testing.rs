//! Synthetic PDF fixtures built with lopdf.
//!
//! Every page shares two fonts: `F1` (Helvetica) and `F2` (Helvetica-Bold).

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// One `Tj` at an absolute position, optionally in colour.
#[derive(Debug, Clone)]
pub struct TextOp {
    pub font_key: &'static str,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub rgb: Option<(f32, f32, f32)>,
}

impl TextOp {
    pub fn new(font_key: &'static str, size: f32, x: f32, y: f32, text: &str) -> Self {
        TextOp {
            font_key,
            size,
            x,
            y,
            text: text.to_string(),
            rgb: None,
        }
    }

    pub fn colored(mut self, r: f32, g: f32, b: f32) -> Self {
        self.rgb = Some((r, g, b));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageSpec {
    pub ops: Vec<TextOp>,
}

impl PageSpec {
    pub fn new(ops: Vec<TextOp>) -> Self {
        PageSpec { ops }
    }
}

/// Body text lines at `size`, `leading` points apart, starting at `top`.
pub fn body_lines(lines: &[&str], size: f32, top: f32, leading: f32) -> Vec<TextOp> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| TextOp::new("F1", size, 72.0, top - leading * i as f32, line))
        .collect()
}

fn page_content(spec: &PageSpec) -> Vec<u8> {
    let mut operations = Vec::new();
    for op in &spec.ops {
        operations.push(Operation::new("q", vec![]));
        if let Some((r, g, b)) = op.rgb {
            operations.push(Operation::new(
                "rg",
                vec![Object::Real(r), Object::Real(g), Object::Real(b)],
            ));
        }
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(op.font_key.as_bytes().to_vec()), Object::Real(op.size)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(op.x), Object::Real(op.y)],
        ));
        operations.push(Operation::new("Tj", vec![Object::string_literal(op.text.as_str())]));
        operations.push(Operation::new("ET", vec![]));
        operations.push(Operation::new("Q", vec![]));
    }
    Content { operations }.encode().unwrap()
}

/// Build a US-Letter PDF with the given pages and optional Info title.
pub fn build_pdf(title: Option<&str>, pages: &[PageSpec]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for spec in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(spec)));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
