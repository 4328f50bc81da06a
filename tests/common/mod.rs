//! Shared fixtures for integration tests.
//!
//! PDFs are generated in-process with lopdf. The rasterizer and the word
//! converter are replaced by in-memory fakes so no external tool runs.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use a5kit::convert::DocumentConverter;
use a5kit::error::{Error, Result};
use a5kit::raster::Rasterizer;
use a5kit::{PageSize, SourcePdf};
use image::{Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// One fixture page: box size and `/Rotate`.
#[derive(Debug, Clone, Copy)]
pub struct FixturePage {
    pub width: f32,
    pub height: f32,
    pub rotate: i64,
}

impl FixturePage {
    pub fn new(size: PageSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            rotate: 0,
        }
    }

    pub fn rotated(mut self, rotate: i64) -> Self {
        self.rotate = rotate;
        self
    }
}

/// Build a PDF whose pages each draw a frame and a line of text.
pub fn build_pdf(pages: &[FixturePage]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for (index, page) in pages.iter().enumerate() {
        let page_id = add_page(&mut doc, pages_id, font_id, index + 1, page);
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(pages.len() as i64),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("fixture serializes");
    buf
}

/// A one-page A4 PDF whose content stream is replaced by `data`, stored
/// under the given `/Filter`.
pub fn pdf_with_content_stream(filter: Option<&str>, data: Vec<u8>) -> Vec<u8> {
    let mut doc = Document::load_mem(&a4_pdf()).expect("fixture loads");
    let page_id = *doc.get_pages().values().next().expect("fixture has a page");
    let content_id = doc
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Contents"))
        .and_then(|contents| contents.as_reference())
        .expect("fixture page has one content stream");

    let mut dict = dictionary! {};
    if let Some(filter) = filter {
        dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
    }
    doc.objects
        .insert(content_id, Object::Stream(Stream::new(dict, data)));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("fixture serializes");
    buf
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    number: usize,
    page: &FixturePage,
) -> ObjectId {
    let content = Content {
        operations: vec![
            Operation::new(
                "re",
                vec![
                    Object::Real(10.0),
                    Object::Real(10.0),
                    Object::Real(page.width - 20.0),
                    Object::Real(page.height - 20.0),
                ],
            ),
            Operation::new("S", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(24)]),
            Operation::new("Td", vec![Object::Integer(72), Object::Integer(72)]),
            Operation::new("Tj", vec![Object::string_literal(format!("Page {}", number))]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("fixture content encodes"),
    ));

    let mut dict = dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(page.width),
            Object::Real(page.height),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    };
    if page.rotate != 0 {
        dict.set("Rotate", Object::Integer(page.rotate));
    }
    doc.add_object(dict)
}

/// A single A4 portrait page.
pub fn a4_pdf() -> Vec<u8> {
    build_pdf(&[FixturePage::new(PageSize::A4)])
}

/// `count` A4 portrait pages.
pub fn a4_pdf_pages(count: usize) -> Vec<u8> {
    build_pdf(&vec![FixturePage::new(PageSize::A4); count])
}

/// A single A5 portrait page.
pub fn a5_pdf() -> Vec<u8> {
    build_pdf(&[FixturePage::new(PageSize::A5)])
}

/// Rasterizer that paints a blank page at the size a real renderer would
/// produce: display size times `dpi / 72`, rounded.
#[derive(Clone, Default)]
pub struct FakeRasterizer {
    calls: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl FakeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(page, dpi)` of every render, in order.
    pub fn calls(&self) -> Vec<(u32, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Rasterizer for FakeRasterizer {
    fn render_page(&self, pdf: &Path, page_number: u32, dpi: u32) -> Result<RgbImage> {
        self.calls.lock().unwrap().push((page_number, dpi));

        let source = SourcePdf::open(pdf)?;
        let display = source.page(page_number)?.display_size();
        let px = |pt: f32| (pt * dpi as f32 / 72.0).round() as u32;
        Ok(RgbImage::from_pixel(
            px(display.width),
            px(display.height),
            Rgb([255, 255, 255]),
        ))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Rasterizer that always fails.
pub struct FailingRasterizer;

impl Rasterizer for FailingRasterizer {
    fn render_page(&self, _pdf: &Path, page_number: u32, _dpi: u32) -> Result<RgbImage> {
        Err(Error::Render(format!("cannot render page {}", page_number)))
    }
}

/// Word converter that returns canned PDF bytes, or fails.
pub struct MockConverter {
    extensions: Vec<&'static str>,
    name: &'static str,
    output: Option<Vec<u8>>,
}

impl MockConverter {
    pub fn new(extensions: Vec<&'static str>, name: &'static str) -> Self {
        Self {
            extensions,
            name,
            output: None,
        }
    }

    /// Converter for DOC/DOCX that yields `pdf`.
    pub fn word(pdf: Vec<u8>) -> Self {
        Self {
            extensions: vec!["doc", "docx"],
            name: "mock-word",
            output: Some(pdf),
        }
    }

    /// Converter for DOC/DOCX that always fails.
    pub fn broken() -> Self {
        Self::new(vec!["doc", "docx"], "broken-word")
    }
}

impl DocumentConverter for MockConverter {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        self.name
    }

    fn convert(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        self.convert_bytes(&[], "docx")
    }

    fn convert_bytes(&self, _bytes: &[u8], _ext: &str) -> Result<Vec<u8>> {
        self.output
            .clone()
            .ok_or_else(|| Error::ConversionFailed(format!("{} is broken", self.name)))
    }
}

/// An output page read back with lopdf.
#[derive(Debug)]
pub struct ReadPage {
    pub media_box: [f32; 4],
    pub operations: Vec<Operation>,
}

impl ReadPage {
    pub fn width(&self) -> f32 {
        self.media_box[2] - self.media_box[0]
    }

    pub fn height(&self) -> f32 {
        self.media_box[3] - self.media_box[1]
    }

    /// Operands of the first `cm`.
    pub fn matrix(&self) -> [f32; 6] {
        let op = self
            .operations
            .iter()
            .find(|op| op.operator == "cm")
            .expect("page has a cm operator");
        let mut m = [0.0; 6];
        for (slot, operand) in m.iter_mut().zip(&op.operands) {
            *slot = operand.as_float().expect("numeric cm operand");
        }
        m
    }

    pub fn has_operator(&self, name: &str) -> bool {
        self.operations.iter().any(|op| op.operator == name)
    }

    /// Strings shown with `Tj`, in drawing order.
    pub fn shown_text(&self) -> Vec<String> {
        self.operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first())
            .filter_map(|o| o.as_str().ok())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }
}

/// Parse an output PDF into its pages.
pub fn read_pages(data: &[u8]) -> Vec<ReadPage> {
    let doc = Document::load_mem(data).expect("output parses");
    doc.get_pages()
        .values()
        .map(|&id| {
            let dict = doc.get_dictionary(id).expect("page dictionary");
            let media_box = dict
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("MediaBox");
            let mut rect = [0.0; 4];
            for (slot, value) in rect.iter_mut().zip(media_box) {
                *slot = value.as_float().expect("numeric MediaBox");
            }
            let operations = doc
                .get_and_decode_page_content(id)
                .expect("content decodes")
                .operations;
            ReadPage {
                media_box: rect,
                operations,
            }
        })
        .collect()
}

/// Pixel widths of every image XObject in an output PDF, ascending.
pub fn image_widths(data: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(data).expect("output parses");
    let mut widths: Vec<i64> = doc
        .objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .map(|n| n == b"Image")
                .unwrap_or(false)
        })
        .filter_map(|s| s.dict.get(b"Width").and_then(Object::as_i64).ok())
        .collect();
    widths.sort_unstable();
    widths
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.05,
        "expected {expected}, got {actual}"
    );
}
