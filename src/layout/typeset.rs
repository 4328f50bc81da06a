//! Flow wrapped lines into frames and emit the pages.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, StringFormat};

use super::font::{encode, sanitize, Font};
use super::frames::FrameGeometry;
use super::paragraph::{split_paragraphs, wrap, Line, Paragraph};
use crate::error::{Error, Result};
use crate::options::{ColumnLayout, TextLayoutOptions, TextStyle};
use crate::pdf::{OutputDocument, PdfWriter};

/// Line height as a multiple of the font size.
pub const LEADING: f32 = 1.2;

/// Title size relative to the body font size.
pub const TITLE_SIZE_INCREASE: f32 = 4.0;

/// Space after the title block, in body font sizes.
pub const TITLE_SPACE_AFTER: f32 = 2.0;

/// Space between paragraphs, in body font sizes.
pub const PARAGRAPH_GAP: f32 = 0.5;

/// Paragraphs per column before a forced column break.
pub const PARAGRAPHS_PER_COLUMN: usize = 3;

/// Size of the page number, in points.
pub const PAGE_NUMBER_SIZE: f32 = 12.0;

const EPSILON: f32 = 1e-3;

/// A line positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub font: Font,
    pub size: f32,
    /// Left edge of the first glyph
    pub x: f32,
    pub baseline: f32,
    pub text: String,
    /// Extra space per word gap (`Tw`)
    pub word_spacing: f32,
}

/// Lines on one output page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PagePlan {
    pub lines: Vec<PlacedLine>,
}

/// The positioned result of a text layout, before PDF encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub geometry: FrameGeometry,
    pub pages: Vec<PagePlan>,
    /// Document title for the info dictionary
    pub title: Option<String>,
}

impl TextLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lay out text into pages without encoding them.
pub fn typeset(text: &str, options: &TextLayoutOptions) -> Result<TextLayout> {
    options.validate()?;

    let (clean, replaced) = sanitize(text);
    if replaced > 0 {
        log::warn!(
            "{} character(s) cannot be set in Helvetica and were replaced by '?'",
            replaced
        );
    }
    let paragraphs = split_paragraphs(&clean);

    let title = options
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if paragraphs.is_empty() && title.is_none() {
        return Err(Error::EmptyText);
    }

    let geometry = FrameGeometry::compute(options)?;
    let font_size = options.font_size;
    let leading = font_size * LEADING;

    let first_inner = geometry.inner(&geometry.frames[0]);
    if first_inner.height < leading {
        return Err(Error::DegenerateArea {
            width: first_inner.width,
            height: first_inner.height,
        });
    }

    let mut flow = Flow::new(&geometry, leading);

    if let Some(title) = title {
        let height = place_title(&mut flow, title, options);
        let spacer = match options.layout {
            ColumnLayout::Single => 0.5,
            ColumnLayout::Double => 1.5,
        };
        flow.reserve_top(height + (TITLE_SPACE_AFTER + spacer) * font_size);
    }

    let width = geometry.line_width();
    let last = paragraphs.len().saturating_sub(1);
    for (index, paragraph) in paragraphs.iter().enumerate() {
        if index > 0 {
            flow.skip(PARAGRAPH_GAP * font_size);
        }

        for line in wrap(paragraph, Font::Helvetica, font_size, width) {
            flow.place(&line, options.text_style, font_size);
        }

        if options.layout == ColumnLayout::Double
            && (index + 1) % PARAGRAPHS_PER_COLUMN == 0
            && index < last
        {
            flow.next_frame();
        }
    }

    log::debug!(
        "Laid out {} paragraph(s) on {} page(s), {} frame(s) per page",
        paragraphs.len(),
        flow.pages.len(),
        geometry.frames.len()
    );

    let pages = flow.pages;
    Ok(TextLayout {
        geometry,
        pages,
        title: title.map(str::to_string),
    })
}

/// Place the title centered across the full content width at the top of
/// the first page. Returns the height taken.
fn place_title(flow: &mut Flow<'_>, title: &str, options: &TextLayoutOptions) -> f32 {
    let size = options.font_size + TITLE_SIZE_INCREASE;
    let leading = size * LEADING;
    let (clean, _) = sanitize(title);
    let paragraph = Paragraph {
        segments: vec![clean.split_whitespace().collect::<Vec<_>>().join(" ")],
    };

    let geometry = flow.geometry;
    let span = geometry.title_width();
    let left = geometry.title_left();
    let mut y = geometry.text_top();

    for line in wrap(&paragraph, Font::HelveticaBold, size, span) {
        flow.pages[0].lines.push(PlacedLine {
            font: Font::HelveticaBold,
            size,
            x: left + (span - line.width) / 2.0,
            baseline: y - size,
            text: line.text(),
            word_spacing: 0.0,
        });
        y -= leading;
    }

    geometry.text_top() - y
}

/// Cursor over the frames of successive pages.
struct Flow<'a> {
    geometry: &'a FrameGeometry,
    leading: f32,
    pages: Vec<PagePlan>,
    frame: usize,
    y: f32,
    at_top: bool,
    /// Space taken from the top of first-page frames
    reserved: f32,
}

impl<'a> Flow<'a> {
    fn new(geometry: &'a FrameGeometry, leading: f32) -> Self {
        let mut flow = Self {
            geometry,
            leading,
            pages: vec![PagePlan::default()],
            frame: 0,
            y: 0.0,
            at_top: true,
            reserved: 0.0,
        };
        flow.y = flow.frame_top();
        flow
    }

    fn inner(&self) -> crate::geometry::Rect {
        self.geometry.inner(&self.geometry.frames[self.frame])
    }

    fn frame_top(&self) -> f32 {
        let reserved = if self.pages.len() == 1 { self.reserved } else { 0.0 };
        self.inner().top() - reserved
    }

    fn reserve_top(&mut self, height: f32) {
        self.reserved = height;
        self.y = self.frame_top();
    }

    fn next_frame(&mut self) {
        self.frame += 1;
        if self.frame == self.geometry.frames.len() {
            self.frame = 0;
            self.pages.push(PagePlan::default());
        }
        self.y = self.frame_top();
        self.at_top = true;
    }

    /// Vertical space, dropped at the top of a frame.
    fn skip(&mut self, amount: f32) {
        if !self.at_top {
            self.y -= amount;
        }
    }

    fn place(&mut self, line: &Line, style: TextStyle, size: f32) {
        // Full-height frames always hold one line, so this terminates.
        while self.y - self.leading < self.inner().y - EPSILON {
            self.next_frame();
        }

        let inner = self.inner();
        let width = inner.width;
        let (x, word_spacing) = match style {
            TextStyle::Normal => (inner.x, 0.0),
            TextStyle::Centered => (inner.x + (width - line.width) / 2.0, 0.0),
            TextStyle::Justified if !line.ends_segment && line.gaps() > 0 => {
                (inner.x, (width - line.width) / line.gaps() as f32)
            }
            TextStyle::Justified => (inner.x, 0.0),
        };

        if !line.words.is_empty() {
            let baseline = self.y - size;
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(PlacedLine {
                    font: Font::Helvetica,
                    size,
                    x,
                    baseline,
                    text: line.text(),
                    word_spacing,
                });
            }
        }

        self.y -= self.leading;
        self.at_top = false;
    }
}

/// Encode a laid-out document as PDF.
pub fn render(layout: &TextLayout) -> Result<OutputDocument> {
    let mut writer = PdfWriter::new().with_title(layout.title.clone());
    let regular = writer.font(Font::Helvetica.base_name());
    let bold = writer.font(Font::HelveticaBold.base_name());

    for (index, page) in layout.pages.iter().enumerate() {
        let mut operations = Vec::new();
        for line in &page.lines {
            operations.extend(text_operations(line));
        }

        if let Some((center, baseline)) = layout.geometry.page_number_at {
            let label = (index + 1).to_string();
            let width = Font::Helvetica.text_width(&label, PAGE_NUMBER_SIZE);
            operations.extend(text_operations(&PlacedLine {
                font: Font::Helvetica,
                size: PAGE_NUMBER_SIZE,
                x: center - width / 2.0,
                baseline,
                text: label,
                word_spacing: 0.0,
            }));
        }

        let resources = dictionary! {
            "Font" => dictionary! {
                Font::Helvetica.resource_name() => regular,
                Font::HelveticaBold.resource_name() => bold,
            },
        };
        writer.add_page(layout.geometry.page_size, Content { operations }, resources)?;
    }

    writer.finish()
}

fn text_operations(line: &PlacedLine) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(line.font.resource_name().as_bytes().to_vec()),
                Object::Real(line.size),
            ],
        ),
        Operation::new("Tw", vec![Object::Real(line.word_spacing)]),
        Operation::new("Td", vec![Object::Real(line.x), Object::Real(line.baseline)]),
        Operation::new(
            "Tj",
            vec![Object::String(encode(&line.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}
