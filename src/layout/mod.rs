//! Text layout engine: typeset plain text into a paginated PDF.
//!
//! Text is split into paragraphs on blank lines, broken into lines with
//! Helvetica metrics and flowed into frames: one per A5 page for the
//! single-column layout, two per A4 page for the two-column layout. An
//! optional title is set centered in Helvetica-Bold across the full
//! content width at the top of the first page.
//!
//! # Example
//!
//! ```no_run
//! use a5kit::layout::layout_text;
//! use a5kit::options::{ColumnLayout, TextLayoutOptions};
//!
//! let options = TextLayoutOptions::new()
//!     .with_title("Report")
//!     .with_layout(ColumnLayout::Double);
//! let pdf = layout_text("First paragraph.\n\nSecond paragraph.", &options).unwrap();
//! pdf.write_to("report.pdf").unwrap();
//! ```

mod font;
mod frames;
mod paragraph;
mod typeset;

pub use font::{sanitize, Font};
pub use frames::{effective_margins, FrameGeometry, GUTTER};
pub use paragraph::{split_paragraphs, wrap, Line, Paragraph};
pub use typeset::{render, typeset, PagePlan, PlacedLine, TextLayout, LEADING};

use crate::error::Result;
use crate::options::TextLayoutOptions;
use crate::pdf::OutputDocument;

/// Typeset `text` and encode it as PDF.
pub fn layout_text(text: &str, options: &TextLayoutOptions) -> Result<OutputDocument> {
    let layout = typeset(text, options)?;
    let content = &layout.geometry.content;
    log::info!(
        "Text layout: {:?} column(s), {} page(s) of {:.0}x{:.0}pt, content {:.2}x{:.2}in",
        options.layout,
        layout.page_count(),
        layout.geometry.page_size.width,
        layout.geometry.page_size.height,
        frames::to_inches(content.width),
        frames::to_inches(content.height)
    );
    render(&layout)
}
