//! # a5kit
//!
//! Reformat documents for A5 paper.
//!
//! This library rescales PDF pages onto A5 sheets, splits A4 pages into two
//! A5 halves, and typesets plain text into single- or two-column PDFs.
//! Word-processor documents are converted to PDF first with an external
//! converter.
//!
//! ## Quick Start
//!
//! ```no_run
//! use a5kit::{resize_file, TransformOptions};
//!
//! fn main() -> a5kit::Result<()> {
//!     let output = resize_file("document.pdf", &TransformOptions::default())?;
//!     output.write_to("document_a5.pdf")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Resize and split**: fit whole pages or halves into the margins of an
//!   A5 (or A4) target, portrait or landscape
//! - **Three transform strategies**: rasterize-and-redraw, vector merge, and
//!   the historical vector split for comparison
//! - **Text layout**: title, alignment, single or two columns
//! - **Word input**: DOC/DOCX through LibreOffice
//! - **Atomic output**: results are only written once complete

pub mod convert;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod options;
pub mod pdf;
pub mod raster;
pub mod transform;

// Re-export commonly used types
pub use convert::{word_to_pdf, ConverterRegistry, DocumentConverter, OfficeConverter, PdfPassthrough};
pub use detect::{detect_format_from_bytes, detect_format_from_path, detect_input_kind, InputKind, PdfFormat};
pub use error::{Error, Result};
pub use geometry::{Margins, Orientation, PageSize, PaperSize};
pub use layout::layout_text;
pub use options::{
    ColumnLayout, PageSelection, RotationPolicy, Strategy, TextLayoutOptions, TextStyle,
    TransformMode, TransformOptions,
};
pub use pdf::{OutputDocument, SourcePdf};
pub use raster::{PdftoppmRasterizer, Rasterizer};
pub use transform::{transform_document, PageTransformStrategy};

use std::path::Path;
use std::sync::Arc;

/// Resize every selected page of a PDF file onto the target paper.
///
/// # Example
///
/// ```no_run
/// use a5kit::{resize_file, Margins, TransformOptions};
///
/// let options = TransformOptions::new().with_margins(Margins::uniform(0.25));
/// let output = resize_file("slides.pdf", &options).unwrap();
/// println!("{} pages", output.page_count());
/// ```
pub fn resize_file<P: AsRef<Path>>(path: P, options: &TransformOptions) -> Result<OutputDocument> {
    let source = SourcePdf::open(path)?;
    transform_document(&source, TransformMode::Resize, options, &PdftoppmRasterizer::new())
}

/// Split every selected page of a PDF file into two target pages.
///
/// Portrait targets get the left and right halves, landscape targets the
/// top and bottom halves.
pub fn split_file<P: AsRef<Path>>(path: P, options: &TransformOptions) -> Result<OutputDocument> {
    let source = SourcePdf::open(path)?;
    transform_document(&source, TransformMode::Split, options, &PdftoppmRasterizer::new())
}

/// Resize a PDF held in memory.
pub fn resize_bytes(data: &[u8], options: &TransformOptions) -> Result<OutputDocument> {
    let source = SourcePdf::from_bytes(data.to_vec())?;
    transform_document(&source, TransformMode::Resize, options, &PdftoppmRasterizer::new())
}

/// Split a PDF held in memory.
pub fn split_bytes(data: &[u8], options: &TransformOptions) -> Result<OutputDocument> {
    let source = SourcePdf::from_bytes(data.to_vec())?;
    transform_document(&source, TransformMode::Split, options, &PdftoppmRasterizer::new())
}

/// Typeset plain text into a PDF.
///
/// # Example
///
/// ```no_run
/// use a5kit::{text_to_pdf, TextLayoutOptions, TextStyle};
///
/// let options = TextLayoutOptions::new()
///     .with_title("Minutes")
///     .with_text_style(TextStyle::Justified);
/// let output = text_to_pdf("Opened at nine.\n\nClosed at ten.", &options).unwrap();
/// output.write_to("minutes.pdf").unwrap();
/// ```
pub fn text_to_pdf(text: &str, options: &TextLayoutOptions) -> Result<OutputDocument> {
    layout_text(text, options)
}

/// Builder that normalizes input and runs the transform engine.
///
/// Accepts PDF directly and DOC/DOCX through the converter registry. The
/// rasterizer and converters can be replaced, which is how the test suite
/// runs without external tools.
///
/// # Example
///
/// ```no_run
/// use a5kit::{Orientation, Reformatter, Strategy, TransformMode};
///
/// let output = Reformatter::new()
///     .with_strategy(Strategy::VectorMerge)
///     .with_orientation(Orientation::Landscape)
///     .process("handout.docx", TransformMode::Split)?;
/// output.write_to("handout_a5.pdf")?;
/// # Ok::<(), a5kit::Error>(())
/// ```
pub struct Reformatter {
    options: TransformOptions,
    rasterizer: Box<dyn Rasterizer>,
    registry: ConverterRegistry,
}

impl Reformatter {
    /// Create a new Reformatter with default options, `pdftoppm` and
    /// LibreOffice.
    pub fn new() -> Self {
        Self {
            options: TransformOptions::default(),
            rasterizer: Box::new(PdftoppmRasterizer::new()),
            registry: ConverterRegistry::with_defaults(),
        }
    }

    /// Replace all transform options.
    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the transform strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.options = self.options.with_strategy(strategy);
        self
    }

    /// Set the target orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.options = self.options.with_orientation(orientation);
        self
    }

    /// Set the target margins (inches).
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.options = self.options.with_margins(margins);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Use a different rasterizer.
    pub fn with_rasterizer(mut self, rasterizer: impl Rasterizer + 'static) -> Self {
        self.rasterizer = Box::new(rasterizer);
        self
    }

    /// Register a converter, replacing the one for its extensions.
    pub fn with_converter(mut self, converter: Arc<dyn DocumentConverter>) -> Self {
        self.registry.register(converter);
        self
    }

    /// The options in effect.
    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Load an input file as a PDF, converting word documents first.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<SourcePdf> {
        let path = path.as_ref();
        let kind = detect_input_kind(path)?;
        log::debug!("{} detected as {:?}", path.display(), kind);

        if kind.needs_conversion() {
            let ext = if kind == InputKind::Doc { "doc" } else { "docx" };
            let converter = self.registry.get_by_extension(ext).ok_or_else(|| {
                Error::UnsupportedInput(format!("no converter registered for .{}", ext))
            })?;
            return SourcePdf::from_bytes(converter.convert(path)?);
        }

        match kind {
            InputKind::Text => Err(Error::UnsupportedInput(format!(
                "{} is plain text; use text_to_pdf to typeset it",
                path.display()
            ))),
            _ => SourcePdf::open(path),
        }
    }

    /// Resize or split an input file.
    pub fn process<P: AsRef<Path>>(&self, path: P, mode: TransformMode) -> Result<OutputDocument> {
        let source = self.load(path)?;
        transform_document(&source, mode, &self.options, self.rasterizer.as_ref())
    }

    /// Resize or split a PDF held in memory.
    pub fn process_bytes(&self, data: &[u8], mode: TransformMode) -> Result<OutputDocument> {
        let source = SourcePdf::from_bytes(data.to_vec())?;
        transform_document(&source, mode, &self.options, self.rasterizer.as_ref())
    }
}

impl Default for Reformatter {
    fn default() -> Self {
        Self::new()
    }
}
