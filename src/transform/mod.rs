//! Page transform engine: carry source pages onto fixed-size target pages.
//!
//! A [`PageTransformStrategy`] turns one source page into one target page
//! (resize) or two (split). Three strategies exist:
//!
//! - [`RasterRedraw`]: render to a bitmap, crop halves in pixels, draw the
//!   bitmap scaled and centered. The default.
//! - [`VectorMerge`]: place the original page as a form XObject under an
//!   affine transform; split halves are clipped.
//! - [`VectorSplitCropTranslate`]: historical split that translates scaled
//!   content without cropping. Kept for regression comparison.
//!
//! [`transform_document`] drives a whole document through a strategy and
//! returns the serialized output; nothing is written anywhere by this
//! module.

mod raster;
mod vector;
mod vector_split;

pub use raster::RasterRedraw;
pub use vector::VectorMerge;
pub use vector_split::VectorSplitCropTranslate;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, ObjectId};

use crate::error::{Error, Result};
use crate::geometry::{
    content_area, margins_to_points, target_dimensions, ContentArea, Orientation, PageSize, Rect,
};
use crate::options::{RotationPolicy, Strategy, TransformMode, TransformOptions};
use crate::pdf::{op_draw, OutputDocument, PdfWriter, SourcePage, SourcePdf};
use crate::raster::Rasterizer;

/// Resolved target geometry shared by every page of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTarget {
    /// Target page size, orientation applied
    pub size: PageSize,
    /// Printable area after margins
    pub area: ContentArea,
    /// Target orientation; also selects the split axis
    pub orientation: Orientation,
    /// Shrink applied to every fitted scale
    pub safety_factor: f32,
}

impl PageTarget {
    /// Resolve target size and content area from options.
    ///
    /// Fails with [`Error::DegenerateArea`] when the margins leave no room.
    pub fn from_options(options: &TransformOptions) -> Result<Self> {
        let size = target_dimensions(options.paper.size(), options.orientation);
        let area = content_area(size, &margins_to_points(&options.margins))?;
        Ok(Self {
            size,
            area,
            orientation: options.orientation,
            safety_factor: options.effective_safety_factor(),
        })
    }
}

/// One way of carrying a source page onto target pages.
pub trait PageTransformStrategy {
    /// Strategy name for log messages.
    fn name(&self) -> &'static str;

    /// Scale the whole page onto one target page.
    fn resize(
        &self,
        source: &SourcePdf,
        page: &SourcePage,
        target: &PageTarget,
        writer: &mut PdfWriter,
    ) -> Result<()>;

    /// Split the page into two halves, each on its own target page.
    ///
    /// Portrait targets take the left then the right half; landscape targets
    /// take the top then the bottom half.
    fn split(
        &self,
        source: &SourcePdf,
        page: &SourcePage,
        target: &PageTarget,
        writer: &mut PdfWriter,
    ) -> Result<()>;
}

/// Build the strategy selected in `options`.
pub fn strategy_for<'a>(
    options: &TransformOptions,
    rasterizer: &'a dyn Rasterizer,
) -> Box<dyn PageTransformStrategy + 'a> {
    match options.strategy {
        Strategy::RasterRedraw => Box::new(RasterRedraw::new(rasterizer, options.dpi)),
        Strategy::VectorMerge => Box::new(VectorMerge),
        Strategy::VectorSplitCropTranslate => Box::new(VectorSplitCropTranslate),
    }
}

/// Transform one source page, appending its output pages to `writer`.
///
/// Returns the number of pages added: 1 for resize, 2 for split.
pub fn transform_page(
    strategy: &dyn PageTransformStrategy,
    source: &SourcePdf,
    page: &SourcePage,
    target: &PageTarget,
    mode: TransformMode,
    writer: &mut PdfWriter,
) -> Result<usize> {
    let before = writer.page_count();
    match mode {
        TransformMode::Resize => strategy.resize(source, page, target, writer)?,
        TransformMode::Split => strategy.split(source, page, target, writer)?,
    }
    Ok(writer.page_count() - before)
}

/// Transform the selected pages of a document and serialize the result.
///
/// The rasterizer is only consulted by [`Strategy::RasterRedraw`].
pub fn transform_document(
    source: &SourcePdf,
    mode: TransformMode,
    options: &TransformOptions,
    rasterizer: &dyn Rasterizer,
) -> Result<OutputDocument> {
    options.validate()?;

    if source.page_count() == 0 {
        return Err(Error::EmptyDocument);
    }

    let target = PageTarget::from_options(options)?;
    let numbers = options.pages.resolve(source.page_count())?;
    let strategy = strategy_for(options, rasterizer);

    log::info!(
        "{:?} {} page(s) onto {} {:?} with {}",
        mode,
        numbers.len(),
        options.paper,
        options.orientation,
        strategy.name()
    );

    let mut writer = PdfWriter::new();
    for number in numbers {
        let page = apply_rotation_policy(source.page(number)?, options.rotation)?;
        transform_page(strategy.as_ref(), source, &page, &target, mode, &mut writer)?;
    }

    writer.finish()
}

/// Decide how a page's `/Rotate` is honored.
pub fn apply_rotation_policy(page: SourcePage, policy: RotationPolicy) -> Result<SourcePage> {
    if !page.is_rotated() {
        return Ok(page);
    }
    match policy {
        RotationPolicy::Normalize => {
            log::debug!("Page {} rotated by {}, normalizing", page.number, page.rotation);
            Ok(page)
        }
        RotationPolicy::Reject => Err(Error::RotatedPage {
            page: page.number,
            rotation: page.rotation,
        }),
        RotationPolicy::Ignore => {
            log::warn!(
                "Page {} rotated by {}, laying out unrotated",
                page.number,
                page.rotation
            );
            Ok(page.unrotated())
        }
    }
}

/// Display-space regions of the two halves, in output order.
pub(crate) fn half_regions(display: PageSize, orientation: Orientation) -> [Rect; 2] {
    let (w, h) = (display.width, display.height);
    match orientation {
        Orientation::Portrait => [
            Rect::new(0.0, 0.0, w / 2.0, h),
            Rect::new(w / 2.0, 0.0, w / 2.0, h),
        ],
        Orientation::Landscape => [
            Rect::new(0.0, h / 2.0, w, h / 2.0),
            Rect::new(0.0, 0.0, w, h / 2.0),
        ],
    }
}

/// Add a page whose content draws a single XObject under `q ... Q`.
pub(crate) fn add_xobject_page(
    writer: &mut PdfWriter,
    size: PageSize,
    name: &str,
    xobject: ObjectId,
    setup: Vec<Operation>,
) -> Result<()> {
    let mut operations = Vec::with_capacity(setup.len() + 3);
    operations.push(Operation::new("q", vec![]));
    operations.extend(setup);
    operations.push(op_draw(name));
    operations.push(Operation::new("Q", vec![]));

    let mut xobjects = Dictionary::new();
    xobjects.set(name.as_bytes().to_vec(), xobject);
    let resources = dictionary! { "XObject" => xobjects };

    writer.add_page(size, Content { operations }, resources)?;
    Ok(())
}
