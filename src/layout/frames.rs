//! Frame geometry for single- and two-column pages.
//!
//! Frames are computed up front as plain rectangles; the flow in
//! `typeset` consumes them in order.

use crate::error::{Error, Result};
use crate::geometry::{
    content_area, margins_to_points, target_dimensions, ContentArea, Margins, PageSize, Rect,
    POINTS_PER_INCH,
};
use crate::options::{ColumnLayout, TextLayoutOptions};

/// Gap between the two columns, in points.
pub const GUTTER: f32 = 20.0;

/// Inner padding of the single-column frame.
pub const SINGLE_FRAME_PADDING: f32 = 6.0;

/// Inner padding of each column frame.
pub const COLUMN_FRAME_PADDING: f32 = 3.0;

/// Smallest side margin (inches) after halving for two columns.
pub const MIN_COLUMN_MARGIN: f32 = 0.2;

/// Page and frame layout for one text run.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGeometry {
    /// Output page size
    pub page_size: PageSize,
    /// Area inside the effective margins; the title spans its width
    pub content: ContentArea,
    /// Outer frame rectangles, in flow order
    pub frames: Vec<Rect>,
    /// Padding applied inside each frame
    pub padding: f32,
    /// Baseline position of the page number, when numbers are drawn
    pub page_number_at: Option<(f32, f32)>,
}

impl FrameGeometry {
    /// Compute geometry for the given options.
    pub fn compute(options: &TextLayoutOptions) -> Result<Self> {
        let margins = effective_margins(&options.margins, options.layout);
        let points = margins_to_points(&margins);

        let (paper, padding) = match options.layout {
            ColumnLayout::Single => (PageSize::A5, SINGLE_FRAME_PADDING),
            ColumnLayout::Double => (PageSize::A4, COLUMN_FRAME_PADDING),
        };
        let page_size = target_dimensions(paper, options.orientation);
        let content = content_area(page_size, &points)?;

        let frames = match options.layout {
            ColumnLayout::Single => vec![content.as_rect()],
            ColumnLayout::Double => {
                let column_width = (content.width - GUTTER) / 2.0;
                if column_width <= 0.0 {
                    return Err(Error::DegenerateArea {
                        width: column_width,
                        height: content.height,
                    });
                }
                vec![
                    Rect::new(content.x, content.y, column_width, content.height),
                    Rect::new(
                        content.x + column_width + GUTTER,
                        content.y,
                        column_width,
                        content.height,
                    ),
                ]
            }
        };

        let geometry = Self {
            page_size,
            content,
            frames,
            padding,
            page_number_at: options
                .draws_page_numbers()
                .then(|| (page_size.width / 2.0, points.bottom / 3.0)),
        };

        let inner = geometry.inner(&geometry.frames[0]);
        if !(inner.width > 0.0 && inner.height > 0.0) {
            return Err(Error::DegenerateArea {
                width: inner.width,
                height: inner.height,
            });
        }

        Ok(geometry)
    }

    /// Frame rectangle with padding removed: the area text is set in.
    pub fn inner(&self, frame: &Rect) -> Rect {
        Rect::new(
            frame.x + self.padding,
            frame.y + self.padding,
            frame.width - 2.0 * self.padding,
            frame.height - 2.0 * self.padding,
        )
    }

    /// Width available to body lines.
    pub fn line_width(&self) -> f32 {
        self.frames[0].width - 2.0 * self.padding
    }

    /// Width available to the title, which spans all columns.
    pub fn title_width(&self) -> f32 {
        self.content.width - 2.0 * self.padding
    }

    /// Left edge of the title span.
    pub fn title_left(&self) -> f32 {
        self.content.x + self.padding
    }

    /// Top edge of the text area.
    pub fn text_top(&self) -> f32 {
        self.content.y + self.content.height - self.padding
    }
}

/// Margins in effect: two-column layout halves the side margins, not
/// going below [`MIN_COLUMN_MARGIN`].
pub fn effective_margins(margins: &Margins, layout: ColumnLayout) -> Margins {
    match layout {
        ColumnLayout::Single => *margins,
        ColumnLayout::Double => Margins {
            left: (margins.left / 2.0).max(MIN_COLUMN_MARGIN),
            right: (margins.right / 2.0).max(MIN_COLUMN_MARGIN),
            ..*margins
        },
    }
}

/// Convert points to inches, for log output.
pub(crate) fn to_inches(points: f32) -> f32 {
    points / POINTS_PER_INCH
}
