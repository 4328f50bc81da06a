//! Page geometry: unit conversion, target sizes, content areas and
//! scale-to-fit placement.
//!
//! Everything here is pure arithmetic in PDF points. The only failure mode is
//! a content area that margins have squeezed to nothing, reported as
//! [`Error::DegenerateArea`].

mod matrix;
mod paper;

pub use matrix::{Matrix, Rect};
pub use paper::{Orientation, PageSize, PaperSize, POINTS_PER_INCH, POINTS_PER_MM};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Page margins in inches, as accepted at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// Create margins from explicit values (inches).
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same margin on every side.
    pub fn uniform(inches: f32) -> Self {
        Self::new(inches, inches, inches, inches)
    }

    /// No margins at all.
    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    /// Check that every side is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidMargins(format!(
                    "{} margin must be a non-negative number, got {}",
                    side, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(0.5)
    }
}

/// Margins converted to points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMargins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// The printable rectangle left after margins, in points.
///
/// `x`/`y` are the left and bottom margins, so the area can be used directly
/// as a placement rectangle on the target page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ContentArea {
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Uniform scale and bottom-left offset that center a source rectangle
/// inside a content area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFit {
    pub scale: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

impl ScaleFit {
    /// Fit `source_width x source_height` into `area`, shrinking the fitted
    /// scale by `shrink` (1.0 = touch the area edges).
    pub fn compute(source_width: f32, source_height: f32, area: &ContentArea, shrink: f32) -> Self {
        let scale = scale_to_fit(source_width, source_height, area.width, area.height) * shrink;
        Self {
            scale,
            x_offset: center_offset(scale, source_width, area.width, area.x),
            y_offset: center_offset(scale, source_height, area.height, area.y),
        }
    }

    /// Scaled size of the source rectangle.
    pub fn scaled_size(&self, source_width: f32, source_height: f32) -> (f32, f32) {
        (source_width * self.scale, source_height * self.scale)
    }

    /// The rectangle the scaled source occupies on the target page.
    pub fn placed_rect(&self, source_width: f32, source_height: f32) -> Rect {
        let (w, h) = self.scaled_size(source_width, source_height);
        Rect::new(self.x_offset, self.y_offset, w, h)
    }
}

/// Target page dimensions for a paper size and orientation.
///
/// Portrait returns `(W, H)`, landscape `(H, W)`.
pub fn target_dimensions(paper: PageSize, orientation: Orientation) -> PageSize {
    paper.oriented(orientation)
}

/// Convert inch margins to points.
pub fn margins_to_points(margins: &Margins) -> PointMargins {
    PointMargins {
        top: margins.top * POINTS_PER_INCH,
        right: margins.right * POINTS_PER_INCH,
        bottom: margins.bottom * POINTS_PER_INCH,
        left: margins.left * POINTS_PER_INCH,
    }
}

/// Content area of `target` after removing `margins`.
///
/// Fails with [`Error::DegenerateArea`] when either dimension is not
/// strictly positive.
pub fn content_area(target: PageSize, margins: &PointMargins) -> Result<ContentArea> {
    let width = target.width - margins.left - margins.right;
    let height = target.height - margins.top - margins.bottom;

    if !(width > 0.0 && height > 0.0) {
        return Err(Error::DegenerateArea { width, height });
    }

    Ok(ContentArea {
        x: margins.left,
        y: margins.bottom,
        width,
        height,
    })
}

/// Largest uniform scale keeping the source inside the content rectangle.
pub fn scale_to_fit(source_width: f32, source_height: f32, content_width: f32, content_height: f32) -> f32 {
    (content_width / source_width).min(content_height / source_height)
}

/// Offset along one axis that centers a scaled source inside the content
/// span starting at `margin`.
pub fn center_offset(scale: f32, source_dim: f32, content_dim: f32, margin: f32) -> f32 {
    margin + (content_dim - source_dim * scale) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margins_to_points() {
        let pts = margins_to_points(&Margins::new(1.0, 0.5, 0.25, 2.0));
        assert_eq!(pts.top, 72.0);
        assert_eq!(pts.right, 36.0);
        assert_eq!(pts.bottom, 18.0);
        assert_eq!(pts.left, 144.0);
    }

    #[test]
    fn test_content_area_half_inch() {
        let pts = margins_to_points(&Margins::uniform(0.5));
        let area = content_area(PageSize::A5, &pts).unwrap();
        assert!((area.width - (PageSize::A5.width - 72.0)).abs() < 1e-3);
        assert!((area.height - (PageSize::A5.height - 72.0)).abs() < 1e-3);
        assert_eq!(area.x, 36.0);
        assert_eq!(area.y, 36.0);
    }

    #[test]
    fn test_content_area_degenerate_vertical() {
        let pts = margins_to_points(&Margins::new(5.0, 0.0, 5.0, 0.0));
        let result = content_area(PageSize::A5, &pts);
        assert!(matches!(result, Err(Error::DegenerateArea { height, .. }) if height < 0.0));
    }

    #[test]
    fn test_content_area_exactly_consumed() {
        let pts = PointMargins {
            top: 0.0,
            bottom: 0.0,
            left: 200.0,
            right: 200.0,
        };
        let result = content_area(PageSize::new(400.0, 600.0), &pts);
        assert!(matches!(result, Err(Error::DegenerateArea { .. })));
    }

    #[test]
    fn test_scale_fit_centers() {
        let area = ContentArea {
            x: 36.0,
            y: 36.0,
            width: 100.0,
            height: 200.0,
        };
        let fit = ScaleFit::compute(200.0, 200.0, &area, 1.0);
        assert_eq!(fit.scale, 0.5);
        assert_eq!(fit.x_offset, 36.0);
        assert_eq!(fit.y_offset, 36.0 + 50.0);
    }

    #[test]
    fn test_scale_fit_shrink() {
        let area = ContentArea {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
        };
        let fit = ScaleFit::compute(100.0, 100.0, &area, 0.9);
        assert!((fit.scale - 0.9).abs() < 1e-6);
        assert!((fit.x_offset - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_margins_validate() {
        assert!(Margins::default().validate().is_ok());
        assert!(Margins::new(-0.1, 0.0, 0.0, 0.0).validate().is_err());
        assert!(Margins::new(0.0, f32::NAN, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_margins_partial_json() {
        let margins: Margins = serde_json::from_str(r#"{"top": 1.0}"#).unwrap();
        assert_eq!(margins.top, 1.0);
        assert_eq!(margins.left, 0.5);
    }
}
