//! Options for resize and split runs.

use super::PageSelection;
use crate::error::{Error, Result};
use crate::geometry::{Margins, Orientation, PaperSize};
use serde::{Deserialize, Serialize};

/// Default rasterization resolution.
pub const DEFAULT_DPI: u32 = 200;

/// Scale shrink the vector merge strategy applies by default.
pub const VECTOR_SAFETY_FACTOR: f32 = 0.95;

/// What to do with each source page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// One source page onto one target page
    #[default]
    Resize,
    /// One source page into two target pages (left/right or top/bottom halves)
    Split,
}

/// How page content is carried onto the target page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Render to a bitmap, then draw the bitmap (halves cropped in pixels)
    #[default]
    RasterRedraw,
    /// Place the original vector content with a transform; halves are clipped
    VectorMerge,
    /// Historical split that shifts scaled content without cropping.
    ///
    /// Content from one half can bleed into the other; kept for regression
    /// comparison only.
    VectorSplitCropTranslate,
}

impl Strategy {
    /// Shrink applied to the fitted scale unless overridden.
    pub fn default_safety_factor(self) -> f32 {
        match self {
            Strategy::RasterRedraw => 1.0,
            Strategy::VectorMerge | Strategy::VectorSplitCropTranslate => VECTOR_SAFETY_FACTOR,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::RasterRedraw => "raster-redraw",
            Strategy::VectorMerge => "vector-merge",
            Strategy::VectorSplitCropTranslate => "vector-split-crop-translate",
        }
    }
}

/// Handling of the `/Rotate` page attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// Lay out the page as a viewer displays it
    #[default]
    Normalize,
    /// Fail on any rotated page
    Reject,
    /// Treat the page as unrotated
    Ignore,
}

/// Options for [`transform_document`](crate::transform::transform_document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Target paper size
    pub paper: PaperSize,

    /// Target orientation
    pub orientation: Orientation,

    /// Target margins (inches)
    pub margins: Margins,

    /// Page transform strategy
    pub strategy: Strategy,

    /// Raster resolution for [`Strategy::RasterRedraw`]
    pub dpi: u32,

    /// Shrink applied to the fitted scale (strategy default when `None`)
    pub safety_factor: Option<f32>,

    /// Rotated source page handling
    pub rotation: RotationPolicy,

    /// Source pages to process
    pub pages: PageSelection,
}

impl TransformOptions {
    /// Create new transform options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target paper size.
    pub fn with_paper(mut self, paper: PaperSize) -> Self {
        self.paper = paper;
        self
    }

    /// Set the target orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the margins (inches).
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the transform strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set raster resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Override the scale shrink factor.
    pub fn with_safety_factor(mut self, factor: f32) -> Self {
        self.safety_factor = Some(factor);
        self
    }

    /// Set rotation handling.
    pub fn with_rotation(mut self, policy: RotationPolicy) -> Self {
        self.rotation = policy;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// The shrink factor in effect for the configured strategy.
    pub fn effective_safety_factor(&self) -> f32 {
        self.safety_factor
            .unwrap_or_else(|| self.strategy.default_safety_factor())
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        self.margins.validate()?;
        if !(36..=1200).contains(&self.dpi) {
            return Err(Error::InvalidOption(format!(
                "dpi must be between 36 and 1200, got {}",
                self.dpi
            )));
        }
        if let Some(factor) = self.safety_factor {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(Error::InvalidOption(format!(
                    "safety factor must be in (0, 1], got {}",
                    factor
                )));
            }
        }
        Ok(())
    }
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            paper: PaperSize::A5,
            orientation: Orientation::Portrait,
            margins: Margins::default(),
            strategy: Strategy::RasterRedraw,
            dpi: DEFAULT_DPI,
            safety_factor: None,
            rotation: RotationPolicy::Normalize,
            pages: PageSelection::All,
        }
    }
}
