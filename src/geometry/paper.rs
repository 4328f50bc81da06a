//! Paper sizes and orientation.

use serde::{Deserialize, Serialize};

/// Points per inch (PDF user space unit).
pub const POINTS_PER_INCH: f32 = 72.0;

/// Points per millimeter.
pub const POINTS_PER_MM: f32 = POINTS_PER_INCH / 25.4;

/// A page size in points (1 point = 1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl PageSize {
    /// ISO A4 (210 x 297 mm).
    pub const A4: PageSize = PageSize {
        width: 210.0 * POINTS_PER_MM,
        height: 297.0 * POINTS_PER_MM,
    };

    /// ISO A5 (148 x 210 mm).
    pub const A5: PageSize = PageSize {
        width: 148.0 * POINTS_PER_MM,
        height: 210.0 * POINTS_PER_MM,
    };

    /// US Letter, the fallback for pages without a usable box.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// Create a page size from explicit dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The same size with width and height swapped.
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Orient this size: portrait keeps the short edge horizontal.
    ///
    /// Sizes are stored portrait, so landscape simply swaps.
    pub fn oriented(self, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => self,
            Orientation::Landscape => self.swapped(),
        }
    }

    /// Whether both dimensions are strictly positive and finite.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Check if the size is wider than tall.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Named paper sizes known to the reformatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    /// ISO A4
    A4,
    /// ISO A5
    #[default]
    A5,
}

impl PaperSize {
    const TABLE: [(PaperSize, PageSize); 2] =
        [(PaperSize::A4, PageSize::A4), (PaperSize::A5, PageSize::A5)];

    /// Portrait dimensions of this paper size.
    pub fn size(self) -> PageSize {
        Self::TABLE
            .iter()
            .find(|(paper, _)| *paper == self)
            .map(|(_, size)| *size)
            .unwrap_or(PageSize::A5)
    }

    /// Paper name as printed in reports.
    pub fn name(self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
        }
    }
}

impl std::fmt::Display for PaperSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Page orientation of the target sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Short edge horizontal
    #[default]
    Portrait,
    /// Long edge horizontal
    Landscape,
}
