//! Options for typesetting plain text.

use crate::error::{Error, Result};
use crate::geometry::{Margins, Orientation};
use serde::{Deserialize, Serialize};

/// Default body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Paragraph alignment selected by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    /// Left aligned
    #[default]
    Normal,
    /// Both edges aligned
    Justified,
    /// Centered lines
    Centered,
}

/// Column layout of the text output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnLayout {
    /// One column on A5
    #[default]
    Single,
    /// Two columns on A4
    Double,
}

/// Options for [`layout_text`](crate::layout::layout_text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayoutOptions {
    /// Optional title, rendered centered above the body
    pub title: Option<String>,

    /// Body font size in points
    pub font_size: f32,

    /// Paragraph alignment
    pub text_style: TextStyle,

    /// Column layout
    pub layout: ColumnLayout,

    /// Page margins (inches)
    pub margins: Margins,

    /// Page orientation
    pub orientation: Orientation,

    /// Draw page numbers (layout default when `None`: only two-column)
    pub page_numbers: Option<bool>,
}

impl TextLayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title. An empty title is treated as none.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = if title.trim().is_empty() {
            None
        } else {
            Some(title)
        };
        self
    }

    /// Set the body font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set paragraph alignment.
    pub fn with_text_style(mut self, style: TextStyle) -> Self {
        self.text_style = style;
        self
    }

    /// Set column layout.
    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set margins (inches).
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Force page numbers on or off.
    pub fn with_page_numbers(mut self, enabled: bool) -> Self {
        self.page_numbers = Some(enabled);
        self
    }

    /// Whether page numbers are drawn for the configured layout.
    pub fn draws_page_numbers(&self) -> bool {
        self.page_numbers
            .unwrap_or(self.layout == ColumnLayout::Double)
    }

    /// Check option ranges.
    pub fn validate(&self) -> Result<()> {
        self.margins.validate()?;
        if !(self.font_size.is_finite() && self.font_size >= 4.0 && self.font_size <= 96.0) {
            return Err(Error::InvalidOption(format!(
                "font size must be between 4 and 96 points, got {}",
                self.font_size
            )));
        }
        Ok(())
    }
}

impl Default for TextLayoutOptions {
    fn default() -> Self {
        Self {
            title: None,
            font_size: DEFAULT_FONT_SIZE,
            text_style: TextStyle::Normal,
            layout: ColumnLayout::Single,
            margins: Margins::default(),
            orientation: Orientation::Portrait,
            page_numbers: None,
        }
    }
}
