//! Error types for a5kit.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for a5kit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reformatting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input file does not exist.
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The input kind cannot be processed (e.g. an unknown extension).
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// The source document has no pages to process.
    #[error("Document has no pages")]
    EmptyDocument,

    /// No text (and no title) was supplied for typesetting.
    #[error("No text to lay out")]
    EmptyText,

    /// Margins leave no printable area on the target page.
    #[error("Margins leave no content area ({width:.2}pt x {height:.2}pt)")]
    DegenerateArea {
        /// Remaining content width in points (may be negative)
        width: f32,
        /// Remaining content height in points (may be negative)
        height: f32,
    },

    /// A margin value is negative or not finite.
    #[error("Invalid margins: {0}")]
    InvalidMargins(String),

    /// An option value is out of range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// The word-processor-to-PDF step failed.
    #[error("Conversion to PDF failed: {0}")]
    ConversionFailed(String),

    /// The PDF codec, rasterizer or typesetter failed.
    #[error("Rendering error: {0}")]
    Render(String),

    /// A rotated source page was found while rotation is rejected.
    #[error("Page {page} is rotated by {rotation} degrees")]
    RotatedPage {
        /// 1-indexed page number
        page: u32,
        /// Normalized rotation in degrees
        rotation: u16,
    },

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),
}

impl Error {
    /// Whether the failing step may succeed when attempted again.
    ///
    /// Only the external word conversion is worth retrying; geometry and
    /// codec failures are deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::ConversionFailed(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Render(err.to_string())
    }
}
