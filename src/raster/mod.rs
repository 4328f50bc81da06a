//! Page rasterization and bitmap cropping.
//!
//! Rendering is delegated to an external renderer behind the [`Rasterizer`]
//! trait. The default backend runs poppler's `pdftoppm` into a scoped
//! temporary directory and decodes the resulting PNG.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::{imageops, RgbImage};

use crate::error::{Error, Result};
use crate::geometry::Orientation;

/// Renders a single PDF page to an RGB bitmap.
///
/// Implementations must return the page as a viewer displays it, i.e. with
/// `/Rotate` already applied.
pub trait Rasterizer {
    /// Render page `page_number` (1-indexed) of the PDF at `pdf` at `dpi`.
    fn render_page(&self, pdf: &Path, page_number: u32, dpi: u32) -> Result<RgbImage>;

    /// Backend name for log messages.
    fn name(&self) -> &str {
        "rasterizer"
    }
}

/// Rasterizer backed by poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: PathBuf,
}

impl PdftoppmRasterizer {
    /// Create a rasterizer, searching for `pdftoppm` in `PATH`.
    pub fn new() -> Self {
        let binary = which::which("pdftoppm").unwrap_or_else(|_| PathBuf::from("pdftoppm"));
        Self { binary }
    }

    /// Use a specific `pdftoppm` binary.
    #[must_use]
    pub fn with_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = path.into();
        self
    }

    /// The binary that will be invoked.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn build_args(pdf: &Path, page_number: u32, dpi: u32, out_root: &Path) -> Vec<String> {
        let page = page_number.to_string();
        vec![
            "-r".to_string(),
            dpi.to_string(),
            "-f".to_string(),
            page.clone(),
            "-l".to_string(),
            page,
            "-png".to_string(),
            "-singlefile".to_string(),
            pdf.to_string_lossy().into_owned(),
            out_root.to_string_lossy().into_owned(),
        ]
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn render_page(&self, pdf: &Path, page_number: u32, dpi: u32) -> Result<RgbImage> {
        let workdir = tempfile::Builder::new().prefix("a5kit-raster-").tempdir()?;
        let out_root = workdir.path().join("page");
        let args = Self::build_args(pdf, page_number, dpi, &out_root);

        log::debug!("Running {} {}", self.binary.display(), args.join(" "));
        let output = Command::new(&self.binary).args(&args).output().map_err(|e| {
            Error::Render(format!(
                "failed to run {}: {}",
                self.binary.display(),
                e
            ))
        })?;

        if !output.status.success() {
            return Err(Error::Render(format!(
                "pdftoppm exited with {} on page {}: {}",
                output.status,
                page_number,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let png = out_root.with_extension("png");
        if !png.exists() {
            return Err(Error::Render(format!(
                "pdftoppm produced no image for page {}",
                page_number
            )));
        }

        // `workdir` is removed on drop, on success and error alike.
        Ok(image::open(&png)?.to_rgb8())
    }

    fn name(&self) -> &str {
        "pdftoppm"
    }
}

/// Crop a rendered page into its two halves.
///
/// Portrait splits at the vertical midline into (left, right); landscape
/// splits at the horizontal midline into (top, bottom). The first half gets
/// `floor(n / 2)` pixels and the second half the remainder, so an odd pixel
/// count goes to the second half.
pub fn split_image(image: &RgbImage, orientation: Orientation) -> (RgbImage, RgbImage) {
    let (width, height) = image.dimensions();
    match orientation {
        Orientation::Portrait => {
            let first = width / 2;
            (
                imageops::crop_imm(image, 0, 0, first, height).to_image(),
                imageops::crop_imm(image, first, 0, width - first, height).to_image(),
            )
        }
        Orientation::Landscape => {
            let first = height / 2;
            (
                imageops::crop_imm(image, 0, 0, width, first).to_image(),
                imageops::crop_imm(image, 0, first, width, height - first).to_image(),
            )
        }
    }
}

/// Undo a clockwise display rotation on a rendered bitmap.
pub fn unrotate_image(image: RgbImage, rotation: u16) -> RgbImage {
    match rotation {
        90 => imageops::rotate270(&image),
        180 => imageops::rotate180(&image),
        270 => imageops::rotate90(&image),
        _ => image,
    }
}
