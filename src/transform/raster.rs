use image::RgbImage;

use super::{add_xobject_page, PageTarget, PageTransformStrategy};
use crate::error::Result;
use crate::geometry::{Matrix, ScaleFit};
use crate::pdf::{op_concat, PdfWriter, SourcePage, SourcePdf};
use crate::raster::{split_image, unrotate_image, Rasterizer};

/// Render each page to a bitmap and draw the bitmap onto the target page.
///
/// The fit is computed against the bitmap's pixel dimensions, so the DPI
/// only affects sharpness, not placement.
pub struct RasterRedraw<'a> {
    rasterizer: &'a dyn Rasterizer,
    dpi: u32,
}

impl<'a> RasterRedraw<'a> {
    pub fn new(rasterizer: &'a dyn Rasterizer, dpi: u32) -> Self {
        Self { rasterizer, dpi }
    }

    fn render(&self, source: &SourcePdf, page: &SourcePage) -> Result<RgbImage> {
        let path = source.materialize()?;
        let image = self.rasterizer.render_page(path, page.number, self.dpi)?;
        log::debug!(
            "Rendered page {} with {} at {} dpi: {}x{} px",
            page.number,
            self.rasterizer.name(),
            self.dpi,
            image.width(),
            image.height()
        );

        // The renderer applies the page's own /Rotate; undo whatever the
        // rotation policy asked us not to apply.
        let displayed = source.page(page.number)?.rotation;
        let excess = (displayed + 360 - page.rotation) % 360;
        Ok(unrotate_image(image, excess))
    }

    fn draw(&self, writer: &mut PdfWriter, target: &PageTarget, image: &RgbImage) -> Result<()> {
        let (w, h) = (image.width() as f32, image.height() as f32);
        let fit = ScaleFit::compute(w, h, &target.area, target.safety_factor);
        let (scaled_w, scaled_h) = fit.scaled_size(w, h);

        log::debug!(
            "Placing {}x{} px at ({:.2}, {:.2}) size {:.2}x{:.2} pt",
            image.width(),
            image.height(),
            fit.x_offset,
            fit.y_offset,
            scaled_w,
            scaled_h
        );

        // Image space is the unit square.
        let placement = Matrix::new(scaled_w, 0.0, 0.0, scaled_h, fit.x_offset, fit.y_offset);
        let xobject = writer.add_image(image)?;
        add_xobject_page(writer, target.size, "Im0", xobject, vec![op_concat(&placement)])
    }
}

impl PageTransformStrategy for RasterRedraw<'_> {
    fn name(&self) -> &'static str {
        "raster-redraw"
    }

    fn resize(
        &self,
        source: &SourcePdf,
        page: &SourcePage,
        target: &PageTarget,
        writer: &mut PdfWriter,
    ) -> Result<()> {
        let image = self.render(source, page)?;
        self.draw(writer, target, &image)
    }

    fn split(
        &self,
        source: &SourcePdf,
        page: &SourcePage,
        target: &PageTarget,
        writer: &mut PdfWriter,
    ) -> Result<()> {
        let image = self.render(source, page)?;
        let (first, second) = split_image(&image, target.orientation);
        self.draw(writer, target, &first)?;
        self.draw(writer, target, &second)
    }
}
