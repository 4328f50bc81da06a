use super::{add_xobject_page, half_regions, PageTarget, PageTransformStrategy};
use crate::error::Result;
use crate::geometry::{Matrix, Rect, ScaleFit};
use crate::pdf::{op_concat, ops_clip, PdfWriter, SourcePage, SourcePdf};

/// Place the original page content on the target page under an affine
/// transform, keeping it vector.
///
/// The page is fitted as displayed: `/Rotate` is folded into the matrix.
/// Split halves are clipped to their placed rectangle so nothing from the
/// other half shows.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorMerge;

impl VectorMerge {
    /// Matrix taking page space to target space for `region` (display
    /// coordinates) fitted into the content area.
    pub fn region_matrix(page: &SourcePage, region: &Rect, fit: &ScaleFit) -> Matrix {
        page.display_matrix()
            .then(&Matrix::translate(-region.x, -region.y))
            .then(&Matrix::scale(fit.scale, fit.scale))
            .then(&Matrix::translate(fit.x_offset, fit.y_offset))
    }

    fn place(
        &self,
        source: &SourcePdf,
        page: &SourcePage,
        region: Rect,
        clip: bool,
        target: &PageTarget,
        writer: &mut PdfWriter,
    ) -> Result<()> {
        let fit = ScaleFit::compute(region.width, region.height, &target.area, target.safety_factor);
        let matrix = Self::region_matrix(page, &region, &fit);

        log::debug!(
            "Page {}: region {:?} scale {:.4} offset ({:.2}, {:.2})",
            page.number,
            region,
            fit.scale,
            fit.x_offset,
            fit.y_offset
        );

        let mut setup = Vec::new();
        if clip {
            setup.extend(ops_clip(&fit.placed_rect(region.width, region.height)));
        }
        setup.push(op_concat(&matrix));

        let form = writer.import_page(source, page)?;
        add_xobject_page(writer, target.size, "P0", form, setup)
    }
}

impl PageTransformStrategy for VectorMerge {
    fn name(&self) -> &'static str {
        "vector-merge"
    }

    fn resize(
        &self,
        source: &SourcePdf,
        page: &SourcePage,
        target: &PageTarget,
        writer: &mut PdfWriter,
    ) -> Result<()> {
        let display = page.display_size();
        let whole = Rect::new(0.0, 0.0, display.width, display.height);
        self.place(source, page, whole, false, target, writer)
    }

    fn split(
        &self,
        source: &SourcePdf,
        page: &SourcePage,
        target: &PageTarget,
        writer: &mut PdfWriter,
    ) -> Result<()> {
        for region in half_regions(page.display_size(), target.orientation) {
            self.place(source, page, region, true, target, writer)?;
        }
        Ok(())
    }
}
