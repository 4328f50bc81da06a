use super::{add_xobject_page, PageTarget, PageTransformStrategy, VectorMerge};
use crate::error::Result;
use crate::geometry::{scale_to_fit, Matrix, Orientation};
use crate::pdf::{op_concat, PdfWriter, SourcePage, SourcePdf};

/// Historical vector split: scale the whole page by twice its fitted scale
/// and shift the second half into view, without cropping.
///
/// Content off-center on the source page bleeds from one half into the
/// other, and the doubled scale can overflow the content area along the
/// axis that is not split. Use [`VectorMerge`] for real output; this one
/// exists to compare against old results. Resize behaves like
/// [`VectorMerge`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorSplitCropTranslate;

impl VectorSplitCropTranslate {
    /// Matrices for the two halves, in output order.
    pub fn half_matrices(page: &SourcePage, target: &PageTarget) -> [Matrix; 2] {
        let display = page.display_size();
        let (dw, dh) = (display.width, display.height);
        let area = &target.area;
        let scale = 2.0 * scale_to_fit(dw, dh, area.width, area.height) * target.safety_factor;

        let shifts = match target.orientation {
            Orientation::Portrait => [(0.0, 0.0), (-dw / 2.0, 0.0)],
            Orientation::Landscape => [(0.0, -dh / 2.0), (0.0, 0.0)],
        };

        shifts.map(|(sx, sy)| {
            page.display_matrix()
                .then(&Matrix::translate(sx, sy))
                .then(&Matrix::scale(scale, scale))
                .then(&Matrix::translate(area.x, area.y))
        })
    }
}

impl PageTransformStrategy for VectorSplitCropTranslate {
    fn name(&self) -> &'static str {
        "vector-split-crop-translate"
    }

    fn resize(
        &self,
        source: &SourcePdf,
        page: &SourcePage,
        target: &PageTarget,
        writer: &mut PdfWriter,
    ) -> Result<()> {
        VectorMerge.resize(source, page, target, writer)
    }

    fn split(
        &self,
        source: &SourcePdf,
        page: &SourcePage,
        target: &PageTarget,
        writer: &mut PdfWriter,
    ) -> Result<()> {
        log::warn!(
            "Page {}: {} does not crop; content may bleed between halves",
            page.number,
            self.name()
        );

        let form = writer.import_page(source, page)?;
        for matrix in Self::half_matrices(page, target) {
            add_xobject_page(writer, target.size, "P0", form, vec![op_concat(&matrix)])?;
        }
        Ok(())
    }
}
