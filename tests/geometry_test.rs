//! Property tests for page geometry.

use a5kit::error::Error;
use a5kit::geometry::{
    content_area, margins_to_points, scale_to_fit, target_dimensions, ContentArea, Margins,
    Orientation, PageSize, PaperSize, PointMargins, ScaleFit,
};
use image::RgbImage;
use proptest::prelude::*;

fn paper() -> impl Strategy<Value = PageSize> {
    prop_oneof![
        Just(PaperSize::A4.size()),
        Just(PaperSize::A5.size()),
        (50.0f32..2000.0, 50.0f32..2000.0).prop_map(|(w, h)| PageSize::new(w, h)),
    ]
}

proptest! {
    #[test]
    fn landscape_swaps_portrait(size in paper()) {
        let portrait = target_dimensions(size, Orientation::Portrait);
        let landscape = target_dimensions(size, Orientation::Landscape);
        prop_assert_eq!(landscape.width, portrait.height);
        prop_assert_eq!(landscape.height, portrait.width);
    }

    #[test]
    fn content_area_positive_or_degenerate(
        size in paper(),
        top in 0.0f32..1200.0,
        right in 0.0f32..1200.0,
        bottom in 0.0f32..1200.0,
        left in 0.0f32..1200.0,
    ) {
        // Stay clear of the exact boundary, where f32 rounding decides.
        prop_assume!((left + right - size.width).abs() > 0.01);
        prop_assume!((top + bottom - size.height).abs() > 0.01);

        let margins = PointMargins { top, right, bottom, left };
        let fits = left + right < size.width && top + bottom < size.height;

        match content_area(size, &margins) {
            Ok(area) => {
                prop_assert!(fits);
                prop_assert!(area.width > 0.0 && area.height > 0.0);
                prop_assert_eq!(area.x, left);
                prop_assert_eq!(area.y, bottom);
            }
            Err(Error::DegenerateArea { .. }) => prop_assert!(!fits),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn scale_to_fit_stays_inside(
        sw in 1.0f32..5000.0,
        sh in 1.0f32..5000.0,
        cw in 1.0f32..2000.0,
        ch in 1.0f32..2000.0,
    ) {
        let scale = scale_to_fit(sw, sh, cw, ch);
        prop_assert!(scale <= cw / sw);
        prop_assert!(scale <= ch / sh);
        prop_assert!(sw * scale <= cw * (1.0 + 1e-5));
        prop_assert!(sh * scale <= ch * (1.0 + 1e-5));
    }

    #[test]
    fn fitted_rect_is_centered_in_area(
        sw in 1.0f32..3000.0,
        sh in 1.0f32..3000.0,
        x in 0.0f32..100.0,
        y in 0.0f32..100.0,
        width in 10.0f32..1000.0,
        height in 10.0f32..1000.0,
        shrink in 0.5f32..=1.0,
    ) {
        let area = ContentArea { x, y, width, height };
        let fit = ScaleFit::compute(sw, sh, &area, shrink);
        let placed = fit.placed_rect(sw, sh);

        let tolerance = 1e-3 * width.max(height);
        prop_assert!(placed.x >= x - tolerance);
        prop_assert!(placed.y >= y - tolerance);
        prop_assert!(placed.right() <= x + width + tolerance);
        prop_assert!(placed.top() <= y + height + tolerance);

        let left_gap = placed.x - x;
        let right_gap = x + width - placed.right();
        prop_assert!((left_gap - right_gap).abs() <= tolerance);
    }

    #[test]
    fn split_halves_cover_the_image(w in 1u32..400, h in 1u32..400) {
        let image = RgbImage::new(w, h);

        let (left, right) = a5kit::raster::split_image(&image, Orientation::Portrait);
        prop_assert_eq!(left.width() + right.width(), w);
        prop_assert_eq!(left.width(), w / 2);
        prop_assert_eq!((left.height(), right.height()), (h, h));

        let (top, bottom) = a5kit::raster::split_image(&image, Orientation::Landscape);
        prop_assert_eq!(top.height() + bottom.height(), h);
        prop_assert_eq!(top.height(), h / 2);
        prop_assert_eq!((top.width(), bottom.width()), (w, w));
    }
}

#[test]
fn a5_onto_a5_without_margins_is_identity_scale() {
    let target = target_dimensions(PaperSize::A5.size(), Orientation::Portrait);
    let area = content_area(target, &margins_to_points(&Margins::zero())).unwrap();
    let fit = ScaleFit::compute(PageSize::A5.width, PageSize::A5.height, &area, 1.0);

    assert!((fit.scale - 1.0).abs() < 1e-5);
    assert!(fit.x_offset.abs() < 1e-3);
    assert!(fit.y_offset.abs() < 1e-3);
}

#[test]
fn vertical_margins_taller_than_a5_are_degenerate() {
    let target = target_dimensions(PaperSize::A5.size(), Orientation::Portrait);
    let margins = Margins::new(5.0, 0.0, 5.0, 0.0);

    match content_area(target, &margins_to_points(&margins)) {
        Err(Error::DegenerateArea { width, height }) => {
            assert!(width > 0.0);
            assert!(height < 0.0);
        }
        other => panic!("expected DegenerateArea, got {:?}", other),
    }
}
