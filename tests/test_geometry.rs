//! Device/document space transform properties.

use docmap::geometry::{DevRect, PageView, PdfRect, Rotation};
use proptest::prelude::*;

fn rotations() -> impl Strategy<Value = Rotation> {
    prop_oneof![
        Just(Rotation::None),
        Just(Rotation::Clockwise90),
        Just(Rotation::UpsideDown),
        Just(Rotation::Clockwise270),
    ]
}

proptest! {
    #[test]
    fn prop_device_rect_round_trips(
        left in 1.0f64..500.0,
        top in 1.0f64..500.0,
        width in 1.0f64..200.0,
        height in 1.0f64..200.0,
        zoom in 0.25f64..4.0,
        rotation in rotations(),
    ) {
        let page_box = PdfRect::new(792.0, 0.0, 0.0, 612.0);
        let view = PageView::new(page_box, zoom, rotation).unwrap();

        let dev = DevRect::from_origin_size(left, top, width, height);
        let rect = view.rect_to_page(&dev);
        let back = view.rect_to_device(&rect);

        prop_assert!((back.left - dev.left).abs() < 1e-6);
        prop_assert!((back.top - dev.top).abs() < 1e-6);
        prop_assert!((back.right - dev.right).abs() < 1e-6);
        prop_assert!((back.bottom - dev.bottom).abs() < 1e-6);
    }

    #[test]
    fn prop_document_rect_is_normalized(
        left in 1.0f64..500.0,
        top in 1.0f64..500.0,
        width in 1.0f64..200.0,
        height in 1.0f64..200.0,
        zoom in 0.25f64..4.0,
        rotation in rotations(),
    ) {
        let page_box = PdfRect::new(792.0, 0.0, 0.0, 612.0);
        let view = PageView::new(page_box, zoom, rotation).unwrap();

        let dev = DevRect::from_origin_size(left, top, width, height);
        let rect = view.rect_to_page(&dev);
        prop_assert!(rect.left <= rect.right);
        prop_assert!(rect.bottom <= rect.top);
    }
}

#[test]
fn test_zoom_scales_device_lengths() {
    let page_box = PdfRect::new(792.0, 0.0, 0.0, 612.0);
    let rect = PdfRect::new(200.0, 50.0, 100.0, 150.0);

    let at_one = PageView::new(page_box, 1.0, Rotation::None).unwrap();
    let at_two = PageView::new(page_box, 2.0, Rotation::None).unwrap();

    let dev_one = at_one.rect_to_device(&rect);
    let dev_two = at_two.rect_to_device(&rect);
    assert!((2.0 * (dev_one.right - dev_one.left) - (dev_two.right - dev_two.left)).abs() < 1e-9);
    assert_eq!(at_two.device_width(), 1224.0);
    assert_eq!(at_two.device_height(), 1584.0);
}

#[test]
fn test_rotated_view_swaps_device_dimensions() {
    let page_box = PdfRect::new(792.0, 0.0, 0.0, 612.0);
    let view = PageView::new(page_box, 1.0, Rotation::Clockwise90).unwrap();
    assert_eq!(view.device_width(), 792.0);
    assert_eq!(view.device_height(), 612.0);
}
