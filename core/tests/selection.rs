use imgtool_core::{ImageScale, ScreenRect, Selection, SelectionGesture};

fn half_scale() -> ImageScale {
    // 1000x500 image shown at 500x250.
    ImageScale::new(1000, 500, 500.0, 250.0).unwrap()
}

#[test]
fn scale_rejects_degenerate_sizes() {
    assert!(ImageScale::new(0, 10, 10.0, 10.0).is_none());
    assert!(ImageScale::new(10, 10, 0.0, 10.0).is_none());
    assert!(ImageScale::new(10, 10, f64::NAN, 10.0).is_none());
}

#[test]
fn rect_is_scaled_to_image_pixels() {
    let scale = half_scale();
    assert_eq!(scale.scale_x(), 2.0);
    let selection = scale.to_image_rect(ScreenRect {
        left: 10.5,
        top: 20.0,
        width: 100.0,
        height: 40.25,
    });
    assert_eq!(selection, Selection::new(21, 40, 200, 80));
}

#[test]
fn drag_in_any_direction_normalizes() {
    let scale = half_scale();
    let mut gesture = SelectionGesture::new();
    gesture.begin(200.0, 150.0, scale);
    assert!(gesture.is_selecting());

    let frame = gesture.update(50.0, 100.0, scale).unwrap();
    assert_eq!(
        frame.screen,
        ScreenRect {
            left: 50.0,
            top: 100.0,
            width: 150.0,
            height: 50.0,
        }
    );
    assert_eq!(frame.selection, Selection::new(100, 200, 300, 100));

    let done = gesture.finish(scale).unwrap();
    assert_eq!(done.selection, Selection::new(100, 200, 300, 100));
    assert!(!gesture.is_selecting());
}

#[test]
fn points_outside_the_image_are_clamped() {
    let scale = half_scale();
    let mut gesture = SelectionGesture::new();
    gesture.begin(-20.0, -5.0, scale);
    let frame = gesture.update(900.0, 900.0, scale).unwrap();
    assert_eq!(frame.selection, Selection::new(0, 0, 1000, 500));
}

#[test]
fn click_without_drag_uses_default_size() {
    let scale = half_scale();
    let mut gesture = SelectionGesture::new();
    gesture.begin(30.0, 40.0, scale);
    let frame = gesture.finish(scale).unwrap();
    assert_eq!(frame.screen.width, 100.0);
    assert_eq!(frame.screen.height, 50.0);
    assert_eq!(frame.selection, Selection::new(60, 80, 200, 100));
    assert!(frame.selection.has_area());
}

#[test]
fn update_and_finish_need_an_active_drag() {
    let scale = half_scale();
    let mut gesture = SelectionGesture::new();
    assert!(gesture.update(10.0, 10.0, scale).is_none());
    assert!(gesture.finish(scale).is_none());

    gesture.begin(1.0, 1.0, scale);
    gesture.cancel();
    assert!(gesture.finish(scale).is_none());
}

#[test]
fn pixel_lookup_stays_inside_the_image() {
    let scale = half_scale();
    assert_eq!(scale.pixel_at(0.0, 0.0), (0, 0));
    assert_eq!(scale.pixel_at(250.0, 125.0), (500, 250));
    assert_eq!(scale.pixel_at(500.0, 250.0), (999, 499));
    assert_eq!(scale.natural_size(), (1000, 500));
}

#[test]
fn click_at_origin_yields_scaled_default_rect() {
    let scale = half_scale();
    let mut gesture = SelectionGesture::new();
    let start = gesture.begin(0.0, 0.0, scale);
    assert_eq!(start.selection, Selection::new(0, 0, 0, 0));
    let frame = gesture.finish(scale).unwrap();
    assert_eq!(frame.selection, Selection::new(0, 0, 200, 100));
}
