use web_sys::{DomRect, Element, HtmlImageElement, MouseEvent};

use imgtool_core::ImageScale;

pub(crate) trait HasClientRect {
    fn client_rect(&self) -> DomRect;
}

impl HasClientRect for HtmlImageElement {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

impl HasClientRect for Element {
    fn client_rect(&self) -> DomRect {
        self.get_bounding_client_rect()
    }
}

/// Pointer position relative to the element's top-left corner, in CSS pixels.
pub(crate) fn offset_within(event: &MouseEvent, element: &impl HasClientRect) -> (f64, f64) {
    client_to_local(event.client_x() as f64, event.client_y() as f64, element)
}

pub(crate) fn client_to_local(
    client_x: f64,
    client_y: f64,
    element: &impl HasClientRect,
) -> (f64, f64) {
    let rect = element.client_rect();
    (client_x - rect.left(), client_y - rect.top())
}

/// Natural-to-rendered ratio of a loaded image; `None` until it has decoded
/// and been laid out.
pub(crate) fn image_scale(image: &HtmlImageElement) -> Option<ImageScale> {
    let rect = image.client_rect();
    ImageScale::new(
        image.natural_width(),
        image.natural_height(),
        rect.width(),
        rect.height(),
    )
}
