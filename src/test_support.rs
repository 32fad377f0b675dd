use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::dom::document;

/// Solid red 4x2 PNG as a `data:` URL.
pub(crate) fn red_image_url() -> String {
    let canvas = document()
        .unwrap()
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(4);
    canvas.set_height(2);
    let ctx = canvas
        .get_context("2d")
        .unwrap()
        .unwrap()
        .dyn_into::<CanvasRenderingContext2d>()
        .unwrap();
    ctx.set_fill_style_str("#ff0000");
    ctx.fill_rect(0.0, 0.0, 4.0, 2.0);
    canvas.to_data_url().unwrap()
}
