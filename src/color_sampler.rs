use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, MouseEvent};

use crate::dom::document;
use crate::input::{image_scale, offset_within};

/// Reads one RGBA pixel of the image under a click. The image is drawn at
/// natural size into a throwaway canvas; cross-origin images fail here.
pub(crate) fn sample_at_event(
    image: &HtmlImageElement,
    event: &MouseEvent,
) -> Result<Vec<u8>, String> {
    let scale = image_scale(image).ok_or_else(|| "image is not loaded".to_string())?;
    let (x, y) = offset_within(event, image);
    let (pixel_x, pixel_y) = scale.pixel_at(x, y);
    sample_pixel(image, scale.natural_size(), pixel_x, pixel_y)
}

fn sample_pixel(
    image: &HtmlImageElement,
    (width, height): (u32, u32),
    pixel_x: u32,
    pixel_y: u32,
) -> Result<Vec<u8>, String> {
    if pixel_x >= width || pixel_y >= height {
        return Err(format!("pixel {pixel_x},{pixel_y} outside {width}x{height}"));
    }
    let canvas = document()?
        .create_element("canvas")
        .map_err(|_| "canvas_create_failed".to_string())?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| "canvas_create_failed".to_string())?;
    canvas.set_width(width);
    canvas.set_height(height);
    let ctx = canvas
        .get_context("2d")
        .map_err(|_| "no 2d context".to_string())?
        .ok_or_else(|| "no 2d context".to_string())?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "no 2d context".to_string())?;
    ctx.draw_image_with_html_image_element(image, 0.0, 0.0)
        .map_err(|_| "image_draw_failed".to_string())?;
    let data = ctx
        .get_image_data(pixel_x as f64, pixel_y as f64, 1.0, 1.0)
        .map_err(|_| "image_read_failed".to_string())?;
    Ok(data.data().to_vec())
}
