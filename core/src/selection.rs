use serde::{Deserialize, Serialize};

/// Fallback on-screen size used when a selection is finalized without a drag.
pub const DEFAULT_SELECTION_WIDTH_PX: f64 = 100.0;
pub const DEFAULT_SELECTION_HEIGHT_PX: f64 = 50.0;

/// Text region in original-image pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub text_x: u32,
    pub text_y: u32,
    pub text_width: u32,
    pub text_height: u32,
}

impl Selection {
    pub const EMPTY: Selection = Selection {
        text_x: 0,
        text_y: 0,
        text_width: 0,
        text_height: 0,
    };

    pub fn new(text_x: u32, text_y: u32, text_width: u32, text_height: u32) -> Self {
        Self {
            text_x,
            text_y,
            text_width,
            text_height,
        }
    }

    pub fn has_area(&self) -> bool {
        self.text_width > 0 && self.text_height > 0
    }
}

/// Rectangle in rendered (CSS pixel) space, relative to the image's top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Ratio between the image's natural size and its rendered size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageScale {
    scale_x: f64,
    scale_y: f64,
    natural_width: u32,
    natural_height: u32,
    rendered_width: f64,
    rendered_height: f64,
}

impl ImageScale {
    pub fn new(
        natural_width: u32,
        natural_height: u32,
        rendered_width: f64,
        rendered_height: f64,
    ) -> Option<Self> {
        if natural_width == 0 || natural_height == 0 {
            return None;
        }
        if !(rendered_width > 0.0 && rendered_height > 0.0) {
            return None;
        }
        Some(Self {
            scale_x: natural_width as f64 / rendered_width,
            scale_y: natural_height as f64 / rendered_height,
            natural_width,
            natural_height,
            rendered_width,
            rendered_height,
        })
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn natural_size(&self) -> (u32, u32) {
        (self.natural_width, self.natural_height)
    }

    /// Keeps a rendered-space point inside the image bounds.
    pub fn clamp_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.clamp(0.0, self.rendered_width),
            y.clamp(0.0, self.rendered_height),
        )
    }

    pub fn to_image_x(&self, x: f64) -> u32 {
        to_pixel(x * self.scale_x)
    }

    pub fn to_image_y(&self, y: f64) -> u32 {
        to_pixel(y * self.scale_y)
    }

    pub fn to_image_rect(&self, rect: ScreenRect) -> Selection {
        Selection {
            text_x: self.to_image_x(rect.left),
            text_y: self.to_image_y(rect.top),
            text_width: self.to_image_x(rect.width),
            text_height: self.to_image_y(rect.height),
        }
    }

    /// Pixel under a rendered-space point, clamped to the last row/column.
    pub fn pixel_at(&self, x: f64, y: f64) -> (u32, u32) {
        let px = self.to_image_x(x).min(self.natural_width - 1);
        let py = self.to_image_y(y).min(self.natural_height - 1);
        (px, py)
    }
}

fn to_pixel(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.floor().min(u32::MAX as f64) as u32
}

/// One step of the drag gesture: where the overlay goes on screen and the
/// matching image-space selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionFrame {
    pub screen: ScreenRect,
    pub selection: Selection,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum GestureState {
    Idle,
    Selecting {
        start_x: f64,
        start_y: f64,
        current: ScreenRect,
    },
}

/// Drag-to-select state machine: idle until a press on the image, selecting
/// until release.
#[derive(Clone, Copy, Debug)]
pub struct SelectionGesture {
    state: GestureState,
}

impl Default for SelectionGesture {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionGesture {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.state, GestureState::Selecting { .. })
    }

    pub fn begin(&mut self, x: f64, y: f64, scale: ImageScale) -> SelectionFrame {
        let (x, y) = scale.clamp_point(x, y);
        let screen = ScreenRect {
            left: x,
            top: y,
            width: 0.0,
            height: 0.0,
        };
        self.state = GestureState::Selecting {
            start_x: x,
            start_y: y,
            current: screen,
        };
        SelectionFrame {
            screen,
            selection: scale.to_image_rect(screen),
        }
    }

    pub fn update(&mut self, x: f64, y: f64, scale: ImageScale) -> Option<SelectionFrame> {
        let GestureState::Selecting {
            start_x,
            start_y,
            current,
        } = &mut self.state
        else {
            return None;
        };
        let (start_x, start_y) = (*start_x, *start_y);
        let (x, y) = scale.clamp_point(x, y);
        let screen = ScreenRect {
            left: start_x.min(x),
            top: start_y.min(y),
            width: (x - start_x).abs(),
            height: (y - start_y).abs(),
        };
        *current = screen;
        Some(SelectionFrame {
            screen,
            selection: scale.to_image_rect(screen),
        })
    }

    /// Ends the drag. A selection with a zero dimension is replaced by the
    /// default rectangle anchored at the same top-left corner.
    pub fn finish(&mut self, scale: ImageScale) -> Option<SelectionFrame> {
        let GestureState::Selecting { current, .. } = self.state else {
            return None;
        };
        self.state = GestureState::Idle;
        let mut screen = current;
        let mut selection = scale.to_image_rect(screen);
        if !selection.has_area() {
            screen.width = DEFAULT_SELECTION_WIDTH_PX;
            screen.height = DEFAULT_SELECTION_HEIGHT_PX;
            selection.text_width = scale.to_image_x(DEFAULT_SELECTION_WIDTH_PX);
            selection.text_height = scale.to_image_y(DEFAULT_SELECTION_HEIGHT_PX);
        }
        Some(SelectionFrame { screen, selection })
    }

    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }
}
