use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use imgtool_core::{
    Change, Eyedropper, PreviewStyle, ScreenRect, Selection, SelectionFrame, SelectionGesture,
    StateUpdate, Store, Subscription, Topic,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlImageElement, MouseEvent};

use crate::dom::{document, is_visible, js_err, query_in, set_style, set_visible};
use crate::input::{image_scale, offset_within};

struct Inner {
    store: Rc<Store>,
    image: HtmlImageElement,
    selection_box: HtmlElement,
    dummy_text: HtmlElement,
    section: Option<HtmlElement>,
    gesture: RefCell<SelectionGesture>,
    overlay: Cell<Option<ScreenRect>>,
    sample_text: RefCell<String>,
    eyedropper: Rc<RefCell<Eyedropper>>,
}

impl Inner {
    fn show_preview(&self, src: &str) {
        self.hide_selection();
        self.image.set_src(src);
        if let Some(section) = &self.section {
            if let Err(err) = set_visible(section, true) {
                gloo::console::warn!("preview section not shown", err);
            }
        }
    }

    fn hide_selection(&self) {
        self.gesture.borrow_mut().cancel();
        self.overlay.set(None);
        if let Err(err) = set_visible(&self.selection_box, false) {
            gloo::console::warn!("selection overlay not hidden", err);
        }
        self.store.set(StateUpdate::Selection(Selection::EMPTY));
    }

    fn place_overlay(&self, rect: ScreenRect) -> Result<(), String> {
        set_visible(&self.selection_box, true)?;
        set_style(&self.selection_box, "left", &px(rect.left))?;
        set_style(&self.selection_box, "top", &px(rect.top))?;
        set_style(&self.selection_box, "width", &px(rect.width))?;
        set_style(&self.selection_box, "height", &px(rect.height))?;
        self.overlay.set(Some(rect));
        Ok(())
    }

    fn apply_frame(&self, frame: SelectionFrame) {
        if let Err(err) = self.place_overlay(frame.screen) {
            gloo::console::warn!("selection overlay not placed", err);
        }
        self.store.set(StateUpdate::Selection(frame.selection));
    }

    fn mockup_span(&self) -> Result<HtmlElement, String> {
        if let Some(span) = self.dummy_text.query_selector("span").map_err(js_err)? {
            return span
                .dyn_into::<HtmlElement>()
                .map_err(|_| "mockup span is not an html element".to_string());
        }
        let span = document()?
            .create_element("span")
            .map_err(js_err)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "mockup span is not an html element".to_string())?;
        span.set_text_content(Some(&self.sample_text.borrow()));
        self.dummy_text.set_inner_html("");
        self.dummy_text.append_child(&span).map_err(js_err)?;
        Ok(span)
    }

    fn update_preview(&self) -> Result<(), String> {
        if !is_visible(&self.selection_box) {
            return Ok(());
        }
        let span = self.mockup_span()?;
        let style = PreviewStyle::from_settings(&self.store.settings());
        for (name, value) in style.declarations() {
            set_style(&span, name, value)?;
        }
        Ok(())
    }

    fn refresh(&self) {
        if let Err(err) = self.update_preview() {
            gloo::console::warn!("preview update failed", err);
        }
    }

    fn on_mouse_down(&self, event: &MouseEvent) {
        let on_image = event
            .target()
            .and_then(|target| target.dyn_into::<HtmlImageElement>().ok())
            .is_some_and(|target| target == self.image);
        if !on_image || self.eyedropper.borrow().is_active() {
            return;
        }
        event.prevent_default();
        let Some(scale) = image_scale(&self.image) else {
            return;
        };
        let (x, y) = offset_within(event, &self.image);
        let frame = self.gesture.borrow_mut().begin(x, y, scale);
        self.apply_frame(frame);
    }

    fn on_mouse_move(&self, event: &MouseEvent) {
        if !self.gesture.borrow().is_selecting() {
            return;
        }
        event.prevent_default();
        let Some(scale) = image_scale(&self.image) else {
            return;
        };
        let (x, y) = offset_within(event, &self.image);
        let frame = self.gesture.borrow_mut().update(x, y, scale);
        if let Some(frame) = frame {
            self.apply_frame(frame);
        }
    }

    fn on_mouse_up(&self) {
        if !self.gesture.borrow().is_selecting() {
            return;
        }
        let Some(scale) = image_scale(&self.image) else {
            self.gesture.borrow_mut().cancel();
            return;
        };
        let frame = self.gesture.borrow_mut().finish(scale);
        if let Some(frame) = frame {
            self.apply_frame(frame);
        }
    }
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Preview image with drag-to-select overlay and styled text mockup.
pub(crate) struct ImagePreview {
    inner: Rc<Inner>,
    _listeners: Vec<EventListener>,
    _subscriptions: Vec<Subscription>,
}

impl ImagePreview {
    pub(crate) fn mount(
        container: &Element,
        store: Rc<Store>,
        sample_text: &str,
        eyedropper: Rc<RefCell<Eyedropper>>,
    ) -> Result<Self, String> {
        let image: HtmlImageElement = query_in(container, "#preview-image")?;
        let selection_box: HtmlElement = query_in(container, "#selection-box")?;
        let dummy_text: HtmlElement = query_in(container, "#dummy-text")?;
        let section = container
            .closest(".preview-section")
            .map_err(js_err)?
            .and_then(|section| section.dyn_into::<HtmlElement>().ok());
        let inner = Rc::new(Inner {
            store: Rc::clone(&store),
            image,
            selection_box,
            dummy_text,
            section,
            gesture: RefCell::new(SelectionGesture::new()),
            overlay: Cell::new(None),
            sample_text: RefCell::new(sample_text.to_string()),
            eyedropper,
        });

        let document = document()?;
        let mut listeners = Vec::new();
        {
            let inner = Rc::clone(&inner);
            listeners.push(EventListener::new(container, "mousedown", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    inner.on_mouse_down(event);
                }
            }));
        }
        {
            let inner = Rc::clone(&inner);
            listeners.push(EventListener::new(container, "mousemove", move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    inner.on_mouse_move(event);
                }
            }));
        }
        {
            let inner = Rc::clone(&inner);
            listeners.push(EventListener::new(&document, "mouseup", move |_| {
                inner.on_mouse_up();
            }));
        }

        let weak = Rc::downgrade(&inner);
        let subscriptions = vec![
            store.subscribe_fn(Topic::Image, {
                let weak = Weak::clone(&weak);
                move |change| {
                    let (Some(inner), Change::Image(Some(image))) = (weak.upgrade(), change) else {
                        return;
                    };
                    inner.show_preview(&image.preview);
                }
            }),
            store.subscribe_fn(Topic::Selection, {
                let weak = Weak::clone(&weak);
                move |_| {
                    if let Some(inner) = weak.upgrade() {
                        inner.refresh();
                    }
                }
            }),
            store.subscribe_fn(Topic::Settings, move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.refresh();
                }
            }),
        ];

        if let Some(image) = store.image() {
            inner.show_preview(&image.preview);
        }

        Ok(Self {
            inner,
            _listeners: listeners,
            _subscriptions: subscriptions,
        })
    }

    pub(crate) fn update_preview(&self) -> Result<(), String> {
        self.inner.update_preview()
    }

    /// Shows a finished selection at the given rendered-space rectangle.
    /// Falls back to treating the numbers as image pixels when the image has
    /// not been laid out yet.
    pub(crate) fn show_selection_at(&self, x: f64, y: f64, width: f64, height: f64) {
        let screen = ScreenRect {
            left: x,
            top: y,
            width,
            height,
        };
        let selection = match image_scale(&self.inner.image) {
            Some(scale) => scale.to_image_rect(screen),
            None => Selection::new(
                x.max(0.0) as u32,
                y.max(0.0) as u32,
                width.max(0.0) as u32,
                height.max(0.0) as u32,
            ),
        };
        self.inner.gesture.borrow_mut().cancel();
        self.inner.apply_frame(SelectionFrame { screen, selection });
    }

    /// Rendered-space rectangle of the visible overlay.
    pub(crate) fn selection_rect(&self) -> Option<ScreenRect> {
        self.inner.overlay.get()
    }

    pub(crate) fn set_sample_text(&self, text: &str) {
        *self.inner.sample_text.borrow_mut() = text.to_string();
        match self.inner.mockup_span() {
            Ok(span) => span.set_text_content(Some(text)),
            Err(err) => gloo::console::warn!("mockup text not updated", err),
        }
    }
}
