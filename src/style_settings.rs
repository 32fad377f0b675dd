use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use imgtool_core::{
    normalize_hex_input, Alignment, ColorTarget, Eyedropper, EyedropperTransition, PickedColor,
    SettingUpdate, Settings, StateUpdate, Store, Subscription, Topic,
};
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlButtonElement, HtmlElement, HtmlImageElement, HtmlInputElement,
    HtmlSelectElement, KeyboardEvent, MouseEvent,
};

use crate::color_sampler;
use crate::dom::{
    alert, by_id, document, js_err, query_all_in, query_in, set_style, set_visible, toggle_class,
};
use crate::error_handler;

const EYEDROPPER_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M19 11L14 16M9 21L5 17M21 9l-9 9M9 3L3 9L12 18L18 12L9 3z"/></svg>"#;

/// A slider and a number box bound to the same integer setting.
struct LinkedRange {
    range: HtmlInputElement,
    number: HtmlInputElement,
    read: fn(&Settings) -> u32,
    write: fn(u32) -> SettingUpdate,
}

/// A colour picker and its hex text field.
struct ColorPair {
    target: ColorTarget,
    picker: HtmlInputElement,
    hex: HtmlInputElement,
}

impl ColorPair {
    fn show(&self, hex: &str) {
        self.picker.set_value(hex);
        self.hex.set_value(hex);
    }
}

fn color_ids(target: ColorTarget) -> (&'static str, &'static str) {
    match target {
        ColorTarget::FontColor => ("font_color", "font_color_hex"),
        ColorTarget::TextBackgroundColor => ("text_background_color", "text_background_color_hex"),
    }
}

fn color_value(settings: &Settings, target: ColorTarget) -> &str {
    match target {
        ColorTarget::FontColor => &settings.font_color,
        ColorTarget::TextBackgroundColor => &settings.text_background_color,
    }
}

struct Controls {
    font_select: Option<HtmlSelectElement>,
    base_name: Option<HtmlInputElement>,
    start_number: Option<HtmlInputElement>,
    start_row: Option<HtmlInputElement>,
    ranges: Vec<LinkedRange>,
    colors: Vec<ColorPair>,
    alignment_buttons: Vec<HtmlElement>,
    alignment_input: Option<HtmlInputElement>,
    text_background: Option<HtmlInputElement>,
    background_settings: Option<HtmlElement>,
}

impl Controls {
    fn find(container: &Element) -> Result<Self, String> {
        let range = |range_id: &str,
                     number_id: &str,
                     read: fn(&Settings) -> u32,
                     write: fn(u32) -> SettingUpdate| {
            let range = query_in(container, &format!("#{range_id}")).ok()?;
            let number = query_in(container, &format!("#{number_id}")).ok()?;
            Some(LinkedRange {
                range,
                number,
                read,
                write,
            })
        };
        let ranges = [
            range(
                "font_size",
                "font_size_number",
                |settings| settings.font_size,
                SettingUpdate::FontSize,
            ),
            range(
                "bg_vertical_padding",
                "bg_vertical_padding_number",
                |settings| settings.bg_vertical_padding,
                SettingUpdate::BgVerticalPadding,
            ),
            range(
                "bg_horizontal_padding",
                "bg_horizontal_padding_number",
                |settings| settings.bg_horizontal_padding,
                SettingUpdate::BgHorizontalPadding,
            ),
            range(
                "bg_corner_radius",
                "bg_corner_radius_number",
                |settings| settings.bg_corner_radius,
                SettingUpdate::BgCornerRadius,
            ),
        ]
        .into_iter()
        .flatten()
        .collect();
        let colors = ColorTarget::ALL
            .into_iter()
            .filter_map(|target| {
                let (picker_id, hex_id) = color_ids(target);
                Some(ColorPair {
                    target,
                    picker: query_in(container, &format!("#{picker_id}")).ok()?,
                    hex: query_in(container, &format!("#{hex_id}")).ok()?,
                })
            })
            .collect();
        Ok(Self {
            font_select: query_in(container, "#font_name").ok(),
            base_name: query_in(container, "#baseName").ok(),
            start_number: query_in(container, "#startNumber").ok(),
            start_row: query_in(container, "#startRow").ok(),
            ranges,
            colors,
            alignment_buttons: query_all_in(container, ".alignment-buttons button[data-align]")?,
            alignment_input: query_in(container, "#alignment").ok(),
            text_background: query_in(container, "#text_background").ok(),
            background_settings: query_in(container, "#background-settings").ok(),
        })
    }

    fn color(&self, target: ColorTarget) -> Option<&ColorPair> {
        self.colors.iter().find(|pair| pair.target == target)
    }

    fn sync(&self, settings: &Settings) {
        if let Some(select) = &self.font_select {
            select.set_value(&settings.font_name);
        }
        for pair in &self.ranges {
            let value = (pair.read)(settings).to_string();
            pair.range.set_value(&value);
            pair.number.set_value(&value);
        }
        for pair in &self.colors {
            pair.show(color_value(settings, pair.target));
        }
        if let Some(input) = &self.alignment_input {
            input.set_value(settings.alignment.as_str());
        }
        self.mark_alignment(settings.alignment);
        if let Some(toggle) = &self.text_background {
            toggle.set_checked(settings.text_background);
        }
        self.show_background_settings(settings.text_background);
        if let Some(input) = &self.base_name {
            input.set_value(&settings.base_name);
        }
        if let Some(input) = &self.start_number {
            input.set_value(&settings.start_number.to_string());
        }
        if let Some(input) = &self.start_row {
            input.set_value(&settings.start_row.to_string());
        }
    }

    fn mark_alignment(&self, alignment: Alignment) {
        for button in &self.alignment_buttons {
            toggle_class(button, "active", button_alignment(button) == Some(alignment));
        }
    }

    fn show_background_settings(&self, visible: bool) {
        if let Some(panel) = &self.background_settings {
            if let Err(err) = set_visible(panel, visible) {
                gloo::console::warn!("background settings not toggled", err);
            }
        }
    }
}

fn button_alignment(button: &HtmlElement) -> Option<Alignment> {
    button
        .dataset()
        .get("align")
        .and_then(|value| Alignment::parse(&value))
}

/// Positive integer from a form field; anything else falls back to 1.
fn parse_counter(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|value| *value > 0)
        .unwrap_or(1)
}

struct EyedropperView {
    store: Rc<Store>,
    eyedropper: Rc<RefCell<Eyedropper>>,
    container: HtmlElement,
    image: HtmlImageElement,
    buttons: RefCell<Vec<(ColorTarget, HtmlButtonElement)>>,
}

impl EyedropperView {
    fn button(&self, target: ColorTarget) -> Option<HtmlButtonElement> {
        self.buttons
            .borrow()
            .iter()
            .find(|(candidate, _)| *candidate == target)
            .map(|(_, button)| button.clone())
    }

    fn set_button_active(&self, target: ColorTarget, active: bool) {
        if let Some(button) = self.button(target) {
            toggle_class(&button, "active", active);
        }
    }

    fn enter_mode(&self, target: ColorTarget) {
        toggle_class(&self.container, "eyedropper-mode", true);
        self.set_button_active(target, true);
        if let Err(err) = set_style(&self.image, "cursor", "crosshair") {
            gloo::console::warn!("eyedropper cursor not set", err);
        }
    }

    fn exit_mode(&self) {
        toggle_class(&self.container, "eyedropper-mode", false);
        for target in ColorTarget::ALL {
            self.set_button_active(target, false);
        }
        if let Err(err) = self.image.style().remove_property("cursor") {
            gloo::console::warn!("eyedropper cursor not reset", js_err(err));
        }
    }

    fn toggle(&self, target: ColorTarget) {
        let result = self
            .eyedropper
            .borrow_mut()
            .toggle(target, self.store.has_image());
        match result {
            Ok(EyedropperTransition::Entered(target)) => self.enter_mode(target),
            Ok(EyedropperTransition::Retargeted { from, to }) => {
                self.set_button_active(from, false);
                self.set_button_active(to, true);
            }
            Ok(EyedropperTransition::Cancelled(_)) => self.exit_mode(),
            Err(err) => {
                self.exit_mode();
                alert(&err.to_string());
            }
        }
    }

    fn cancel(&self) {
        let cancelled = self.eyedropper.borrow_mut().cancel();
        if cancelled.is_some() {
            self.exit_mode();
        }
    }

    /// Samples the clicked pixel for the awaiting target.
    fn pick(&self, event: &MouseEvent) -> Option<PickedColor> {
        if !self.eyedropper.borrow().is_active() {
            return None;
        }
        event.prevent_default();
        let rgba = match color_sampler::sample_at_event(&self.image, event) {
            Ok(rgba) => rgba,
            Err(err) => {
                self.cancel();
                error_handler::report("color pick failed", format!("Could not read color: {err}"));
                return None;
            }
        };
        let picked = self.eyedropper.borrow_mut().pick(&rgba);
        self.exit_mode();
        picked
    }
}

/// Settings panel: binds every control to the store and keeps them in sync.
pub(crate) struct StyleSettings {
    store: Rc<Store>,
    controls: Rc<Controls>,
    eyedropper: Option<Rc<EyedropperView>>,
    listeners: Vec<EventListener>,
    _subscription: Subscription,
}

impl StyleSettings {
    pub(crate) fn mount(container: &Element, store: Rc<Store>) -> Result<Self, String> {
        let controls = Rc::new(Controls::find(container)?);
        controls.sync(&store.settings());

        let mut listeners = Vec::new();
        if let Some(select) = &controls.font_select {
            let store = Rc::clone(&store);
            let select_for_cb = select.clone();
            listeners.push(EventListener::new(select, "change", move |_| {
                store.set(StateUpdate::Setting(SettingUpdate::FontName(
                    select_for_cb.value(),
                )));
            }));
        }
        for (index, pair) in controls.ranges.iter().enumerate() {
            for from_range in [true, false] {
                let source = if from_range { &pair.range } else { &pair.number };
                let store = Rc::clone(&store);
                let controls = Rc::clone(&controls);
                listeners.push(EventListener::new(source, "input", move |_| {
                    let pair = &controls.ranges[index];
                    let (source, partner) = if from_range {
                        (&pair.range, &pair.number)
                    } else {
                        (&pair.number, &pair.range)
                    };
                    let value = source.value();
                    partner.set_value(&value);
                    if let Ok(parsed) = value.trim().parse::<u32>() {
                        store.set(StateUpdate::Setting((pair.write)(parsed)));
                    }
                }));
            }
        }
        for (index, pair) in controls.colors.iter().enumerate() {
            {
                let store = Rc::clone(&store);
                let controls = Rc::clone(&controls);
                listeners.push(EventListener::new(&pair.picker, "input", move |_| {
                    let pair = &controls.colors[index];
                    let value = pair.picker.value();
                    pair.hex.set_value(&value);
                    store.set(StateUpdate::Setting(pair.target.update(value)));
                }));
            }
            {
                let store = Rc::clone(&store);
                let controls = Rc::clone(&controls);
                listeners.push(EventListener::new(&pair.hex, "input", move |_| {
                    let pair = &controls.colors[index];
                    if let Some(hex) = normalize_hex_input(&pair.hex.value()) {
                        pair.show(&hex);
                        store.set(StateUpdate::Setting(pair.target.update(hex)));
                    }
                }));
            }
        }
        for button in &controls.alignment_buttons {
            let store = Rc::clone(&store);
            let controls = Rc::clone(&controls);
            let button_for_cb = button.clone();
            listeners.push(EventListener::new(button, "click", move |_| {
                let Some(alignment) = button_alignment(&button_for_cb) else {
                    return;
                };
                controls.mark_alignment(alignment);
                if let Some(input) = &controls.alignment_input {
                    input.set_value(alignment.as_str());
                }
                store.set(StateUpdate::Setting(SettingUpdate::Alignment(alignment)));
            }));
        }
        if let Some(toggle) = &controls.text_background {
            let store = Rc::clone(&store);
            let controls = Rc::clone(&controls);
            let toggle_for_cb = toggle.clone();
            listeners.push(EventListener::new(toggle, "change", move |_| {
                let checked = toggle_for_cb.checked();
                controls.show_background_settings(checked);
                store.set(StateUpdate::Setting(SettingUpdate::TextBackground(checked)));
            }));
        }
        if let Some(input) = &controls.base_name {
            let store = Rc::clone(&store);
            let input_for_cb = input.clone();
            listeners.push(EventListener::new(input, "input", move |_| {
                store.set(StateUpdate::Setting(SettingUpdate::BaseName(
                    input_for_cb.value(),
                )));
            }));
        }
        let counters: [(&Option<HtmlInputElement>, fn(u32) -> SettingUpdate); 2] = [
            (&controls.start_number, SettingUpdate::StartNumber),
            (&controls.start_row, SettingUpdate::StartRow),
        ];
        for (input, write) in counters {
            let Some(input) = input else {
                continue;
            };
            let store = Rc::clone(&store);
            let input_for_cb = input.clone();
            listeners.push(EventListener::new(input, "change", move |_| {
                store.set(StateUpdate::Setting(write(parse_counter(
                    &input_for_cb.value(),
                ))));
            }));
        }

        let subscription = {
            let controls = Rc::clone(&controls);
            store.subscribe_fn(Topic::Settings, move |change| {
                if let imgtool_core::Change::Settings(settings) = change {
                    controls.sync(settings);
                }
            })
        };

        Ok(Self {
            store,
            controls,
            eyedropper: None,
            listeners,
            _subscription: subscription,
        })
    }

    pub(crate) fn sync_with_state(&self) {
        self.controls.sync(&self.store.settings());
    }

    /// Adds an eyedropper button after the hex field of `target` and wires the
    /// preview image as the pick surface. The first call installs the shared
    /// click and Escape handlers.
    pub(crate) fn setup_eyedropper(
        &mut self,
        target: ColorTarget,
        eyedropper: &Rc<RefCell<Eyedropper>>,
    ) -> Result<(), String> {
        let Some(pair) = self.controls.color(target) else {
            return Err(format!("no colour controls for {}", target.field()));
        };
        let hex = pair.hex.clone();
        let view = match &self.eyedropper {
            Some(view) => Rc::clone(view),
            None => {
                let view = Rc::new(EyedropperView {
                    store: Rc::clone(&self.store),
                    eyedropper: Rc::clone(eyedropper),
                    container: by_id("preview-container")?,
                    image: by_id("preview-image")?,
                    buttons: RefCell::new(Vec::new()),
                });
                self.install_pick_handlers(&view)?;
                self.eyedropper = Some(Rc::clone(&view));
                view
            }
        };

        let button = document()?
            .create_element("button")
            .map_err(js_err)?
            .dyn_into::<HtmlButtonElement>()
            .map_err(|_| "eyedropper button is not a button".to_string())?;
        button.set_type("button");
        button.set_class_name("btn btn-icon eyedropper-btn");
        button.set_title("Pick color from image");
        button.set_inner_html(EYEDROPPER_ICON);
        hex.insert_adjacent_element("afterend", &button)
            .map_err(js_err)?;
        view.buttons.borrow_mut().push((target, button.clone()));

        let view_for_cb = Rc::clone(&view);
        self.listeners
            .push(EventListener::new(&button, "click", move |_| {
                view_for_cb.toggle(target);
            }));
        Ok(())
    }

    fn install_pick_handlers(&mut self, view: &Rc<EyedropperView>) -> Result<(), String> {
        {
            let image = view.image.clone();
            let view = Rc::clone(view);
            let store = Rc::clone(&self.store);
            let controls = Rc::clone(&self.controls);
            self.listeners
                .push(EventListener::new(&image, "click", move |event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let Some(picked) = view.pick(event) else {
                        return;
                    };
                    if let Some(pair) = controls.color(picked.target) {
                        pair.show(&picked.hex);
                    }
                    store.set(StateUpdate::Setting(picked.into_update()));
                }));
        }
        {
            let view = Rc::clone(view);
            let document = document()?;
            self.listeners
                .push(EventListener::new(&document, "keydown", move |event| {
                    let is_escape = event
                        .dyn_ref::<KeyboardEvent>()
                        .is_some_and(|event| event.key() == "Escape");
                    if is_escape {
                        view.cancel();
                    }
                }));
        }
        Ok(())
    }
}
