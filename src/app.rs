use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use imgtool_core::{
    parse_dimension, validate_submission, Change, ColorTarget, Eyedropper, RequestSequence,
    Selection, SettingUpdate, StateUpdate, Store, StoreHooks, SubmissionError, Subscription,
    Topic,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, File, HtmlElement, HtmlInputElement, HtmlSelectElement, StorageEvent};

use crate::config::{DEFAULT_SAMPLE_TEXT, STORAGE_KEY};
use crate::dom::{by_id, document, query, set_visible, window};
use crate::error_handler::{self, ErrorHandler};
use crate::file_uploader::{file_meta, FileUploader};
use crate::image_preview::ImagePreview;
use crate::sample_text::fetch_sample_text;
use crate::storage::LocalSettingsStorage;
use crate::style_settings::StyleSettings;
use crate::toast;

const SELECTION_INPUTS: [&str; 4] = ["text_x", "text_y", "text_width", "text_height"];

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

/// Starts the app once the document is parsed.
pub(crate) fn boot() {
    let Ok(document) = document() else {
        gloo::console::error!("no document; app not started");
        return;
    };
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| start()).forget();
    } else {
        start();
    }
}

fn start() {
    let sample_text = window_sample_text().unwrap_or_else(|| DEFAULT_SAMPLE_TEXT.to_string());
    match App::init(&sample_text) {
        Ok(app) => {
            APP.with(|slot| {
                *slot.borrow_mut() = Some(app);
            });
            gloo::console::info!("app initialized");
        }
        Err(err) => {
            gloo::console::error!("app init failed", err.clone());
            toast::show_error(format!("Failed to initialize app: {err}"));
        }
    }
}

fn window_sample_text() -> Option<String> {
    let window = window().ok()?;
    js_sys::Reflect::get(&window, &JsValue::from_str("sampleText"))
        .ok()?
        .as_string()
        .filter(|text| !text.is_empty())
}

fn set_window_sample_text(text: &str) {
    let Ok(window) = window() else {
        return;
    };
    let _ = js_sys::Reflect::set(
        &window,
        &JsValue::from_str("sampleText"),
        &JsValue::from_str(text),
    );
}

/// Composition root: owns the store, every component and the page-level
/// listeners. Dropping it detaches everything.
pub(crate) struct App {
    _store: Rc<Store>,
    _errors: Option<ErrorHandler>,
    _uploader: Option<Rc<FileUploader>>,
    _preview: Option<Rc<ImagePreview>>,
    _settings: Option<Rc<StyleSettings>>,
    _listeners: Vec<EventListener>,
    _subscriptions: Vec<Subscription>,
}

impl App {
    pub(crate) fn init(sample_text: &str) -> Result<Self, String> {
        let errors = match ErrorHandler::install() {
            Ok(handler) => Some(handler),
            Err(err) => {
                gloo::console::warn!("global error capture unavailable", err);
                None
            }
        };
        let store = Store::new(
            Box::new(LocalSettingsStorage::new()),
            StoreHooks {
                on_storage_error: Rc::new(|err| {
                    gloo::console::warn!("settings storage failed", err.to_string());
                }),
            },
        );
        let eyedropper = Rc::new(RefCell::new(Eyedropper::new()));
        let mut listeners = Vec::new();
        let mut subscriptions = Vec::new();

        let uploader = match query::<Element>(".upload-area") {
            Ok(area) => Some(Rc::new(FileUploader::mount(
                &area,
                Rc::clone(&store),
                Some(Rc::new(|file: &File, _preview: &str| {
                    gloo::console::log!("file uploaded", file.name());
                })),
            )?)),
            Err(_) => None,
        };

        let preview = match by_id::<Element>("preview-container") {
            Ok(container) => Some(Rc::new(ImagePreview::mount(
                &container,
                Rc::clone(&store),
                sample_text,
                Rc::clone(&eyedropper),
            )?)),
            Err(_) => None,
        };

        let settings = match query::<Element>(".panel-left") {
            Ok(panel) => {
                let mut settings = StyleSettings::mount(&panel, Rc::clone(&store))?;
                for target in ColorTarget::ALL {
                    if let Err(err) = settings.setup_eyedropper(target, &eyedropper) {
                        gloo::console::warn!("eyedropper not installed", err);
                    }
                }
                Some(Rc::new(settings))
            }
            Err(_) => None,
        };

        subscriptions.push(store.subscribe_fn(Topic::Selection, |change| {
            if let Change::Selection(selection) = change {
                write_selection_inputs(*selection);
            }
        }));
        write_selection_inputs(store.selection());

        if let Ok(form) = by_id::<HtmlElement>("imageForm") {
            let uploader = uploader.clone();
            listeners.push(EventListener::new(&form, "submit", move |event| {
                let file = uploader.as_ref().and_then(|uploader| uploader.selected_file());
                if let Err(err) = check_submission(file.as_ref()) {
                    event.prevent_default();
                    toast::show_error(err.to_string());
                }
            }));
        }

        listeners.extend(init_modals()?);
        listeners.push(init_settings_sync(
            Rc::clone(&store),
            settings.clone(),
            preview.clone(),
        )?);

        if let Ok(select) = by_id::<HtmlSelectElement>("sheet_name") {
            listeners.push(init_sheet_selector(
                select,
                Rc::clone(&store),
                preview.clone(),
            ));
        }

        Ok(Self {
            _store: store,
            _errors: errors,
            _uploader: uploader,
            _preview: preview,
            _settings: settings,
            _listeners: listeners,
            _subscriptions: subscriptions,
        })
    }
}

/// Keeps the hidden form fields equal to the current selection.
fn write_selection_inputs(selection: Selection) {
    let values = [
        selection.text_x,
        selection.text_y,
        selection.text_width,
        selection.text_height,
    ];
    for (id, value) in SELECTION_INPUTS.into_iter().zip(values) {
        if let Ok(input) = by_id::<HtmlInputElement>(id) {
            input.set_value(&value.to_string());
        }
    }
}

fn read_selection_input(id: &str) -> u32 {
    by_id::<HtmlInputElement>(id)
        .map(|input| parse_dimension(&input.value()))
        .unwrap_or(0)
}

fn check_submission(file: Option<&File>) -> Result<(), SubmissionError> {
    let meta = file.map(file_meta);
    validate_submission(
        meta.as_ref(),
        read_selection_input("text_width"),
        read_selection_input("text_height"),
    )
}

fn init_modals() -> Result<Vec<EventListener>, String> {
    let Ok(modal) = by_id::<HtmlElement>("helpModal") else {
        return Ok(Vec::new());
    };
    let mut listeners = Vec::new();
    if let Ok(button) = by_id::<HtmlElement>("helpBtn") {
        let modal = modal.clone();
        listeners.push(EventListener::new(&button, "click", move |_| {
            let _ = set_visible(&modal, true);
        }));
    }
    if let Ok(close) = query::<HtmlElement>(".modal-close") {
        let modal = modal.clone();
        listeners.push(EventListener::new(&close, "click", move |_| {
            let _ = set_visible(&modal, false);
        }));
    }
    let window = window()?;
    listeners.push(EventListener::new(&window, "click", move |event| {
        let on_backdrop = event
            .target()
            .and_then(|target| target.dyn_into::<HtmlElement>().ok())
            .is_some_and(|target| target == modal);
        if on_backdrop {
            let _ = set_visible(&modal, false);
        }
    }));
    Ok(listeners)
}

/// Picks up settings saved by another tab of the app.
fn init_settings_sync(
    store: Rc<Store>,
    settings: Option<Rc<StyleSettings>>,
    preview: Option<Rc<ImagePreview>>,
) -> Result<EventListener, String> {
    let window = window()?;
    Ok(EventListener::new(&window, "storage", move |event| {
        let ours = event
            .dyn_ref::<StorageEvent>()
            .and_then(|event| event.key())
            .is_some_and(|key| key == STORAGE_KEY);
        if !ours || store.load_settings().is_empty() {
            return;
        }
        if let Some(settings) = &settings {
            settings.sync_with_state();
        }
        if let Some(preview) = &preview {
            if let Err(err) = preview.update_preview() {
                gloo::console::warn!("preview update failed", err);
            }
        }
        toast::show_success("Settings updated from another tab");
    }))
}

fn init_sheet_selector(
    select: HtmlSelectElement,
    store: Rc<Store>,
    preview: Option<Rc<ImagePreview>>,
) -> EventListener {
    let requests = Rc::new(RequestSequence::new());
    let select_for_cb = select.clone();
    EventListener::new(&select, "change", move |_| {
        let sheet = select_for_cb.value();
        store.set(StateUpdate::Setting(SettingUpdate::SheetName(sheet.clone())));
        let ticket = requests.begin();
        let requests = Rc::clone(&requests);
        let preview = preview.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_sample_text(&sheet).await;
            if !requests.is_current(ticket) {
                return;
            }
            match result {
                Ok(text) => {
                    set_window_sample_text(&text);
                    if let Some(preview) = &preview {
                        preview.set_sample_text(&text);
                        if let Some(rect) = preview.selection_rect() {
                            preview.show_selection_at(rect.left, rect.top, rect.width, rect.height);
                        }
                    }
                }
                Err(err) => error_handler::report(
                    "sample text fetch failed",
                    format!("Failed to fetch sample text: {err}"),
                ),
            }
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_error_panic_hook::set_once as set_panic_hook;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn form_fixture() -> Element {
        let document = document().unwrap();
        let form = document.create_element("div").unwrap();
        form.set_inner_html(
            r#"<input type="file" id="image_file">
               <input type="hidden" id="text_x" value="0">
               <input type="hidden" id="text_y" value="0">
               <input type="hidden" id="text_width" value="0">
               <input type="hidden" id="text_height" value="0">"#,
        );
        document.body().unwrap().append_child(&form).unwrap();
        form
    }

    #[wasm_bindgen_test]
    fn hidden_inputs_mirror_selection() {
        set_panic_hook();
        let form = form_fixture();
        write_selection_inputs(Selection::new(5, 6, 70, 80));
        let width: HtmlInputElement = by_id("text_width").unwrap();
        let y: HtmlInputElement = by_id("text_y").unwrap();
        assert_eq!(width.value(), "70");
        assert_eq!(y.value(), "6");
        assert_eq!(read_selection_input("text_height"), 80);
        form.remove();
    }

    #[wasm_bindgen_test]
    fn submission_without_file_is_vetoed() {
        set_panic_hook();
        let form = form_fixture();
        write_selection_inputs(Selection::new(0, 0, 10, 10));
        assert_eq!(check_submission(None), Err(SubmissionError::NoFile));
        form.remove();
    }

    #[wasm_bindgen_test]
    fn submission_without_area_is_vetoed() {
        set_panic_hook();
        let form = form_fixture();
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(&[1u8, 2, 3][..]));
        let options = web_sys::FilePropertyBag::new();
        options.set_type("image/png");
        let file =
            File::new_with_u8_array_sequence_and_options(&parts, "card.png", &options).unwrap();
        write_selection_inputs(Selection::new(4, 4, 0, 30));
        assert_eq!(check_submission(Some(&file)), Err(SubmissionError::NoSelection));
        write_selection_inputs(Selection::new(4, 4, 20, 30));
        assert_eq!(check_submission(Some(&file)), Ok(()));
        form.remove();
    }

    #[wasm_bindgen_test]
    fn garbage_dimension_reads_as_zero() {
        set_panic_hook();
        let form = form_fixture();
        let width: HtmlInputElement = by_id("text_width").unwrap();
        width.set_value("wide");
        assert_eq!(read_selection_input("text_width"), 0);
        assert_eq!(read_selection_input("missing_input"), 0);
        form.remove();
    }
}
