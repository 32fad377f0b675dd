use std::rc::Rc;

use gloo::events::EventListener;
use imgtool_core::{
    encode_data_url, validate_image_file, FileMeta, ImageUpload, RequestSequence, StateUpdate,
    Store,
};
use wasm_bindgen::JsCast;
use web_sys::{DataTransfer, DragEvent, Element, File, HtmlElement, HtmlInputElement};

use crate::dom::{alert, js_err, query_in, toggle_class};
use crate::error_handler;

pub(crate) type FileChangeCallback = Rc<dyn Fn(&File, &str)>;

pub(crate) fn file_meta(file: &File) -> FileMeta {
    FileMeta::new(file.name(), file.type_(), file.size().max(0.0) as u64)
}

pub(crate) async fn read_file_bytes(file: &File) -> Result<Vec<u8>, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(js_err)?;
    let array = js_sys::Uint8Array::new(&buffer);
    Ok(array.to_vec())
}

/// Reads the file and resolves to a `data:` URL usable as an image `src`.
pub(crate) async fn create_file_preview(file: &File) -> Result<String, String> {
    let bytes = read_file_bytes(file).await?;
    Ok(encode_data_url(&file.type_(), &bytes))
}

struct Inner {
    store: Rc<Store>,
    input: HtmlInputElement,
    label: Option<HtmlElement>,
    on_file_change: Option<FileChangeCallback>,
    reads: RequestSequence,
}

fn handle_file(inner: &Rc<Inner>, file: File) {
    let meta = file_meta(&file);
    if let Err(err) = validate_image_file(&meta) {
        alert(&err.to_string());
        inner.input.set_value("");
        inner.reads.invalidate();
        return;
    }
    if let Some(label) = &inner.label {
        show_filename(label, &meta.name);
    }
    let ticket = inner.reads.begin();
    let inner = Rc::clone(inner);
    wasm_bindgen_futures::spawn_local(async move {
        let preview = create_file_preview(&file).await;
        if !inner.reads.is_current(ticket) {
            gloo::console::log!("file read superseded", meta.name.clone());
            return;
        }
        match preview {
            Ok(preview) => {
                inner.store.set(StateUpdate::Image(Some(ImageUpload {
                    file: meta,
                    preview: preview.clone(),
                })));
                if let Some(callback) = &inner.on_file_change {
                    callback(&file, &preview);
                }
            }
            Err(err) => error_handler::report("file read failed", err),
        }
    });
}

fn handle_drop(inner: &Rc<Inner>, event: &DragEvent) {
    let Some(file) = event
        .data_transfer()
        .and_then(|transfer| transfer.files())
        .and_then(|files| files.get(0))
    else {
        return;
    };
    let meta = file_meta(&file);
    if let Err(err) = validate_image_file(&meta) {
        alert(&err.to_string());
        return;
    }
    if let Err(err) = copy_into_input(&inner.input, &file) {
        gloo::console::warn!("could not attach dropped file to the form", err);
    }
    handle_file(inner, file);
}

/// Puts a dropped file into the input's `FileList` so the form submits it.
fn copy_into_input(input: &HtmlInputElement, file: &File) -> Result<(), String> {
    let transfer = DataTransfer::new().map_err(js_err)?;
    transfer.items().add_with_file(file).map_err(js_err)?;
    input.set_files(transfer.files().as_ref());
    Ok(())
}

fn show_filename(label: &HtmlElement, name: &str) {
    label.set_inner_html("");
    let Ok(document) = crate::dom::document() else {
        return;
    };
    if let Ok(span) = document.create_element("span") {
        span.set_text_content(Some(name));
        if let Err(err) = label.append_child(&span) {
            gloo::console::warn!("filename not shown", js_err(err));
        }
    }
}

/// Drag-and-drop plus file-input upload area.
pub(crate) struct FileUploader {
    inner: Rc<Inner>,
    _listeners: Vec<EventListener>,
}

impl FileUploader {
    pub(crate) fn mount(
        container: &Element,
        store: Rc<Store>,
        on_file_change: Option<FileChangeCallback>,
    ) -> Result<Self, String> {
        let input: HtmlInputElement = query_in(container, "input[type=file]")?;
        let label: Option<HtmlElement> = query_in(container, ".file-input-label").ok();
        let inner = Rc::new(Inner {
            store,
            input,
            label,
            on_file_change,
            reads: RequestSequence::new(),
        });

        let mut listeners = Vec::new();
        {
            let inner_for_change = Rc::clone(&inner);
            listeners.push(EventListener::new(&inner.input, "change", move |_| {
                let file = inner_for_change
                    .input
                    .files()
                    .and_then(|files| files.get(0));
                if let Some(file) = file {
                    handle_file(&inner_for_change, file);
                }
            }));
        }
        for name in ["dragenter", "dragover"] {
            let area = container.clone();
            listeners.push(EventListener::new(container, name, move |event| {
                stop(event);
                toggle_class(&area, "highlight", true);
            }));
        }
        {
            let area = container.clone();
            listeners.push(EventListener::new(container, "dragleave", move |event| {
                stop(event);
                toggle_class(&area, "highlight", false);
            }));
        }
        {
            let area = container.clone();
            let inner_for_drop = Rc::clone(&inner);
            listeners.push(EventListener::new(container, "drop", move |event| {
                stop(event);
                toggle_class(&area, "highlight", false);
                if let Some(event) = event.dyn_ref::<DragEvent>() {
                    handle_drop(&inner_for_drop, event);
                }
            }));
        }

        Ok(Self {
            inner,
            _listeners: listeners,
        })
    }

    /// The file currently attached to the form, if any.
    pub(crate) fn selected_file(&self) -> Option<File> {
        self.inner.input.files().and_then(|files| files.get(0))
    }
}

fn stop(event: &web_sys::Event) {
    event.prevent_default();
    event.stop_propagation();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use console_error_panic_hook::set_once as set_panic_hook;
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;
    use web_sys::{DragEventInit, FilePropertyBag};

    wasm_bindgen_test_configure!(run_in_browser);

    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
        0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8,
        0xcf, 0xc0, 0xf0, 0x1f, 0x00, 0x05, 0x00, 0x01, 0xff, 0x89, 0x99, 0x3d, 0x1d, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ];

    fn make_file(bytes: &[u8], name: &str, mime: &str) -> File {
        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes));
        let options = FilePropertyBag::new();
        options.set_type(mime);
        File::new_with_u8_array_sequence_and_options(&parts, name, &options).unwrap()
    }

    fn fixture() -> Element {
        let document = crate::dom::document().unwrap();
        let area = document.create_element("div").unwrap();
        area.set_class_name("upload-area");
        area.set_inner_html(
            r#"<input type="file" id="image_file"><label class="file-input-label">Choose</label>"#,
        );
        document.body().unwrap().append_child(&area).unwrap();
        area
    }

    fn drop_event(file: &File) -> DragEvent {
        let transfer = DataTransfer::new().unwrap();
        transfer.items().add_with_file(file).unwrap();
        let init = DragEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_data_transfer(Some(&transfer));
        DragEvent::new_with_event_init_dict("drop", &init).unwrap()
    }

    #[wasm_bindgen_test]
    async fn preview_is_a_data_url() {
        set_panic_hook();
        let file = make_file(PNG_1X1, "dot.png", "image/png");
        let preview = create_file_preview(&file).await.unwrap();
        assert!(preview.starts_with("data:image/png;base64,"));
    }

    #[wasm_bindgen_test]
    async fn dropped_png_populates_the_store() {
        set_panic_hook();
        let area = fixture();
        let store = Store::in_memory();
        let uploader = FileUploader::mount(&area, Rc::clone(&store), None).unwrap();

        let file = make_file(PNG_1X1, "dot.png", "image/png");
        area.dispatch_event(&drop_event(&file)).unwrap();
        TimeoutFuture::new(50).await;

        let image = store.image().expect("image stored");
        assert_eq!(image.file.name, "dot.png");
        assert!(!image.preview.is_empty());
        assert_eq!(uploader.selected_file().map(|file| file.name()), Some("dot.png".to_string()));
        let label = area.query_selector(".file-input-label span").unwrap().unwrap();
        assert_eq!(label.text_content().as_deref(), Some("dot.png"));
        area.remove();
    }

    fn capture_alerts() -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        crate::dom::set_alert_hook(Some(Rc::new(move |message: &str| {
            sink.borrow_mut().push(message.to_string());
        })));
        seen
    }

    #[wasm_bindgen_test]
    async fn dropped_text_file_is_rejected() {
        set_panic_hook();
        let alerts = capture_alerts();
        let area = fixture();
        let store = Store::in_memory();
        let uploader = FileUploader::mount(&area, Rc::clone(&store), None).unwrap();

        let file = make_file(b"hello", "notes.txt", "text/plain");
        area.dispatch_event(&drop_event(&file)).unwrap();
        TimeoutFuture::new(50).await;

        assert!(store.image().is_none());
        assert!(uploader.selected_file().is_none());
        assert_eq!(alerts.borrow().len(), 1);
        assert!(alerts.borrow()[0].starts_with("Invalid file type"));
        assert!(area.query_selector(".file-input-label span").unwrap().is_none());
        crate::dom::set_alert_hook(None);
        area.remove();
    }

    #[wasm_bindgen_test]
    async fn rejected_file_drops_the_pending_read() {
        set_panic_hook();
        let alerts = capture_alerts();
        let area = fixture();
        let store = Store::in_memory();
        let uploader = FileUploader::mount(&area, Rc::clone(&store), None).unwrap();

        handle_file(&uploader.inner, make_file(PNG_1X1, "dot.png", "image/png"));
        handle_file(&uploader.inner, make_file(b"hello", "notes.txt", "text/plain"));
        TimeoutFuture::new(50).await;

        assert!(store.image().is_none());
        assert_eq!(alerts.borrow().len(), 1);
        crate::dom::set_alert_hook(None);
        area.remove();
    }

    #[wasm_bindgen_test]
    fn drag_over_toggles_highlight() {
        set_panic_hook();
        let area = fixture();
        let _uploader = FileUploader::mount(&area, Store::in_memory(), None).unwrap();
        let enter = web_sys::Event::new("dragenter").unwrap();
        area.dispatch_event(&enter).unwrap();
        assert!(area.class_list().contains("highlight"));
        let leave = web_sys::Event::new("dragleave").unwrap();
        area.dispatch_event(&leave).unwrap();
        assert!(!area.class_list().contains("highlight"));
        area.remove();
    }
}
