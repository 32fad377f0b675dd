use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use yew::prelude::*;

use crate::config::{ERROR_TOAST_MS, SUCCESS_TOAST_MS, TOAST_CONTAINER_ID};
use crate::dom::{document, js_err};

const CONTAINER_STYLE: &str = "position: fixed; bottom: 20px; right: 20px; z-index: 9999;";
const ERROR_BACKGROUND: &str = "#f44336";
const SUCCESS_BACKGROUND: &str = "#4CAF50";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Error,
    Success,
}

impl ToastKind {
    fn duration_ms(self) -> u32 {
        match self {
            ToastKind::Error => ERROR_TOAST_MS,
            ToastKind::Success => SUCCESS_TOAST_MS,
        }
    }

    fn class(self) -> &'static str {
        match self {
            ToastKind::Error => "error-toast",
            ToastKind::Success => "success-toast",
        }
    }

    fn background(self) -> &'static str {
        match self {
            ToastKind::Error => ERROR_BACKGROUND,
            ToastKind::Success => SUCCESS_BACKGROUND,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

thread_local! {
    static TOASTS: RefCell<Vec<Toast>> = RefCell::new(Vec::new());
    static TOAST_HOOK: RefCell<Option<Rc<dyn Fn(Vec<Toast>)>>> = RefCell::new(None);
    static NEXT_TOAST_ID: Cell<u64> = Cell::new(1);
    static HOST: RefCell<Option<yew::AppHandle<ToastHost>>> = RefCell::new(None);
}

pub(crate) fn show_error(message: impl Into<String>) {
    push(ToastKind::Error, message.into());
}

pub(crate) fn show_success(message: impl Into<String>) {
    push(ToastKind::Success, message.into());
}

pub(crate) fn dismiss(id: u64) {
    let changed = TOASTS.with(|toasts| {
        let mut toasts = toasts.borrow_mut();
        let before = toasts.len();
        toasts.retain(|toast| toast.id != id);
        toasts.len() != before
    });
    if changed {
        publish();
    }
}

pub(crate) fn current_toasts() -> Vec<Toast> {
    TOASTS.with(|toasts| toasts.borrow().clone())
}

fn push(kind: ToastKind, message: String) {
    if let Err(err) = ensure_host() {
        gloo::console::error!("toast host unavailable", err, message.clone());
    }
    let id = NEXT_TOAST_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });
    TOASTS.with(|toasts| {
        toasts.borrow_mut().push(Toast { id, kind, message });
    });
    publish();
    Timeout::new(kind.duration_ms(), move || dismiss(id)).forget();
}

fn set_toast_hook(hook: Option<Rc<dyn Fn(Vec<Toast>)>>) {
    TOAST_HOOK.with(|slot| {
        *slot.borrow_mut() = hook.clone();
    });
    if let Some(hook) = hook {
        hook(current_toasts());
    }
}

fn publish() {
    let hook = TOAST_HOOK.with(|slot| slot.borrow().clone());
    if let Some(hook) = hook {
        hook(current_toasts());
    }
}

/// Mounts the toast host into `#toast-container`, creating the container when
/// the page does not provide one.
fn ensure_host() -> Result<(), String> {
    if HOST.with(|host| host.borrow().is_some()) {
        return Ok(());
    }
    let document = document()?;
    let container = match document.get_element_by_id(TOAST_CONTAINER_ID) {
        Some(container) => container,
        None => {
            let container = document.create_element("div").map_err(js_err)?;
            container.set_id(TOAST_CONTAINER_ID);
            container
                .set_attribute("style", CONTAINER_STYLE)
                .map_err(js_err)?;
            let body = document
                .body()
                .ok_or_else(|| "document has no body".to_string())?;
            body.append_child(&container).map_err(js_err)?;
            container
        }
    };
    let handle = yew::Renderer::<ToastHost>::with_root(container).render();
    HOST.with(|host| {
        *host.borrow_mut() = Some(handle);
    });
    Ok(())
}

#[function_component]
pub(crate) fn ToastHost() -> Html {
    let toasts = use_state(current_toasts);
    {
        let toasts = toasts.clone();
        use_effect_with((), move |_| {
            set_toast_hook(Some(Rc::new(move |items: Vec<Toast>| toasts.set(items))));
            move || set_toast_hook(None)
        });
    }
    html! {
        <>
            { for toasts.iter().map(|toast| html! { <ToastView toast={toast.clone()} /> }) }
        </>
    }
}

#[derive(Properties, PartialEq)]
struct ToastViewProps {
    toast: Toast,
}

#[function_component]
fn ToastView(props: &ToastViewProps) -> Html {
    let toast = &props.toast;
    let style = format!(
        "background-color: {}; color: white; padding: 12px 16px; border-radius: 4px; \
         margin-top: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.2); min-width: 250px; \
         max-width: 400px; word-break: break-word;",
        toast.kind.background()
    );
    let close = (toast.kind == ToastKind::Error).then(|| {
        let id = toast.id;
        let onclick = Callback::from(move |_: MouseEvent| dismiss(id));
        html! {
            <button class="toast-close" type="button" aria-label="Close" {onclick}
                style="float: right; background: none; border: none; color: white; font-size: 20px; cursor: pointer; margin-left: 10px; margin-right: -8px; margin-top: -4px;">
                { "\u{00d7}" }
            </button>
        }
    });
    html! {
        <div class={toast.kind.class()} role="alert" style={style}>
            { for close }
            { toast.message.clone() }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn dismiss_removes_only_the_named_toast() {
        show_error("first");
        show_success("second");
        let toasts = current_toasts();
        let first = toasts
            .iter()
            .find(|toast| toast.message == "first")
            .map(|toast| toast.id)
            .unwrap();
        dismiss(first);
        let remaining = current_toasts();
        assert!(remaining.iter().all(|toast| toast.id != first));
        assert!(remaining
            .iter()
            .any(|toast| toast.message == "second" && toast.kind == ToastKind::Success));
    }

    #[wasm_bindgen_test]
    fn host_container_is_created_on_demand() {
        show_success("hello");
        let container = document()
            .unwrap()
            .get_element_by_id(TOAST_CONTAINER_ID);
        assert!(container.is_some());
    }
}
