use std::panic;

use gloo::events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{ErrorEvent, PromiseRejectionEvent};

use crate::dom::{js_err, window};
use crate::toast;

const PANIC_MESSAGE: &str = "Error: internal failure, see console";
const REJECTION_FALLBACK: &str = "Promise rejected";

/// Owns the global listeners; dropping it detaches them.
pub(crate) struct ErrorHandler {
    _error: EventListener,
    _rejection: EventListener,
}

impl ErrorHandler {
    pub(crate) fn install() -> Result<Self, String> {
        install_panic_hook();
        let window = window()?;
        let error = EventListener::new(&window, "error", |event| {
            let detail = event
                .dyn_ref::<ErrorEvent>()
                .map(|event| event.message())
                .unwrap_or_default();
            gloo::console::error!("uncaught error", detail.clone());
            toast::show_error(format!("Error: {detail}"));
        });
        let rejection = EventListener::new(&window, "unhandledrejection", |event| {
            let reason = event
                .dyn_ref::<PromiseRejectionEvent>()
                .map(|event| rejection_message(event.reason()))
                .unwrap_or_else(|| REJECTION_FALLBACK.to_string());
            gloo::console::error!("unhandled rejection", reason.clone());
            toast::show_error(format!("Async Error: {reason}"));
        });
        Ok(Self {
            _error: error,
            _rejection: rejection,
        })
    }
}

fn install_panic_hook() {
    console_error_panic_hook::set_once();
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        previous(info);
        toast::show_error(PANIC_MESSAGE);
    }));
}

fn rejection_message(reason: JsValue) -> String {
    if reason.is_undefined() || reason.is_null() {
        return REJECTION_FALLBACK.to_string();
    }
    let message = js_err(reason);
    if message.is_empty() {
        REJECTION_FALLBACK.to_string()
    } else {
        message
    }
}

/// Logs a failed operation and tells the user.
pub(crate) fn report(context: &str, err: impl std::fmt::Display) {
    let message = err.to_string();
    gloo::console::error!(context.to_string(), message.clone());
    toast::show_error(message);
}
