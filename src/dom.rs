use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Some(err) = error.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    format!("{error:?}")
}

pub(crate) fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "window unavailable".to_string())
}

pub(crate) fn document() -> Result<Document, String> {
    window()?
        .document()
        .ok_or_else(|| "document unavailable".to_string())
}

pub(crate) fn by_id<T: JsCast>(id: &str) -> Result<T, String> {
    let element = document()?
        .get_element_by_id(id)
        .ok_or_else(|| format!("missing #{id}"))?;
    element
        .dyn_into::<T>()
        .map_err(|_| format!("#{id} has an unexpected element type"))
}

pub(crate) fn query_in<T: JsCast>(root: &Element, selector: &str) -> Result<T, String> {
    let element = root
        .query_selector(selector)
        .map_err(js_err)?
        .ok_or_else(|| format!("missing {selector}"))?;
    element
        .dyn_into::<T>()
        .map_err(|_| format!("{selector} has an unexpected element type"))
}

pub(crate) fn query<T: JsCast>(selector: &str) -> Result<T, String> {
    let root = document()?
        .document_element()
        .ok_or_else(|| "document has no root element".to_string())?;
    query_in(&root, selector)
}

pub(crate) fn query_all_in<T: JsCast>(root: &Element, selector: &str) -> Result<Vec<T>, String> {
    let nodes = root.query_selector_all(selector).map_err(js_err)?;
    let mut found = Vec::with_capacity(nodes.length() as usize);
    for index in 0..nodes.length() {
        if let Some(node) = nodes.item(index) {
            if let Ok(element) = node.dyn_into::<T>() {
                found.push(element);
            }
        }
    }
    Ok(found)
}

pub(crate) fn set_style(element: &HtmlElement, name: &str, value: &str) -> Result<(), String> {
    element.style().set_property(name, value).map_err(js_err)
}

pub(crate) fn set_visible(element: &HtmlElement, visible: bool) -> Result<(), String> {
    set_style(element, "display", if visible { "block" } else { "none" })
}

pub(crate) fn is_visible(element: &HtmlElement) -> bool {
    element
        .style()
        .get_property_value("display")
        .map(|value| value != "none" && !value.is_empty())
        .unwrap_or(false)
}

/// Adds or removes one class; a failing `classList` call is logged.
pub(crate) fn toggle_class(element: &Element, class: &str, on: bool) {
    let classes = element.class_list();
    let result = if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if let Err(err) = result {
        gloo::console::warn!("class not updated", class.to_string(), js_err(err));
    }
}

thread_local! {
    static ALERT_HOOK: RefCell<Option<Rc<dyn Fn(&str)>>> = RefCell::new(None);
}

/// Routes `alert` somewhere other than the blocking browser dialog.
#[cfg(test)]
pub(crate) fn set_alert_hook(hook: Option<Rc<dyn Fn(&str)>>) {
    ALERT_HOOK.with(|slot| {
        *slot.borrow_mut() = hook;
    });
}

pub(crate) fn alert(message: &str) {
    let hook = ALERT_HOOK.with(|slot| slot.borrow().clone());
    match hook {
        Some(hook) => hook(message),
        None => gloo::dialogs::alert(message),
    }
}
