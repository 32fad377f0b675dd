pub(crate) const STORAGE_KEY: &str = "imgtoolSettings";
pub(crate) const ERROR_TOAST_MS: u32 = 5_000;
pub(crate) const SUCCESS_TOAST_MS: u32 = 3_000;
pub(crate) const TOAST_CONTAINER_ID: &str = "toast-container";
pub(crate) const DEFAULT_SAMPLE_TEXT: &str = "Sample text will appear here";

/// Prefix for server requests; empty means same origin.
pub(crate) fn api_base() -> &'static str {
    let base = option_env!("IMGTOOL_API_BASE")
        .or(option_env!("TRUNK_PUBLIC_IMGTOOL_API_BASE"))
        .unwrap_or("");
    base.trim_end_matches('/')
}

pub(crate) fn sample_text_url(sheet: &str) -> String {
    let encoded = js_sys::encode_uri_component(sheet);
    format!("{}/sample_text/{}", api_base(), String::from(encoded))
}
