mod app;
mod color_sampler;
mod config;
mod dom;
mod error_handler;
mod file_uploader;
mod image_preview;
mod input;
mod sample_text;
mod storage;
mod style_settings;
#[cfg(test)]
mod test_support;
mod toast;

fn main() {
    app::boot();
}
