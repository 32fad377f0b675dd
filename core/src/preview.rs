use crate::catalog::font_family;
use crate::settings::Settings;

const FALLBACK_FAMILY: &str = "sans-serif";

/// CSS applied to the mockup text inside the selection overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewStyle {
    pub text_align: String,
    pub color: String,
    pub font_size: String,
    pub font_family: String,
    pub background_color: String,
    pub padding: String,
    pub border_radius: String,
}

impl PreviewStyle {
    pub fn from_settings(settings: &Settings) -> Self {
        let family = font_family(&settings.font_name);
        let (background_color, padding, border_radius) = if settings.text_background {
            (
                settings.text_background_color.clone(),
                format!(
                    "{}px {}px",
                    settings.bg_vertical_padding, settings.bg_horizontal_padding
                ),
                format!("{}px", settings.bg_corner_radius),
            )
        } else {
            ("transparent".to_string(), "0".to_string(), "0".to_string())
        };
        Self {
            text_align: settings.alignment.as_str().to_string(),
            color: settings.font_color.clone(),
            font_size: format!("{}px", settings.font_size),
            font_family: format!("\"{family}\", {FALLBACK_FAMILY}"),
            background_color,
            padding,
            border_radius,
        }
    }

    pub fn declarations(&self) -> [(&'static str, &str); 7] {
        [
            ("text-align", self.text_align.as_str()),
            ("color", self.color.as_str()),
            ("font-size", self.font_size.as_str()),
            ("font-family", self.font_family.as_str()),
            ("background-color", self.background_color.as_str()),
            ("padding", self.padding.as_str()),
            ("border-radius", self.border_radius.as_str()),
        ]
    }
}
