use imgtool_core::{
    font_by_file, font_family, Alignment, PreviewStyle, RequestSequence, Settings,
    DEFAULT_FONT_FILE, FONT_CATALOG,
};

#[test]
fn catalog_contains_the_default_font() {
    assert!(!FONT_CATALOG.is_empty());
    assert!(font_by_file(DEFAULT_FONT_FILE).is_some());
    assert!(font_by_file("missing.ttf").is_none());
}

#[test]
fn family_strips_font_extension() {
    assert_eq!(font_family("ProximaNova-Bold.ttf"), "ProximaNova-Bold");
    assert_eq!(font_family("Foo.OTF"), "Foo");
    assert_eq!(font_family("Bare"), "Bare");
}

#[test]
fn style_without_background_is_transparent() {
    let mut settings = Settings::default();
    settings.font_name = "Montserrat-Black.ttf".to_string();
    settings.alignment = Alignment::Left;
    let style = PreviewStyle::from_settings(&settings);
    assert_eq!(style.text_align, "left");
    assert_eq!(style.font_size, "24px");
    assert_eq!(style.font_family, "\"Montserrat-Black\", sans-serif");
    assert_eq!(style.background_color, "transparent");
    assert_eq!(style.padding, "0");
    assert_eq!(style.border_radius, "0");
}

#[test]
fn style_with_background_uses_padding_and_radius() {
    let mut settings = Settings::default();
    settings.text_background = true;
    settings.text_background_color = "#112233".to_string();
    let style = PreviewStyle::from_settings(&settings);
    assert_eq!(style.background_color, "#112233");
    assert_eq!(style.padding, "10px 20px");
    assert_eq!(style.border_radius, "5px");
    assert!(style
        .declarations()
        .iter()
        .any(|(name, value)| *name == "color" && *value == "#ffffff"));
}

#[test]
fn only_latest_request_is_current() {
    let requests = RequestSequence::new();
    let first = requests.begin();
    let second = requests.begin();
    assert!(!requests.is_current(first));
    assert!(requests.is_current(second));
    requests.invalidate();
    assert!(!requests.is_current(second));
}
