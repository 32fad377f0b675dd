use imgtool_core::{
    Alignment, SettingUpdate, SettingValue, Settings, SettingsError, SettingsField,
    DEFAULT_FONT_FILE,
};
use serde_json::json;

#[test]
fn defaults_match_the_form() {
    let settings = Settings::default();
    assert_eq!(settings.base_name, "image");
    assert_eq!(settings.start_number, 1);
    assert_eq!(settings.start_row, 1);
    assert_eq!(settings.sheet_name, "Sheet1");
    assert_eq!(settings.font_name, DEFAULT_FONT_FILE);
    assert_eq!(settings.font_size, 24);
    assert_eq!(settings.font_color, "#ffffff");
    assert!(!settings.text_background);
    assert_eq!(settings.text_background_color, "#000000");
    assert_eq!(settings.bg_vertical_padding, 10);
    assert_eq!(settings.bg_horizontal_padding, 20);
    assert_eq!(settings.bg_corner_radius, 5);
    assert_eq!(settings.alignment, Alignment::Center);
}

#[test]
fn json_uses_camel_case_keys() {
    let blob = Settings::default().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    for field in SettingsField::ALL {
        assert!(value.get(field.key()).is_some(), "missing {}", field.key());
    }
    assert_eq!(value["alignment"], json!("center"));
}

#[test]
fn field_keys_round_trip() {
    for field in SettingsField::ALL {
        assert_eq!(SettingsField::from_key(field.key()), Some(field));
    }
    assert_eq!(SettingsField::from_key("nope"), None);
    assert_eq!(SettingsField::FontSize.to_string(), "settings.fontSize");
}

#[test]
fn apply_and_get_agree() {
    let mut settings = Settings::default();
    let update = SettingUpdate::SheetName("Q3".to_string());
    assert_eq!(update.field(), SettingsField::SheetName);
    settings.apply(update.clone());
    assert_eq!(settings.get(SettingsField::SheetName), update.value());
    assert_eq!(
        settings.get(SettingsField::TextBackground),
        SettingValue::Flag(false)
    );
}

#[test]
fn decode_rejects_mistyped_values() {
    assert_eq!(SettingsField::FontSize.decode(&json!("big")), None);
    assert_eq!(SettingsField::FontSize.decode(&json!(-3)), None);
    assert_eq!(SettingsField::TextBackground.decode(&json!(1)), None);
    assert_eq!(SettingsField::Alignment.decode(&json!("justify")), None);
    assert_eq!(
        SettingsField::Alignment.decode(&json!("LEFT")),
        Some(SettingUpdate::Alignment(Alignment::Left))
    );
    assert_eq!(
        SettingsField::StartRow.decode(&json!(3)),
        Some(SettingUpdate::StartRow(3))
    );
}

#[test]
fn merge_overwrites_known_fields_only() {
    let mut settings = Settings::default();
    let applied = settings
        .merge_persisted(r#"{"baseName":"promo","fontSize":"x","extra":true}"#)
        .unwrap();
    assert_eq!(applied, vec![SettingsField::BaseName]);
    assert_eq!(settings.base_name, "promo");
    assert_eq!(settings.font_size, 24);
}

#[test]
fn merge_of_empty_blob_changes_nothing() {
    let mut settings = Settings::default();
    assert!(settings.merge_persisted("   ").unwrap().is_empty());
    assert!(settings.merge_persisted("{}").unwrap().is_empty());
    assert_eq!(settings, Settings::default());
}

#[test]
fn merge_reports_bad_blobs() {
    assert!(matches!(
        Settings::merged_over_defaults("{oops"),
        Err(SettingsError::Malformed(_))
    ));
    assert_eq!(
        Settings::merged_over_defaults("[1,2]"),
        Err(SettingsError::NotAnObject)
    );
}

#[test]
fn alignment_parse_is_case_insensitive() {
    assert_eq!(Alignment::parse(" Right "), Some(Alignment::Right));
    assert_eq!(Alignment::parse("middle"), None);
    assert_eq!(Alignment::Left.to_string(), "left");
}
