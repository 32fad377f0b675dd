use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::DEFAULT_FONT_FILE;

pub const DEFAULT_BASE_NAME: &str = "image";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_FONT_SIZE: u32 = 24;
pub const DEFAULT_FONT_COLOR: &str = "#ffffff";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#000000";
pub const DEFAULT_BG_VERTICAL_PADDING: u32 = 10;
pub const DEFAULT_BG_HORIZONTAL_PADDING: u32 = 20;
pub const DEFAULT_BG_CORNER_RADIUS: u32 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    pub const ALL: [Alignment; 3] = [Alignment::Left, Alignment::Center, Alignment::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|alignment| alignment.as_str().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Styling and output options; serialized with the same camelCase keys the
/// rendering form and the persisted blob use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub base_name: String,
    pub start_number: u32,
    pub start_row: u32,
    pub sheet_name: String,
    pub font_name: String,
    pub font_size: u32,
    pub font_color: String,
    pub text_background: bool,
    pub text_background_color: String,
    pub bg_vertical_padding: u32,
    pub bg_horizontal_padding: u32,
    pub bg_corner_radius: u32,
    pub alignment: Alignment,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_string(),
            start_number: 1,
            start_row: 1,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            font_name: DEFAULT_FONT_FILE.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_color: DEFAULT_FONT_COLOR.to_string(),
            text_background: false,
            text_background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            bg_vertical_padding: DEFAULT_BG_VERTICAL_PADDING,
            bg_horizontal_padding: DEFAULT_BG_HORIZONTAL_PADDING,
            bg_corner_radius: DEFAULT_BG_CORNER_RADIUS,
            alignment: Alignment::Center,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingsField {
    BaseName,
    StartNumber,
    StartRow,
    SheetName,
    FontName,
    FontSize,
    FontColor,
    TextBackground,
    TextBackgroundColor,
    BgVerticalPadding,
    BgHorizontalPadding,
    BgCornerRadius,
    Alignment,
}

impl SettingsField {
    pub const ALL: [SettingsField; 13] = [
        SettingsField::BaseName,
        SettingsField::StartNumber,
        SettingsField::StartRow,
        SettingsField::SheetName,
        SettingsField::FontName,
        SettingsField::FontSize,
        SettingsField::FontColor,
        SettingsField::TextBackground,
        SettingsField::TextBackgroundColor,
        SettingsField::BgVerticalPadding,
        SettingsField::BgHorizontalPadding,
        SettingsField::BgCornerRadius,
        SettingsField::Alignment,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SettingsField::BaseName => "baseName",
            SettingsField::StartNumber => "startNumber",
            SettingsField::StartRow => "startRow",
            SettingsField::SheetName => "sheetName",
            SettingsField::FontName => "fontName",
            SettingsField::FontSize => "fontSize",
            SettingsField::FontColor => "fontColor",
            SettingsField::TextBackground => "textBackground",
            SettingsField::TextBackgroundColor => "textBackgroundColor",
            SettingsField::BgVerticalPadding => "bgVerticalPadding",
            SettingsField::BgHorizontalPadding => "bgHorizontalPadding",
            SettingsField::BgCornerRadius => "bgCornerRadius",
            SettingsField::Alignment => "alignment",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Reads a persisted JSON value for this field. Values of the wrong JSON
    /// type yield `None`.
    pub fn decode(self, value: &Value) -> Option<SettingUpdate> {
        let text = || value.as_str().map(str::to_string);
        let number = || value.as_u64().and_then(|raw| u32::try_from(raw).ok());
        let update = match self {
            SettingsField::BaseName => SettingUpdate::BaseName(text()?),
            SettingsField::StartNumber => SettingUpdate::StartNumber(number()?),
            SettingsField::StartRow => SettingUpdate::StartRow(number()?),
            SettingsField::SheetName => SettingUpdate::SheetName(text()?),
            SettingsField::FontName => SettingUpdate::FontName(text()?),
            SettingsField::FontSize => SettingUpdate::FontSize(number()?),
            SettingsField::FontColor => SettingUpdate::FontColor(text()?),
            SettingsField::TextBackground => SettingUpdate::TextBackground(value.as_bool()?),
            SettingsField::TextBackgroundColor => SettingUpdate::TextBackgroundColor(text()?),
            SettingsField::BgVerticalPadding => SettingUpdate::BgVerticalPadding(number()?),
            SettingsField::BgHorizontalPadding => SettingUpdate::BgHorizontalPadding(number()?),
            SettingsField::BgCornerRadius => SettingUpdate::BgCornerRadius(number()?),
            SettingsField::Alignment => {
                SettingUpdate::Alignment(Alignment::parse(value.as_str()?)?)
            }
        };
        Some(update)
    }
}

impl fmt::Display for SettingsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "settings.{}", self.key())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Number(u32),
    Flag(bool),
    Alignment(Alignment),
}

/// One settable settings field together with its new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingUpdate {
    BaseName(String),
    StartNumber(u32),
    StartRow(u32),
    SheetName(String),
    FontName(String),
    FontSize(u32),
    FontColor(String),
    TextBackground(bool),
    TextBackgroundColor(String),
    BgVerticalPadding(u32),
    BgHorizontalPadding(u32),
    BgCornerRadius(u32),
    Alignment(Alignment),
}

impl SettingUpdate {
    pub fn field(&self) -> SettingsField {
        match self {
            SettingUpdate::BaseName(_) => SettingsField::BaseName,
            SettingUpdate::StartNumber(_) => SettingsField::StartNumber,
            SettingUpdate::StartRow(_) => SettingsField::StartRow,
            SettingUpdate::SheetName(_) => SettingsField::SheetName,
            SettingUpdate::FontName(_) => SettingsField::FontName,
            SettingUpdate::FontSize(_) => SettingsField::FontSize,
            SettingUpdate::FontColor(_) => SettingsField::FontColor,
            SettingUpdate::TextBackground(_) => SettingsField::TextBackground,
            SettingUpdate::TextBackgroundColor(_) => SettingsField::TextBackgroundColor,
            SettingUpdate::BgVerticalPadding(_) => SettingsField::BgVerticalPadding,
            SettingUpdate::BgHorizontalPadding(_) => SettingsField::BgHorizontalPadding,
            SettingUpdate::BgCornerRadius(_) => SettingsField::BgCornerRadius,
            SettingUpdate::Alignment(_) => SettingsField::Alignment,
        }
    }

    pub fn value(&self) -> SettingValue {
        match self {
            SettingUpdate::BaseName(value)
            | SettingUpdate::SheetName(value)
            | SettingUpdate::FontName(value)
            | SettingUpdate::FontColor(value)
            | SettingUpdate::TextBackgroundColor(value) => SettingValue::Text(value.clone()),
            SettingUpdate::StartNumber(value)
            | SettingUpdate::StartRow(value)
            | SettingUpdate::FontSize(value)
            | SettingUpdate::BgVerticalPadding(value)
            | SettingUpdate::BgHorizontalPadding(value)
            | SettingUpdate::BgCornerRadius(value) => SettingValue::Number(*value),
            SettingUpdate::TextBackground(value) => SettingValue::Flag(*value),
            SettingUpdate::Alignment(value) => SettingValue::Alignment(*value),
        }
    }
}

impl Settings {
    pub fn get(&self, field: SettingsField) -> SettingValue {
        match field {
            SettingsField::BaseName => SettingValue::Text(self.base_name.clone()),
            SettingsField::StartNumber => SettingValue::Number(self.start_number),
            SettingsField::StartRow => SettingValue::Number(self.start_row),
            SettingsField::SheetName => SettingValue::Text(self.sheet_name.clone()),
            SettingsField::FontName => SettingValue::Text(self.font_name.clone()),
            SettingsField::FontSize => SettingValue::Number(self.font_size),
            SettingsField::FontColor => SettingValue::Text(self.font_color.clone()),
            SettingsField::TextBackground => SettingValue::Flag(self.text_background),
            SettingsField::TextBackgroundColor => {
                SettingValue::Text(self.text_background_color.clone())
            }
            SettingsField::BgVerticalPadding => SettingValue::Number(self.bg_vertical_padding),
            SettingsField::BgHorizontalPadding => SettingValue::Number(self.bg_horizontal_padding),
            SettingsField::BgCornerRadius => SettingValue::Number(self.bg_corner_radius),
            SettingsField::Alignment => SettingValue::Alignment(self.alignment),
        }
    }

    pub fn apply(&mut self, update: SettingUpdate) {
        match update {
            SettingUpdate::BaseName(value) => self.base_name = value,
            SettingUpdate::StartNumber(value) => self.start_number = value,
            SettingUpdate::StartRow(value) => self.start_row = value,
            SettingUpdate::SheetName(value) => self.sheet_name = value,
            SettingUpdate::FontName(value) => self.font_name = value,
            SettingUpdate::FontSize(value) => self.font_size = value,
            SettingUpdate::FontColor(value) => self.font_color = value,
            SettingUpdate::TextBackground(value) => self.text_background = value,
            SettingUpdate::TextBackgroundColor(value) => self.text_background_color = value,
            SettingUpdate::BgVerticalPadding(value) => self.bg_vertical_padding = value,
            SettingUpdate::BgHorizontalPadding(value) => self.bg_horizontal_padding = value,
            SettingUpdate::BgCornerRadius(value) => self.bg_corner_radius = value,
            SettingUpdate::Alignment(value) => self.alignment = value,
        }
    }

    /// Overlays a persisted blob on top of the defaults. Known keys replace
    /// the default when their JSON type fits the field; unknown keys and
    /// mistyped values are ignored.
    pub fn merged_over_defaults(raw: &str) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();
        settings.merge_persisted(raw)?;
        Ok(settings)
    }

    pub fn merge_persisted(&mut self, raw: &str) -> Result<Vec<SettingsField>, SettingsError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let value: Value =
            serde_json::from_str(raw).map_err(|err| SettingsError::Malformed(err.to_string()))?;
        let Value::Object(entries) = value else {
            return Err(SettingsError::NotAnObject);
        };
        let mut applied = Vec::new();
        for field in SettingsField::ALL {
            let Some(value) = entries.get(field.key()) else {
                continue;
            };
            if let Some(update) = field.decode(value) {
                self.apply(update);
                applied.push(field);
            }
        }
        Ok(applied)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string(self).map_err(|err| SettingsError::Encode(err.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    Malformed(String),
    NotAnObject,
    Encode(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Malformed(reason) => write!(f, "persisted settings are not valid JSON: {reason}"),
            SettingsError::NotAnObject => f.write_str("persisted settings must be a JSON object"),
            SettingsError::Encode(reason) => write!(f, "failed to encode settings: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {}
