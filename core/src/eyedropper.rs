use std::fmt;

use crate::color::hex_from_rgba;
use crate::settings::{SettingUpdate, SettingsField};

/// Colour field an eyedropper pick is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorTarget {
    FontColor,
    TextBackgroundColor,
}

impl ColorTarget {
    pub const ALL: [ColorTarget; 2] = [ColorTarget::FontColor, ColorTarget::TextBackgroundColor];

    pub fn field(self) -> SettingsField {
        match self {
            ColorTarget::FontColor => SettingsField::FontColor,
            ColorTarget::TextBackgroundColor => SettingsField::TextBackgroundColor,
        }
    }

    pub fn update(self, hex: String) -> SettingUpdate {
        match self {
            ColorTarget::FontColor => SettingUpdate::FontColor(hex),
            ColorTarget::TextBackgroundColor => SettingUpdate::TextBackgroundColor(hex),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EyedropperState {
    Idle,
    AwaitingPick(ColorTarget),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EyedropperTransition {
    Entered(ColorTarget),
    Retargeted { from: ColorTarget, to: ColorTarget },
    Cancelled(ColorTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EyedropperError {
    NoImage,
}

impl fmt::Display for EyedropperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EyedropperError::NoImage => f.write_str("Please upload an image first"),
        }
    }
}

impl std::error::Error for EyedropperError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickedColor {
    pub target: ColorTarget,
    pub hex: String,
}

impl PickedColor {
    pub fn into_update(self) -> SettingUpdate {
        self.target.update(self.hex)
    }
}

/// idle -> awaiting-pick(target) -> idle. Leaving awaiting-pick happens on a
/// pick, a re-toggle of the same target or an explicit cancel.
#[derive(Clone, Copy, Debug)]
pub struct Eyedropper {
    state: EyedropperState,
}

impl Default for Eyedropper {
    fn default() -> Self {
        Self::new()
    }
}

impl Eyedropper {
    pub fn new() -> Self {
        Self {
            state: EyedropperState::Idle,
        }
    }

    pub fn state(&self) -> EyedropperState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, EyedropperState::AwaitingPick(_))
    }

    pub fn target(&self) -> Option<ColorTarget> {
        match self.state {
            EyedropperState::Idle => None,
            EyedropperState::AwaitingPick(target) => Some(target),
        }
    }

    pub fn toggle(
        &mut self,
        target: ColorTarget,
        image_loaded: bool,
    ) -> Result<EyedropperTransition, EyedropperError> {
        match self.state {
            EyedropperState::AwaitingPick(current) if current == target => {
                self.state = EyedropperState::Idle;
                Ok(EyedropperTransition::Cancelled(current))
            }
            _ if !image_loaded => {
                self.state = EyedropperState::Idle;
                Err(EyedropperError::NoImage)
            }
            EyedropperState::AwaitingPick(current) => {
                self.state = EyedropperState::AwaitingPick(target);
                Ok(EyedropperTransition::Retargeted {
                    from: current,
                    to: target,
                })
            }
            EyedropperState::Idle => {
                self.state = EyedropperState::AwaitingPick(target);
                Ok(EyedropperTransition::Entered(target))
            }
        }
    }

    pub fn cancel(&mut self) -> Option<ColorTarget> {
        let target = self.target();
        self.state = EyedropperState::Idle;
        target
    }

    /// Completes a pick with an RGBA sample. Returns `None` (and stays
    /// unchanged) when not awaiting a pick or the sample is short.
    pub fn pick(&mut self, rgba: &[u8]) -> Option<PickedColor> {
        let target = self.target()?;
        let hex = hex_from_rgba(rgba)?;
        self.state = EyedropperState::Idle;
        Some(PickedColor { target, hex })
    }
}
