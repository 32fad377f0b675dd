use imgtool_core::{
    hex_from_rgba, normalize_hex_input, rgb_to_hex, ColorTarget, Eyedropper, EyedropperError,
    EyedropperState, EyedropperTransition, SettingUpdate,
};

#[test]
fn hex_input_normalization() {
    assert_eq!(normalize_hex_input("#ff8800").as_deref(), Some("#ff8800"));
    assert_eq!(normalize_hex_input("FF8800").as_deref(), Some("#FF8800"));
    assert_eq!(normalize_hex_input(" f0a ").as_deref(), Some("#ff00aa"));
    assert_eq!(normalize_hex_input("#ff88"), None);
    assert_eq!(normalize_hex_input("#gg0000"), None);
    assert_eq!(normalize_hex_input(""), None);
}

#[test]
fn rgb_formatting_is_lowercase_and_padded() {
    assert_eq!(rgb_to_hex(255, 8, 0), "#ff0800");
    assert_eq!(hex_from_rgba(&[1, 2, 3, 255]).as_deref(), Some("#010203"));
    assert_eq!(hex_from_rgba(&[1, 2]), None);
}

#[test]
fn eyedropper_needs_an_image() {
    let mut eyedropper = Eyedropper::new();
    assert_eq!(
        eyedropper.toggle(ColorTarget::FontColor, false),
        Err(EyedropperError::NoImage)
    );
    assert_eq!(eyedropper.state(), EyedropperState::Idle);
    assert_eq!(EyedropperError::NoImage.to_string(), "Please upload an image first");
}

#[test]
fn eyedropper_pick_writes_the_target_field() {
    let mut eyedropper = Eyedropper::new();
    assert_eq!(
        eyedropper.toggle(ColorTarget::TextBackgroundColor, true),
        Ok(EyedropperTransition::Entered(ColorTarget::TextBackgroundColor))
    );
    assert!(eyedropper.is_active());

    let picked = eyedropper.pick(&[0x12, 0x34, 0x56, 0xff]).unwrap();
    assert_eq!(
        picked.into_update(),
        SettingUpdate::TextBackgroundColor("#123456".to_string())
    );
    assert!(!eyedropper.is_active());
    assert!(eyedropper.pick(&[0, 0, 0, 0]).is_none());
}

#[test]
fn eyedropper_retoggle_and_retarget() {
    let mut eyedropper = Eyedropper::new();
    eyedropper.toggle(ColorTarget::FontColor, true).unwrap();
    assert_eq!(
        eyedropper.toggle(ColorTarget::TextBackgroundColor, true),
        Ok(EyedropperTransition::Retargeted {
            from: ColorTarget::FontColor,
            to: ColorTarget::TextBackgroundColor,
        })
    );
    assert_eq!(
        eyedropper.toggle(ColorTarget::TextBackgroundColor, true),
        Ok(EyedropperTransition::Cancelled(ColorTarget::TextBackgroundColor))
    );
    assert_eq!(eyedropper.target(), None);
}

#[test]
fn eyedropper_cancel_returns_previous_target() {
    let mut eyedropper = Eyedropper::new();
    assert_eq!(eyedropper.cancel(), None);
    eyedropper.toggle(ColorTarget::FontColor, true).unwrap();
    assert_eq!(eyedropper.cancel(), Some(ColorTarget::FontColor));
    assert_eq!(eyedropper.state(), EyedropperState::Idle);
}
