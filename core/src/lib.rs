pub mod catalog;
pub mod color;
pub mod eyedropper;
pub mod file;
pub mod preview;
pub mod request;
pub mod selection;
pub mod settings;
pub mod state;
pub mod submission;

pub use catalog::{font_by_file, font_family, FontCatalogEntry, DEFAULT_FONT_FILE, FONT_CATALOG};
pub use color::{hex_from_rgba, normalize_hex_input, rgb_to_hex};
pub use eyedropper::{
    ColorTarget, Eyedropper, EyedropperError, EyedropperState, EyedropperTransition, PickedColor,
};
pub use file::{
    encode_data_url, file_extension, generate_sequential_filename, mime_for_extension,
    validate_image_file, FileMeta, FileValidationError, ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES,
};
pub use preview::PreviewStyle;
pub use request::{RequestSequence, RequestTicket};
pub use selection::{ImageScale, ScreenRect, Selection, SelectionFrame, SelectionGesture};
pub use settings::{
    Alignment, SettingUpdate, SettingValue, Settings, SettingsError, SettingsField,
};
pub use state::{
    Change, ImageUpload, Listener, MemoryStorage, State, StateUpdate, StorageError, Store,
    StoreHooks, Subscription, SettingsStorage, Topic,
};
pub use submission::{parse_dimension, validate_submission, SubmissionError};
