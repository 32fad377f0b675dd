use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
    "image/gif",
];

const FILENAME_NUMBER_WIDTH: usize = 3;

/// What the front-end knows about an uploaded blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileValidationError {
    InvalidType { mime: String },
    TooLarge { size: u64, max: u64 },
}

impl fmt::Display for FileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileValidationError::InvalidType { .. } => {
                f.write_str("Invalid file type. Allowed types: ")?;
                for (index, mime) in ALLOWED_IMAGE_TYPES.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(mime.split('/').nth(1).unwrap_or(mime))?;
                }
                Ok(())
            }
            FileValidationError::TooLarge { max, .. } => {
                let mib = (*max as f64 / (1024.0 * 1024.0)).round() as u64;
                write!(f, "File too large. Maximum size is {mib}MB")
            }
        }
    }
}

impl std::error::Error for FileValidationError {}

pub fn validate_image_file(file: &FileMeta) -> Result<(), FileValidationError> {
    if !ALLOWED_IMAGE_TYPES.contains(&file.mime.as_str()) {
        return Err(FileValidationError::InvalidType {
            mime: file.mime.clone(),
        });
    }
    if file.size > MAX_IMAGE_BYTES {
        return Err(FileValidationError::TooLarge {
            size: file.size,
            max: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    let mime = mime.trim();
    let mime = if mime.is_empty() {
        "application/octet-stream"
    } else {
        mime
    };
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// `{base}_{index + start_number:03}.{extension}`; a leading dot on the
/// extension is dropped.
pub fn generate_sequential_filename(
    base_name: &str,
    index: u32,
    start_number: u32,
    extension: &str,
) -> String {
    let extension = extension.strip_prefix('.').unwrap_or(extension);
    let number = u64::from(index) + u64::from(start_number);
    format!("{base_name}_{number:0width$}.{extension}", width = FILENAME_NUMBER_WIDTH)
}

pub fn file_extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_ascii_lowercase()
}

pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        "tif" | "tiff" => Some("image/tiff"),
        "txt" => Some("text/plain"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}
