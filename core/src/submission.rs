use std::fmt;

use crate::file::{validate_image_file, FileMeta, FileValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    NoFile,
    InvalidFile(FileValidationError),
    NoSelection,
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::NoFile => f.write_str("Please select an image file"),
            SubmissionError::InvalidFile(err) => err.fmt(f),
            SubmissionError::NoSelection => f.write_str("Please select a text area on the image"),
        }
    }
}

impl std::error::Error for SubmissionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmissionError::InvalidFile(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FileValidationError> for SubmissionError {
    fn from(err: FileValidationError) -> Self {
        SubmissionError::InvalidFile(err)
    }
}

/// Reads one of the hidden selection inputs; blank or non-numeric text
/// counts as zero.
pub fn parse_dimension(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0)
}

/// Client-side veto for the render form: a valid image must be attached and
/// the text area must have a non-zero size.
pub fn validate_submission(
    file: Option<&FileMeta>,
    text_width: u32,
    text_height: u32,
) -> Result<(), SubmissionError> {
    let file = file.ok_or(SubmissionError::NoFile)?;
    validate_image_file(file)?;
    if text_width == 0 || text_height == 0 {
        return Err(SubmissionError::NoSelection);
    }
    Ok(())
}
