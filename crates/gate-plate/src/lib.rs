//! License plate capture pipeline: binarize an image, hand it to a text
//! recognizer, and pull a plate number out of whatever text comes back.

pub mod binarize;
pub mod extract;
pub mod recognizer;
pub mod session;

use thiserror::Error;

pub use binarize::{binarize, decode_and_binarize, luminance, Threshold, MIDPOINT_THRESHOLD};
pub use extract::{extract_plate, MatchSource, PlateMatch};
pub use recognizer::{RecognitionError, TesseractCommand, TextRecognizer};
pub use session::{PlateReading, ScanOutcome, ScanSession};

#[derive(Debug, Error)]
pub enum PlateError {
    #[error("image could not be decoded: {0}")]
    Decode(String),
    #[error("recognition failed: {0}")]
    Recognition(#[from] RecognitionError),
    #[error("a scan is already in progress")]
    Busy,
    #[error("plate number cannot be empty")]
    EmptyPlate,
}

pub type PlateResult<T> = Result<T, PlateError>;

/// Trims and uppercases a manually entered plate number.
///
/// Recognition output is never trusted as-is, so every plate passes through
/// here before it is used downstream.
pub fn confirm_plate(text: &str) -> PlateResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PlateError::EmptyPlate);
    }
    Ok(trimmed.to_uppercase())
}
