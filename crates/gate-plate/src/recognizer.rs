use std::path::PathBuf;
use std::process::Command;

use image::{GrayImage, ImageFormat};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("recognition engine unavailable: {0}")]
    Unavailable(String),
    #[error("recognition engine failed: {0}")]
    Engine(String),
    #[error("io failure: {0}")]
    Io(String),
}

/// Black-box text recognition over a binarized image.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognitionError>;
}

/// Runs an external `tesseract` executable against a temporary PNG and reads
/// the recognized text from its stdout.
#[derive(Clone, Debug)]
pub struct TesseractCommand {
    program: PathBuf,
    language: String,
}

impl Default for TesseractCommand {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TesseractCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            language: "eng".to_string(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

impl TextRecognizer for TesseractCommand {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognitionError> {
        let input = tempfile::Builder::new()
            .prefix("gate-plate-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| RecognitionError::Io(e.to_string()))?;
        image
            .save_with_format(input.path(), ImageFormat::Png)
            .map_err(|e| RecognitionError::Io(e.to_string()))?;

        debug!(program = %self.program.display(), "invoking recognizer");
        let output = Command::new(&self.program)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| {
                RecognitionError::Unavailable(format!("{}: {e}", self.program.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Engine(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_reported_as_unavailable() {
        let recognizer = TesseractCommand::new("/nonexistent/gate-plate-tesseract");
        let image = GrayImage::new(4, 4);

        let result = recognizer.recognize(&image);

        assert!(matches!(result, Err(RecognitionError::Unavailable(_))));
    }
}
