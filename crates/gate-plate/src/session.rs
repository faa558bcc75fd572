use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::binarize::{decode_and_binarize, Threshold};
use crate::extract::extract_plate;
use crate::recognizer::TextRecognizer;
use crate::{confirm_plate, PlateError, PlateResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    Detected { plate: String, raw_text: String },
    NotFound { raw_text: String },
}

impl ScanOutcome {
    pub fn plate(&self) -> Option<&str> {
        match self {
            Self::Detected { plate, .. } => Some(plate),
            Self::NotFound { .. } => None,
        }
    }

    /// Starts an editable reading seeded with the detected plate, if any.
    pub fn into_reading(self) -> PlateReading {
        PlateReading::new(self.plate().map(str::to_string))
    }
}

/// One capture session. Only a single recognition may run at a time.
pub struct ScanSession<R> {
    recognizer: R,
    threshold: Threshold,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<R: TextRecognizer> ScanSession<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            threshold: Threshold::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn scan(&self, image_bytes: &[u8]) -> PlateResult<ScanOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PlateError::Busy);
        }
        let _guard = InFlight(&self.in_flight);

        let binarized = decode_and_binarize(image_bytes, self.threshold)?;
        let raw_text = self.recognizer.recognize(&binarized)?;

        match extract_plate(&raw_text) {
            Some(found) => {
                info!(plate = %found.plate, source = ?found.source, "license plate detected");
                Ok(ScanOutcome::Detected {
                    plate: found.plate,
                    raw_text,
                })
            }
            None => {
                warn!("no license plate found; retry or enter manually");
                Ok(ScanOutcome::NotFound { raw_text })
            }
        }
    }
}

/// The plate value shown to the operator, who can always overwrite it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlateReading {
    detected: Option<String>,
    draft: String,
}

impl PlateReading {
    pub fn new(detected: Option<String>) -> Self {
        let draft = detected.clone().unwrap_or_default();
        Self { detected, draft }
    }

    pub fn detected(&self) -> Option<&str> {
        self.detected.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn cancel_edit(&mut self) {
        self.draft = self.detected.clone().unwrap_or_default();
    }

    pub fn confirm(&self) -> PlateResult<String> {
        confirm_plate(&self.draft)
    }
}
