use std::io::Cursor;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use gate_plate::{
    PlateError, RecognitionError, ScanOutcome, ScanSession, TextRecognizer, Threshold,
};
use image::{DynamicImage, GrayImage, ImageFormat, Rgba, RgbaImage};

fn png_bytes() -> Vec<u8> {
    let mut source = RgbaImage::from_pixel(8, 4, Rgba([220, 210, 200, 255]));
    for x in 2..6 {
        source.put_pixel(x, 1, Rgba([30, 30, 30, 255]));
    }
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(source)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

struct FixedText {
    text: String,
    seen: Mutex<Vec<GrayImage>>,
}

impl FixedText {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl TextRecognizer for FixedText {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognitionError> {
        self.seen.lock().expect("lock").push(image.clone());
        Ok(self.text.clone())
    }
}

struct Broken;

impl TextRecognizer for Broken {
    fn recognize(&self, _image: &GrayImage) -> Result<String, RecognitionError> {
        Err(RecognitionError::Engine("worker crashed".to_string()))
    }
}

struct Gated {
    entered: Arc<Barrier>,
    release: Arc<Barrier>,
}

impl TextRecognizer for Gated {
    fn recognize(&self, _image: &GrayImage) -> Result<String, RecognitionError> {
        self.entered.wait();
        self.release.wait();
        Ok("KA01AB1234".to_string())
    }
}

#[test]
fn scan_detects_plate_from_recognized_text() {
    let session = ScanSession::new(FixedText::new("IND\nKA 01 AB 1234\n"));

    let outcome = session.scan(&png_bytes()).expect("scan");

    assert_eq!(outcome.plate(), Some("KA01AB1234"));
    assert!(!session.is_busy());
}

#[test]
fn binarized_image_matches_source_dimensions() {
    let recognizer = Arc::new(FixedText::new("noise"));
    let fixed = ScanSession::new(SharedRecognizer(Arc::clone(&recognizer)));
    let adaptive = ScanSession::new(SharedRecognizer(Arc::clone(&recognizer)))
        .with_threshold(Threshold::Otsu);

    fixed.scan(&png_bytes()).expect("fixed scan");
    adaptive.scan(&png_bytes()).expect("adaptive scan");

    let seen = recognizer.seen.lock().expect("lock");
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[0].dimensions(), (8, 4));
    assert!(seen[0].pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    assert_eq!(seen[0].get_pixel(3, 1).0[0], 0);
    assert_eq!(seen[0].get_pixel(0, 0).0[0], 255);
}

struct SharedRecognizer(Arc<FixedText>);

impl TextRecognizer for SharedRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String, RecognitionError> {
        self.0.recognize(image)
    }
}

#[test]
fn unreadable_text_yields_not_found_with_raw_text() {
    let session = ScanSession::new(FixedText::new("?? ab"));

    let outcome = session.scan(&png_bytes()).expect("scan");

    assert_eq!(
        outcome,
        ScanOutcome::NotFound {
            raw_text: "?? ab".to_string()
        }
    );
    let mut reading = outcome.into_reading();
    assert_eq!(reading.detected(), None);
    reading.edit("ka01ab1234");
    assert_eq!(reading.confirm().expect("manual plate"), "KA01AB1234");
}

#[test]
fn engine_failure_is_reported_and_session_recovers() {
    let session = ScanSession::new(Broken);

    let result = session.scan(&png_bytes());

    assert!(matches!(result, Err(PlateError::Recognition(_))));
    assert!(!session.is_busy());
}

#[test]
fn invalid_image_bytes_are_rejected() {
    let session = ScanSession::new(FixedText::new("KA01AB1234"));

    let result = session.scan(b"\x00\x01garbage");

    assert!(matches!(result, Err(PlateError::Decode(_))));
    assert!(!session.is_busy());
}

#[test]
fn overlapping_scan_is_rejected_while_busy() {
    let entered = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));
    let session = ScanSession::new(Gated {
        entered: Arc::clone(&entered),
        release: Arc::clone(&release),
    });
    let bytes = png_bytes();

    thread::scope(|scope| {
        let first = scope.spawn(|| session.scan(&bytes));

        entered.wait();
        assert!(session.is_busy());
        assert!(matches!(session.scan(&bytes), Err(PlateError::Busy)));
        release.wait();

        let outcome = first.join().expect("join").expect("first scan");
        assert_eq!(outcome.plate(), Some("KA01AB1234"));
    });

    assert!(!session.is_busy());
}
