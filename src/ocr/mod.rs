pub mod engine;
pub mod preprocess;
pub mod setup;

pub use engine::{Recognizer, TesseractRecognizer};
pub use preprocess::{adaptive_threshold, crop_rect, to_grayscale};
pub use setup::ensure_tesseract;
