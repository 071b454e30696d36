use anyhow::{anyhow, Result};
use image::GrayImage;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::{find_tessdata_dir, find_tesseract_executable};
use crate::paths;
use crate::regions::Layout;

/// Characters that can appear in a catalog name. Q never appears in any
/// item name, so it is left out of the whitelist.
const CHAR_WHITELIST: &str = "ABCDEFGHIJKLMNOPRSTUVWXYZ&";

/// Text recognition seam. The production implementation shells out to the
/// Tesseract CLI; tests substitute fakes.
///
/// `slot` identifies which reward position the sub-image belongs to (used to
/// name the persisted diagnostic image); `layout` selects the page
/// segmentation mode. Garbled or empty text is a successful result — the
/// catalog matcher decides downstream whether it means anything.
pub trait Recognizer {
    fn recognize(&self, slot: usize, layout: Layout, img: &GrayImage) -> Result<String>;
}

/// Recognizer backed by the Tesseract CLI.
///
/// Every call spawns a fresh `tesseract` process, so no engine state is
/// ever shared between concurrent workers — the engine is not thread-safe,
/// and sharing an instance corrupts results rather than failing cleanly.
pub struct TesseractRecognizer {
    executable: PathBuf,
    tessdata: PathBuf,
    save_captures: bool,
}

impl TesseractRecognizer {
    pub fn new(save_captures: bool) -> Result<Self> {
        Ok(Self {
            executable: find_tesseract_executable()?,
            tessdata: find_tessdata_dir()?,
            save_captures,
        })
    }

    fn psm(layout: Layout) -> &'static str {
        match layout {
            // 7 = treat the image as a single text line
            Layout::SingleLine => "7",
            // 6 = assume a single uniform block of text
            Layout::TwoLine => "6",
        }
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, slot: usize, layout: Layout, img: &GrayImage) -> Result<String> {
        // Keep the processed sub-image around for diagnostic submission.
        if self.save_captures {
            let capture_path = paths::get_captures_dir().join(format!("slot_{}.png", slot));
            if let Err(e) = img.save(&capture_path) {
                crate::log(&format!(
                    "Could not save capture for slot {}: {}",
                    slot, e
                ));
            }
        }

        let temp_input = NamedTempFile::with_suffix(".png")?;
        img.save(temp_input.path())?;

        let output = Command::new(&self.executable)
            .arg(temp_input.path())
            .arg("stdout")
            .arg("--tessdata-dir")
            .arg(&self.tessdata)
            .arg("-l")
            .arg("eng")
            .arg("--psm")
            .arg(Self::psm(layout))
            .arg("-c")
            .arg(format!("tessedit_char_whitelist={}", CHAR_WHITELIST))
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("Tesseract failed: {}", stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitelist_has_no_digits_or_lowercase() {
        assert!(CHAR_WHITELIST.chars().all(|c| c.is_ascii_uppercase() || c == '&'));
        assert!(!CHAR_WHITELIST.contains('Q'));
    }

    #[test]
    fn test_psm_per_layout() {
        assert_eq!(TesseractRecognizer::psm(Layout::SingleLine), "7");
        assert_eq!(TesseractRecognizer::psm(Layout::TwoLine), "6");
    }
}
