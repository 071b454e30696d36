use anyhow::{anyhow, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::log;

const TESSDATA_REPO: &str = "https://github.com/tesseract-ocr/tessdata/raw/main";

#[cfg(windows)]
const TESSERACT_EXE: &str = "tesseract.exe";
#[cfg(not(windows))]
const TESSERACT_EXE: &str = "tesseract";

/// Installation paths checked when Tesseract is not on PATH.
#[cfg(windows)]
const SYSTEM_TESSERACT_DIRS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR",
    r"C:\Program Files (x86)\Tesseract-OCR",
];
#[cfg(not(windows))]
const SYSTEM_TESSERACT_DIRS: &[&str] = &["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin"];

/// Returns the app-local directory for Tesseract data files.
pub fn get_tesseract_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("relic-rewards")
        .join("tesseract")
}

/// Ensures Tesseract and the English model are usable. The executable must
/// come from a system install; the trained data is downloaded into the
/// app-local dir when no system copy exists.
pub fn ensure_tesseract() -> Result<()> {
    let executable = find_tesseract_executable()?;
    log(&format!("Tesseract executable: {}", executable.display()));

    if find_tessdata_dir().is_err() {
        let tessdata_dir = get_tesseract_dir().join("tessdata");
        fs::create_dir_all(&tessdata_dir)?;
        download_tessdata(&tessdata_dir)?;
    }

    Ok(())
}

/// Downloads eng.traineddata from the tessdata repository.
fn download_tessdata(tessdata_dir: &PathBuf) -> Result<()> {
    let eng_url = format!("{}/eng.traineddata", TESSDATA_REPO);
    let eng_path = tessdata_dir.join("eng.traineddata");

    log("Downloading eng.traineddata...");

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(300))
        .build()?;

    let response = client
        .get(&eng_url)
        .header("User-Agent", "relic-rewards")
        .send()?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "Failed to download eng.traineddata: HTTP {}",
            response.status()
        ));
    }

    let bytes = response.bytes()?;
    let mut file = fs::File::create(&eng_path)?;
    file.write_all(&bytes)?;

    log(&format!("Downloaded eng.traineddata ({} bytes)", bytes.len()));

    Ok(())
}

/// Finds the Tesseract executable: PATH first, then common install dirs.
pub fn find_tesseract_executable() -> Result<PathBuf> {
    if let Ok(output) = std::process::Command::new(TESSERACT_EXE)
        .arg("--version")
        .output()
    {
        if output.status.success() {
            return Ok(PathBuf::from(TESSERACT_EXE));
        }
    }

    for dir in SYSTEM_TESSERACT_DIRS {
        let p = PathBuf::from(dir).join(TESSERACT_EXE);
        if p.exists() {
            return Ok(p);
        }
    }

    Err(anyhow!(
        "Tesseract not found. Please install Tesseract-OCR and make sure it is on PATH."
    ))
}

/// Finds a tessdata directory containing eng.traineddata: the app-local
/// copy first, then system installs, then TESSDATA_PREFIX.
pub fn find_tessdata_dir() -> Result<PathBuf> {
    let local_tessdata = get_tesseract_dir().join("tessdata");
    if local_tessdata.join("eng.traineddata").exists() {
        return Ok(local_tessdata);
    }

    #[cfg(windows)]
    let system_tessdata: &[&str] = &[
        r"C:\Program Files\Tesseract-OCR\tessdata",
        r"C:\Program Files (x86)\Tesseract-OCR\tessdata",
    ];
    #[cfg(not(windows))]
    let system_tessdata: &[&str] = &[
        "/usr/share/tesseract-ocr/5/tessdata",
        "/usr/share/tesseract-ocr/4.00/tessdata",
        "/usr/share/tessdata",
        "/usr/local/share/tessdata",
        "/opt/homebrew/share/tessdata",
    ];

    for dir in system_tessdata {
        let p = PathBuf::from(dir);
        if p.join("eng.traineddata").exists() {
            return Ok(p);
        }
    }

    if let Ok(prefix) = std::env::var("TESSDATA_PREFIX") {
        for candidate in [PathBuf::from(&prefix), PathBuf::from(&prefix).join("tessdata")] {
            if candidate.join("eng.traineddata").exists() {
                return Ok(candidate);
            }
        }
    }

    Err(anyhow!(
        "tessdata directory not found. Please ensure eng.traineddata is available."
    ))
}
