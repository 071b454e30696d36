//! Relic Rewards
//!
//! Reads an end-of-mission screenshot, recognizes the four reward item
//! names with Tesseract, matches them against the item catalog, and looks
//! up their current market prices.
//!
//! Screen capture itself is left to the caller: pass the path of a captured
//! frame as the first argument.

mod catalog;
mod config;
mod market;
mod ocr;
mod paths;
mod regions;
mod report;
mod scan;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("relic_rewards.log");
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
        let _ = file.write_all(line.as_bytes());
    }
}

fn main() -> Result<()> {
    // Log panics from worker threads too.
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        eprintln!("[PANIC]{} {}", location, msg);
    }));

    paths::ensure_directories()?;

    if let Err(e) = ocr::ensure_tesseract() {
        log(&format!("Warning: Failed to set up Tesseract: {}", e));
        log("Recognition will not work until Tesseract is installed.");
    }

    config::init_config();
    let config = config::get_config();

    let screenshot = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: relic-rewards <screenshot.png>"))?;

    log(&format!("Scanning {}", screenshot));
    let frame = image::open(&screenshot)
        .with_context(|| format!("failed to load screenshot {}", screenshot))?
        .to_rgba8();

    let recognizer = ocr::TesseractRecognizer::new(config.save_captures)?;
    let market = market::WarframeMarket::new()?;

    let report = scan::scan_rewards(&frame, &recognizer, &market, config)?;
    print!("{}", report);

    if report.has_unrecognized() {
        log("Some rewards were not recognized. Raw/fixed text per slot:");
        for (slot, (raw, fixed)) in report.diagnostic_pairs().iter().enumerate() {
            log(&format!("  slot {}: {:?} -> {}", slot, raw, fixed));
        }
        log(&format!(
            "Sub-images are saved under {} for manual review.",
            paths::get_captures_dir().display()
        ));
    }

    Ok(())
}
