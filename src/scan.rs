//! The recognition cycle.
//!
//! One scan takes a captured frame and produces a [`ScanReport`]: the frame
//! is thresholded once, all eight candidate regions are cropped up front,
//! then four worker threads (one per reward slot) run OCR, catalog matching
//! and the price lookup independently. A slot whose single-line region
//! yields no acceptable match retries once with the taller two-line region;
//! there is no other signal for whether a name wrapped.

use anyhow::{anyhow, Result};
use image::{GrayImage, RgbaImage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::catalog::{self, NOT_RECOGNIZED};
use crate::config::ScanConfig;
use crate::market::{self, MarketApi};
use crate::ocr::{adaptive_threshold, crop_rect, to_grayscale, Recognizer};
use crate::paths;
use crate::regions::{reward_regions, Layout, SLOT_COUNT};
use crate::report::{ScanReport, SlotResult};

/// At most one cycle runs at a time. A trigger arriving while a scan is in
/// flight is rejected instead of racing it.
static SCAN_IN_FLIGHT: AtomicBool = AtomicBool::new(false);

struct ScanGuard;

impl ScanGuard {
    fn claim() -> Result<Self> {
        match SCAN_IN_FLIGHT.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => Ok(Self),
            Err(_) => Err(anyhow!("a scan is already in progress")),
        }
    }
}

impl Drop for ScanGuard {
    fn drop(&mut self) {
        SCAN_IN_FLIGHT.store(false, Ordering::SeqCst);
    }
}

/// Both preprocessed sub-images of one slot, cropped before fan-out.
struct SlotCrops {
    single_line: GrayImage,
    two_line: GrayImage,
}

/// Runs one full recognition cycle over a captured frame.
///
/// Returns an error without touching any worker when the frame is unusable
/// or another cycle is still in flight; per-slot recognition and pricing
/// failures are absorbed into the report instead.
pub fn scan_rewards<R, M>(
    frame: &RgbaImage,
    recognizer: &R,
    market: &M,
    config: &ScanConfig,
) -> Result<ScanReport>
where
    R: Recognizer + Sync,
    M: MarketApi + Sync,
{
    let _guard = ScanGuard::claim()?;

    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(anyhow!("captured frame has no pixels"));
    }

    // Keep the full frame for diagnostic submission.
    if config.save_captures {
        let path = paths::get_captures_dir().join("screenshot.png");
        if let Err(e) = frame.save(&path) {
            crate::log(&format!("Could not save screenshot: {}", e));
        }
    }

    // Threshold the whole frame once, then crop every candidate region
    // before any worker starts. The crop source must not be read from
    // multiple threads, so all eight crops happen here.
    let gray = to_grayscale(frame);
    let binary = adaptive_threshold(&gray, config.threshold_block_size, config.threshold_bias);

    let crops: Vec<SlotCrops> = reward_regions(width, height)
        .iter()
        .map(|slot| SlotCrops {
            single_line: crop_rect(&binary, &slot.single_line),
            two_line: crop_rect(&binary, &slot.two_line),
        })
        .collect();

    // One worker per slot. Each owns its slot's data until the join; the
    // join collects in slot order, so completion order does not matter.
    let results: Vec<SlotResult> = thread::scope(|scope| {
        let handles: Vec<_> = crops
            .iter()
            .enumerate()
            .map(|(slot, slot_crops)| {
                scope.spawn(move || run_slot(slot, slot_crops, recognizer, market, config))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("slot worker panicked"))
            .collect()
    });

    let slots: [SlotResult; SLOT_COUNT] = results
        .try_into()
        .map_err(|_| anyhow!("slot worker count mismatch"))?;
    Ok(ScanReport { slots })
}

/// Drives one slot to its terminal state: single-line attempt, one two-line
/// retry on match failure, then the price lookup for a resolved name.
fn run_slot<R, M>(
    slot: usize,
    crops: &SlotCrops,
    recognizer: &R,
    market: &M,
    config: &ScanConfig,
) -> SlotResult
where
    R: Recognizer,
    M: MarketApi,
{
    let mut layout = Layout::SingleLine;
    let mut raw_text = recognize_or_empty(recognizer, slot, layout, &crops.single_line);
    let mut name = catalog::best_match(&raw_text, config.max_match_distance);

    if name == NOT_RECOGNIZED {
        layout = Layout::TwoLine;
        raw_text = recognize_or_empty(recognizer, slot, layout, &crops.two_line);
        name = catalog::best_match(&raw_text, config.max_match_distance);
    }

    let (ducats, platinum) = if name == NOT_RECOGNIZED {
        (None, None)
    } else {
        (
            catalog::ducats(name),
            market::price_for(market, name, &config.platform),
        )
    };

    SlotResult { slot, raw_text, name, layout, ducats, platinum }
}

/// An engine error on one attempt is treated like empty text: the matcher
/// turns it into NOT_RECOGNIZED and the slot continues through its normal
/// retry path instead of poisoning the cycle.
fn recognize_or_empty<R: Recognizer>(
    recognizer: &R,
    slot: usize,
    layout: Layout,
    img: &GrayImage,
) -> String {
    match recognizer.recognize(slot, layout, img) {
        Ok(text) => text,
        Err(e) => {
            crate::log(&format!("OCR failed for slot {} ({:?}): {}", slot, layout, e));
            String::new()
        }
    }
}
