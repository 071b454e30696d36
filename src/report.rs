//! Final per-slot scan results.

use std::fmt;

use crate::catalog::NOT_RECOGNIZED;
use crate::regions::{Layout, SLOT_COUNT};

/// Terminal outcome of one reward slot's pipeline.
#[derive(Clone, Debug)]
pub struct SlotResult {
    /// Slot index, 0..3 left to right.
    pub slot: usize,
    /// Raw OCR text from the attempt that produced the terminal state.
    pub raw_text: String,
    /// Canonical catalog name, or [`NOT_RECOGNIZED`].
    pub name: &'static str,
    /// Which region variant the terminal attempt used.
    pub layout: Layout,
    /// Ducat value for the resolved name; None when unrecognized.
    pub ducats: Option<u32>,
    /// Lowest market sell price; None when unknown.
    pub platinum: Option<u32>,
}

impl SlotResult {
    pub fn is_recognized(&self) -> bool {
        self.name != NOT_RECOGNIZED
    }
}

/// One completed recognition cycle: all four slots in screen order.
#[derive(Clone, Debug)]
pub struct ScanReport {
    pub slots: [SlotResult; SLOT_COUNT],
}

impl ScanReport {
    /// True when any slot failed both recognition attempts. Gates whether a
    /// diagnostic submission is offered.
    pub fn has_unrecognized(&self) -> bool {
        self.slots.iter().any(|s| !s.is_recognized())
    }

    /// Ordered (raw text, resolved name) pairs for diagnostic submission,
    /// matching the per-slot sub-images saved under captures/.
    pub fn diagnostic_pairs(&self) -> Vec<(&str, &str)> {
        self.slots
            .iter()
            .map(|s| (s.raw_text.as_str(), s.name))
            .collect()
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            let ducats = slot
                .ducats
                .map(|d| d.to_string())
                .unwrap_or_else(|| "???".to_string());
            let platinum = slot
                .platinum
                .map(|p| p.to_string())
                .unwrap_or_else(|| "???".to_string());
            writeln!(
                f,
                "{}. {:<36} {:>4} ducats  {:>4} plat",
                slot.slot + 1,
                slot.name,
                ducats,
                platinum
            )?;
        }
        Ok(())
    }
}
