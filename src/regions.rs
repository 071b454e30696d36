//! Reward-slot geometry.
//!
//! The end-of-mission screen shows four reward items in a fixed row. The
//! rectangles below bound each item's name at the 1920x1080 reference
//! resolution and are scaled proportionally to the actual display size.
//! Long names wrap onto a second line, so each slot also carries a taller
//! variant that covers both text rows.

/// Reference display the rectangle constants are measured against.
pub const REFERENCE_WIDTH: u32 = 1920;
pub const REFERENCE_HEIGHT: u32 = 1080;

/// Number of reward slots on the screen.
pub const SLOT_COUNT: usize = 4;

/// Left/right edges of each slot's name column at reference resolution.
const SLOT_X_SPANS: [(u32, u32); SLOT_COUNT] = [(108, 516), (540, 948), (972, 1380), (1404, 1813)];

/// Vertical extent of a single-line name row.
const SINGLE_LINE_Y: (u32, u32) = (458, 487);

/// Vertical extent when the name wraps onto two lines. The lower edge is
/// shared with the single-line row; the upper edge covers the extra row.
const TWO_LINE_Y: (u32, u32) = (429, 487);

/// An absolute pixel rectangle inside the captured frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The layout variant a rectangle (and a recognition attempt) belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    SingleLine,
    TwoLine,
}

/// Both layout variants of one reward slot's name region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRegions {
    pub single_line: Rect,
    pub two_line: Rect,
}

/// Scales a reference-resolution rectangle to the given display size.
/// Both axes scale independently, so non-16:9 displays stretch the regions
/// the same way the game stretches its UI.
fn scaled_rect(
    x: (u32, u32),
    y: (u32, u32),
    display_width: u32,
    display_height: u32,
) -> Rect {
    let sx = |v: u32| v * display_width / REFERENCE_WIDTH;
    let sy = |v: u32| v * display_height / REFERENCE_HEIGHT;
    Rect {
        x: sx(x.0),
        y: sy(y.0),
        width: sx(x.1) - sx(x.0),
        height: sy(y.1) - sy(y.0),
    }
}

/// Returns the name regions for all four reward slots, scaled from the
/// 1920x1080 reference to the given display size.
///
/// Pure and deterministic. Display dimensions must be positive; zero is a
/// caller contract violation (there is no frame to crop from).
pub fn reward_regions(display_width: u32, display_height: u32) -> [SlotRegions; SLOT_COUNT] {
    SLOT_X_SPANS.map(|span| SlotRegions {
        single_line: scaled_rect(span, SINGLE_LINE_Y, display_width, display_height),
        two_line: scaled_rect(span, TWO_LINE_Y, display_width, display_height),
    })
}
