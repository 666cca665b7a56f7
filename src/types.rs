//! Core Types - Identities, modes, pointer events, settings
//!
//! Shared vocabulary for the engine:
//! - Opaque host identities (`RootId`, `NodeId`, `TimerId`)
//! - Layout mode and the viewport breakpoint that selects it
//! - Unified pointer events for mouse and touch
//! - Per-instance settings read from root data attributes

use bitflags::bitflags;
use thiserror::Error;

// =============================================================================
// HOST IDENTITIES
// =============================================================================

/// Identity of one carousel root. Minted by the host, stable for the
/// lifetime of the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootId(pub u64);

/// Identity of any host node (track, slide, button, clickable element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Handle for a host timer (interval, timeout, or animation frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

// =============================================================================
// MODE
// =============================================================================

/// Viewport width below which the mobile layout is used.
pub const MOBILE_BREAKPOINT: f32 = 768.0;

/// Layout strategy for one instance.
///
/// Mobile uses native horizontal scrolling with snap points; Desktop pages
/// through slides with an explicit track offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Mobile,
    Desktop,
}

impl Mode {
    /// Derive the mode from the current viewport width.
    pub fn from_viewport(width: f32) -> Self {
        if width < MOBILE_BREAKPOINT {
            Mode::Mobile
        } else {
            Mode::Desktop
        }
    }
}

/// One navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    /// Signed step for index arithmetic.
    pub fn step(self) -> i32 {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

// =============================================================================
// POINTER EVENTS
// =============================================================================

bitflags! {
    /// Buttons / contact kinds active on a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PointerButtons: u8 {
        /// Left mouse button.
        const PRIMARY = 1 << 0;
        /// Right mouse button.
        const SECONDARY = 1 << 1;
        /// Middle mouse button.
        const AUXILIARY = 1 << 2;
        /// Touch contact.
        const TOUCH = 1 << 3;
    }
}

impl PointerButtons {
    /// Whether this contact may start a drag session (left button or touch).
    pub fn starts_drag(self) -> bool {
        self.intersects(PointerButtons::PRIMARY | PointerButtons::TOUCH)
    }
}

/// Unified pointer event for mouse and touch.
///
/// The host converts its native events into this shape. `timestamp_ms` is a
/// monotonic millisecond clock; only differences are used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub buttons: PointerButtons,
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, buttons: PointerButtons, timestamp_ms: u64) -> Self {
        Self {
            x,
            y,
            buttons,
            timestamp_ms,
        }
    }

    /// A primary-button mouse event.
    pub fn mouse(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(x, y, PointerButtons::PRIMARY, timestamp_ms)
    }

    /// A touch contact event.
    pub fn touch(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(x, y, PointerButtons::TOUCH, timestamp_ms)
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Default desktop column count when the attribute is missing or invalid.
pub const DEFAULT_DESKTOP_COLUMNS: usize = 5;

/// Default mobile column count when the attribute is missing or invalid.
pub const DEFAULT_MOBILE_COLUMNS: usize = 2;

/// Default autoplay interval in milliseconds.
pub const DEFAULT_AUTOPLAY_MS: u64 = 3000;

/// Swipe distance threshold in desktop mode (pixels).
pub const DESKTOP_SWIPE_DISTANCE: f32 = 50.0;

/// Swipe velocity threshold in pixels per millisecond.
pub const SWIPE_VELOCITY: f32 = 0.3;

/// Immutable per-instance configuration, read once at initialization from
/// the root's data attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub desktop_columns: usize,
    pub mobile_columns: usize,
    pub autoplay: bool,
    pub autoplay_ms: u64,
    /// Desktop swipe distance threshold in pixels. Mobile uses a fraction
    /// of the container width instead.
    pub swipe_distance: f32,
    /// Swipe velocity threshold in pixels per millisecond.
    pub swipe_velocity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            desktop_columns: DEFAULT_DESKTOP_COLUMNS,
            mobile_columns: DEFAULT_MOBILE_COLUMNS,
            autoplay: false,
            autoplay_ms: DEFAULT_AUTOPLAY_MS,
            swipe_distance: DESKTOP_SWIPE_DISTANCE,
            swipe_velocity: SWIPE_VELOCITY,
        }
    }
}

impl Settings {
    /// Build settings from a data-attribute lookup.
    ///
    /// Missing or unparsable values fall back to defaults; a zero column
    /// count is rejected the same way.
    pub fn from_attrs<F>(attr: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_cols = |name: &str, default: usize| {
            attr(name)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(default)
        };

        Self {
            desktop_columns: parse_cols("columns", DEFAULT_DESKTOP_COLUMNS),
            mobile_columns: parse_cols("mobile-columns", DEFAULT_MOBILE_COLUMNS),
            autoplay: attr("autoplay").as_deref() == Some("true"),
            autoplay_ms: attr("autoplay-speed")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|&ms| ms > 0)
                .unwrap_or(DEFAULT_AUTOPLAY_MS),
            ..Self::default()
        }
    }

    /// Number of slides visible at once in the given mode.
    pub fn visible_items(&self, mode: Mode) -> usize {
        match mode {
            Mode::Mobile => self.mobile_columns,
            Mode::Desktop => self.desktop_columns,
        }
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Mode-dependent geometry computed by the layout engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    /// Per-item width in pixels.
    pub item_width: f32,
    /// Gap between items in pixels.
    pub gap: f32,
    /// Absolute left offset of every slide index. Desktop only; empty in
    /// mobile mode where the host's native scroll owns positions.
    pub offsets: Vec<f32>,
}

impl Geometry {
    /// Width of one paging step (item plus gap).
    pub fn step_width(&self) -> f32 {
        self.item_width + self.gap
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Failure constructing the state machine for a root.
///
/// Recovered locally by falling back to a static grid for that root.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CarouselError {
    #[error("carousel root has no slide track")]
    MissingTrack,
}
