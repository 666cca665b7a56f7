//! Carousel Instance - Per-root state
//!
//! One `Instance` exists per initialized carousel root. It bundles the
//! immutable settings, the mode-dependent geometry, the drag state machine,
//! timer handles and reload bookkeeping. All mutation goes through the
//! `state`, `layout` and `reload` modules; the struct itself is plain data
//! with a few derived accessors.

use crate::state::drag::DragPhase;
use crate::types::{Direction, Geometry, Mode, NodeId, RootId, Settings, TimerId};

/// State machine for one carousel root.
#[derive(Debug)]
pub struct Instance {
    /// The root container this instance governs.
    pub root: RootId,
    /// The element holding all slides.
    pub track: NodeId,
    /// Slides in display order. Fixed at setup; replaced wholesale on
    /// reload.
    pub slides: Vec<NodeId>,
    /// Immutable per-instance configuration.
    pub settings: Settings,
    /// Active layout strategy.
    pub mode: Mode,
    /// Which mode's inline styles are currently applied, if any. Tracked
    /// separately from `mode` so a switch can clear exactly the old set.
    pub styled_mode: Option<Mode>,
    /// Current page index. Authoritative in desktop mode; derived from
    /// scroll position in mobile mode (button/autoplay purposes only).
    pub current_index: usize,
    /// Explicit visual track offset in desktop mode. Updated by every
    /// operation that moves the track; never parsed back from the host.
    pub current_offset: f32,
    /// Mode-dependent geometry from the last layout pass.
    pub geometry: Geometry,
    /// Pointer/drag finite-state machine.
    pub drag: DragPhase,
    /// Repeating autoplay timer. At most one exists at any time.
    pub autoplay_timer: Option<TimerId>,
    /// Pending resize-debounce timeout.
    pub resize_timer: Option<TimerId>,
    /// Pending animation frame for scroll-derived index updates.
    pub frame_timer: Option<TimerId>,
    /// Previous-page button.
    pub prev_button: NodeId,
    /// Next-page button.
    pub next_button: NodeId,
    /// Content identifier currently rendered.
    pub loaded_slug: Option<String>,
    /// Whether a reload request is awaiting its result.
    pub reload_in_flight: bool,
    /// Newest identifier requested while a reload was in flight.
    pub pending_slug: Option<String>,
}

impl Instance {
    /// Upper bound for `current_index` in the current mode:
    /// `max(0, slide_count − visible_items)`.
    pub fn max_index(&self) -> usize {
        self.slides
            .len()
            .saturating_sub(self.settings.visible_items(self.mode))
    }

    /// The nav button for a direction.
    pub fn nav_button(&self, direction: Direction) -> NodeId {
        match direction {
            Direction::Prev => self.prev_button,
            Direction::Next => self.next_button,
        }
    }

    /// Whether a node is one of this instance's nav buttons. Taps on nav
    /// buttons are never re-synthesized as clicks.
    pub fn is_nav_button(&self, node: NodeId) -> bool {
        node == self.prev_button || node == self.next_button
    }
}
