//! Drag Tracker - Unified mouse/touch gesture state machine
//!
//! One explicit FSM per instance:
//!
//! ```text
//! Idle → Pending → Dragging → Settling → Idle
//!          │                      ▲
//!          └── tap (≤ 5 px) ──────┘ (click guard consumption / next press)
//! ```
//!
//! - `Pending`: pointer is down, the 5 px start threshold not yet crossed.
//! - `Dragging`: the track follows the pointer 1:1; autoplay stays stopped.
//! - `Settling`: a drag was just released; the capture-phase click guard
//!   swallows the click that trails the release, then the FSM returns to
//!   `Idle`.
//!
//! The swipe-vs-tap decision is a pure function of displacement, elapsed
//! time and the two thresholds, so it is testable without synthesizing
//! pointer events.

use std::mem;

use crate::engine::Instance;
use crate::host::{ClickAction, Host};
use crate::state::{autoplay, nav};
use crate::types::{Direction, Mode, NodeId, PointerEvent};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Movement below this never counts as a drag (pixels).
pub const DRAG_START_THRESHOLD: f32 = 5.0;

/// Mobile swipe distance threshold as a fraction of container width.
pub const MOBILE_SWIPE_FRACTION: f32 = 0.2;

// =============================================================================
// STATE MACHINE
// =============================================================================

/// One pointer session, recorded at press time and updated on moves.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSession {
    /// Pointer X at press.
    pub start_x: f32,
    /// Last observed pointer X.
    pub last_x: f32,
    /// Scroll position (mobile) or track offset (desktop) at press.
    pub start_offset: f32,
    /// Press timestamp in milliseconds.
    pub started_at: u64,
    /// Timestamp of the last observed move.
    pub last_at: u64,
    /// Closest clickable element under the initial pointer, if any.
    pub pressed_target: Option<NodeId>,
}

/// Phase of the drag FSM.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    Pending(PointerSession),
    Dragging(PointerSession),
    Settling,
}

impl DragPhase {
    /// Whether a drag gesture currently owns the pointer sequence. While
    /// true, clicks inside the track must be suppressed.
    pub fn owns_clicks(&self) -> bool {
        matches!(self, DragPhase::Dragging(_) | DragPhase::Settling)
    }
}

// =============================================================================
// SWIPE DECISION
// =============================================================================

/// Outcome of releasing a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Navigate one step in the displacement's direction.
    Navigate(Direction),
    /// Below both thresholds: snap back to the nearest slide boundary.
    SnapBack,
}

/// Decide what a release does, from displacement (`start_x − end_x`),
/// release velocity (px/ms) and the two thresholds.
pub fn swipe_decision(
    displacement: f32,
    velocity: f32,
    velocity_threshold: f32,
    distance_threshold: f32,
) -> SwipeOutcome {
    if velocity.abs() > velocity_threshold || displacement.abs() > distance_threshold {
        if displacement > 0.0 {
            SwipeOutcome::Navigate(Direction::Next)
        } else {
            SwipeOutcome::Navigate(Direction::Prev)
        }
    } else {
        SwipeOutcome::SnapBack
    }
}

/// Swipe distance threshold for the current mode: 20% of the container
/// width on mobile, a fixed pixel constant on desktop.
pub fn distance_threshold<H: Host>(instance: &Instance, host: &H) -> f32 {
    match instance.mode {
        Mode::Mobile => host.container_width(instance.root) * MOBILE_SWIPE_FRACTION,
        Mode::Desktop => instance.settings.swipe_distance,
    }
}

// =============================================================================
// TRANSITIONS
// =============================================================================

/// Pointer press. Returns whether a session started (so the engine can
/// route subsequent document-level moves to this instance).
pub fn on_down<H: Host>(instance: &mut Instance, host: &mut H, event: &PointerEvent) -> bool {
    if !event.buttons.starts_drag() {
        return false;
    }

    // A press always opens a fresh session; a stale Settling collapses here.
    let start_offset = match instance.mode {
        Mode::Mobile => host.scroll_left(instance.track),
        Mode::Desktop => instance.current_offset,
    };

    instance.drag = DragPhase::Pending(PointerSession {
        start_x: event.x,
        last_x: event.x,
        start_offset,
        started_at: event.timestamp_ms,
        last_at: event.timestamp_ms,
        pressed_target: host.clickable_ancestor_at(instance.root, event.x, event.y),
    });

    if instance.settings.autoplay {
        autoplay::stop(instance, host);
    }

    true
}

/// Pointer move. Crossing the start threshold promotes `Pending` to
/// `Dragging`; while dragging the track follows the pointer 1:1.
pub fn on_move<H: Host>(instance: &mut Instance, host: &mut H, event: &PointerEvent) {
    let phase = mem::take(&mut instance.drag);

    instance.drag = match phase {
        DragPhase::Pending(mut session) => {
            let displacement = session.start_x - event.x;
            if displacement.abs() > DRAG_START_THRESHOLD {
                session.last_x = event.x;
                session.last_at = event.timestamp_ms;
                host.set_drag_visual(instance.track, true);
                follow_pointer(instance, host, &session, displacement);
                DragPhase::Dragging(session)
            } else {
                DragPhase::Pending(session)
            }
        }
        DragPhase::Dragging(mut session) => {
            let displacement = session.start_x - event.x;
            session.last_x = event.x;
            session.last_at = event.timestamp_ms;
            follow_pointer(instance, host, &session, displacement);
            DragPhase::Dragging(session)
        }
        other => other,
    };
}

/// Pointer release: tap synthesis or swipe evaluation, then autoplay
/// resumes either way.
pub fn on_up<H: Host>(instance: &mut Instance, host: &mut H, event: &PointerEvent) {
    let phase = mem::take(&mut instance.drag);

    instance.drag = match phase {
        DragPhase::Pending(session) => {
            // A tap. The press handler prevented the host's default action,
            // so recover the click that was swallowed, unless it targeted a
            // nav button (those deliver their own presses).
            if let Some(target) = session.pressed_target {
                if !instance.is_nav_button(target) {
                    host.synthesize_click(target);
                }
            }
            DragPhase::Idle
        }
        DragPhase::Dragging(session) => {
            finish_drag(instance, host, &session, event.x, event.timestamp_ms);
            DragPhase::Settling
        }
        other => other,
    };

    if instance.settings.autoplay {
        autoplay::start(instance, host);
    }
}

/// Pointer left the tracked area. A drag is evaluated at its last observed
/// position; a pending tap is abandoned without click synthesis.
pub fn on_cancel<H: Host>(instance: &mut Instance, host: &mut H) {
    let phase = mem::take(&mut instance.drag);

    instance.drag = match phase {
        DragPhase::Dragging(session) => {
            let (end_x, end_at) = (session.last_x, session.last_at);
            finish_drag(instance, host, &session, end_x, end_at);
            DragPhase::Settling
        }
        DragPhase::Pending(_) => DragPhase::Idle,
        other => other,
    };

    if instance.settings.autoplay {
        autoplay::start(instance, host);
    }
}

/// Capture-phase click guard. Must run before the target's own handler.
pub fn click_guard(instance: &mut Instance) -> ClickAction {
    if instance.drag.owns_clicks() {
        if instance.drag == DragPhase::Settling {
            instance.drag = DragPhase::Idle;
        }
        ClickAction::Suppress
    } else {
        ClickAction::Allow
    }
}

// =============================================================================
// INTERNALS
// =============================================================================

fn follow_pointer<H: Host>(
    instance: &mut Instance,
    host: &mut H,
    session: &PointerSession,
    displacement: f32,
) {
    match instance.mode {
        Mode::Mobile => {
            host.set_scroll_left(instance.track, session.start_offset + displacement);
        }
        Mode::Desktop => {
            let max_offset = instance
                .geometry
                .offsets
                .get(instance.max_index())
                .copied()
                .unwrap_or(0.0);
            let offset = (session.start_offset + displacement).clamp(0.0, max_offset);
            instance.current_offset = offset;
            host.set_track_offset(instance.track, offset);
        }
    }
}

fn finish_drag<H: Host>(
    instance: &mut Instance,
    host: &mut H,
    session: &PointerSession,
    end_x: f32,
    end_ms: u64,
) {
    host.set_drag_visual(instance.track, false);

    let displacement = session.start_x - end_x;
    let elapsed = end_ms.saturating_sub(session.started_at).max(1) as f32;
    let velocity = displacement / elapsed;

    let decision = swipe_decision(
        displacement,
        velocity,
        instance.settings.swipe_velocity,
        distance_threshold(instance, host),
    );

    match decision {
        SwipeOutcome::Navigate(direction) => nav::navigate(instance, host, direction),
        SwipeOutcome::SnapBack => nav::snap_to_nearest(instance, host),
    }
}
