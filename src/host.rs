//! Host Abstraction - Everything the engine needs from its embedder
//!
//! The engine is headless: it owns state and decisions but never touches a
//! real widget tree, network, or clock. A host (DOM bridge, GUI toolkit,
//! test harness) implements [`Host`] and drives the engine through the
//! entry points on [`Engine`](crate::engine::Engine).
//!
//! # Contract highlights
//!
//! - Style application is structured: the engine sends `(StyleProp,
//!   StyleValue)` pairs and later removes exactly the same property set.
//!   Hosts must treat `clear_styles` as full removal, not a reset to a
//!   default value.
//! - Timers never fire by themselves: `set_interval`, `set_timeout` and
//!   `request_frame` return a [`TimerId`](crate::types::TimerId) and the
//!   host calls `Engine::on_timer` with it when due. Intervals keep firing
//!   until cleared; timeouts and frames fire once.
//! - Before delivering any click originating inside a carousel track, the
//!   host must consult `Engine::on_click_capture` (the capture-phase guard)
//!   and drop the click when the answer is [`ClickAction::Suppress`].
//! - `bind_instance` / `unbind_instance` bracket the lifetime of the
//!   host-side event listeners for one root. The host retains its own
//!   handler identities so a release never detaches another instance's
//!   listeners.

use crate::reload::ReloadRequest;
use crate::types::{Direction, Mode, NodeId, RootId, TimerId};

// =============================================================================
// STYLE COMMANDS
// =============================================================================

/// Inline style property the engine may set on a track or slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProp {
    Display,
    Width,
    MaxWidth,
    /// Shorthand `flex: 0 0 <basis>`; the value carries the basis.
    Flex,
    Gap,
    Padding,
    OverflowX,
    ScrollSnapType,
    ScrollSnapAlign,
    ScrollBehavior,
    Cursor,
    GridTemplateColumns,
}

/// Value for a [`StyleProp`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleValue {
    /// A pixel length.
    Px(f32),
    /// A literal CSS keyword or expression.
    Keyword(&'static str),
}

/// Scroll motion requested through [`Host::scroll_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMotion {
    /// Jump without animation.
    Instant,
    /// Animate to the target position.
    Smooth,
}

/// Verdict of the capture-phase click guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// Deliver the click normally.
    Allow,
    /// Swallow the click; a drag gesture owns this pointer sequence.
    Suppress,
}

// =============================================================================
// HOST TRAIT
// =============================================================================

/// Services the embedding layer provides to the engine.
///
/// All methods are infallible from the engine's point of view: a host that
/// cannot honor a request (node already gone, timers unsupported in a test)
/// simply no-ops.
pub trait Host {
    // --- structure -----------------------------------------------------------

    /// All carousel roots currently present, initialized or not.
    fn carousel_roots(&self) -> Vec<RootId>;

    /// The slide container of a root, if present.
    fn track_of(&self, root: RootId) -> Option<NodeId>;

    /// The slides inside a root's track, in display order.
    fn slides(&self, root: RootId) -> Vec<NodeId>;

    /// A `data-*` attribute on the root, by unprefixed kebab-case name.
    fn data_attr(&self, root: RootId, name: &str) -> Option<String>;

    // --- measurement ---------------------------------------------------------

    /// Current outer width of the root container in pixels.
    fn container_width(&self, root: RootId) -> f32;

    /// Current viewport width in pixels.
    fn viewport_width(&self) -> f32;

    /// Whether the document is visible (autoplay pauses while hidden).
    fn is_document_visible(&self) -> bool;

    // --- styling -------------------------------------------------------------

    /// Apply inline styles to a node.
    fn set_styles(&mut self, node: NodeId, styles: &[(StyleProp, StyleValue)]);

    /// Remove the given inline properties from a node entirely.
    fn clear_styles(&mut self, node: NodeId, props: &[StyleProp]);

    /// Mark the root with the active layout mode (replaces any prior marker).
    fn set_mode_marker(&mut self, root: RootId, mode: Mode);

    /// Toggle the visual "dragging" state on the track.
    fn set_drag_visual(&mut self, track: NodeId, active: bool);

    // --- position ------------------------------------------------------------

    /// Current horizontal scroll position of a node.
    fn scroll_left(&self, node: NodeId) -> f32;

    /// Set the horizontal scroll position immediately (drag following).
    fn set_scroll_left(&mut self, node: NodeId, x: f32);

    /// Scroll a node to a horizontal position with the given motion.
    fn scroll_to(&mut self, node: NodeId, x: f32, motion: ScrollMotion);

    /// Position the track at `offset` pixels from its left edge (the host
    /// renders this as a leftward translation, e.g. `translateX(-offset)`).
    fn set_track_offset(&mut self, track: NodeId, offset: f32);

    // --- navigation buttons --------------------------------------------------

    /// Look up an existing nav button on the root.
    fn find_nav_button(&self, root: RootId, direction: Direction) -> Option<NodeId>;

    /// Create a nav button on the root (icon markup is the host's concern).
    fn create_nav_button(&mut self, root: RootId, direction: Direction) -> NodeId;

    fn set_button_enabled(&mut self, button: NodeId, enabled: bool);

    fn set_button_visible(&mut self, button: NodeId, visible: bool);

    // --- interaction ---------------------------------------------------------

    /// Closest clickable ancestor (anchor, button, click-handling element)
    /// of whatever sits under the given point inside the root.
    fn clickable_ancestor_at(&self, root: RootId, x: f32, y: f32) -> Option<NodeId>;

    /// Dispatch a synthetic click to a node, as if the user had clicked it.
    fn synthesize_click(&mut self, node: NodeId);

    // --- timers --------------------------------------------------------------

    /// Schedule a repeating timer; fires `Engine::on_timer` every `ms`.
    fn set_interval(&mut self, root: RootId, ms: u64) -> TimerId;

    /// Schedule a one-shot timer; fires `Engine::on_timer` once after `ms`.
    fn set_timeout(&mut self, root: RootId, ms: u64) -> TimerId;

    /// Schedule a one-shot animation-frame callback.
    fn request_frame(&mut self, root: RootId) -> TimerId;

    /// Cancel a pending timer of any kind. Unknown ids are ignored.
    fn clear_timer(&mut self, timer: TimerId);

    // --- lifecycle -----------------------------------------------------------

    /// Attach the host-side event listeners for a root and keep their
    /// identities for a later [`Host::unbind_instance`].
    fn bind_instance(&mut self, root: RootId);

    /// Detach exactly the listeners attached by the matching
    /// [`Host::bind_instance`]; other roots' listeners stay untouched.
    fn unbind_instance(&mut self, root: RootId);

    // --- reload transport ----------------------------------------------------

    /// Anti-forgery token supplied by the host page.
    fn nonce(&self) -> String;

    /// Fire the reload request. The host answers later, exactly once, via
    /// `Engine::on_reload_result` with the raw response body or a transport
    /// error. The engine never cancels an in-flight request.
    fn begin_reload(&mut self, root: RootId, request: &ReloadRequest);

    /// Replace the root's inner markup with a rendered fragment.
    fn replace_content(&mut self, root: RootId, html: &str);
}
