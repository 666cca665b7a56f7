//! # carousel-core
//!
//! Headless product-carousel engine: drag gestures, index paging,
//! autoplay, responsive layout.
//!
//! The engine owns the interaction and layout state machine for
//! horizontally scrolling product listings, but performs no rendering and
//! no I/O. An embedding layer implements the [`Host`](host::Host) trait
//! (a DOM bridge, a GUI toolkit, a test harness) and drives the engine
//! through the entry points on [`Engine`](engine::Engine):
//!
//! ```text
//! host events ──▶ Engine (registry) ──▶ drag FSM / nav / autoplay / resize
//!                                            │
//!                     style & position commands, timers, reload requests
//!                                            ▼
//!                                          Host
//! ```
//!
//! Two layout modes share one slide track: small viewports get a natively
//! scrollable row with snap points; wide viewports get index-based paging
//! over a fixed-width flex row positioned by an explicit track offset.
//! The desktop row geometry is solved with [taffy](https://docs.rs/taffy).
//!
//! ## Modules
//!
//! - [`types`] - Identities, modes, pointer events, settings
//! - [`host`] - The host abstraction and style/scroll command vocabulary
//! - [`engine`] - Registry, per-root instances, event routing
//! - [`layout`] - Per-mode geometry computation and application
//! - [`state`] - Drag FSM, navigation, autoplay, resize handling
//! - [`reload`] - Content-identifier watching and the reload transport
//!   contract

pub mod engine;
pub mod host;
pub mod layout;
pub mod reload;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{Engine, Instance};

pub use host::{ClickAction, Host, ScrollMotion, StyleProp, StyleValue};

pub use layout::{
    DESKTOP_ITEM_WIDTH, MOBILE_EDGE_PADDING, SLIDE_GAP, TrackLayout, apply_grid_fallback,
    apply_layout, solve_track,
};

pub use state::{
    DragPhase, PointerSession, RESIZE_DEBOUNCE_MS, SwipeOutcome, clamp_index,
    nearest_offset_index, swipe_decision,
};

pub use reload::{RELOAD_ACTION, ReloadError, ReloadRequest, TransportError};
