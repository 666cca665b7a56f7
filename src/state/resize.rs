//! Responsive Re-layout - Debounced viewport-resize handling
//!
//! Viewport resizes arrive in bursts; each burst restarts a 100 ms settle
//! timeout. When it fires, the mode is re-derived from the viewport width.
//! A mode change resets the index to 0 and reruns the full layout setup
//! (including the desktop offset-cache rebuild); button state is refreshed
//! either way.

use crate::engine::Instance;
use crate::host::Host;
use crate::layout;
use crate::state::nav;
use crate::types::Mode;

/// Settle window for bursts of resize events.
pub const RESIZE_DEBOUNCE_MS: u64 = 100;

/// A viewport resize was observed: (re)start the settle timeout.
pub fn on_viewport_resized<H: Host>(instance: &mut Instance, host: &mut H) {
    if let Some(timer) = instance.resize_timer.take() {
        host.clear_timer(timer);
    }
    instance.resize_timer = Some(host.set_timeout(instance.root, RESIZE_DEBOUNCE_MS));
}

/// The settle timeout fired: re-derive the mode and re-lay-out on change.
pub fn on_settle<H: Host>(instance: &mut Instance, host: &mut H) {
    instance.resize_timer = None;

    let mode = Mode::from_viewport(host.viewport_width());
    if mode != instance.mode {
        log::debug!(
            "carousel {:?} switching {:?} -> {:?}",
            instance.root,
            instance.mode,
            mode
        );
        instance.mode = mode;
        instance.current_index = 0;
        layout::apply_layout(instance, host);
    }

    nav::refresh_nav_state(instance, host);
}
