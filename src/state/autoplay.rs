//! Autoplay Coordinator - Interval-driven advancement
//!
//! A repeating host timer advances the carousel one step per tick. Ticks
//! are skipped while a pointer session is active or the document is
//! hidden. At the last page the index wraps to 0 by stepping back through
//! the same clamped navigate primitive user input uses; this wrap (rather
//! than the clamp manual navigation gets) is deliberate.

use crate::engine::Instance;
use crate::host::Host;
use crate::state::{drag::DragPhase, nav};

/// Signed step for one autoplay tick: forward, or back to the start when
/// at or past the last page.
pub fn wrap_step(current_index: usize, max_index: usize) -> i32 {
    if current_index >= max_index {
        -(current_index as i32)
    } else {
        1
    }
}

/// Start (or restart) the autoplay interval. Idempotent: any prior timer
/// is cleared first, so at most one interval exists per instance.
pub fn start<H: Host>(instance: &mut Instance, host: &mut H) {
    stop(instance, host);
    instance.autoplay_timer = Some(host.set_interval(instance.root, instance.settings.autoplay_ms));
}

/// Stop autoplay and null the handle.
pub fn stop<H: Host>(instance: &mut Instance, host: &mut H) {
    if let Some(timer) = instance.autoplay_timer.take() {
        host.clear_timer(timer);
    }
}

/// One interval tick.
pub fn tick<H: Host>(instance: &mut Instance, host: &mut H) {
    if instance.drag != DragPhase::Idle {
        return;
    }
    if !host.is_document_visible() {
        return;
    }

    let steps = wrap_step(instance.current_index, instance.max_index());
    nav::navigate_by(instance, host, steps);
}
