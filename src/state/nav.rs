//! Navigation Controller - Index paging, snapping, button state
//!
//! Desktop mode owns an authoritative `current_index` clamped to
//! `[0, slide_count − visible_items]` and positions the track by cached
//! offset. Mobile mode delegates positioning to native scrolling and only
//! *derives* an index from the scroll position (for button state and the
//! autoplay edge check), deferred to an animation frame by the engine.

use crate::engine::Instance;
use crate::host::{Host, ScrollMotion};
use crate::types::{Direction, Mode};

// =============================================================================
// INDEX MATH
// =============================================================================

/// Clamp an index step into `[0, max_index]`.
pub fn clamp_index(current: usize, steps: i32, max_index: usize) -> usize {
    (current as i64 + steps as i64).clamp(0, max_index as i64) as usize
}

/// Index of the cached offset closest to `current`. Ties resolve to the
/// earlier slide; an empty cache yields 0.
pub fn nearest_offset_index(offsets: &[f32], current: f32) -> usize {
    let mut nearest = 0;
    let mut best = f32::INFINITY;
    for (index, &offset) in offsets.iter().enumerate() {
        let distance = (offset - current).abs();
        if distance < best {
            best = distance;
            nearest = index;
        }
    }
    nearest
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// Navigate one step.
pub fn navigate<H: Host>(instance: &mut Instance, host: &mut H, direction: Direction) {
    navigate_by(instance, host, direction.step());
}

/// Navigate by a signed number of steps. User input always passes ±1; the
/// autoplay wrap passes `−current_index` to return to the start through the
/// same clamped path.
pub fn navigate_by<H: Host>(instance: &mut Instance, host: &mut H, steps: i32) {
    match instance.mode {
        Mode::Mobile => {
            let target =
                host.scroll_left(instance.track) + steps as f32 * instance.geometry.step_width();
            host.scroll_to(instance.track, target, ScrollMotion::Smooth);
        }
        Mode::Desktop => {
            instance.current_index = clamp_index(instance.current_index, steps, instance.max_index());
            apply_index_position(instance, host);
        }
    }

    refresh_nav_state(instance, host);
}

/// Settle the track on the nearest slide boundary after a non-qualifying
/// drag release.
pub fn snap_to_nearest<H: Host>(instance: &mut Instance, host: &mut H) {
    match instance.mode {
        Mode::Mobile => {
            let step = instance.geometry.step_width();
            if step > 0.0 {
                let scroll = host.scroll_left(instance.track);
                let last = instance.slides.len().saturating_sub(1);
                let index = ((scroll / step).round().max(0.0) as usize).min(last);
                instance.current_index = index;
                host.scroll_to(instance.track, index as f32 * step, ScrollMotion::Smooth);
            }
        }
        Mode::Desktop => {
            // The nearest slide is found from the explicit current offset
            // (a drag may have moved the track without committing an
            // index), then clamped back into the valid page range.
            let nearest = nearest_offset_index(&instance.geometry.offsets, instance.current_offset);
            instance.current_index = nearest.min(instance.max_index());
            apply_index_position(instance, host);
        }
    }

    refresh_nav_state(instance, host);
}

/// Recompute the mobile index from the live scroll position. Called on the
/// animation frame after scroll events settle.
pub fn derive_index_from_scroll<H: Host>(instance: &mut Instance, host: &mut H) {
    if instance.mode != Mode::Mobile {
        return;
    }

    let step = instance.geometry.step_width();
    if step > 0.0 {
        let scroll = host.scroll_left(instance.track);
        let last = instance.slides.len().saturating_sub(1);
        instance.current_index = ((scroll / step).round().max(0.0) as usize).min(last);
    }

    refresh_nav_state(instance, host);
}

/// Position the desktop track at the canonical offset for `current_index`.
pub fn apply_index_position<H: Host>(instance: &mut Instance, host: &mut H) {
    let offset = instance
        .geometry
        .offsets
        .get(instance.current_index)
        .copied()
        .unwrap_or(0.0);
    instance.current_offset = offset;
    host.set_track_offset(instance.track, offset);
}

// =============================================================================
// BUTTON STATE
// =============================================================================

/// Refresh nav-button visibility and enabled state for the current mode
/// and index. Mobile hides both buttons; continuous scrolling needs no
/// page indicator.
pub fn refresh_nav_state<H: Host>(instance: &mut Instance, host: &mut H) {
    match instance.mode {
        Mode::Mobile => {
            host.set_button_visible(instance.prev_button, false);
            host.set_button_visible(instance.next_button, false);
        }
        Mode::Desktop => {
            let max_index = instance.max_index();
            host.set_button_enabled(instance.prev_button, instance.current_index > 0);
            host.set_button_enabled(instance.next_button, instance.current_index < max_index);
            host.set_button_visible(instance.prev_button, true);
            host.set_button_visible(instance.next_button, true);
        }
    }
}
