//! Layout Engine - Per-mode geometry computation and application
//!
//! Two layout strategies share one track:
//! - **Mobile**: a natively scrollable flex row with snap points; item width
//!   derived from the container width and the mobile column count.
//! - **Desktop**: a fixed-width flex row positioned by an explicit track
//!   offset; per-item width is a constant so column counts outside the
//!   supported range never reflow item size.
//!
//! Switching modes removes the previous mode's inline property set entirely
//! before applying the new one. The property sets differ by mode, so
//! overwriting is not sufficient.

mod track;

pub use track::{TrackLayout, solve_track};

use crate::engine::Instance;
use crate::host::{Host, StyleProp, StyleValue};
use crate::types::{Geometry, Mode, RootId};

// =============================================================================
// GEOMETRY CONSTANTS
// =============================================================================

/// Gap between slides in both modes.
pub const SLIDE_GAP: f32 = 12.0;

/// Fixed per-item width in desktop mode.
pub const DESKTOP_ITEM_WIDTH: f32 = 271.2;

/// Horizontal container padding subtracted before computing mobile item
/// width.
pub const MOBILE_EDGE_PADDING: f32 = 40.0;

// =============================================================================
// STYLE SETS
// =============================================================================

/// Track properties owned by the mobile layout.
pub const MOBILE_TRACK_PROPS: [StyleProp; 8] = [
    StyleProp::Display,
    StyleProp::Gap,
    StyleProp::Width,
    StyleProp::OverflowX,
    StyleProp::ScrollSnapType,
    StyleProp::ScrollBehavior,
    StyleProp::Padding,
    StyleProp::Cursor,
];

/// Slide properties owned by the mobile layout.
pub const MOBILE_SLIDE_PROPS: [StyleProp; 3] = [
    StyleProp::Flex,
    StyleProp::Width,
    StyleProp::ScrollSnapAlign,
];

/// Track properties owned by the desktop layout.
pub const DESKTOP_TRACK_PROPS: [StyleProp; 7] = [
    StyleProp::Display,
    StyleProp::Width,
    StyleProp::Gap,
    StyleProp::OverflowX,
    StyleProp::ScrollSnapType,
    StyleProp::Padding,
    StyleProp::Cursor,
];

/// Slide properties owned by the desktop layout.
pub const DESKTOP_SLIDE_PROPS: [StyleProp; 4] = [
    StyleProp::Flex,
    StyleProp::MaxWidth,
    StyleProp::Width,
    StyleProp::ScrollSnapAlign,
];

fn mobile_track_styles() -> [(StyleProp, StyleValue); 8] {
    [
        (StyleProp::Display, StyleValue::Keyword("flex")),
        (StyleProp::Gap, StyleValue::Px(SLIDE_GAP)),
        (StyleProp::Width, StyleValue::Keyword("auto")),
        (StyleProp::OverflowX, StyleValue::Keyword("auto")),
        (StyleProp::ScrollSnapType, StyleValue::Keyword("x mandatory")),
        (StyleProp::ScrollBehavior, StyleValue::Keyword("smooth")),
        (StyleProp::Padding, StyleValue::Keyword("0 20px")),
        (StyleProp::Cursor, StyleValue::Keyword("grab")),
    ]
}

fn mobile_slide_styles(item_width: f32) -> [(StyleProp, StyleValue); 3] {
    [
        (StyleProp::Flex, StyleValue::Px(item_width)),
        (StyleProp::Width, StyleValue::Px(item_width)),
        (StyleProp::ScrollSnapAlign, StyleValue::Keyword("start")),
    ]
}

fn desktop_track_styles(total_width: f32) -> [(StyleProp, StyleValue); 7] {
    [
        (StyleProp::Display, StyleValue::Keyword("flex")),
        (StyleProp::Width, StyleValue::Px(total_width)),
        (StyleProp::Gap, StyleValue::Px(SLIDE_GAP)),
        (StyleProp::OverflowX, StyleValue::Keyword("hidden")),
        (StyleProp::ScrollSnapType, StyleValue::Keyword("none")),
        (StyleProp::Padding, StyleValue::Keyword("0 20px")),
        (StyleProp::Cursor, StyleValue::Keyword("grab")),
    ]
}

fn desktop_slide_styles(item_width: f32) -> [(StyleProp, StyleValue); 4] {
    [
        (StyleProp::Flex, StyleValue::Px(item_width)),
        (StyleProp::MaxWidth, StyleValue::Px(item_width)),
        (StyleProp::Width, StyleValue::Px(item_width)),
        (StyleProp::ScrollSnapAlign, StyleValue::Keyword("none")),
    ]
}

// =============================================================================
// LAYOUT APPLICATION
// =============================================================================

/// Apply the instance's current mode to the track and slides.
///
/// Clears the other mode's inline geometry first, computes the new
/// geometry (mobile: container-derived item width; desktop: taffy pass over
/// the fixed-width row), and in desktop mode re-applies the canonical
/// offset for the current index so the visual state and `current_offset`
/// agree immediately.
pub fn apply_layout<H: Host>(instance: &mut Instance, host: &mut H) {
    clear_mode_styles(instance, host);

    match instance.mode {
        Mode::Mobile => {
            let usable =
                host.container_width(instance.root) - MOBILE_EDGE_PADDING - SLIDE_GAP;
            let item_width = (usable / instance.settings.mobile_columns as f32).max(0.0);

            host.set_styles(instance.track, &mobile_track_styles());
            for &slide in &instance.slides {
                host.set_styles(slide, &mobile_slide_styles(item_width));
            }

            instance.geometry = Geometry {
                item_width,
                gap: SLIDE_GAP,
                offsets: Vec::new(),
            };
        }
        Mode::Desktop => {
            let solved = solve_track(instance.slides.len(), DESKTOP_ITEM_WIDTH, SLIDE_GAP);

            host.set_styles(instance.track, &desktop_track_styles(solved.total_width));
            for &slide in &instance.slides {
                host.set_styles(slide, &desktop_slide_styles(DESKTOP_ITEM_WIDTH));
            }

            instance.geometry = Geometry {
                item_width: DESKTOP_ITEM_WIDTH,
                gap: SLIDE_GAP,
                offsets: solved.offsets,
            };

            instance.current_offset = instance
                .geometry
                .offsets
                .get(instance.current_index)
                .copied()
                .unwrap_or(0.0);
            host.set_track_offset(instance.track, instance.current_offset);
        }
    }

    host.set_mode_marker(instance.root, instance.mode);
    instance.styled_mode = Some(instance.mode);
}

/// Remove the inline property set of whichever mode is currently styled.
pub fn clear_mode_styles<H: Host>(instance: &mut Instance, host: &mut H) {
    let Some(prev) = instance.styled_mode.take() else {
        return;
    };

    let (track_props, slide_props): (&[StyleProp], &[StyleProp]) = match prev {
        Mode::Mobile => (&MOBILE_TRACK_PROPS, &MOBILE_SLIDE_PROPS),
        Mode::Desktop => (&DESKTOP_TRACK_PROPS, &DESKTOP_SLIDE_PROPS),
    };

    host.clear_styles(instance.track, track_props);
    for &slide in &instance.slides {
        host.clear_styles(slide, slide_props);
    }

    // The transform offset is desktop geometry too.
    if prev == Mode::Desktop {
        instance.current_offset = 0.0;
        host.set_track_offset(instance.track, 0.0);
    }
}

// =============================================================================
// GRID FALLBACK
// =============================================================================

/// Degrade a root to a static responsive grid after an init failure.
///
/// Absent structure is a no-op guard here, never an error: a root without a
/// track simply keeps its server-rendered markup.
pub fn apply_grid_fallback<H: Host>(host: &mut H, root: RootId) {
    if let Some(container) = host.track_of(root) {
        host.set_styles(
            container,
            &[
                (StyleProp::Display, StyleValue::Keyword("grid")),
                (
                    StyleProp::GridTemplateColumns,
                    StyleValue::Keyword("repeat(auto-fill, minmax(200px, 1fr))"),
                ),
                (StyleProp::Gap, StyleValue::Px(20.0)),
            ],
        );
    }

    for direction in [crate::types::Direction::Prev, crate::types::Direction::Next] {
        if let Some(button) = host.find_nav_button(root, direction) {
            host.set_button_visible(button, false);
        }
    }
}
