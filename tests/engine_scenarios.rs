//! End-to-end scenarios driven through a scripted mock host.
//!
//! The mock records every command the engine issues (styles, positions,
//! timers, clicks, reload requests) so each scenario can assert on the
//! exact host-visible behavior.

use std::collections::HashMap;

use carousel_core::{
    ClickAction, Direction, DragPhase, Engine, Host, Mode, NodeId, PointerEvent, ReloadRequest,
    RootId, ScrollMotion, StyleProp, StyleValue, TimerId, TransportError, apply_grid_fallback,
};

// =============================================================================
// MOCK HOST
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Interval,
    Timeout,
    Frame,
}

#[derive(Debug, Clone)]
struct TimerSpec {
    root: RootId,
    ms: u64,
    kind: TimerKind,
}

#[derive(Default)]
struct MockHost {
    roots: Vec<RootId>,
    tracks: HashMap<RootId, NodeId>,
    slides: HashMap<RootId, Vec<NodeId>>,
    attrs: HashMap<(RootId, String), String>,
    container_widths: HashMap<RootId, f32>,
    viewport: f32,
    document_visible: bool,
    styles: HashMap<NodeId, HashMap<StyleProp, StyleValue>>,
    mode_markers: HashMap<RootId, Mode>,
    drag_visuals: HashMap<NodeId, bool>,
    scrolls: HashMap<NodeId, f32>,
    smooth_scrolls: Vec<(NodeId, f32)>,
    track_offsets: HashMap<NodeId, f32>,
    nav_buttons: HashMap<(RootId, Direction), NodeId>,
    buttons_enabled: HashMap<NodeId, bool>,
    buttons_visible: HashMap<NodeId, bool>,
    clickables: HashMap<RootId, NodeId>,
    clicks: Vec<NodeId>,
    timers: HashMap<TimerId, TimerSpec>,
    next_timer: u64,
    next_node: u64,
    binds: HashMap<RootId, u32>,
    unbinds: HashMap<RootId, u32>,
    reload_requests: Vec<(RootId, ReloadRequest)>,
    replaced: Vec<(RootId, String)>,
}

const TRACK: NodeId = NodeId(10);

impl MockHost {
    fn with_root(slide_count: usize, viewport: f32) -> (Self, RootId) {
        let root = RootId(1);
        let mut host = MockHost {
            viewport,
            document_visible: true,
            next_node: 1000,
            ..MockHost::default()
        };
        host.roots.push(root);
        host.tracks.insert(root, TRACK);
        host.slides.insert(
            root,
            (0..slide_count).map(|i| NodeId(100 + i as u64)).collect(),
        );
        host.container_widths.insert(root, 1000.0);
        (host, root)
    }

    fn set_attr(&mut self, root: RootId, name: &str, value: &str) {
        self.attrs
            .insert((root, name.to_string()), value.to_string());
    }

    fn styles_of(&self, node: NodeId) -> &HashMap<StyleProp, StyleValue> {
        self.styles.get(&node).expect("node has styles")
    }

    fn mint_timer(&mut self, root: RootId, ms: u64, kind: TimerKind) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timers.insert(id, TimerSpec { root, ms, kind });
        id
    }
}

impl Host for MockHost {
    fn carousel_roots(&self) -> Vec<RootId> {
        self.roots.clone()
    }

    fn track_of(&self, root: RootId) -> Option<NodeId> {
        self.tracks.get(&root).copied()
    }

    fn slides(&self, root: RootId) -> Vec<NodeId> {
        self.slides.get(&root).cloned().unwrap_or_default()
    }

    fn data_attr(&self, root: RootId, name: &str) -> Option<String> {
        self.attrs.get(&(root, name.to_string())).cloned()
    }

    fn container_width(&self, root: RootId) -> f32 {
        self.container_widths.get(&root).copied().unwrap_or(0.0)
    }

    fn viewport_width(&self) -> f32 {
        self.viewport
    }

    fn is_document_visible(&self) -> bool {
        self.document_visible
    }

    fn set_styles(&mut self, node: NodeId, styles: &[(StyleProp, StyleValue)]) {
        let entry = self.styles.entry(node).or_default();
        for &(prop, value) in styles {
            entry.insert(prop, value);
        }
    }

    fn clear_styles(&mut self, node: NodeId, props: &[StyleProp]) {
        if let Some(entry) = self.styles.get_mut(&node) {
            for prop in props {
                entry.remove(prop);
            }
        }
    }

    fn set_mode_marker(&mut self, root: RootId, mode: Mode) {
        self.mode_markers.insert(root, mode);
    }

    fn set_drag_visual(&mut self, track: NodeId, active: bool) {
        self.drag_visuals.insert(track, active);
    }

    fn scroll_left(&self, node: NodeId) -> f32 {
        self.scrolls.get(&node).copied().unwrap_or(0.0)
    }

    fn set_scroll_left(&mut self, node: NodeId, x: f32) {
        self.scrolls.insert(node, x);
    }

    fn scroll_to(&mut self, node: NodeId, x: f32, _motion: ScrollMotion) {
        self.smooth_scrolls.push((node, x));
        self.scrolls.insert(node, x);
    }

    fn set_track_offset(&mut self, track: NodeId, offset: f32) {
        self.track_offsets.insert(track, offset);
    }

    fn find_nav_button(&self, root: RootId, direction: Direction) -> Option<NodeId> {
        self.nav_buttons.get(&(root, direction)).copied()
    }

    fn create_nav_button(&mut self, root: RootId, direction: Direction) -> NodeId {
        self.next_node += 1;
        let button = NodeId(self.next_node);
        self.nav_buttons.insert((root, direction), button);
        button
    }

    fn set_button_enabled(&mut self, button: NodeId, enabled: bool) {
        self.buttons_enabled.insert(button, enabled);
    }

    fn set_button_visible(&mut self, button: NodeId, visible: bool) {
        self.buttons_visible.insert(button, visible);
    }

    fn clickable_ancestor_at(&self, root: RootId, _x: f32, _y: f32) -> Option<NodeId> {
        self.clickables.get(&root).copied()
    }

    fn synthesize_click(&mut self, node: NodeId) {
        self.clicks.push(node);
    }

    fn set_interval(&mut self, root: RootId, ms: u64) -> TimerId {
        self.mint_timer(root, ms, TimerKind::Interval)
    }

    fn set_timeout(&mut self, root: RootId, ms: u64) -> TimerId {
        self.mint_timer(root, ms, TimerKind::Timeout)
    }

    fn request_frame(&mut self, root: RootId) -> TimerId {
        self.mint_timer(root, 0, TimerKind::Frame)
    }

    fn clear_timer(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }

    fn bind_instance(&mut self, root: RootId) {
        *self.binds.entry(root).or_default() += 1;
    }

    fn unbind_instance(&mut self, root: RootId) {
        *self.unbinds.entry(root).or_default() += 1;
    }

    fn nonce(&self) -> String {
        "test-nonce".to_string()
    }

    fn begin_reload(&mut self, root: RootId, request: &ReloadRequest) {
        self.reload_requests.push((root, request.clone()));
    }

    fn replace_content(&mut self, root: RootId, html: &str) {
        self.replaced.push((root, html.to_string()));
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn engine_with_root(slide_count: usize, viewport: f32) -> (Engine<MockHost>, RootId) {
    let (host, root) = MockHost::with_root(slide_count, viewport);
    let mut engine = Engine::new(host);
    engine.scan();
    (engine, root)
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 0.5,
        "{actual} not close to {expected}"
    );
}

/// Press, move once, release; timestamps give the requested elapsed time.
fn drag(engine: &mut Engine<MockHost>, root: RootId, start_x: f32, end_x: f32, elapsed_ms: u64) {
    engine.on_pointer_down(root, &PointerEvent::mouse(start_x, 50.0, 1_000));
    engine.on_pointer_move(&PointerEvent::mouse(end_x, 50.0, 1_000 + elapsed_ms / 2));
    engine.on_pointer_up(&PointerEvent::mouse(end_x, 50.0, 1_000 + elapsed_ms));
}

// =============================================================================
// DISCOVERY & FALLBACK
// =============================================================================

#[test]
fn test_scan_initializes_each_root_once() {
    let (mut engine, root) = engine_with_root(8, 1024.0);

    engine.scan();
    engine.on_nodes_added();

    assert!(engine.instance(root).is_some());
    assert_eq!(engine.host().binds[&root], 1);
}

#[test]
fn test_init_failure_falls_back_and_is_not_retried() {
    let (mut host, root) = MockHost::with_root(8, 1024.0);
    host.tracks.remove(&root);

    let mut engine = Engine::new(host);
    engine.scan();
    engine.scan();

    assert!(engine.is_failed(root));
    assert!(engine.instance(root).is_none());
    assert!(engine.host().binds.get(&root).is_none());
}

#[test]
fn test_grid_fallback_styles_and_hides_nav() {
    let (mut host, root) = MockHost::with_root(4, 1024.0);
    let prev = host.create_nav_button(root, Direction::Prev);
    let next = host.create_nav_button(root, Direction::Next);

    apply_grid_fallback(&mut host, root);

    let styles = host.styles_of(TRACK);
    assert_eq!(
        styles.get(&StyleProp::Display),
        Some(&StyleValue::Keyword("grid"))
    );
    assert!(styles.contains_key(&StyleProp::GridTemplateColumns));
    assert_eq!(styles.get(&StyleProp::Gap), Some(&StyleValue::Px(20.0)));
    assert_eq!(host.buttons_visible[&prev], false);
    assert_eq!(host.buttons_visible[&next], false);
}

#[test]
fn test_empty_carousel_is_safe() {
    let (mut engine, root) = engine_with_root(0, 1024.0);

    engine.on_nav_press(root, Direction::Next);
    engine.on_nav_press(root, Direction::Prev);

    let instance = engine.instance(root).unwrap();
    assert_eq!(instance.current_index, 0);
    assert!(instance.geometry.offsets.is_empty());
}

// =============================================================================
// DESKTOP NAVIGATION
// =============================================================================

#[test]
fn test_navigate_clamps_at_last_page() {
    // 8 slides, 5 visible: max index 3.
    let (mut engine, root) = engine_with_root(8, 1024.0);

    let mut seen = Vec::new();
    for _ in 0..4 {
        engine.on_nav_press(root, Direction::Next);
        seen.push(engine.instance(root).unwrap().current_index);
    }
    assert_eq!(seen, vec![1, 2, 3, 3]);

    let instance = engine.instance(root).unwrap();
    let next = instance.nav_button(Direction::Next);
    let prev = instance.nav_button(Direction::Prev);
    assert_eq!(engine.host().buttons_enabled[&next], false);
    assert_eq!(engine.host().buttons_enabled[&prev], true);
    assert_close(engine.host().track_offsets[&TRACK], 3.0 * 283.2);
}

#[test]
fn test_navigate_prev_clamps_at_zero() {
    let (mut engine, root) = engine_with_root(8, 1024.0);

    engine.on_nav_press(root, Direction::Prev);

    let instance = engine.instance(root).unwrap();
    assert_eq!(instance.current_index, 0);
    let prev = instance.nav_button(Direction::Prev);
    assert_eq!(engine.host().buttons_enabled[&prev], false);
    assert_close(engine.host().track_offsets[&TRACK], 0.0);
}

// =============================================================================
// DRAG GESTURES
// =============================================================================

#[test]
fn test_failed_swipe_snaps_back() {
    let (mut engine, root) = engine_with_root(8, 1024.0);
    engine.on_nav_press(root, Direction::Next); // index 1, offset 283.2

    // 20 px over a full second: below both thresholds.
    engine.on_pointer_down(root, &PointerEvent::mouse(500.0, 50.0, 1_000));
    engine.on_pointer_move(&PointerEvent::mouse(480.0, 50.0, 1_500));

    // Mid-drag the track follows the pointer and shows the drag visual.
    assert_close(engine.host().track_offsets[&TRACK], 303.2);
    assert_close(engine.instance(root).unwrap().current_offset, 303.2);
    assert_eq!(engine.host().drag_visuals[&TRACK], true);

    engine.on_pointer_up(&PointerEvent::mouse(480.0, 50.0, 2_000));
    assert_eq!(engine.host().drag_visuals[&TRACK], false);

    let instance = engine.instance(root).unwrap();
    assert_eq!(instance.current_index, 1);
    assert_close(engine.host().track_offsets[&TRACK], 283.2);
    assert_eq!(instance.drag, DragPhase::Settling);
}

#[test]
fn test_fast_flick_navigates_on_velocity() {
    let (mut engine, root) = engine_with_root(8, 1024.0);

    // 30 px in 50 ms = 0.6 px/ms: above velocity, below distance.
    drag(&mut engine, root, 500.0, 470.0, 50);

    assert_eq!(engine.instance(root).unwrap().current_index, 1);
}

#[test]
fn test_slow_long_drag_navigates_on_distance() {
    let (mut engine, root) = engine_with_root(8, 1024.0);

    // 100 px over a second = 0.1 px/ms: below velocity, above distance.
    drag(&mut engine, root, 500.0, 400.0, 1_000);

    assert_eq!(engine.instance(root).unwrap().current_index, 1);
}

#[test]
fn test_rightward_swipe_navigates_prev() {
    let (mut engine, root) = engine_with_root(8, 1024.0);
    engine.on_nav_press(root, Direction::Next);
    engine.on_nav_press(root, Direction::Next); // index 2

    drag(&mut engine, root, 400.0, 500.0, 50);

    assert_eq!(engine.instance(root).unwrap().current_index, 1);
}

#[test]
fn test_tap_synthesizes_click_exactly_once() {
    let (mut engine, root) = engine_with_root(8, 1024.0);
    let link = NodeId(555);
    engine.host_mut().clickables.insert(root, link);

    engine.on_pointer_down(root, &PointerEvent::mouse(500.0, 50.0, 1_000));
    engine.on_pointer_up(&PointerEvent::mouse(502.0, 50.0, 1_080));

    assert_eq!(engine.host().clicks, vec![link]);
    assert_eq!(engine.on_click_capture(root), ClickAction::Allow);
    assert_eq!(engine.instance(root).unwrap().current_index, 0);
}

#[test]
fn test_drag_over_link_suppresses_click() {
    let (mut engine, root) = engine_with_root(8, 1024.0);
    engine.host_mut().clickables.insert(root, NodeId(555));

    drag(&mut engine, root, 500.0, 400.0, 1_000);

    assert!(engine.host().clicks.is_empty());
    // The capture-phase guard swallows the click trailing the release,
    // then the FSM settles back to idle.
    assert_eq!(engine.on_click_capture(root), ClickAction::Suppress);
    assert_eq!(engine.on_click_capture(root), ClickAction::Allow);
}

#[test]
fn test_secondary_button_never_starts_a_session() {
    let (mut engine, root) = engine_with_root(8, 1024.0);

    let press = PointerEvent::new(
        500.0,
        50.0,
        carousel_core::PointerButtons::SECONDARY,
        1_000,
    );
    engine.on_pointer_down(root, &press);
    engine.on_pointer_move(&PointerEvent::mouse(400.0, 50.0, 1_050));
    engine.on_pointer_up(&PointerEvent::mouse(400.0, 50.0, 1_100));

    assert_eq!(engine.instance(root).unwrap().current_index, 0);
    assert_eq!(engine.instance(root).unwrap().drag, DragPhase::Idle);
}

#[test]
fn test_cancel_evaluates_drag_at_last_position() {
    let (mut engine, root) = engine_with_root(8, 1024.0);

    engine.on_pointer_down(root, &PointerEvent::mouse(500.0, 50.0, 1_000));
    engine.on_pointer_move(&PointerEvent::mouse(400.0, 50.0, 1_050));
    engine.on_pointer_cancel(root);

    // 100 px fast: navigates even though the release never arrived.
    assert_eq!(engine.instance(root).unwrap().current_index, 1);
}

// =============================================================================
// RESPONSIVE MODE SWITCHING
// =============================================================================

#[test]
fn test_mode_switch_resets_index_and_clears_styles() {
    let (mut engine, root) = engine_with_root(8, 1024.0);
    engine.on_nav_press(root, Direction::Next); // index 1

    let slide = NodeId(100);
    assert!(engine.host().styles_of(slide).contains_key(&StyleProp::MaxWidth));

    engine.host_mut().viewport = 500.0;
    engine.on_viewport_resized();
    let timer = engine.instance(root).unwrap().resize_timer.unwrap();
    engine.on_timer(timer);

    let instance = engine.instance(root).unwrap();
    assert_eq!(instance.mode, Mode::Mobile);
    assert_eq!(instance.current_index, 0);
    assert!(instance.geometry.offsets.is_empty());
    // Mobile item width: (1000 − 40 − 12) / 2.
    assert_close(instance.geometry.item_width, 474.0);

    // Desktop-only slide geometry is gone, mobile styling is present.
    assert!(!engine.host().styles_of(slide).contains_key(&StyleProp::MaxWidth));
    assert_eq!(
        engine.host().styles_of(slide).get(&StyleProp::ScrollSnapAlign),
        Some(&StyleValue::Keyword("start"))
    );
    let track_styles = engine.host().styles_of(TRACK);
    assert_eq!(
        track_styles.get(&StyleProp::OverflowX),
        Some(&StyleValue::Keyword("auto"))
    );
    assert!(track_styles.contains_key(&StyleProp::ScrollBehavior));
    assert_eq!(engine.host().mode_markers[&root], Mode::Mobile);
    // The desktop transform was cleared along with its styles.
    assert_close(engine.host().track_offsets[&TRACK], 0.0);

    // And back: mobile-only properties are removed again.
    engine.host_mut().viewport = 1200.0;
    engine.on_viewport_resized();
    let timer = engine.instance(root).unwrap().resize_timer.unwrap();
    engine.on_timer(timer);

    let instance = engine.instance(root).unwrap();
    assert_eq!(instance.mode, Mode::Desktop);
    assert_eq!(instance.geometry.offsets.len(), 8);
    assert!(!engine.host().styles_of(TRACK).contains_key(&StyleProp::ScrollBehavior));
    assert!(engine.host().styles_of(slide).contains_key(&StyleProp::MaxWidth));
    assert_close(engine.host().track_offsets[&TRACK], 0.0);
}

#[test]
fn test_resize_debounce_restarts() {
    let (mut engine, root) = engine_with_root(8, 1024.0);

    engine.on_viewport_resized();
    let first = engine.instance(root).unwrap().resize_timer.unwrap();
    engine.on_viewport_resized();
    let second = engine.instance(root).unwrap().resize_timer.unwrap();

    assert_ne!(first, second);
    assert!(!engine.host().timers.contains_key(&first));
    let spec = &engine.host().timers[&second];
    assert_eq!(spec.kind, TimerKind::Timeout);
    assert_eq!(spec.ms, 100);
    assert_eq!(spec.root, root);
}

#[test]
fn test_resize_without_mode_change_keeps_index() {
    let (mut engine, root) = engine_with_root(8, 1024.0);
    engine.on_nav_press(root, Direction::Next);

    engine.host_mut().viewport = 1600.0;
    engine.on_viewport_resized();
    let timer = engine.instance(root).unwrap().resize_timer.unwrap();
    engine.on_timer(timer);

    assert_eq!(engine.instance(root).unwrap().current_index, 1);
}

// =============================================================================
// MOBILE MODE
// =============================================================================

#[test]
fn test_mobile_hides_nav_buttons() {
    let (mut engine, root) = engine_with_root(8, 500.0);

    let instance = engine.instance(root).unwrap();
    let prev = instance.nav_button(Direction::Prev);
    let next = instance.nav_button(Direction::Next);
    assert_eq!(engine.host().buttons_visible[&prev], false);
    assert_eq!(engine.host().buttons_visible[&next], false);

    engine.on_nav_press(root, Direction::Next);
    assert_eq!(engine.host().buttons_visible[&next], false);
}

#[test]
fn test_mobile_navigate_scrolls_one_step() {
    let (mut engine, root) = engine_with_root(8, 500.0);
    let step = engine.instance(root).unwrap().geometry.step_width();

    engine.on_nav_press(root, Direction::Next);

    assert_eq!(engine.host().smooth_scrolls.len(), 1);
    let (node, target) = engine.host().smooth_scrolls[0];
    assert_eq!(node, TRACK);
    assert_close(target, step);
}

#[test]
fn test_mobile_drag_follows_scroll() {
    let (mut engine, root) = engine_with_root(8, 500.0);
    engine.host_mut().scrolls.insert(TRACK, 200.0);

    engine.on_pointer_down(root, &PointerEvent::touch(300.0, 50.0, 1_000));
    engine.on_pointer_move(&PointerEvent::touch(250.0, 50.0, 1_050));

    assert_close(engine.host().scrolls[&TRACK], 250.0);
}

#[test]
fn test_mobile_scroll_derives_index_on_frame() {
    let (mut engine, root) = engine_with_root(8, 500.0);
    let step = engine.instance(root).unwrap().geometry.step_width();
    engine.host_mut().scrolls.insert(TRACK, 2.0 * step);

    engine.on_track_scrolled(root);
    let frame = engine.instance(root).unwrap().frame_timer.unwrap();

    // Rapid scroll events coalesce onto the pending frame.
    engine.on_track_scrolled(root);
    assert_eq!(engine.instance(root).unwrap().frame_timer, Some(frame));

    engine.on_timer(frame);
    let instance = engine.instance(root).unwrap();
    assert_eq!(instance.current_index, 2);
    assert_eq!(instance.frame_timer, None);
}

// =============================================================================
// AUTOPLAY
// =============================================================================

fn autoplay_engine(slide_count: usize, viewport: f32) -> (Engine<MockHost>, RootId) {
    let (mut host, root) = MockHost::with_root(slide_count, viewport);
    host.set_attr(root, "autoplay", "true");
    let mut engine = Engine::new(host);
    engine.scan();
    (engine, root)
}

#[test]
fn test_autoplay_advances_one_step() {
    let (mut engine, root) = autoplay_engine(8, 1024.0);

    let timer = engine.instance(root).unwrap().autoplay_timer.unwrap();
    assert_eq!(engine.host().timers[&timer].ms, 3000);

    engine.on_timer(timer);
    assert_eq!(engine.instance(root).unwrap().current_index, 1);
}

#[test]
fn test_autoplay_wraps_to_zero_at_last_page() {
    let (mut engine, root) = autoplay_engine(8, 1024.0);
    for _ in 0..3 {
        engine.on_nav_press(root, Direction::Next);
    }
    assert_eq!(engine.instance(root).unwrap().current_index, 3);

    let timer = engine.instance(root).unwrap().autoplay_timer.unwrap();
    engine.on_timer(timer);

    assert_eq!(engine.instance(root).unwrap().current_index, 0);
    assert_close(engine.host().track_offsets[&TRACK], 0.0);
}

#[test]
fn test_autoplay_skips_while_hidden() {
    let (mut engine, root) = autoplay_engine(8, 1024.0);
    engine.host_mut().document_visible = false;

    let timer = engine.instance(root).unwrap().autoplay_timer.unwrap();
    engine.on_timer(timer);

    assert_eq!(engine.instance(root).unwrap().current_index, 0);
}

#[test]
fn test_autoplay_suspends_during_pointer_session() {
    let (mut engine, root) = autoplay_engine(8, 1024.0);
    let timer = engine.instance(root).unwrap().autoplay_timer.unwrap();

    engine.on_pointer_down(root, &PointerEvent::mouse(500.0, 50.0, 1_000));
    assert_eq!(engine.instance(root).unwrap().autoplay_timer, None);
    assert!(!engine.host().timers.contains_key(&timer));

    engine.on_pointer_up(&PointerEvent::mouse(500.0, 50.0, 1_050));
    let restarted = engine.instance(root).unwrap().autoplay_timer.unwrap();
    assert_eq!(engine.host().timers[&restarted].ms, 3000);
}

// =============================================================================
// CONTENT RELOAD
// =============================================================================

fn slugged_engine() -> (Engine<MockHost>, RootId) {
    let (mut host, root) = MockHost::with_root(8, 1024.0);
    host.set_attr(root, "slug", "a");
    let mut engine = Engine::new(host);
    engine.scan();
    (engine, root)
}

#[test]
fn test_slug_change_requests_reload() {
    let (mut engine, root) = slugged_engine();

    engine.host_mut().set_attr(root, "slug", "b");
    engine.on_attribute_changed(root);

    let requests = &engine.host().reload_requests;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1.action, "load_carousel");
    assert_eq!(requests[0].1.slug, "b");
    assert_eq!(requests[0].1.cache_buster, 1);
    assert_eq!(requests[0].1.nonce, "test-nonce");
    assert!(engine.instance(root).unwrap().reload_in_flight);
}

#[test]
fn test_same_slug_does_not_reload() {
    let (mut engine, root) = slugged_engine();

    engine.on_attribute_changed(root);

    assert!(engine.host().reload_requests.is_empty());
}

#[test]
fn test_reload_success_rebuilds_instance() {
    let (mut engine, root) = slugged_engine();
    engine.on_nav_press(root, Direction::Next); // index 1

    engine.host_mut().set_attr(root, "slug", "b");
    engine.on_attribute_changed(root);
    engine.on_reload_result(
        root,
        Ok(r#"{"success": true, "data": {"html": "<div>b</div>"}}"#.to_string()),
    );

    let instance = engine.instance(root).unwrap();
    assert_eq!(instance.current_index, 0);
    assert_eq!(instance.loaded_slug.as_deref(), Some("b"));
    assert!(!instance.reload_in_flight);
    assert_eq!(instance.geometry.offsets.len(), 8);
    assert_eq!(
        engine.host().replaced,
        vec![(root, "<div>b</div>".to_string())]
    );
    // Old bindings were released before the new ones were attached.
    assert_eq!(engine.host().binds[&root], 2);
    assert_eq!(engine.host().unbinds[&root], 1);
}

#[test]
fn test_reload_failure_keeps_previous_content() {
    let (mut engine, root) = slugged_engine();
    engine.on_nav_press(root, Direction::Next);
    engine.on_nav_press(root, Direction::Next); // index 2

    engine.host_mut().set_attr(root, "slug", "b");
    engine.on_attribute_changed(root);
    engine.on_reload_result(root, Err(TransportError::Network("boom".to_string())));

    let instance = engine.instance(root).unwrap();
    assert_eq!(instance.current_index, 2);
    assert!(!instance.reload_in_flight);
    assert!(engine.host().replaced.is_empty());
    assert_eq!(engine.host().binds[&root], 1);
    assert!(engine.host().unbinds.get(&root).is_none());
}

#[test]
fn test_rejected_payload_keeps_previous_content() {
    let (mut engine, root) = slugged_engine();

    engine.host_mut().set_attr(root, "slug", "b");
    engine.on_attribute_changed(root);
    engine.on_reload_result(root, Ok(r#"{"success": false}"#.to_string()));

    assert!(engine.host().replaced.is_empty());
    assert!(engine.instance(root).is_some());
}

#[test]
fn test_reload_coalesces_rapid_slug_changes() {
    let (mut engine, root) = slugged_engine();

    engine.host_mut().set_attr(root, "slug", "b");
    engine.on_attribute_changed(root);
    assert_eq!(engine.host().reload_requests.len(), 1);

    // A newer identifier while the first request is in flight: remembered,
    // not fired.
    engine.host_mut().set_attr(root, "slug", "c");
    engine.on_attribute_changed(root);
    assert_eq!(engine.host().reload_requests.len(), 1);

    engine.on_reload_result(
        root,
        Ok(r#"{"success": true, "data": {"html": "<div>b</div>"}}"#.to_string()),
    );

    // The pending identifier is fetched next with a fresh token.
    let requests = &engine.host().reload_requests;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].1.slug, "c");
    assert_eq!(requests[1].1.cache_buster, 2);
    assert!(engine.instance(root).unwrap().reload_in_flight);

    engine.on_reload_result(
        root,
        Ok(r#"{"success": true, "data": {"html": "<div>c</div>"}}"#.to_string()),
    );
    let instance = engine.instance(root).unwrap();
    assert_eq!(instance.loaded_slug.as_deref(), Some("c"));
    assert!(!instance.reload_in_flight);
    assert_eq!(engine.host().replaced.len(), 2);
}

// =============================================================================
// DESTROY
// =============================================================================

#[test]
fn test_destroy_releases_everything() {
    let (mut engine, root) = autoplay_engine(8, 1024.0);
    let timer = engine.instance(root).unwrap().autoplay_timer.unwrap();

    engine.destroy(root);

    assert!(engine.instance(root).is_none());
    assert!(!engine.host().timers.contains_key(&timer));
    assert_eq!(engine.host().unbinds[&root], 1);

    // A later scan may initialize the root again from scratch.
    engine.scan();
    assert!(engine.instance(root).is_some());
    assert_eq!(engine.host().binds[&root], 2);
}
