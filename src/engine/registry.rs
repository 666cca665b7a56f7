//! Engine & Registry - Root discovery, instance lifecycle, event routing
//!
//! The registry is an explicit map from root identity to instance state:
//! discovery consults it instead of marking the host tree, so a rescan
//! after any node insertion initializes each root exactly once. Roots
//! whose initialization failed are recorded too: they fell back to the
//! static grid and are never retried.
//!
//! The engine is the single entry surface the host drives. Per-root events
//! (`on_pointer_down`, `on_nav_press`, …) carry the root; document-level
//! pointer moves and releases are routed to whichever instance holds the
//! active pointer session.

use std::collections::HashMap;

use crate::host::{ClickAction, Host};
use crate::layout;
use crate::reload::{self, TransportError};
use crate::state::{autoplay, drag, nav, resize};
use crate::types::{CarouselError, Direction, Geometry, Mode, PointerEvent, RootId, Settings, TimerId};

use super::instance::Instance;

// =============================================================================
// REGISTRY ENTRIES
// =============================================================================

#[derive(Debug)]
enum RootEntry {
    /// A live state machine governs this root.
    Active(Instance),
    /// Initialization failed; the root was degraded to a static grid and
    /// is skipped by every later scan.
    Failed,
}

// =============================================================================
// ENGINE
// =============================================================================

/// The carousel engine: one per host document.
#[derive(Debug)]
pub struct Engine<H: Host> {
    host: H,
    roots: HashMap<RootId, RootEntry>,
    /// Root owning the active pointer session, if any. Document-level
    /// moves and releases route here.
    active_pointer: Option<RootId>,
    /// Monotonic cache-busting token for reload requests.
    next_cache_buster: u64,
}

impl<H: Host> Engine<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            roots: HashMap::new(),
            active_pointer: None,
            next_cache_buster: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The live instance for a root, if initialization succeeded.
    pub fn instance(&self, root: RootId) -> Option<&Instance> {
        match self.roots.get(&root) {
            Some(RootEntry::Active(instance)) => Some(instance),
            _ => None,
        }
    }

    /// Whether the root fell back to the static grid.
    pub fn is_failed(&self, root: RootId) -> bool {
        matches!(self.roots.get(&root), Some(RootEntry::Failed))
    }

    // --- discovery -----------------------------------------------------------

    /// Scan the host for carousel roots and initialize every root not yet
    /// in the registry. Idempotent.
    pub fn scan(&mut self) {
        for root in self.host.carousel_roots() {
            if self.roots.contains_key(&root) {
                continue;
            }

            let entry = match init_root(&mut self.host, root) {
                Ok(instance) => RootEntry::Active(instance),
                Err(error) => {
                    log::error!("carousel init failed for {root:?}: {error}");
                    layout::apply_grid_fallback(&mut self.host, root);
                    RootEntry::Failed
                }
            };
            self.roots.insert(root, entry);
        }
    }

    /// Nodes were added somewhere in the document: rescan.
    pub fn on_nodes_added(&mut self) {
        self.scan();
    }

    /// Tear one root down: release listeners, stop timers, forget it.
    pub fn destroy(&mut self, root: RootId) {
        if self.active_pointer == Some(root) {
            self.active_pointer = None;
        }
        if let Some(RootEntry::Active(mut instance)) = self.roots.remove(&root) {
            teardown_instance(&mut instance, &mut self.host);
        }
    }

    // --- pointer events ------------------------------------------------------

    /// Pointer press inside a root's track.
    pub fn on_pointer_down(&mut self, root: RootId, event: &PointerEvent) {
        let Some(RootEntry::Active(instance)) = self.roots.get_mut(&root) else {
            return;
        };
        if drag::on_down(instance, &mut self.host, event) {
            self.active_pointer = Some(root);
        }
    }

    /// Document-level pointer move.
    pub fn on_pointer_move(&mut self, event: &PointerEvent) {
        let Some(root) = self.active_pointer else {
            return;
        };
        if let Some(RootEntry::Active(instance)) = self.roots.get_mut(&root) {
            drag::on_move(instance, &mut self.host, event);
        }
    }

    /// Document-level pointer release.
    pub fn on_pointer_up(&mut self, event: &PointerEvent) {
        let Some(root) = self.active_pointer.take() else {
            return;
        };
        if let Some(RootEntry::Active(instance)) = self.roots.get_mut(&root) {
            drag::on_up(instance, &mut self.host, event);
        }
    }

    /// The pointer left the tracked area of a root.
    pub fn on_pointer_cancel(&mut self, root: RootId) {
        if self.active_pointer == Some(root) {
            self.active_pointer = None;
        }
        if let Some(RootEntry::Active(instance)) = self.roots.get_mut(&root) {
            drag::on_cancel(instance, &mut self.host);
        }
    }

    /// Capture-phase click guard: the host must consult this before
    /// delivering any click originating inside the root's track.
    pub fn on_click_capture(&mut self, root: RootId) -> ClickAction {
        match self.roots.get_mut(&root) {
            Some(RootEntry::Active(instance)) => drag::click_guard(instance),
            _ => ClickAction::Allow,
        }
    }

    // --- navigation ----------------------------------------------------------

    /// A nav button was pressed.
    pub fn on_nav_press(&mut self, root: RootId, direction: Direction) {
        if let Some(RootEntry::Active(instance)) = self.roots.get_mut(&root) {
            nav::navigate(instance, &mut self.host, direction);
        }
    }

    /// The mobile track scrolled; defer index derivation to the next
    /// animation frame so rapid scroll events coalesce.
    pub fn on_track_scrolled(&mut self, root: RootId) {
        let Some(RootEntry::Active(instance)) = self.roots.get_mut(&root) else {
            return;
        };
        if instance.mode == Mode::Mobile && instance.frame_timer.is_none() {
            instance.frame_timer = Some(self.host.request_frame(root));
        }
    }

    // --- environment ---------------------------------------------------------

    /// The viewport resized: restart every instance's settle debounce.
    pub fn on_viewport_resized(&mut self) {
        for entry in self.roots.values_mut() {
            if let RootEntry::Active(instance) = entry {
                resize::on_viewport_resized(instance, &mut self.host);
            }
        }
    }

    /// A host timer fired. The id is matched against each instance's
    /// outstanding handles; unknown ids (already cleared) are ignored.
    pub fn on_timer(&mut self, timer: TimerId) {
        for entry in self.roots.values_mut() {
            let RootEntry::Active(instance) = entry else {
                continue;
            };

            if instance.autoplay_timer == Some(timer) {
                autoplay::tick(instance, &mut self.host);
                return;
            }
            if instance.resize_timer == Some(timer) {
                resize::on_settle(instance, &mut self.host);
                return;
            }
            if instance.frame_timer == Some(timer) {
                instance.frame_timer = None;
                nav::derive_index_from_scroll(instance, &mut self.host);
                return;
            }
        }
    }

    // --- content reload ------------------------------------------------------

    /// The content-identifier attribute changed on a root.
    pub fn on_attribute_changed(&mut self, root: RootId) {
        let Some(slug) = self.host.data_attr(root, "slug") else {
            return;
        };
        let Some(RootEntry::Active(instance)) = self.roots.get_mut(&root) else {
            return;
        };
        if instance.loaded_slug.as_deref() == Some(slug.as_str()) {
            return;
        }

        if instance.reload_in_flight {
            instance.pending_slug = Some(slug);
        } else {
            self.next_cache_buster += 1;
            reload::begin(instance, &mut self.host, slug, self.next_cache_buster);
        }
    }

    /// Continuation of [`Host::begin_reload`]: the raw response body or the
    /// transport failure. On success the root's markup is replaced and the
    /// state machine rebuilt from scratch; on any failure the previous
    /// content and bindings stay in place.
    pub fn on_reload_result(&mut self, root: RootId, result: Result<String, TransportError>) {
        if !matches!(self.roots.get(&root), Some(RootEntry::Active(_))) {
            return;
        }
        let Some(RootEntry::Active(mut instance)) = self.roots.remove(&root) else {
            return;
        };
        instance.reload_in_flight = false;

        let parsed = result
            .map_err(reload::ReloadError::from)
            .and_then(|body| reload::parse_response(&body));

        let entry = match parsed {
            Ok(html) => {
                if self.active_pointer == Some(root) {
                    self.active_pointer = None;
                }
                teardown_instance(&mut instance, &mut self.host);
                self.host.replace_content(root, &html);

                match init_root(&mut self.host, root) {
                    Ok(mut fresh) => {
                        // The attribute may already name a newer identifier
                        // than the fragment we just rendered; keep the slug
                        // the fetch was actually for so the pending one
                        // still differs.
                        fresh.loaded_slug = instance.loaded_slug.take();
                        fresh.pending_slug = instance.pending_slug.take();
                        RootEntry::Active(fresh)
                    }
                    Err(error) => {
                        log::error!("carousel re-init failed for {root:?}: {error}");
                        layout::apply_grid_fallback(&mut self.host, root);
                        RootEntry::Failed
                    }
                }
            }
            Err(error) => {
                log::error!("carousel reload failed for {root:?}: {error}");
                RootEntry::Active(instance)
            }
        };
        self.roots.insert(root, entry);

        // Coalesced identifier changes: fetch the newest one next.
        if let Some(RootEntry::Active(instance)) = self.roots.get_mut(&root) {
            if let Some(pending) = instance.pending_slug.take() {
                if instance.loaded_slug.as_deref() != Some(pending.as_str()) {
                    self.next_cache_buster += 1;
                    reload::begin(instance, &mut self.host, pending, self.next_cache_buster);
                }
            }
        }
    }
}

// =============================================================================
// INSTANCE LIFECYCLE
// =============================================================================

/// Build and wire up the state machine for one root.
fn init_root<H: Host>(host: &mut H, root: RootId) -> Result<Instance, CarouselError> {
    let track = host.track_of(root).ok_or(CarouselError::MissingTrack)?;
    let slides = host.slides(root);
    let settings = Settings::from_attrs(|name| host.data_attr(root, name));
    let mode = Mode::from_viewport(host.viewport_width());

    let prev_button = match host.find_nav_button(root, Direction::Prev) {
        Some(button) => button,
        None => host.create_nav_button(root, Direction::Prev),
    };
    let next_button = match host.find_nav_button(root, Direction::Next) {
        Some(button) => button,
        None => host.create_nav_button(root, Direction::Next),
    };

    let mut instance = Instance {
        root,
        track,
        slides,
        settings,
        mode,
        styled_mode: None,
        current_index: 0,
        current_offset: 0.0,
        geometry: Geometry::default(),
        drag: drag::DragPhase::Idle,
        autoplay_timer: None,
        resize_timer: None,
        frame_timer: None,
        prev_button,
        next_button,
        loaded_slug: host.data_attr(root, "slug"),
        reload_in_flight: false,
        pending_slug: None,
    };

    layout::apply_layout(&mut instance, host);
    host.bind_instance(root);
    nav::refresh_nav_state(&mut instance, host);
    if instance.settings.autoplay {
        autoplay::start(&mut instance, host);
    }

    Ok(instance)
}

/// Release everything an instance holds: timers, drag state, listener
/// bindings. Used by reload re-init and by [`Engine::destroy`].
fn teardown_instance<H: Host>(instance: &mut Instance, host: &mut H) {
    autoplay::stop(instance, host);
    if let Some(timer) = instance.resize_timer.take() {
        host.clear_timer(timer);
    }
    if let Some(timer) = instance.frame_timer.take() {
        host.clear_timer(timer);
    }
    instance.drag = drag::DragPhase::Idle;
    host.unbind_instance(instance.root);
}
