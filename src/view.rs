//! Per-mount view runtime.
//!
//! `DrawView` is what a host mounts once per map view. It subscribes to the
//! surface's event channel, feeds completed geometries to the
//! [`DrawController`], runs place lookups on the tokio runtime, and publishes
//! a [`DisplayState`] through a watch channel. All state transitions happen on
//! the caller's task; only the lookups run concurrently, and their results come
//! back through [`DrawView::settle`] / [`DrawView::next_lookup`] tagged with
//! the session that asked for them. Retiring a resolving session aborts its
//! lookup.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinSet};

use crate::capture::Cursor;
use crate::controller::{Action, DrawController};
use crate::geocode::{GeocodeError, PlaceResolver};
use crate::overlay::Overlay;
use crate::session::{DrawMode, FeatureResult, SessionId};
use crate::surface::{MapSurface, SurfaceEvent};
use crate::viewport::{LonLat, Point};

type LookupOutcome = (SessionId, Result<String, GeocodeError>);

/// What the host should currently show next to the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// Cursor over the map.
    pub cursor: Cursor,
    /// Text for the result slot.
    pub result: Option<FeatureResult>,
}

/// A mounted map view: controller, surface subscription, and in-flight lookups.
pub struct DrawView {
    controller: DrawController,
    events: mpsc::UnboundedReceiver<SurfaceEvent>,
    resolver: Arc<dyn PlaceResolver>,
    lookups: JoinSet<LookupOutcome>,
    /// The lookup for the session the controller is resolving, if any.
    pending: Option<(SessionId, AbortHandle)>,
    display: watch::Sender<DisplayState>,
}

impl DrawView {
    /// Mount `surface`, attaching its overlay if needed and subscribing to its events.
    #[must_use]
    pub fn mount(mut surface: MapSurface, resolver: Arc<dyn PlaceResolver>) -> Self {
        surface.attach_overlay();
        let events = surface.subscribe();
        let mut controller = DrawController::new();
        controller.mount(surface);
        let (display, _) = watch::channel(DisplayState::default());
        tracing::debug!("draw view mounted");
        Self { controller, events, resolver, lookups: JoinSet::new(), pending: None, display }
    }

    /// Subscribe to display updates.
    #[must_use]
    pub fn display(&self) -> watch::Receiver<DisplayState> {
        self.display.subscribe()
    }

    /// Snapshot of the current display state.
    #[must_use]
    pub fn display_state(&self) -> DisplayState {
        self.display.borrow().clone()
    }

    /// Toolbar trigger: start drawing `mode`.
    pub fn begin_draw(&mut self, mode: DrawMode) {
        let actions = self.controller.begin_draw(mode);
        self.apply(actions);
    }

    /// Pointer click on the map; completed shapes are processed immediately.
    pub fn click(&mut self, screen: Point) {
        if let Some(surface) = self.controller.surface_mut() {
            surface.click(screen);
        }
        self.pump();
    }

    /// Pointer double-click on the map.
    pub fn double_click(&mut self, screen: Point) {
        if let Some(surface) = self.controller.surface_mut() {
            surface.double_click(screen);
        }
        self.pump();
    }

    /// Pointer movement over the map.
    pub fn pointer_move(&mut self, screen: Point) {
        if let Some(surface) = self.controller.surface_mut() {
            surface.pointer_move(screen);
        }
    }

    /// Screen position of a geographic coordinate in the current view.
    #[must_use]
    pub fn to_screen(&self, ll: LonLat) -> Option<Point> {
        self.controller.surface().map(|s| s.to_screen(ll))
    }

    /// Process every surface event queued so far.
    pub fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SurfaceEvent::GeometryCompleted { feature, geometry } => {
                    let actions = self.controller.on_geometry_complete(feature, &geometry);
                    self.apply(actions);
                }
            }
        }
    }

    /// Wait for the next place lookup to finish and apply it.
    ///
    /// Returns false when no lookup is in flight.
    pub async fn next_lookup(&mut self) -> bool {
        let Some(joined) = self.lookups.join_next().await else {
            return false;
        };
        match joined {
            Ok((session, outcome)) => {
                let actions = self.controller.apply_lookup(session, outcome);
                self.apply(actions);
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                tracing::error!(error = %e, "place lookup task failed");
                // Without other lookups in flight, the failed task was the pending one.
                if self.lookups.is_empty() {
                    if let Some(session) = self.controller.pending_lookup() {
                        let outcome = Err(GeocodeError::Request(format!("lookup task failed: {e}")));
                        let actions = self.controller.apply_lookup(session, outcome);
                        self.apply(actions);
                    }
                }
            }
        }
        self.pump();
        true
    }

    /// Drain queued surface events and wait for every in-flight lookup.
    pub async fn settle(&mut self) {
        self.pump();
        while self.next_lookup().await {}
    }

    /// Number of place lookups not yet collected, cancelled ones included.
    #[must_use]
    pub fn lookups_in_flight(&self) -> usize {
        self.lookups.len()
    }

    /// The controller, for state queries.
    #[must_use]
    pub fn controller(&self) -> &DrawController {
        &self.controller
    }

    /// The mounted surface, for viewport changes and overlay inspection.
    pub fn surface_mut(&mut self) -> Option<&mut MapSurface> {
        self.controller.surface_mut()
    }

    /// Tear the view down: abort lookups, unsubscribe, and destroy the surface.
    ///
    /// Returns the detached overlay.
    pub fn unmount(mut self) -> Option<Overlay> {
        self.lookups.abort_all();
        self.events.close();
        let surface = self.controller.unmount()?;
        tracing::debug!("draw view unmounted");
        surface.destroy()
    }

    fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::SetCursor(cursor) => {
                    self.display.send_modify(|d| d.cursor = cursor);
                }
                Action::RenderNeeded => {
                    if let Some(surface) = self.controller.surface_mut() {
                        surface.request_redraw();
                    }
                }
                Action::LookupPlace { session, at } => {
                    let resolver = Arc::clone(&self.resolver);
                    let handle = self.lookups.spawn(async move { (session, resolver.resolve(at.lon, at.lat).await) });
                    if let Some((_, previous)) = self.pending.replace((session, handle)) {
                        previous.abort();
                    }
                }
                Action::ShowResult(result) => {
                    self.display.send_modify(|d| d.result = Some(result));
                }
            }
        }
        self.cancel_retired_lookup();
    }

    /// Abort the lookup of a session the controller no longer resolves.
    fn cancel_retired_lookup(&mut self) {
        let current = self.controller.pending_lookup();
        let Some((session, handle)) = self.pending.take_if(|(s, _)| Some(*s) != current) else {
            return;
        };
        if !handle.is_finished() {
            handle.abort();
            tracing::debug!(%session, "place lookup cancelled; its session was retired");
        }
    }
}
