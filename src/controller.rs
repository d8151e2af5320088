//! Draw-session controller: the state machine behind the draw buttons.
//!
//! ```text
//! Idle --begin_draw(mode)--> Armed(mode) --on_geometry_complete--> Resolving(mode) --apply_lookup--> Idle
//! ```
//!
//! Lines and polygons are measured synchronously and skip straight back to
//! `Idle`; only points wait on a place lookup. `begin_draw` from any state
//! retires the current interaction and arms a fresh session. Each session gets
//! a new [`SessionId`], and a lookup result is only applied when its id still
//! matches the session being resolved, so a slow lookup can never overwrite
//! the result of a later session.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::capture::Cursor;
use crate::geocode::GeocodeError;
use crate::geometry::Geometry;
use crate::measure;
use crate::overlay::FeatureId;
use crate::session::{DrawMode, DrawSession, FeatureResult, SessionId};
use crate::surface::MapSurface;
use crate::viewport::LonLat;

/// Actions returned from controller operations for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show this cursor over the map.
    SetCursor(Cursor),
    /// The overlay changed and should be repainted.
    RenderNeeded,
    /// Start a place lookup for the point drawn in `session`.
    LookupPlace { session: SessionId, at: LonLat },
    /// Put this result in the display slot.
    ShowResult(FeatureResult),
}

/// Where the controller is in the draw-session lifecycle.
#[derive(Debug, Clone, Copy, Default)]
pub enum SessionState {
    /// Nothing armed.
    #[default]
    Idle,
    /// A capture is armed and waiting for the user to finish a shape.
    Armed(DrawSession),
    /// A point was drawn; its place lookup is outstanding.
    Resolving {
        session: DrawSession,
        /// The overlay feature that receives the result label.
        feature: FeatureId,
        /// Geographic position of the drawn point.
        at: LonLat,
    },
}

/// Owns the draw-session state and the mounted map surface.
///
/// One controller exists per mounted view. Operations never fail: anything
/// that doesn't apply to the current state is a logged no-op.
#[derive(Debug, Default)]
pub struct DrawController {
    surface: Option<MapSurface>,
    state: SessionState,
    next_session: u64,
    latest: Option<FeatureResult>,
}

impl DrawController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Lifecycle ---

    /// Attach a map surface, returning the previously mounted one.
    ///
    /// Any in-flight session is abandoned; its lookup result becomes stale.
    pub fn mount(&mut self, surface: MapSurface) -> Option<MapSurface> {
        let previous = self.unmount();
        self.surface = Some(surface);
        previous
    }

    /// Detach the map surface, abandoning any in-flight session.
    pub fn unmount(&mut self) -> Option<MapSurface> {
        self.retire_session();
        let mut surface = self.surface.take()?;
        surface.disarm_capture();
        surface.set_cursor(Cursor::Default);
        Some(surface)
    }

    // --- Operations ---

    /// Arm a capture for `mode`, retiring whatever session was active.
    ///
    /// Does nothing for `DrawMode::None` or when no surface is mounted.
    pub fn begin_draw(&mut self, mode: DrawMode) -> Vec<Action> {
        if !mode.is_active() {
            tracing::debug!("begin_draw(None) ignored");
            return Vec::new();
        }
        if self.surface.is_none() {
            tracing::debug!(%mode, "begin_draw without a mounted surface ignored");
            return Vec::new();
        }
        self.retire_session();

        let id = self.next_session_id();
        let Some(surface) = self.surface.as_mut() else {
            return Vec::new();
        };
        surface.disarm_capture();
        if !surface.arm_capture(mode) {
            surface.set_cursor(Cursor::Default);
            return vec![Action::SetCursor(Cursor::Default), Action::RenderNeeded];
        }
        surface.set_cursor(Cursor::Crosshair);
        self.state = SessionState::Armed(DrawSession::new(id, mode));
        tracing::info!(session = %id, %mode, "draw session armed");
        vec![Action::SetCursor(Cursor::Crosshair), Action::RenderNeeded]
    }

    /// Handle a finished shape from the surface.
    ///
    /// Acts only on an armed session whose mode matches the geometry; stale or
    /// duplicate completions are ignored.
    pub fn on_geometry_complete(&mut self, feature: FeatureId, geometry: &Geometry) -> Vec<Action> {
        let SessionState::Armed(session) = self.state else {
            tracing::debug!(kind = %geometry.mode(), "geometry completed with no armed session; ignored");
            return Vec::new();
        };
        if geometry.mode() != session.mode {
            tracing::debug!(session = %session.id, kind = %geometry.mode(), "geometry kind does not match session; ignored");
            return Vec::new();
        }
        let Some(surface) = self.surface.as_mut() else {
            return Vec::new();
        };
        surface.disarm_capture();
        surface.set_cursor(Cursor::Default);
        let mut actions = vec![Action::SetCursor(Cursor::Default), Action::RenderNeeded];

        match geometry {
            Geometry::Point(p) => {
                let at = surface.to_geographic(*p);
                self.state = SessionState::Resolving { session, feature, at };
                tracing::debug!(session = %session.id, lon = at.lon, lat = at.lat, "resolving place");
                actions.push(Action::LookupPlace { session: session.id, at });
            }
            Geometry::LineString(_) => {
                let result = FeatureResult::length(measure::length(geometry));
                actions.extend(self.finish(session, feature, result));
            }
            Geometry::Polygon(_) => {
                let result = FeatureResult::area(measure::area(geometry));
                actions.extend(self.finish(session, feature, result));
            }
        }
        actions
    }

    /// Apply the outcome of a place lookup requested by `session`.
    ///
    /// Results for any session other than the one currently resolving are
    /// dropped. A failed lookup degrades to a coordinate-only summary.
    pub fn apply_lookup(&mut self, session: SessionId, outcome: Result<String, GeocodeError>) -> Vec<Action> {
        let SessionState::Resolving { session: current, feature, at } = self.state else {
            tracing::debug!(session = %session, "stale place lookup dropped (nothing resolving)");
            return Vec::new();
        };
        if current.id != session {
            tracing::debug!(session = %session, current = %current.id, "stale place lookup dropped");
            return Vec::new();
        }
        let result = match outcome {
            Ok(name) if !name.trim().is_empty() => FeatureResult::point(Some(name.trim()), at),
            Ok(_) => {
                tracing::warn!(session = %session, "place lookup returned an empty name; showing coordinates only");
                FeatureResult::point(None, at)
            }
            Err(e) => {
                tracing::warn!(session = %session, error = %e, code = e.error_code(), "place lookup failed; showing coordinates only");
                FeatureResult::point(None, at)
            }
        };
        self.finish(current, feature, result)
    }

    // --- Queries ---

    /// The active draw mode; `DrawMode::None` when idle.
    #[must_use]
    pub fn mode(&self) -> DrawMode {
        self.session().map_or(DrawMode::None, |s| s.mode)
    }

    /// The active session, armed or resolving.
    #[must_use]
    pub fn session(&self) -> Option<&DrawSession> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Armed(session) | SessionState::Resolving { session, .. } => Some(session),
        }
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The session whose place lookup is outstanding, if any.
    #[must_use]
    pub fn pending_lookup(&self) -> Option<SessionId> {
        match self.state {
            SessionState::Resolving { session, .. } => Some(session.id),
            SessionState::Idle | SessionState::Armed(_) => None,
        }
    }

    /// The most recent result; overwritten by each completed session.
    #[must_use]
    pub fn latest(&self) -> Option<&FeatureResult> {
        self.latest.as_ref()
    }

    /// The mounted surface, if any.
    #[must_use]
    pub fn surface(&self) -> Option<&MapSurface> {
        self.surface.as_ref()
    }

    /// Mutable access to the mounted surface, for pointer input and viewport changes.
    pub fn surface_mut(&mut self) -> Option<&mut MapSurface> {
        self.surface.as_mut()
    }

    // --- Internals ---

    fn next_session_id(&mut self) -> SessionId {
        self.next_session += 1;
        SessionId(self.next_session)
    }

    fn retire_session(&mut self) {
        match std::mem::take(&mut self.state) {
            SessionState::Idle => {}
            SessionState::Armed(session) => {
                tracing::info!(session = %session.id, mode = %session.mode, "draw session retired before completion");
            }
            SessionState::Resolving { session, .. } => {
                tracing::info!(session = %session.id, "draw session retired while its place lookup was pending");
            }
        }
    }

    fn finish(&mut self, session: DrawSession, feature: FeatureId, result: FeatureResult) -> Vec<Action> {
        if let Some(overlay) = self.surface.as_mut().and_then(MapSurface::overlay_mut) {
            overlay.set_label(&feature, result.summary.clone());
        }
        self.state = SessionState::Idle;
        tracing::info!(
            session = %session.id,
            mode = %session.mode,
            elapsed_ms = u64::try_from(session.started_at.elapsed().as_millis()).unwrap_or(u64::MAX),
            summary = %result.summary,
            "draw session complete"
        );
        self.latest = Some(result.clone());
        vec![Action::ShowResult(result)]
    }
}
