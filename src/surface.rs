//! Map surface: base tile layer, vector overlay, capture, and coordinate conversion.
//!
//! The surface is created once per mounted view. Its overlay is attached
//! after creation and detached before [`MapSurface::destroy`], so the surface
//! always outlives the overlay. Finished shapes are appended to the overlay
//! by the capture and announced as [`SurfaceEvent::GeometryCompleted`] on the
//! channel handed out by [`MapSurface::subscribe`].

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::capture::{Capture, CaptureStep, Cursor, Tolerance};
use crate::consts::{CLOSE_RING_TOLERANCE_PX, DEFAULT_MAX_ZOOM, DUPLICATE_VERTEX_TOLERANCE_PX, MAX_MERCATOR_LAT};
use crate::geometry::Geometry;
use crate::overlay::{FeatureId, Overlay};
use crate::session::DrawMode;
use crate::viewport::{LonLat, Point, Viewport, project, unproject};

// =============================================================================
// BASE LAYER
// =============================================================================

/// Deepest zoom whose tile indices fit the XYZ scheme in `u32`.
const MAX_TILE_ZOOM: u8 = 30;

/// Address of one tile in the XYZ tiling scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// Immutable base layer: where raster tiles come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    /// Attribution text the host must display.
    pub attribution: String,
    /// Highest zoom level served.
    pub max_zoom: u8,
}

impl Default for TileSource {
    fn default() -> Self {
        Self {
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl TileSource {
    /// The tile covering `ll` at zoom `z` (clamped to `max_zoom`).
    #[must_use]
    pub fn tile_for(&self, ll: LonLat, z: u8) -> TileCoord {
        let z = z.min(self.max_zoom).min(MAX_TILE_ZOOM);
        let n = f64::from(1_u32 << z);
        let lat = ll.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        let fx = (ll.lon + 180.0) / 360.0 * n;
        let fy = (1.0 - lat.tan().asinh() / PI) / 2.0 * n;
        TileCoord { z, x: tile_index(fx, n), y: tile_index(fy, n) }
    }

    /// Resolve the URL template for one tile.
    #[must_use]
    pub fn tile_url(&self, tile: TileCoord) -> String {
        self.url_template
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tile_index(f: f64, n: f64) -> u32 {
    f.floor().clamp(0.0, n - 1.0) as u32
}

// =============================================================================
// EVENTS
// =============================================================================

/// Events emitted by the surface to its subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The armed capture finished a shape, already appended to the overlay as `feature`.
    GeometryCompleted { feature: FeatureId, geometry: Geometry },
}

// =============================================================================
// SURFACE
// =============================================================================

/// Headless map surface. Owns the base layer, overlay, viewport and the armed capture.
#[derive(Debug)]
pub struct MapSurface {
    base: TileSource,
    viewport: Viewport,
    overlay: Option<Overlay>,
    capture: Option<Capture>,
    cursor: Cursor,
    redraws: u64,
    events: Option<mpsc::UnboundedSender<SurfaceEvent>>,
}

impl MapSurface {
    /// Create a surface with no overlay attached yet.
    #[must_use]
    pub fn new(base: TileSource, viewport: Viewport) -> Self {
        Self { base, viewport, overlay: None, capture: None, cursor: Cursor::Default, redraws: 0, events: None }
    }

    /// Create a surface and attach an empty overlay to it.
    #[must_use]
    pub fn with_overlay(base: TileSource, viewport: Viewport) -> Self {
        let mut surface = Self::new(base, viewport);
        surface.attach_overlay();
        surface
    }

    /// Attach an empty overlay. Does nothing if one is already attached.
    pub fn attach_overlay(&mut self) {
        if self.overlay.is_none() {
            self.overlay = Some(Overlay::new());
            self.request_redraw();
        }
    }

    /// Detach the overlay, disarming any capture that draws into it.
    pub fn detach_overlay(&mut self) -> Option<Overlay> {
        self.disarm_capture();
        let overlay = self.overlay.take();
        if overlay.is_some() {
            self.request_redraw();
        }
        overlay
    }

    /// The attached overlay, if any.
    #[must_use]
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Mutable access to the attached overlay, if any.
    pub fn overlay_mut(&mut self) -> Option<&mut Overlay> {
        self.overlay.as_mut()
    }

    /// The immutable base layer.
    #[must_use]
    pub fn base(&self) -> &TileSource {
        &self.base
    }

    // --- Subscription ---

    /// Open the event channel. A previous subscriber stops receiving events.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SurfaceEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Close the event channel.
    pub fn unsubscribe(&mut self) {
        self.events = None;
    }

    // --- Capture ---

    /// Begin interactive capture of `mode`, replacing any armed capture.
    ///
    /// Returns false (and arms nothing) for `DrawMode::None` or when no overlay is attached.
    pub fn arm_capture(&mut self, mode: DrawMode) -> bool {
        if self.overlay.is_none() {
            tracing::debug!(%mode, "arm_capture without overlay ignored");
            return false;
        }
        let Some(capture) = Capture::new(mode) else {
            return false;
        };
        self.disarm_capture();
        self.capture = Some(capture);
        true
    }

    /// Stop capture and drop the in-progress sketch. Safe to call when nothing is armed.
    ///
    /// Returns true if a capture was armed. Completed features are untouched.
    pub fn disarm_capture(&mut self) -> bool {
        if self.capture.take().is_none() {
            return false;
        }
        if let Some(overlay) = self.overlay.as_mut() {
            if overlay.clear_sketch().is_some() {
                self.redraws += 1;
            }
        }
        true
    }

    /// The mode of the armed capture, or `DrawMode::None`.
    #[must_use]
    pub fn armed_mode(&self) -> DrawMode {
        self.capture.as_ref().map_or(DrawMode::None, Capture::mode)
    }

    /// Whether a capture is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.capture.is_some()
    }

    // --- Pointer input ---

    /// A single click at a screen position.
    pub fn click(&mut self, screen: Point) {
        let at = self.viewport.screen_to_projected(screen);
        let tol = self.tolerance();
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        let step = capture.click(at, tol);
        self.after_step(step);
    }

    /// A double-click at a screen position; finishes line and polygon sketches.
    pub fn double_click(&mut self, screen: Point) {
        let at = self.viewport.screen_to_projected(screen);
        let tol = self.tolerance();
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        let step = capture.double_click(at, tol);
        self.after_step(step);
    }

    /// Pointer movement; updates the rubber-band preview of the sketch.
    pub fn pointer_move(&mut self, screen: Point) {
        let at = self.viewport.screen_to_projected(screen);
        let Some(capture) = self.capture.as_mut() else {
            return;
        };
        capture.hover(at);
        self.sync_sketch();
    }

    fn after_step(&mut self, step: CaptureStep) {
        match step {
            CaptureStep::Ignored => {}
            CaptureStep::Extended => self.sync_sketch(),
            CaptureStep::Complete(geometry) => {
                self.sync_sketch();
                let Some(overlay) = self.overlay.as_mut() else {
                    return;
                };
                let feature = overlay.push(geometry.clone());
                self.request_redraw();
                self.emit(SurfaceEvent::GeometryCompleted { feature, geometry });
            }
        }
    }

    fn sync_sketch(&mut self) {
        let sketch = self.capture.as_ref().and_then(Capture::sketch);
        if let Some(overlay) = self.overlay.as_mut() {
            match sketch {
                Some(geometry) => overlay.set_sketch(geometry),
                None => {
                    overlay.clear_sketch();
                }
            }
        }
        self.request_redraw();
    }

    fn emit(&mut self, event: SurfaceEvent) {
        let Some(tx) = self.events.as_ref() else {
            tracing::debug!("surface event dropped: no subscriber");
            return;
        };
        if tx.send(event).is_err() {
            tracing::debug!("surface subscriber gone; closing event channel");
            self.events = None;
        }
    }

    fn tolerance(&self) -> Tolerance {
        Tolerance {
            duplicate: self.viewport.screen_dist_to_projected(DUPLICATE_VERTEX_TOLERANCE_PX),
            close_ring: self.viewport.screen_dist_to_projected(CLOSE_RING_TOLERANCE_PX),
        }
    }

    // --- Coordinates ---

    /// Convert a projected point to longitude/latitude.
    #[must_use]
    pub fn to_geographic(&self, projected: Point) -> LonLat {
        unproject(projected)
    }

    /// Convert longitude/latitude to the surface's projected space.
    #[must_use]
    pub fn to_projected(&self, ll: LonLat) -> Point {
        project(ll)
    }

    /// Screen position (CSS pixels) of a geographic coordinate in the current view.
    #[must_use]
    pub fn to_screen(&self, ll: LonLat) -> Point {
        self.viewport.projected_to_screen(project(ll))
    }

    /// Geographic coordinate under a screen position in the current view.
    #[must_use]
    pub fn screen_to_geographic(&self, screen: Point) -> LonLat {
        unproject(self.viewport.screen_to_projected(screen))
    }

    // --- Viewport ---

    /// The current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the pixel size of the surface.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.request_redraw();
    }

    /// Pan by a screen-space drag delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.viewport.pan_by(dx, dy);
        self.request_redraw();
    }

    /// Zoom by `factor` around a screen anchor, within the base layer's zoom range.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
        self.viewport.zoom_at(anchor, factor, f64::from(self.base.max_zoom));
        self.request_redraw();
    }

    // --- Display feedback ---

    /// Set the pointer cursor.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// The current pointer cursor.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Ask the host to repaint the overlay.
    pub fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    /// Number of repaints requested so far.
    #[must_use]
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Tear the surface down: disarm, detach the overlay, close the event channel.
    ///
    /// Returns the detached overlay so the host can inspect what was drawn.
    pub fn destroy(mut self) -> Option<Overlay> {
        let overlay = self.detach_overlay();
        self.unsubscribe();
        tracing::debug!(features = overlay.as_ref().map_or(0, Overlay::len), "map surface destroyed");
        overlay
    }
}
