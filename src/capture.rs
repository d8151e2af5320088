//! Interactive geometry capture: the gesture state for one armed draw mode.
//!
//! A `Capture` collects clicked vertices in projected space and decides when
//! the shape is finished. Point captures finish on the first click. Line and
//! polygon captures grow one vertex per click and finish on a double-click;
//! a polygon also finishes when the user clicks back on its first vertex.
//! Finishing a sketch that has too few vertices is ignored, leaving the
//! capture armed.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use crate::consts::{MIN_LINE_VERTICES, MIN_POLYGON_VERTICES};
use crate::geometry::Geometry;
use crate::session::DrawMode;
use crate::viewport::Point;

/// Pointer cursor shown over the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Normal pointer; nothing armed.
    #[default]
    Default,
    /// Crosshair while a draw mode is armed.
    Crosshair,
}

/// Hit distances in projected units, derived from pixel tolerances at the current zoom.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Clicks closer than this to the previous vertex are dropped.
    pub duplicate: f64,
    /// Clicks closer than this to the first polygon vertex close the ring.
    pub close_ring: f64,
}

/// Outcome of feeding a pointer event into a capture.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureStep {
    /// The event did not change the sketch.
    Ignored,
    /// A vertex was added; the shape is still open.
    Extended,
    /// The shape is finished. The capture is reset and stays armed.
    Complete(Geometry),
}

/// Gesture state for one armed draw mode.
#[derive(Debug, Clone)]
pub struct Capture {
    mode: DrawMode,
    vertices: Vec<Point>,
    /// Last pointer position, drawn as a trailing rubber-band vertex.
    hover: Option<Point>,
}

impl Capture {
    /// Start capturing `mode`. Returns `None` for `DrawMode::None`.
    #[must_use]
    pub fn new(mode: DrawMode) -> Option<Self> {
        mode.is_active().then(|| Self { mode, vertices: Vec::new(), hover: None })
    }

    /// The geometry type being captured.
    #[must_use]
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Vertices clicked so far.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Handle a single click at a projected position.
    pub fn click(&mut self, at: Point, tol: Tolerance) -> CaptureStep {
        match self.mode {
            DrawMode::None => CaptureStep::Ignored,
            DrawMode::Point => {
                self.reset();
                CaptureStep::Complete(Geometry::Point(at))
            }
            DrawMode::Line | DrawMode::Polygon => {
                if self.closes_ring(at, tol) {
                    return self.finish();
                }
                if self.vertices.last().is_some_and(|last| last.distance(at) < tol.duplicate) {
                    return CaptureStep::Ignored;
                }
                self.vertices.push(at);
                CaptureStep::Extended
            }
        }
    }

    /// Handle a double-click: the position is added as a vertex, then the shape is finished.
    pub fn double_click(&mut self, at: Point, tol: Tolerance) -> CaptureStep {
        match self.click(at, tol) {
            CaptureStep::Complete(geometry) => CaptureStep::Complete(geometry),
            CaptureStep::Ignored | CaptureStep::Extended => self.finish(),
        }
    }

    /// Try to finish the current sketch with the vertices collected so far.
    pub fn finish(&mut self) -> CaptureStep {
        let geometry = match self.mode {
            DrawMode::Line if self.vertices.len() >= MIN_LINE_VERTICES => {
                Geometry::LineString(std::mem::take(&mut self.vertices))
            }
            DrawMode::Polygon if self.vertices.len() >= MIN_POLYGON_VERTICES => {
                Geometry::Polygon(std::mem::take(&mut self.vertices))
            }
            _ => return CaptureStep::Ignored,
        };
        self.reset();
        CaptureStep::Complete(geometry)
    }

    /// Track the pointer for the rubber-band preview.
    pub fn hover(&mut self, at: Point) {
        self.hover = Some(at);
    }

    /// Preview geometry for the overlay, including the hover vertex.
    #[must_use]
    pub fn sketch(&self) -> Option<Geometry> {
        let mut pts = self.vertices.clone();
        if pts.is_empty() {
            return None;
        }
        if let Some(hover) = self.hover {
            pts.push(hover);
        }
        match self.mode {
            DrawMode::Line => Some(Geometry::LineString(pts)),
            DrawMode::Polygon => Some(Geometry::Polygon(pts)),
            DrawMode::None | DrawMode::Point => None,
        }
    }

    fn closes_ring(&self, at: Point, tol: Tolerance) -> bool {
        self.mode == DrawMode::Polygon
            && self.vertices.len() >= MIN_POLYGON_VERTICES
            && self.vertices.first().is_some_and(|first| first.distance(at) < tol.close_ring)
    }

    fn reset(&mut self) {
        self.vertices.clear();
        self.hover = None;
    }
}
