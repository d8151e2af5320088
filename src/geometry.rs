//! Drawn shapes in projected (Web Mercator) space.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::session::DrawMode;
use crate::viewport::{LonLat, Point, project, unproject};

/// A finished (or in-progress) shape on the overlay.
///
/// Polygon rings are stored open; the closing edge back to the first vertex
/// is implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Point),
    LineString(Vec<Point>),
    Polygon(Vec<Point>),
}

impl Geometry {
    /// Build a geometry of `mode` from geographic vertices.
    ///
    /// Returns `None` for `DrawMode::None` or an empty vertex list.
    #[must_use]
    pub fn from_lon_lat(mode: DrawMode, vertices: &[LonLat]) -> Option<Self> {
        let projected: Vec<Point> = vertices.iter().copied().map(project).collect();
        match mode {
            DrawMode::None => None,
            DrawMode::Point => projected.first().copied().map(Self::Point),
            DrawMode::Line if !projected.is_empty() => Some(Self::LineString(projected)),
            DrawMode::Polygon if !projected.is_empty() => Some(Self::Polygon(projected)),
            DrawMode::Line | DrawMode::Polygon => None,
        }
    }

    /// The draw mode that produces this kind of geometry.
    #[must_use]
    pub fn mode(&self) -> DrawMode {
        match self {
            Self::Point(_) => DrawMode::Point,
            Self::LineString(_) => DrawMode::Line,
            Self::Polygon(_) => DrawMode::Polygon,
        }
    }

    /// Vertices in projected coordinates.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        match self {
            Self::Point(p) => std::slice::from_ref(p),
            Self::LineString(pts) | Self::Polygon(pts) => pts,
        }
    }

    /// Vertices converted to longitude/latitude.
    #[must_use]
    pub fn lon_lats(&self) -> Vec<LonLat> {
        self.vertices().iter().copied().map(unproject).collect()
    }
}
