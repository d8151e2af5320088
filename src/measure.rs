//! Geodesic measurements: length and area.
//!
//! Vertices are unprojected from Web Mercator and measured on the WGS84
//! ellipsoid, so results are in real meters regardless of how distorted the
//! projection is at the drawn latitude. Self-intersecting rings are not
//! detected; their area is whatever the geodesic polygon algorithm yields.

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use geo::orient::{Direction, Orient};
use geo::{Coord, Geodesic, GeodesicArea, Length, LineString, Polygon};

use crate::consts::{MIN_LINE_VERTICES, MIN_POLYGON_VERTICES};
use crate::geometry::Geometry;

/// Geodesic length of a line geometry in meters. Other geometries measure `0.0`.
#[must_use]
pub fn length(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::LineString(_) if geometry.vertices().len() >= MIN_LINE_VERTICES => {
            to_line_string(geometry).length::<Geodesic>()
        }
        _ => 0.0,
    }
}

/// Unsigned geodesic area of a polygon geometry in square meters. Other geometries measure `0.0`.
///
/// The ring is wound counter-clockwise before measuring; a clockwise ring
/// would otherwise be taken as enclosing the rest of the globe.
#[must_use]
pub fn area(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Polygon(_) if geometry.vertices().len() >= MIN_POLYGON_VERTICES => {
            Polygon::new(to_line_string(geometry), Vec::new())
                .orient(Direction::Default)
                .geodesic_area_unsigned()
        }
        _ => 0.0,
    }
}

fn to_line_string(geometry: &Geometry) -> LineString<f64> {
    geometry
        .lon_lats()
        .into_iter()
        .map(|ll| Coord { x: ll.lon, y: ll.lat })
        .collect()
}
