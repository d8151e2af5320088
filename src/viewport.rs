//! Coordinate spaces and the map viewport.
//!
//! Three spaces are in play: screen pixels (origin top-left, y down), the
//! projected Web Mercator plane in meters (EPSG:3857, y up), and geographic
//! longitude/latitude in degrees. Geometries live in projected space; screen
//! space is only used for pointer input, and geographic space only for
//! human-readable output and measurement.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use serde::{Deserialize, Serialize};

use crate::consts::{EARTH_RADIUS_M, MAX_MERCATOR_LAT, TILE_SIZE_PX};

/// A point in either screen or projected space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in the point's own space.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Project a geographic coordinate onto the Web Mercator plane.
///
/// Latitudes beyond the projection limit are clamped.
#[must_use]
pub fn project(ll: LonLat) -> Point {
    let lat = ll.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    Point {
        x: EARTH_RADIUS_M * ll.lon.to_radians(),
        y: EARTH_RADIUS_M * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln(),
    }
}

/// Inverse of [`project`].
#[must_use]
pub fn unproject(p: Point) -> LonLat {
    LonLat {
        lon: (p.x / EARTH_RADIUS_M).to_degrees(),
        lat: (2.0 * (p.y / EARTH_RADIUS_M).exp().atan() - FRAC_PI_2).to_degrees(),
    }
}

/// Visible window onto the projected plane.
///
/// `center` is in projected meters. `zoom` is a fractional tile zoom level
/// (0 = whole world in one tile). `width` / `height` are in CSS pixels.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub center: Point,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { center: Point::new(0.0, 0.0), zoom: 2.0, width: 800.0, height: 600.0 }
    }
}

impl Viewport {
    /// A viewport of the given pixel size centered on `center`.
    #[must_use]
    pub fn centered_on(center: LonLat, zoom: f64, width: f64, height: f64) -> Self {
        Self { center: project(center), zoom, width, height }
    }

    /// Projected meters per screen pixel at the current zoom.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        2.0 * PI * EARTH_RADIUS_M / (TILE_SIZE_PX * self.zoom.exp2())
    }

    /// Convert a screen-space point (CSS pixels) to projected coordinates.
    #[must_use]
    pub fn screen_to_projected(&self, screen: Point) -> Point {
        let res = self.resolution();
        Point {
            x: self.center.x + (screen.x - self.width / 2.0) * res,
            y: self.center.y - (screen.y - self.height / 2.0) * res,
        }
    }

    /// Convert a projected point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn projected_to_screen(&self, projected: Point) -> Point {
        let res = self.resolution();
        Point {
            x: (projected.x - self.center.x) / res + self.width / 2.0,
            y: (self.center.y - projected.y) / res + self.height / 2.0,
        }
    }

    /// Convert a screen-space distance (pixels) to projected distance.
    #[must_use]
    pub fn screen_dist_to_projected(&self, screen_dist: f64) -> f64 {
        screen_dist * self.resolution()
    }

    /// Shift the view by a screen-space drag delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let res = self.resolution();
        self.center.x -= dx * res;
        self.center.y += dy * res;
    }

    /// Zoom by `factor` while keeping the projected point under `anchor` fixed on screen.
    ///
    /// The resulting zoom level is clamped to `[0, max_zoom]`.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64, max_zoom: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let before = self.screen_to_projected(anchor);
        self.zoom = (self.zoom + factor.log2()).clamp(0.0, max_zoom);
        let after = self.screen_to_projected(anchor);
        self.center.x += before.x - after.x;
        self.center.y += before.y - after.y;
    }
}
