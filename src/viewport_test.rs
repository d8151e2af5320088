#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-6;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_distance() {
    assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
}

// --- Projection ---

#[test]
fn project_origin_is_origin() {
    let p = project(LonLat::new(0.0, 0.0));
    assert!(point_approx_eq(p, Point::new(0.0, 0.0)));
}

#[test]
fn project_antimeridian_is_half_circumference() {
    let p = project(LonLat::new(180.0, 0.0));
    assert!(approx_eq(p.x, PI * EARTH_RADIUS_M));
}

#[test]
fn project_unproject_round_trip() {
    let ll = LonLat::new(2.3522, 48.8566);
    let back = unproject(project(ll));
    assert!((back.lon - ll.lon).abs() < 1e-9);
    assert!((back.lat - ll.lat).abs() < 1e-9);
}

#[test]
fn project_clamps_polar_latitude() {
    let pole = project(LonLat::new(0.0, 90.0));
    let limit = project(LonLat::new(0.0, MAX_MERCATOR_LAT));
    assert!(pole.y.is_finite());
    assert!(approx_eq(pole.y, limit.y));
}

#[test]
fn project_mercator_limit_is_square_world() {
    let limit = project(LonLat::new(180.0, MAX_MERCATOR_LAT));
    assert!((limit.x - limit.y).abs() < 1e-3);
}

// --- Viewport ---

#[test]
fn resolution_at_zoom_zero() {
    let vp = Viewport { zoom: 0.0, ..Viewport::default() };
    assert!((vp.resolution() - 156_543.033_928).abs() < 1e-3);
}

#[test]
fn resolution_halves_per_zoom_level() {
    let a = Viewport { zoom: 3.0, ..Viewport::default() };
    let b = Viewport { zoom: 4.0, ..Viewport::default() };
    assert!(approx_eq(a.resolution() / 2.0, b.resolution()));
}

#[test]
fn screen_center_maps_to_view_center() {
    let vp = Viewport::centered_on(LonLat::new(10.0, 20.0), 5.0, 800.0, 600.0);
    let p = vp.screen_to_projected(Point::new(400.0, 300.0));
    assert!(point_approx_eq(p, vp.center));
}

#[test]
fn screen_y_grows_downward() {
    let vp = Viewport::default();
    let upper = vp.screen_to_projected(Point::new(400.0, 100.0));
    let lower = vp.screen_to_projected(Point::new(400.0, 500.0));
    assert!(upper.y > lower.y);
}

#[test]
fn screen_projected_round_trip() {
    let vp = Viewport::centered_on(LonLat::new(-73.98, 40.75), 12.5, 1024.0, 768.0);
    let screen = Point::new(123.0, 456.0);
    let back = vp.projected_to_screen(vp.screen_to_projected(screen));
    assert!(point_approx_eq(screen, back));
}

#[test]
fn screen_dist_scales_with_resolution() {
    let vp = Viewport { zoom: 10.0, ..Viewport::default() };
    assert!(approx_eq(vp.screen_dist_to_projected(8.0), 8.0 * vp.resolution()));
}

#[test]
fn pan_moves_content_with_pointer() {
    let mut vp = Viewport::default();
    let anchor = vp.screen_to_projected(Point::new(100.0, 100.0));
    vp.pan_by(50.0, -20.0);
    let moved = vp.projected_to_screen(anchor);
    assert!(point_approx_eq(moved, Point::new(150.0, 80.0)));
}

#[test]
fn zoom_at_keeps_anchor_fixed() {
    let mut vp = Viewport::centered_on(LonLat::new(5.0, 45.0), 8.0, 800.0, 600.0);
    let anchor = Point::new(200.0, 150.0);
    let before = vp.screen_to_projected(anchor);
    vp.zoom_at(anchor, 2.0, 19.0);
    assert!(approx_eq(vp.zoom, 9.0));
    let after = vp.screen_to_projected(anchor);
    assert!((before.x - after.x).abs() < 1e-3);
    assert!((before.y - after.y).abs() < 1e-3);
}

#[test]
fn zoom_at_clamps_to_range() {
    let mut vp = Viewport { zoom: 18.5, ..Viewport::default() };
    vp.zoom_at(Point::new(400.0, 300.0), 8.0, 19.0);
    assert_eq!(vp.zoom, 19.0);
    vp.zoom_at(Point::new(400.0, 300.0), 2.0_f64.powi(-20), 19.0);
    assert_eq!(vp.zoom, 0.0);
}

#[test]
fn zoom_at_ignores_non_positive_factor() {
    let mut vp = Viewport { zoom: 4.0, ..Viewport::default() };
    vp.zoom_at(Point::new(0.0, 0.0), 0.0, 19.0);
    vp.zoom_at(Point::new(0.0, 0.0), f64::NAN, 19.0);
    assert_eq!(vp.zoom, 4.0);
}
