//! Shared numeric constants for the map engine.

// ── Projection ──────────────────────────────────────────────────

/// Semi-major axis of the WGS84 ellipsoid in meters, used as the Web Mercator sphere radius.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator projection, in degrees.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Edge length of one map tile in screen pixels.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Highest zoom level the default tile source serves.
pub const DEFAULT_MAX_ZOOM: u8 = 19;

// ── Capture ─────────────────────────────────────────────────────

/// Screen-space distance in pixels within which a click closes a polygon ring.
pub const CLOSE_RING_TOLERANCE_PX: f64 = 8.0;

/// Screen-space distance in pixels below which consecutive clicks are treated as one vertex.
pub const DUPLICATE_VERTEX_TOLERANCE_PX: f64 = 1.0;

/// Minimum distinct vertices for a finished line.
pub const MIN_LINE_VERTICES: usize = 2;

/// Minimum distinct vertices for a finished polygon ring.
pub const MIN_POLYGON_VERTICES: usize = 3;

// ── Display ─────────────────────────────────────────────────────

/// Decimal places kept when printing longitude/latitude in a result summary.
pub const COORD_DECIMALS: usize = 6;
