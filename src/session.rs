//! Draw modes, draw sessions, and the results they produce.
//!
//! A `DrawSession` exists from the moment a mode is armed until its geometry
//! has been measured or resolved. Each session carries a `SessionId` drawn
//! from a per-controller counter so that late place lookups can be matched
//! against the session that requested them.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::consts::COORD_DECIMALS;
use crate::viewport::LonLat;

/// Which kind of geometry the user is drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Nothing armed.
    #[default]
    None,
    /// A single clicked location.
    Point,
    /// An open polyline.
    Line,
    /// A closed polygon ring.
    Polygon,
}

impl DrawMode {
    /// Whether this mode draws something (anything but `None`).
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Point => "point",
            Self::Line => "line",
            Self::Polygon => "polygon",
        })
    }
}

/// Monotonically increasing identifier of a draw session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One armed drawing interaction.
#[derive(Debug, Clone, Copy)]
pub struct DrawSession {
    pub id: SessionId,
    pub mode: DrawMode,
    pub started_at: Instant,
}

impl DrawSession {
    #[must_use]
    pub fn new(id: SessionId, mode: DrawMode) -> Self {
        Self { id, mode, started_at: Instant::now() }
    }
}

/// User-visible outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureResult {
    pub mode: DrawMode,
    pub summary: String,
}

impl FeatureResult {
    /// Summary for a drawn point. `place` is `None` when the lookup failed.
    #[must_use]
    pub fn point(place: Option<&str>, at: LonLat) -> Self {
        let lon = format_coord(at.lon);
        let lat = format_coord(at.lat);
        let summary = match place {
            Some(name) => format!("Point added: {name} ({lon}, {lat})"),
            None => format!("Point added: ({lon}, {lat})"),
        };
        Self { mode: DrawMode::Point, summary }
    }

    /// Summary for a drawn line of `meters` geodesic length.
    #[must_use]
    pub fn length(meters: f64) -> Self {
        Self { mode: DrawMode::Line, summary: format!("Length: {meters:.2} meters") }
    }

    /// Summary for a drawn polygon of `square_meters` geodesic area.
    #[must_use]
    pub fn area(square_meters: f64) -> Self {
        Self { mode: DrawMode::Polygon, summary: format!("Area: {square_meters:.2} square meters") }
    }
}

impl fmt::Display for FeatureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)
    }
}

/// Print a degree value with at most [`COORD_DECIMALS`] places and no trailing zeros.
///
/// Unprojecting a clicked point leaves float noise in the last digits
/// (`48.856599999999996`); rounding keeps the summary readable.
#[must_use]
pub fn format_coord(deg: f64) -> String {
    let fixed = format!("{deg:.COORD_DECIMALS$}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
}
