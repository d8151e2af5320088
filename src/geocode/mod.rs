//! Geocode — reverse geocoding for drawn points.
//!
//! DESIGN
//! ======
//! The draw flow only sees the [`PlaceResolver`] trait, so tests and hosts
//! can swap in their own resolver. [`NominatimResolver`] is the HTTP
//! implementation, configured from environment variables through
//! [`GeocodeConfig::from_env`]. Every failure is a typed [`GeocodeError`];
//! the controller turns it into a coordinate-only summary.

pub mod config;
pub mod nominatim;
pub mod types;

pub use config::{GeocodeConfig, GeocodeTimeouts};
pub use nominatim::NominatimResolver;
pub use types::{GeocodeError, PlaceResolver};
