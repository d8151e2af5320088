//! Map drawing and measurement engine.
//!
//! A user picks a draw mode, sketches a point, line or polygon on the map
//! surface, and gets back a place name, a geodesic length, or a geodesic
//! area. The crate owns the draw-session state machine that sits between the
//! map surface and those enrichment steps. The host layer only wires pointer
//! events into the surface and renders the published [`view::DisplayState`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`view`] | Per-mount runtime: event pump, place lookups, display state |
//! | [`controller`] | Draw-session state machine and its [`controller::Action`]s |
//! | [`session`] | Draw modes, sessions, and feature results |
//! | [`surface`] | Map surface: base layer, overlay, capture, coordinate conversion |
//! | [`capture`] | Interactive geometry capture for one draw mode |
//! | [`overlay`] | Vector overlay holding drawn features and the live sketch |
//! | [`viewport`] | Screen / projected / geographic coordinate conversions |
//! | [`geometry`] | Geometry shapes in projected space |
//! | [`measure`] | Geodesic length and area |
//! | [`geocode`] | Reverse geocoding client and the [`geocode::PlaceResolver`] seam |
//! | [`consts`] | Shared numeric constants (earth radius, tolerances, defaults) |

pub mod capture;
pub mod consts;
pub mod controller;
pub mod geocode;
pub mod geometry;
pub mod measure;
pub mod overlay;
pub mod session;
pub mod surface;
pub mod view;
pub mod viewport;
