//! Vector overlay: drawn features and the live sketch.
//!
//! The overlay is the mutable layer above the base tiles. It holds every
//! completed feature (they accumulate across sessions and are never removed)
//! plus at most one in-progress sketch belonging to the armed capture. The
//! renderer reads `features` in insertion order, then draws the sketch on top.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Geometry;

/// Unique identifier for a drawn feature.
pub type FeatureId = Uuid;

/// A completed shape on the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Unique identifier for this feature.
    pub id: FeatureId,
    /// The finished geometry in projected coordinates.
    pub geometry: Geometry,
    /// Result text attached once the feature has been measured or resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// In-memory store of overlay features.
#[derive(Debug, Default)]
pub struct Overlay {
    features: Vec<Feature>,
    sketch: Option<Geometry>,
}

impl Overlay {
    /// Create an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed geometry and return its new id.
    pub fn push(&mut self, geometry: Geometry) -> FeatureId {
        let id = Uuid::new_v4();
        self.features.push(Feature { id, geometry, label: None });
        id
    }

    /// Return a reference to a feature by id.
    #[must_use]
    pub fn get(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == *id)
    }

    /// Attach a result label to a feature. Returns false if the feature doesn't exist.
    pub fn set_label(&mut self, id: &FeatureId, label: String) -> bool {
        let Some(feature) = self.features.iter_mut().find(|f| f.id == *id) else {
            return false;
        };
        feature.label = Some(label);
        true
    }

    /// All completed features in draw order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Replace the in-progress sketch.
    pub fn set_sketch(&mut self, geometry: Geometry) {
        self.sketch = Some(geometry);
    }

    /// Drop the in-progress sketch, returning it if there was one.
    pub fn clear_sketch(&mut self) -> Option<Geometry> {
        self.sketch.take()
    }

    /// The in-progress sketch, if any.
    #[must_use]
    pub fn sketch(&self) -> Option<&Geometry> {
        self.sketch.as_ref()
    }

    /// Number of completed features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if no feature has been completed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
