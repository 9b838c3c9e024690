//! Point loads on members

use serde::{Deserialize, Serialize};

/// Kind of member load. Only concentrated loads are modelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadKind {
    #[default]
    Point,
}

/// A concentrated load on a member, acting along the member's local
/// transverse axis (the member axis rotated +90°).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    /// Identity, unique among loads
    pub id: String,
    /// Id of the loaded member
    pub member: String,
    /// Load kind
    #[serde(default)]
    pub kind: LoadKind,
    /// Signed magnitude, negative = downward for a member running left to right
    pub magnitude: f64,
    /// Distance from the start node
    pub position: f64,
}

impl PointLoad {
    /// Create a new point load
    pub fn new(id: &str, member: &str, magnitude: f64, position: f64) -> Self {
        Self {
            id: id.to_string(),
            member: member.to_string(),
            kind: LoadKind::Point,
            magnitude,
            position,
        }
    }

    /// Create a downward point load (magnitude taken as absolute)
    pub fn downward(id: &str, member: &str, magnitude: f64, position: f64) -> Self {
        Self::new(id, member, -magnitude.abs(), position)
    }

    /// Global force components `[Fx, Fy]` for a member with direction cosines `c`, `s`
    pub fn global_components(&self, c: f64, s: f64) -> [f64; 2] {
        [-s * self.magnitude, c * self.magnitude]
    }
}
