//! Support conditions

use serde::{Deserialize, Serialize};

/// Kind of support at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportKind {
    /// Both translations restrained, rotation free
    Pin,
    /// Translations and rotation restrained
    Fixed,
    /// Vertical translation restrained only
    Roller,
}

/// Support condition at a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Support {
    /// Identity, unique among supports
    pub id: String,
    /// Id of the supported node
    pub node: String,
    /// Support kind
    pub kind: SupportKind,
    /// Orientation of the bearing surface in radians.
    ///
    /// Rollers always bear on a horizontal surface; the angle is kept for the
    /// caller's drawing only.
    #[serde(default)]
    pub angle: f64,
}

impl Support {
    /// Create a new support
    pub fn new(id: &str, node: &str, kind: SupportKind) -> Self {
        Self {
            id: id.to_string(),
            node: node.to_string(),
            kind,
            angle: 0.0,
        }
    }

    /// Create a pinned support
    pub fn pin(id: &str, node: &str) -> Self {
        Self::new(id, node, SupportKind::Pin)
    }

    /// Create a fully fixed support
    pub fn fixed(id: &str, node: &str) -> Self {
        Self::new(id, node, SupportKind::Fixed)
    }

    /// Create a roller support on a horizontal surface
    pub fn roller(id: &str, node: &str) -> Self {
        Self::new(id, node, SupportKind::Roller)
    }

    /// Set the drawn orientation
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Restraint mask `[x, y, rotation]`
    pub fn restraints(&self) -> [bool; 3] {
        match self.kind {
            SupportKind::Pin => [true, true, false],
            SupportKind::Fixed => [true, true, true],
            SupportKind::Roller => [false, true, false],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_support() {
        let support = Support::fixed("S1", "N1");
        assert_eq!(support.restraints(), [true, true, true]);
    }

    #[test]
    fn test_pin_support() {
        let support = Support::pin("S1", "N1");
        assert_eq!(support.restraints(), [true, true, false]);
    }

    #[test]
    fn test_roller_ignores_angle() {
        let support = Support::roller("S1", "N1").with_angle(0.5);
        assert_eq!(support.restraints(), [false, true, false]);
    }
}
