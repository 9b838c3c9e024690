//! Node element - a point in the plane of the frame

use serde::{Deserialize, Serialize};

/// A 2D node of the frame model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Identity, unique among nodes
    pub id: String,
    /// X coordinate
    pub x: f64,
    /// Y coordinate (up)
    pub y: f64,
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(id: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
        }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// True when both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new("N1", 1.0, 2.0);
        assert_eq!(node.id, "N1");
        assert_eq!(node.coords(), [1.0, 2.0]);
    }

    #[test]
    fn test_node_finite_coordinates() {
        assert!(Node::new("N1", 3.0, 4.0).is_finite());
        assert!(!Node::new("N2", f64::NAN, 0.0).is_finite());
        assert!(!Node::new("N3", 0.0, f64::INFINITY).is_finite());
    }
}
