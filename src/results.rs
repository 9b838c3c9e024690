//! Result types for frame analysis

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Displacement results at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Rotation about the out-of-plane axis (counter-clockwise positive)
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, RZ]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            rz: arr[2],
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.dx, self.dy, self.rz]
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2)).sqrt()
    }
}

/// Reaction forces at a supported node, zero on unrestrained components
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Reaction force in X direction
    pub fx: f64,
    /// Reaction force in Y direction
    pub fy: f64,
    /// Reaction moment (counter-clockwise positive)
    pub mz: f64,
}

impl Reactions {
    /// Create from array [FX, FY, MZ]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
            mz: arr[2],
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.fx, self.fy, self.mz]
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2)).sqrt()
    }
}

/// End forces of a member in its local axes.
///
/// Start values are the forces the start node exerts on the member. End
/// values carry the opposite sign: they are what the member exerts on the
/// end node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberForces {
    pub axial_start: f64,
    pub shear_start: f64,
    pub moment_start: f64,
    pub axial_end: f64,
    pub shear_end: f64,
    pub moment_end: f64,
}

impl MemberForces {
    /// Create from the local force vector `[f1..f6]` acting on the member
    pub fn from_local_forces(forces: &[f64; 6]) -> Self {
        Self {
            axial_start: forces[0],
            shear_start: forces[1],
            moment_start: forces[2],
            axial_end: -forces[3],
            shear_end: -forces[4],
            moment_end: -forces[5],
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [
            self.axial_start,
            self.shear_start,
            self.moment_start,
            self.axial_end,
            self.shear_end,
            self.moment_end,
        ]
    }
}

/// One sample of a member diagram
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramPoint {
    /// Distance from the start node
    pub x: f64,
    /// Axial force, tension positive
    pub axial: f64,
    /// Shear force
    pub shear: f64,
    /// Bending moment, sagging positive
    pub moment: f64,
    /// Transverse displacement in local y
    pub deflection: f64,
}

/// Sampled internal forces and deflection along a member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberDiagram {
    pub length: f64,
    pub points: Vec<DiagramPoint>,
}

impl MemberDiagram {
    fn extreme(&self, value: impl Fn(&DiagramPoint) -> f64, pick: fn(f64, f64) -> f64) -> f64 {
        self.points
            .iter()
            .map(value)
            .reduce(pick)
            .unwrap_or(0.0)
    }

    pub fn max_moment(&self) -> f64 {
        self.extreme(|p| p.moment, f64::max)
    }

    pub fn min_moment(&self) -> f64 {
        self.extreme(|p| p.moment, f64::min)
    }

    pub fn max_abs_moment(&self) -> f64 {
        self.extreme(|p| p.moment.abs(), f64::max)
    }

    pub fn max_abs_shear(&self) -> f64 {
        self.extreme(|p| p.shear.abs(), f64::max)
    }

    pub fn max_abs_deflection(&self) -> f64 {
        self.extreme(|p| p.deflection.abs(), f64::max)
    }

    /// Sample closest to `x`
    pub fn nearest(&self, x: f64) -> Option<&DiagramPoint> {
        self.points
            .iter()
            .min_by(|a, b| (a.x - x).abs().total_cmp(&(b.x - x).abs()))
    }

    pub fn first(&self) -> Option<&DiagramPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&DiagramPoint> {
        self.points.last()
    }
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of members
    pub num_members: usize,
    /// Total number of supports
    pub num_supports: usize,
    /// Total number of point loads
    pub num_loads: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
    /// Free DOFs that received the dummy stiffness; their values are not meaningful
    pub regularized_dofs: Vec<String>,
    /// Sum of applied load components in global X
    pub applied_fx: f64,
    /// Sum of applied load components in global Y
    pub applied_fy: f64,
    /// Maximum translation
    pub max_displacement: f64,
    /// Node with maximum translation
    pub max_disp_node: String,
    /// Maximum reaction force
    pub max_reaction: f64,
    /// Node with maximum reaction
    pub max_reaction_node: String,
    /// Maximum absolute moment over all diagrams
    pub max_moment: f64,
    /// Member with maximum moment
    pub max_moment_member: String,
}

/// Everything recovered from one solve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub displacements: HashMap<String, NodeDisplacement>,
    pub member_forces: HashMap<String, MemberForces>,
    pub diagrams: HashMap<String, MemberDiagram>,
    pub reactions: HashMap<String, Reactions>,
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    /// True for the result of a model without nodes
    pub fn is_empty(&self) -> bool {
        self.displacements.is_empty()
            && self.member_forces.is_empty()
            && self.diagrams.is_empty()
            && self.reactions.is_empty()
    }

    /// Get node displacement
    pub fn displacement(&self, node: &str) -> FrameResult<&NodeDisplacement> {
        self.displacements
            .get(node)
            .ok_or_else(|| FrameError::NodeNotFound(node.to_string()))
    }

    /// Get node reactions
    pub fn reaction(&self, node: &str) -> FrameResult<&Reactions> {
        self.reactions
            .get(node)
            .ok_or_else(|| FrameError::NodeNotFound(node.to_string()))
    }

    /// Get member end forces
    pub fn forces(&self, member: &str) -> FrameResult<&MemberForces> {
        self.member_forces
            .get(member)
            .ok_or_else(|| FrameError::MemberNotFound(member.to_string()))
    }

    /// Get member diagram
    pub fn diagram(&self, member: &str) -> FrameResult<&MemberDiagram> {
        self.diagrams
            .get(member)
            .ok_or_else(|| FrameError::MemberNotFound(member.to_string()))
    }

    /// Out-of-balance force `[ΣRx + ΣPx, ΣRy + ΣPy]`; zero for a converged solve
    pub fn statics_residual(&self) -> [f64; 2] {
        let (rx, ry) = self
            .reactions
            .values()
            .fold((0.0, 0.0), |(x, y), r| (x + r.fx, y + r.fy));
        [rx + self.summary.applied_fx, ry + self.summary.applied_fy]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_forces_flip_end_values() {
        let forces = MemberForces::from_local_forces(&[1.0, 2.0, 3.0, -1.0, 4.0, 5.0]);
        assert_eq!(forces.as_array(), [1.0, 2.0, 3.0, 1.0, -4.0, -5.0]);
    }

    #[test]
    fn test_diagram_extremes() {
        let diagram = MemberDiagram {
            length: 2.0,
            points: vec![
                DiagramPoint { x: 0.0, moment: -3.0, ..Default::default() },
                DiagramPoint { x: 1.0, moment: 2.0, deflection: -0.5, ..Default::default() },
                DiagramPoint { x: 2.0, moment: 0.0, ..Default::default() },
            ],
        };
        assert_eq!(diagram.max_moment(), 2.0);
        assert_eq!(diagram.min_moment(), -3.0);
        assert_eq!(diagram.max_abs_moment(), 3.0);
        assert_eq!(diagram.max_abs_deflection(), 0.5);
        assert_eq!(diagram.nearest(0.9).map(|p| p.x), Some(1.0));
        assert_eq!(MemberDiagram::default().max_moment(), 0.0);
    }

    #[test]
    fn test_missing_entries_are_reported() {
        let result = AnalysisResult::default();
        assert!(result.is_empty());
        assert!(matches!(result.displacement("N1"), Err(FrameError::NodeNotFound(_))));
        assert!(matches!(result.diagram("M1"), Err(FrameError::MemberNotFound(_))));
    }
}
