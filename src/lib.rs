//! Frame Solver - linear static analysis of plane frames
//!
//! This library implements the direct stiffness method for 2D frames made of
//! straight prismatic beam-columns:
//! - Rigid or hinged member ends (static condensation)
//! - Point loads anywhere along a member
//! - Pin, fixed and roller supports
//! - Member end forces, support reactions and sampled shear, moment and
//!   deflection diagrams
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//!
//! let mut model = FrameModel::new();
//!
//! // Add nodes
//! model.add_node(Node::new("N1", 0.0, 0.0)).unwrap();
//! model.add_node(Node::new("N2", 6.0, 0.0)).unwrap();
//!
//! // Add member
//! let section = Section::rectangular(STEEL_E, 0.2, 0.4);
//! model.add_member(Member::new("M1", "N1", "N2", section)).unwrap();
//!
//! // Add supports
//! model.add_support(Support::pin("S1", "N1")).unwrap();
//! model.add_support(Support::roller("S2", "N2")).unwrap();
//!
//! // 10 kN downward at midspan
//! model.add_load(PointLoad::downward("P1", "M1", 10_000.0, 3.0)).unwrap();
//!
//! // Analyze
//! let result = model.analyze().unwrap();
//!
//! // Get results
//! let midspan = result.diagram("M1").unwrap().max_moment();
//! assert!((midspan - 15_000.0).abs() < 1e-6);
//! ```

pub mod analysis;
pub mod api;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;

pub use analysis::{solve, solve_with};

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{solve, solve_with, AnalysisOptions, DofKind, DofMap};
    pub use crate::elements::{EndRelease, Member, Node, Section, Support, SupportKind, STEEL_E};
    pub use crate::error::{FaultKind, FrameError, FrameResult};
    pub use crate::loads::{LoadKind, PointLoad};
    pub use crate::model::FrameModel;
    pub use crate::results::{
        AnalysisResult, AnalysisSummary, DiagramPoint, MemberDiagram, MemberForces,
        NodeDisplacement, Reactions,
    };
}

#[cfg(feature = "wasm")]
pub mod wasm;
