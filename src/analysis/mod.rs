//! Linear static analysis of plane frames
//!
//! One call to [`solve_with`] runs the whole pipeline: number the DOFs,
//! formulate every member, assemble and solve the free partition, then
//! recover forces, reactions and diagrams. Nothing is shared between calls.

mod assembly;
mod dof;
mod element;
mod extract;

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::elements::{Member, Node, Support};
use crate::error::{FrameError, FrameResult};
use crate::loads::PointLoad;
use crate::results::{AnalysisResult, AnalysisSummary};

pub use dof::{DofKind, DofMap, DOFS_PER_NODE};
pub use element::MemberElement;
pub use extract::sample_positions;

/// Options for frame analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Uniform intervals per member diagram (load positions are added on top)
    pub diagram_segments: usize,
    /// Rows whose entries all stay below this fraction of the largest
    /// diagonal count as having no stiffness
    pub regularization_threshold: f64,
    /// Stiffness injected on a missing diagonal
    pub dummy_stiffness: f64,
    /// Relative pivot size below which the free system is singular
    pub singularity_tolerance: f64,
    /// Use the skyline Cholesky solver instead of dense LU
    pub sparse: bool,
    /// Log the out-of-balance force after the solve
    pub check_statics: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            diagram_segments: 50,
            regularization_threshold: 1e-9,
            dummy_stiffness: 1e-6,
            singularity_tolerance: 1e-12,
            sparse: false,
            check_statics: false,
        }
    }
}

impl AnalysisOptions {
    /// Default dense linear analysis
    pub fn linear() -> Self {
        Self::default()
    }

    /// Set the number of diagram intervals
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.diagram_segments = segments;
        self
    }

    /// Set the regularisation threshold and injected stiffness
    pub fn with_regularization(mut self, threshold: f64, dummy_stiffness: f64) -> Self {
        self.regularization_threshold = threshold;
        self.dummy_stiffness = dummy_stiffness;
        self
    }

    /// Set the singularity tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.singularity_tolerance = tol;
        self
    }

    /// Use the sparse solver
    pub fn with_sparse(mut self) -> Self {
        self.sparse = true;
        self
    }

    /// Log the equilibrium residual
    pub fn with_statics_check(mut self) -> Self {
        self.check_statics = true;
        self
    }

    fn validate(&self) -> FrameResult<()> {
        if self.diagram_segments == 0 {
            return Err(FrameError::InvalidInput(
                "diagram_segments must be at least 1".to_string(),
            ));
        }
        if !(self.dummy_stiffness > 0.0 && self.dummy_stiffness.is_finite()) {
            return Err(FrameError::InvalidInput(format!(
                "dummy_stiffness must be positive (got {})",
                self.dummy_stiffness
            )));
        }
        if !(self.regularization_threshold >= 0.0 && self.singularity_tolerance >= 0.0) {
            return Err(FrameError::InvalidInput(
                "tolerances must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Analyse a frame with default options
pub fn solve(
    nodes: &[Node],
    members: &[Member],
    supports: &[Support],
    loads: &[PointLoad],
) -> FrameResult<AnalysisResult> {
    solve_with(nodes, members, supports, loads, &AnalysisOptions::default())
}

/// Group loads by member, rejecting loads on unknown members
fn loads_by_member<'a>(
    members: &[Member],
    loads: &'a [PointLoad],
) -> FrameResult<HashMap<String, Vec<&'a PointLoad>>> {
    let mut grouped: HashMap<String, Vec<&PointLoad>> = HashMap::with_capacity(members.len());
    for member in members {
        if grouped.insert(member.id.clone(), Vec::new()).is_some() {
            return Err(FrameError::DuplicateName(member.id.clone()));
        }
    }

    for load in loads {
        grouped
            .get_mut(&load.member)
            .ok_or_else(|| FrameError::MemberNotFound(load.member.clone()))?
            .push(load);
    }

    Ok(grouped)
}

/// Formulate every member; the extractor calls this again after the solve
fn formulate<'a>(
    nodes: &[Node],
    members: &'a [Member],
    dof_map: &DofMap,
    loads: &HashMap<String, Vec<&PointLoad>>,
) -> FrameResult<Vec<MemberElement<'a>>> {
    members
        .iter()
        .map(|member| {
            let on_member = loads.get(&member.id).map(Vec::as_slice).unwrap_or(&[]);
            MemberElement::new(member, nodes, dof_map, on_member)
        })
        .collect()
}

/// Analyse a frame
pub fn solve_with(
    nodes: &[Node],
    members: &[Member],
    supports: &[Support],
    loads: &[PointLoad],
    options: &AnalysisOptions,
) -> FrameResult<AnalysisResult> {
    if nodes.is_empty() {
        debug!("Model has no nodes; returning an empty result");
        return Ok(AnalysisResult::default());
    }
    options.validate()?;

    let dof_map = DofMap::new(nodes)?;
    let grouped = loads_by_member(members, loads)?;
    let n_dofs = dof_map.n_dofs();

    let restrained = assembly::restrained_dofs(supports, &dof_map)?;

    // Assemble and solve
    let (d, regularized) = {
        let elements = formulate(nodes, members, &dof_map, &grouped)?;
        let (k_global, p_global) = assembly::assemble(&elements, n_dofs, options.sparse);
        let regularized = assembly::regularize(&k_global, options);

        for dof in (0..n_dofs).filter(|&i| regularized[i] && !restrained[i]) {
            debug!("Regularised free DOF {}", dof_map.describe(dof));
        }

        let d = assembly::solve_free(
            &k_global,
            &p_global,
            &restrained,
            &regularized,
            &dof_map,
            options,
        )?;
        (d, regularized)
    };

    // Recover results from fresh element formulations
    let elements = formulate(nodes, members, &dof_map, &grouped)?;

    let mut result = AnalysisResult {
        displacements: extract::node_displacements(&d, &dof_map),
        member_forces: elements
            .iter()
            .map(|e| (e.member.id.clone(), extract::member_forces(e, &d)))
            .collect(),
        diagrams: elements
            .iter()
            .map(|e| {
                (
                    e.member.id.clone(),
                    extract::member_diagram(e, &d, options.diagram_segments),
                )
            })
            .collect(),
        reactions: extract::reactions(&elements, supports, &d),
        summary: AnalysisSummary::default(),
    };

    result.summary = summarize(
        &result,
        nodes,
        &elements,
        &dof_map,
        &restrained,
        &regularized,
        supports,
        loads,
    );

    if options.check_statics {
        let [rx, ry] = result.statics_residual();
        info!("Static equilibrium residual: Fx = {:.3e}, Fy = {:.3e}", rx, ry);
    }

    Ok(result)
}

/// Walks the inputs in model order so ties resolve the same way every call
fn summarize(
    result: &AnalysisResult,
    nodes: &[Node],
    elements: &[MemberElement<'_>],
    dof_map: &DofMap,
    restrained: &[bool],
    regularized: &[bool],
    supports: &[Support],
    loads: &[PointLoad],
) -> AnalysisSummary {
    let total_dofs = dof_map.n_dofs();
    let mut summary = AnalysisSummary {
        num_nodes: total_dofs / DOFS_PER_NODE,
        num_members: elements.len(),
        num_supports: supports.len(),
        num_loads: loads.len(),
        total_dofs,
        free_dofs: restrained.iter().filter(|&&r| !r).count(),
        regularized_dofs: (0..total_dofs)
            .filter(|&i| regularized[i] && !restrained[i])
            .map(|i| dof_map.describe(i))
            .collect(),
        ..Default::default()
    };

    for element in elements {
        for &(p, _) in &element.loads {
            summary.applied_fx += -element.s * p;
            summary.applied_fy += element.c * p;
        }
    }

    for node in nodes {
        if let Some(disp) = result.displacements.get(&node.id) {
            let mag = disp.translation_magnitude();
            if mag > summary.max_displacement {
                summary.max_displacement = mag;
                summary.max_disp_node = node.id.clone();
            }
        }
    }

    for support in supports {
        if let Some(rxn) = result.reactions.get(&support.node) {
            let mag = rxn.force_magnitude();
            if mag > summary.max_reaction {
                summary.max_reaction = mag;
                summary.max_reaction_node = support.node.clone();
            }
        }
    }

    for element in elements {
        if let Some(diagram) = result.diagrams.get(&element.member.id) {
            let moment = diagram.max_abs_moment();
            if moment > summary.max_moment {
                summary.max_moment = moment;
                summary.max_moment_member = element.member.id.clone();
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = AnalysisOptions::linear()
            .with_segments(10)
            .with_regularization(1e-8, 1e-4)
            .with_sparse()
            .with_statics_check();
        assert_eq!(options.diagram_segments, 10);
        assert_eq!(options.dummy_stiffness, 1e-4);
        assert!(options.sparse && options.check_statics);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_invalid_options() {
        assert!(AnalysisOptions::default().with_segments(0).validate().is_err());
        assert!(AnalysisOptions::default()
            .with_regularization(1e-9, 0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: AnalysisOptions = serde_json::from_str(r#"{"sparse": true}"#).unwrap();
        assert!(options.sparse);
        assert_eq!(options.diagram_segments, 50);
    }

    #[test]
    fn test_load_on_missing_member() {
        let members = vec![];
        let loads = vec![PointLoad::new("P1", "M9", -1.0, 0.5)];
        assert!(matches!(
            loads_by_member(&members, &loads),
            Err(FrameError::MemberNotFound(id)) if id == "M9"
        ));
    }
}
