//! Global assembly, boundary conditions and the free-DOF solve

use log::{debug, warn};
use nalgebra_sparse::CsrMatrix;

use crate::elements::{Support, SupportKind};
use crate::error::{FrameError, FrameResult};
use crate::math::{self, Mat, SolveFailure, SparseMatrixBuilder, Vec};

use super::dof::{DofKind, DofMap};
use super::element::MemberElement;
use super::AnalysisOptions;

/// Global stiffness in the storage the selected solver works on
#[derive(Debug, Clone)]
pub enum GlobalStiffness {
    Dense(Mat),
    Sparse(CsrMatrix<f64>),
}

impl GlobalStiffness {
    pub fn n_dofs(&self) -> usize {
        match self {
            GlobalStiffness::Dense(k) => k.nrows(),
            GlobalStiffness::Sparse(k) => k.nrows(),
        }
    }

    /// Largest magnitude in each row, and the largest diagonal magnitude
    fn row_maxima(&self) -> (std::vec::Vec<f64>, f64) {
        let n = self.n_dofs();
        let mut rows = vec![0.0_f64; n];
        let mut diagonal = 0.0_f64;

        match self {
            GlobalStiffness::Dense(k) => {
                for i in 0..n {
                    rows[i] = k.row(i).amax();
                    diagonal = diagonal.max(k[(i, i)].abs());
                }
            }
            GlobalStiffness::Sparse(k) => {
                for (i, j, v) in k.triplet_iter() {
                    rows[i] = rows[i].max(v.abs());
                    if i == j {
                        diagonal = diagonal.max(v.abs());
                    }
                }
            }
        }

        (rows, diagonal)
    }
}

/// Accumulate member stiffness and equivalent nodal loads into fresh global arrays
pub fn assemble(elements: &[MemberElement<'_>], n_dofs: usize, sparse: bool) -> (GlobalStiffness, Vec) {
    let mut p_global = Vec::zeros(n_dofs);
    for element in elements {
        let p = element.equivalent_nodal_loads();
        for (a, &da) in element.dofs().iter().enumerate() {
            p_global[da] += p[a];
        }
    }

    let k_global = if sparse {
        let mut builder = SparseMatrixBuilder::new(n_dofs);
        for element in elements {
            builder.add_element_matrix(&element.dofs(), &element.global_stiffness());
        }
        debug!("Sparse assembly: {} triplets for {} DOFs", builder.nnz(), n_dofs);
        GlobalStiffness::Sparse(builder.to_csr())
    } else {
        let mut k = Mat::zeros(n_dofs, n_dofs);
        for element in elements {
            let k_elem = element.global_stiffness();
            let dofs = element.dofs();
            for (a, &da) in dofs.iter().enumerate() {
                for (b, &db) in dofs.iter().enumerate() {
                    k[(da, db)] += k_elem[(a, b)];
                }
            }
        }
        GlobalStiffness::Dense(k)
    };

    (k_global, p_global)
}

/// Flag every equation held at zero by a support
pub fn restrained_dofs(supports: &[Support], dof_map: &DofMap) -> FrameResult<std::vec::Vec<bool>> {
    let mut restrained = vec![false; dof_map.n_dofs()];

    for support in supports {
        let base = dof_map.base(&support.node)?;
        if support.kind == SupportKind::Roller && support.angle.abs() > f64::EPSILON {
            warn!(
                "Support '{}' is a roller at angle {}; rollers always restrain global Y only",
                support.id, support.angle
            );
        }
        for (offset, &r) in support.restraints().iter().enumerate() {
            if r {
                restrained[base + offset] = true;
            }
        }
    }

    Ok(restrained)
}

/// Find the equations with no physical stiffness.
///
/// An equation qualifies when every entry of its row is at most
/// `regularization_threshold` times the largest diagonal magnitude. Such
/// rows are decoupled by [`solve_free`] and get the dummy stiffness.
pub fn regularize(k: &GlobalStiffness, options: &AnalysisOptions) -> std::vec::Vec<bool> {
    let (rows, scale) = k.row_maxima();
    let cutoff = options.regularization_threshold * scale;
    rows.into_iter().map(|m| m <= cutoff).collect()
}

/// Solve the free partition and scatter it back into a full displacement vector
pub fn solve_free(
    k_global: &GlobalStiffness,
    p_global: &Vec,
    restrained: &[bool],
    regularized: &[bool],
    dof_map: &DofMap,
    options: &AnalysisOptions,
) -> FrameResult<Vec> {
    let n_dofs = k_global.n_dofs();
    let free_dofs: std::vec::Vec<usize> = (0..n_dofs).filter(|&d| !restrained[d]).collect();

    let mut d_full = Vec::zeros(n_dofs);
    if free_dofs.is_empty() {
        debug!("All {} DOFs restrained; nothing to solve", n_dofs);
        return Ok(d_full);
    }

    // Global equation -> free equation, for entries that enter the system
    let mut free_index = vec![None; n_dofs];
    for (i, &d) in free_dofs.iter().enumerate() {
        if !regularized[d] {
            free_index[d] = Some(i);
        }
    }

    let n_free = free_dofs.len();
    let p1 = Vec::from_iterator(n_free, free_dofs.iter().map(|&d| p_global[d]));
    let flags: std::vec::Vec<bool> = free_dofs.iter().map(|&d| regularized[d]).collect();

    debug!(
        "Solving {} free DOFs ({} solver)",
        n_free,
        if options.sparse { "sparse" } else { "dense" }
    );

    let solved = match k_global {
        GlobalStiffness::Dense(k) => {
            let mut k11 = Mat::zeros(n_free, n_free);
            for (i, &di) in free_dofs.iter().enumerate() {
                if flags[i] {
                    k11[(i, i)] = options.dummy_stiffness;
                    continue;
                }
                for (j, &dj) in free_dofs.iter().enumerate() {
                    if !flags[j] {
                        k11[(i, j)] = k[(di, dj)];
                    }
                }
            }
            math::solve_linear_system(&k11, &p1, &flags, options.singularity_tolerance)
        }
        GlobalStiffness::Sparse(k) => {
            let mut builder = SparseMatrixBuilder::new(n_free);
            for (di, dj, &v) in k.triplet_iter() {
                if let (Some(i), Some(j)) = (free_index[di], free_index[dj]) {
                    builder.add(i, j, v);
                }
            }
            for (i, &flagged) in flags.iter().enumerate() {
                if flagged {
                    builder.add(i, i, options.dummy_stiffness);
                }
            }
            math::solve_sparse_system(&builder.to_csr(), &p1, &flags, options.singularity_tolerance)
        }
    };

    let d1 = solved.map_err(|failure| match failure {
        SolveFailure::Factorization => FrameError::SingularMatrix,
        SolveFailure::Pivot(i) => {
            let dof = free_dofs[i];
            let what = match dof_map.label(dof) {
                Some((node, DofKind::Rotation)) => format!("rotation at node '{}'", node),
                Some((node, kind)) => format!("translation {} at node '{}'", kind, node),
                None => format!("equation {}", dof),
            };
            FrameError::Unstable(format!("no stiffness against {}", what))
        }
        SolveFailure::NonFinite => FrameError::Unstable("displacements are not finite".to_string()),
    })?;

    for (i, &di) in free_dofs.iter().enumerate() {
        d_full[di] = d1[i];
    }

    Ok(d_full)
}
