//! Mathematical utilities for plane frame calculations
//!
//! Member DOF ordering throughout is `[u1, v1, θ1, u2, v2, θ2]`: axial and
//! transverse translation plus rotation at the start node, then the same at
//! the end node.

pub mod sparse;

use nalgebra::{DMatrix, DVector, SMatrix, SVector};
use nalgebra_sparse::CsrMatrix;

use crate::elements::EndRelease;

pub use sparse::{SparseCholeskySolver, SparseMatrixBuilder};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;

/// 6x6 matrix for member stiffness
pub type Mat6 = SMatrix<f64, 6, 6>;
/// 6-element vector for member forces/displacements
pub type Vec6 = SVector<f64, 6>;

/// Members shorter than this are treated as zero length
pub const MIN_LENGTH: f64 = 1e-10;

/// Direction cosines and length of the segment `start -> end`.
///
/// Returns `None` for a zero-length segment.
pub fn direction_cosines(start: &[f64; 2], end: &[f64; 2]) -> Option<(f64, f64, f64)> {
    let dx = end[0] - start[0];
    let dy = end[1] - start[1];
    let length = (dx * dx + dy * dy).sqrt();

    if !length.is_finite() || length < MIN_LENGTH {
        return None;
    }

    Some((dx / length, dy / length, length))
}

/// Compute the transformation matrix for a plane frame element
///
/// # Arguments
/// * `c` - cosine of the member axis with global X
/// * `s` - sine of the member axis with global X
///
/// # Returns
/// 6x6 matrix mapping global member vectors to local ones
pub fn member_transformation_matrix(c: f64, s: f64) -> Mat6 {
    #[rustfmt::skip]
    let data = [
        c,   s,   0.0, 0.0, 0.0, 0.0,
        -s,  c,   0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, c,   s,   0.0,
        0.0, 0.0, 0.0, -s,  c,   0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    ];

    Mat6::from_row_slice(&data)
}

/// Compute the local stiffness matrix of a prismatic beam-column
///
/// Pinned ends are statically condensed out: one pinned end leaves the
/// propped-cantilever coefficients, two pinned ends leave an axial bar.
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `i` - Second moment of area
/// * `a` - Cross-sectional area
/// * `l` - Member length
/// * `releases` - End connections `[start, end]`
pub fn member_local_stiffness(e: f64, i: f64, a: f64, l: f64, releases: [EndRelease; 2]) -> Mat6 {
    let l2 = l * l;
    let l3 = l2 * l;
    let w1 = e * a / l;

    match (releases[0].is_pinned(), releases[1].is_pinned()) {
        (false, false) => {
            let w2 = 12.0 * e * i / l3;
            let w3 = 6.0 * e * i / l2;
            let w4 = 4.0 * e * i / l;
            let w5 = 2.0 * e * i / l;

            #[rustfmt::skip]
            let data = [
                w1,  0.0, 0.0, -w1, 0.0, 0.0,
                0.0, w2,  w3,  0.0, -w2, w3,
                0.0, w3,  w4,  0.0, -w3, w5,
                -w1, 0.0, 0.0, w1,  0.0, 0.0,
                0.0, -w2, -w3, 0.0, w2,  -w3,
                0.0, w3,  w5,  0.0, -w3, w4,
            ];
            Mat6::from_row_slice(&data)
        }
        (true, false) => {
            let w2 = 3.0 * e * i / l3;
            let w3 = 3.0 * e * i / l2;
            let w4 = 3.0 * e * i / l;

            #[rustfmt::skip]
            let data = [
                w1,  0.0, 0.0, -w1, 0.0, 0.0,
                0.0, w2,  0.0, 0.0, -w2, w3,
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
                -w1, 0.0, 0.0, w1,  0.0, 0.0,
                0.0, -w2, 0.0, 0.0, w2,  -w3,
                0.0, w3,  0.0, 0.0, -w3, w4,
            ];
            Mat6::from_row_slice(&data)
        }
        (false, true) => {
            let w2 = 3.0 * e * i / l3;
            let w3 = 3.0 * e * i / l2;
            let w4 = 3.0 * e * i / l;

            #[rustfmt::skip]
            let data = [
                w1,  0.0, 0.0, -w1, 0.0, 0.0,
                0.0, w2,  w3,  0.0, -w2, 0.0,
                0.0, w3,  w4,  0.0, -w3, 0.0,
                -w1, 0.0, 0.0, w1,  0.0, 0.0,
                0.0, -w2, -w3, 0.0, w2,  0.0,
                0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            ];
            Mat6::from_row_slice(&data)
        }
        (true, true) => {
            let mut k = Mat6::zeros();
            k[(0, 0)] = w1;
            k[(0, 3)] = -w1;
            k[(3, 0)] = -w1;
            k[(3, 3)] = w1;
            k
        }
    }
}

/// Compute fixed end reactions for a transverse point load on a
/// fixed-fixed member
///
/// # Arguments
/// * `p` - Signed load in the local y direction
/// * `a` - Distance from the start node to the load
/// * `length` - Member length
pub fn fer_point_load(p: f64, a: f64, length: f64) -> Vec6 {
    let l = length;
    let b = l - a;
    let l2 = l * l;
    let l3 = l2 * l;

    let mut fer = Vec6::zeros();
    fer[1] = -p * b * b * (3.0 * a + b) / l3;
    fer[2] = -p * a * b * b / l2;
    fer[4] = -p * a * a * (a + 3.0 * b) / l3;
    fer[5] = p * a * a * b / l2;
    fer
}

/// Adjust fixed end reactions for pinned member ends
///
/// A single released moment is carried over by half to the far end, with
/// the matching shear couple `1.5·M/L`. Two released ends leave the simple
/// beam reactions.
pub fn apply_fer_releases(fer: &Vec6, p: f64, a: f64, length: f64, releases: [EndRelease; 2]) -> Vec6 {
    let l = length;
    let b = l - a;

    match (releases[0].is_pinned(), releases[1].is_pinned()) {
        (false, false) => *fer,
        (true, true) => {
            let mut out = *fer;
            out[1] = -p * b / l;
            out[2] = 0.0;
            out[4] = -p * a / l;
            out[5] = 0.0;
            out
        }
        (start_pinned, _) => {
            let (released, carried) = if start_pinned { (2, 5) } else { (5, 2) };
            let m_rel = -fer[released];

            let mut out = *fer;
            out[carried] += 0.5 * m_rel;
            out[1] += 1.5 * m_rel / l;
            out[4] -= 1.5 * m_rel / l;
            out[released] = 0.0;
            out
        }
    }
}

/// Why a linear solve was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolveFailure {
    /// The factorisation itself broke down
    Factorization,
    /// A pivot of the given (free) DOF vanished relative to the matrix scale
    Pivot(usize),
    /// The solution contained NaN or infinity
    NonFinite,
}

/// Largest diagonal magnitude over the DOFs that were not regularised
fn diagonal_scale(k: &Mat, regularized: &[bool]) -> f64 {
    (0..k.nrows())
        .filter(|&i| !regularized[i])
        .map(|i| k[(i, i)].abs())
        .fold(0.0, f64::max)
}

fn check_finite(x: Vec) -> Result<Vec, SolveFailure> {
    if x.iter().all(|v| v.is_finite()) {
        Ok(x)
    } else {
        Err(SolveFailure::NonFinite)
    }
}

/// Solve a linear system using LU decomposition
///
/// Pivots of non-regularised DOFs below `tolerance × max|k_ii|` mark the
/// system as singular.
pub fn solve_linear_system(
    k: &Mat,
    p: &Vec,
    regularized: &[bool],
    tolerance: f64,
) -> Result<Vec, SolveFailure> {
    let scale = diagonal_scale(k, regularized);
    let lu = k.clone().lu();

    let u = lu.u();
    for i in 0..u.nrows() {
        if !regularized[i] && u[(i, i)].abs() <= tolerance * scale {
            return Err(SolveFailure::Pivot(i));
        }
    }

    let x = lu.solve(p).ok_or(SolveFailure::Factorization)?;
    check_finite(x)
}

/// Solve a symmetric positive definite system with the skyline Cholesky solver
///
/// Same pivot rule as [`solve_linear_system`], applied to the squared
/// diagonal of the Cholesky factor.
pub fn solve_sparse_system(
    k: &CsrMatrix<f64>,
    p: &Vec,
    regularized: &[bool],
    tolerance: f64,
) -> Result<Vec, SolveFailure> {
    let scale = k
        .triplet_iter()
        .filter(|&(i, j, _)| i == j && !regularized[i])
        .map(|(_, _, v)| v.abs())
        .fold(0.0, f64::max);

    let mut solver = SparseCholeskySolver::new(k);
    solver
        .factorize()
        .map_err(|_| SolveFailure::Factorization)?;

    for i in 0..k.nrows() {
        let pivot = solver.diagonal(i);
        if !regularized[i] && pivot * pivot <= tolerance * scale {
            return Err(SolveFailure::Pivot(i));
        }
    }

    check_finite(solver.solve(p))
}
