//! Sparse matrix utilities for the free-DOF solve
//!
//! Frame stiffness matrices are banded and mostly zero. Member matrices are
//! scattered straight into COO triplets, compressed to CSR and factorised in
//! skyline storage.

use nalgebra::{DVector, SMatrix};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// Sparse matrix builder using COO format
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new sparse matrix builder
    pub fn new(size: usize) -> Self {
        // 3 DOFs per node, a handful of neighbours each
        let estimated_nnz = size * 18;
        Self {
            size,
            entries: Vec::with_capacity(estimated_nnz),
        }
    }

    /// Add a value to the matrix (accumulates if already exists)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value != 0.0 {
            self.entries.push((row, col, value));
        }
    }

    /// Scatter an element matrix into the global equations `dofs`
    pub fn add_element_matrix<const N: usize>(
        &mut self,
        dofs: &[usize; N],
        k_elem: &SMatrix<f64, N, N>,
    ) {
        for (i, &di) in dofs.iter().enumerate() {
            for (j, &dj) in dofs.iter().enumerate() {
                self.add(di, dj, k_elem[(i, j)]);
            }
        }
    }

    /// Convert to CSR format for efficient solves
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);

        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }

        CsrMatrix::from(&coo)
    }

    /// Number of stored triplets (duplicates not yet summed)
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// Skyline Cholesky solver for symmetric positive definite matrices
pub struct SparseCholeskySolver {
    size: usize,
    // For each row, values from the first non-zero up to the diagonal
    skyline: Vec<Vec<f64>>,
    // Distance from the diagonal to the first non-zero in each row
    heights: Vec<usize>,
}

impl SparseCholeskySolver {
    /// Create solver from CSR matrix
    pub fn new(csr: &CsrMatrix<f64>) -> Self {
        let size = csr.nrows();

        let mut heights = vec![0usize; size];
        for (row, col, _val) in csr.triplet_iter() {
            if col < row {
                heights[row] = heights[row].max(row - col);
            }
        }

        let mut skyline: Vec<Vec<f64>> = heights.iter().map(|&h| vec![0.0; h + 1]).collect();

        for (row, col, &val) in csr.triplet_iter() {
            if col <= row && col >= row - heights[row] {
                let idx = col - (row - heights[row]);
                skyline[row][idx] += val;
            }
        }

        Self {
            size,
            skyline,
            heights,
        }
    }

    /// Factorize the matrix in place
    pub fn factorize(&mut self) -> Result<(), &'static str> {
        for i in 0..self.size {
            let hi = self.heights[i];
            let start_i = i - hi;

            for j in start_i..i {
                let start_j = j - self.heights[j];
                let start = start_i.max(start_j);

                let mut sum = 0.0;
                for k in start..j {
                    sum += self.get(i, k) * self.get(j, k);
                }

                // Earlier rows already passed the positive pivot check
                let diag_j = self.get(j, j);
                let idx = j - start_i;
                self.skyline[i][idx] = (self.skyline[i][idx] - sum) / diag_j;
            }

            let mut sum = 0.0;
            for j in start_i..i {
                let val = self.get(i, j);
                sum += val * val;
            }

            let diag = self.skyline[i][hi] - sum;
            if !(diag > 0.0) {
                return Err("Matrix not positive definite");
            }
            self.skyline[i][hi] = diag.sqrt();
        }

        Ok(())
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        if col > row {
            return self.get(col, row);
        }
        let start = row - self.heights[row];
        if col < start {
            return 0.0;
        }
        self.skyline[row][col - start]
    }

    /// Diagonal entry of the factor `L`
    pub fn diagonal(&self, i: usize) -> f64 {
        self.skyline[i][self.heights[i]]
    }

    /// Solve L * L^T * x = b
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        let mut x = b.clone();

        // Forward substitution: L * y = b
        for i in 0..self.size {
            let start = i - self.heights[i];
            let mut sum = 0.0;
            for j in start..i {
                sum += self.get(i, j) * x[j];
            }
            x[i] = (x[i] - sum) / self.get(i, i);
        }

        // Backward substitution: L^T * x = y
        for i in (0..self.size).rev() {
            x[i] /= self.get(i, i);
            let start = i - self.heights[i];
            for j in start..i {
                x[j] -= self.get(i, j) * x[i];
            }
        }

        x
    }
}
