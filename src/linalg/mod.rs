// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense complex linear algebra for the two-partner Hilbert space.
//!
//! Everything in the engine lives in a 4-dimensional joint space (two
//! two-level subsystems), so plain dense `Array2<Complex64>` matrices are
//! used throughout. The only "large" object is the 16×16 Liouvillian.
//!
//! - [`matrix_exp`]: scaling-and-squaring with Padé(13)
//! - [`eig_normal`]: eigendecomposition of normal (unitary or Hermitian)
//!   matrices via Hessenberg reduction and shifted QR

pub mod eig;
pub mod expm;

pub use eig::{eig_normal, hermitian_eigenvalues, EigenDecomposition};
pub use expm::matrix_exp;

use ndarray::Array2;
use num_complex::Complex64;

/// Dimension of the joint Hilbert space (two qubits).
pub const DIM: usize = 4;

/// Shorthand for the matrix type used everywhere in the engine.
pub type CMatrix = Array2<Complex64>;

/// Real scalar as a complex number.
#[inline]
pub fn c(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// `n × n` identity.
pub fn identity(n: usize) -> CMatrix {
    Array2::from_diag_elem(n, c(1.0))
}

/// Conjugate transpose (dagger).
pub fn adjoint(m: &CMatrix) -> CMatrix {
    m.t().mapv(|z| z.conj())
}

/// Kronecker product A ⊗ B.
pub fn kron(a: &CMatrix, b: &CMatrix) -> CMatrix {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    let mut out = Array2::zeros((ar * br, ac * bc));
    for ((i, j), &x) in a.indexed_iter() {
        if x == Complex64::new(0.0, 0.0) {
            continue;
        }
        for ((k, l), &y) in b.indexed_iter() {
            out[[i * br + k, j * bc + l]] = x * y;
        }
    }
    out
}

/// Trace of a square matrix.
pub fn trace(m: &CMatrix) -> Complex64 {
    m.diag().iter().copied().sum()
}

/// Commutator [A, B] = AB − BA.
pub fn commutator(a: &CMatrix, b: &CMatrix) -> CMatrix {
    a.dot(b) - b.dot(a)
}

/// Largest absolute entry of U†U − I.
pub fn unitarity_deviation(u: &CMatrix) -> f64 {
    let n = u.nrows();
    let product = adjoint(u).dot(u) - identity(n);
    product.iter().fold(0.0f64, |acc, z| acc.max(z.norm()))
}

/// Largest absolute entry of M − M†.
pub fn hermiticity_deviation(m: &CMatrix) -> f64 {
    let diff = m - &adjoint(m);
    diff.iter().fold(0.0f64, |acc, z| acc.max(z.norm()))
}

/// Largest absolute entry of A − B.
pub fn max_abs_diff(a: &CMatrix, b: &CMatrix) -> f64 {
    (a - b).iter().fold(0.0f64, |acc, z| acc.max(z.norm()))
}

/// Column-major vectorization vec(ρ), the convention used by the
/// Liouvillian: vec(AρB) = (Bᵀ ⊗ A) vec(ρ).
pub fn vectorize(m: &CMatrix) -> ndarray::Array1<Complex64> {
    let n = m.nrows();
    ndarray::Array1::from_shape_fn(n * m.ncols(), |k| m[[k % n, k / n]])
}

/// Inverse of [`vectorize`] for an `n × n` matrix.
pub fn unvectorize(v: &ndarray::Array1<Complex64>, n: usize) -> CMatrix {
    Array2::from_shape_fn((n, n), |(i, j)| v[j * n + i])
}
