// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lindblad dissipator and Liouvillian superoperator.
//!
//! Computes D[L](ρ) = γ (L ρ L† − ½{L†L, ρ}) for each collapse operator, and
//! assembles the full generator 𝓛 as a d²×d² matrix acting on column-major
//! vec(ρ), so a time-independent master equation can be propagated exactly
//! with one matrix exponential.
//!
//! Ref: Breuer & Petruccione, "The Theory of Open Quantum Systems" (2002), Ch. 3.

use ndarray::Array2;
use num_complex::Complex64;

use super::types::CollapseOperator;
use crate::linalg::{adjoint, c, commutator, vectorize, CMatrix};

/// Dissipator contribution of a single collapse operator.
///
/// D[L](ρ) = γ (L ρ L† − ½ L†L ρ − ½ ρ L†L)
pub fn dissipator(op: &CollapseOperator, rho: &CMatrix) -> CMatrix {
    if op.rate == 0.0 {
        return Array2::zeros(rho.raw_dim());
    }

    let l = &op.matrix;
    let l_dag = adjoint(l);
    let l_dag_l = l_dag.dot(l);

    let jump = l.dot(rho).dot(&l_dag);
    let anti = l_dag_l.dot(rho) + rho.dot(&l_dag_l);

    (jump - anti * c(0.5)) * c(op.rate)
}

/// Σ_k D[L_k](ρ).
pub fn total_dissipator(collapse_ops: &[CollapseOperator], rho: &CMatrix) -> CMatrix {
    collapse_ops
        .iter()
        .fold(Array2::zeros(rho.raw_dim()), |acc, op| acc + dissipator(op, rho))
}

/// dρ/dt = −i[H, ρ] + Σ_k D[L_k](ρ).
pub fn lindblad_rhs(hamiltonian: &CMatrix, collapse_ops: &[CollapseOperator], rho: &CMatrix) -> CMatrix {
    commutator(hamiltonian, rho) * Complex64::new(0.0, -1.0) + total_dissipator(collapse_ops, rho)
}

/// Matrix of the linear map ρ ↦ lindblad_rhs(H, ops, ρ) on vec(ρ).
///
/// Column `j·d + i` is vec(𝓛(|i⟩⟨j|)).
pub fn liouvillian(hamiltonian: &CMatrix, collapse_ops: &[CollapseOperator]) -> CMatrix {
    let d = hamiltonian.nrows();
    let mut superop = Array2::zeros((d * d, d * d));
    for j in 0..d {
        for i in 0..d {
            let mut basis = Array2::zeros((d, d));
            basis[[i, j]] = c(1.0);
            let image = vectorize(&lindblad_rhs(hamiltonian, collapse_ops, &basis));
            superop.column_mut(j * d + i).assign(&image);
        }
    }
    superop
}
