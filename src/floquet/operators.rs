// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Fixed operator catalog for the two-partner joint Hilbert space.
//!
//! Single-partner basis: index 0 is "happy" (σz = +1), index 1 is
//! "unhappy" (σz = −1). Joint index is 2·a + b for partner A ⊗ partner B.

use ndarray::{array, Array2};
use num_complex::Complex64;

use crate::linalg::{c, identity, kron, CMatrix};

/// Pauli X.
pub fn sigma_x() -> CMatrix {
    array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]]
}

/// Pauli Y.
pub fn sigma_y() -> CMatrix {
    let i = Complex64::new(0.0, 1.0);
    array![[c(0.0), -i], [i, c(0.0)]]
}

/// Pauli Z.
pub fn sigma_z() -> CMatrix {
    array![[c(1.0), c(0.0)], [c(0.0), c(-1.0)]]
}

/// Lowering operator σ⁻ = |1⟩⟨0| (happy → unhappy).
pub fn sigma_minus() -> CMatrix {
    let mut m = Array2::zeros((2, 2));
    m[[1, 0]] = c(1.0);
    m
}

/// All 4×4 operators used by the Hamiltonian, the dissipation channels and
/// the observables.
#[derive(Debug, Clone)]
pub struct OperatorCatalog {
    /// Bit flip on A ("hot/cold").
    pub x_a: CMatrix,
    /// Phase on A; also the happiness observable.
    pub z_a: CMatrix,
    /// Decay of A ("burned out").
    pub lower_a: CMatrix,
    pub x_b: CMatrix,
    pub z_b: CMatrix,
    pub lower_b: CMatrix,
    /// Z ⊗ Z ("growing apart", anti-correlated dephasing).
    pub zz: CMatrix,
    /// σ⁻ ⊗ σ⁻ ("codependent spiral", collective decay).
    pub lower_lower: CMatrix,
    /// Y on A; only used in the empathy (flip-flop) coupling.
    pub y_a: CMatrix,
    /// Y on B; only used in the empathy (flip-flop) coupling.
    pub y_b: CMatrix,
}

impl OperatorCatalog {
    pub fn new() -> Self {
        let eye = identity(2);
        let on_a = |op: CMatrix| kron(&op, &eye);
        let on_b = |op: CMatrix| kron(&eye, &op);

        Self {
            x_a: on_a(sigma_x()),
            z_a: on_a(sigma_z()),
            lower_a: on_a(sigma_minus()),
            x_b: on_b(sigma_x()),
            z_b: on_b(sigma_z()),
            lower_b: on_b(sigma_minus()),
            zz: kron(&sigma_z(), &sigma_z()),
            lower_lower: kron(&sigma_minus(), &sigma_minus()),
            y_a: on_a(sigma_y()),
            y_b: on_b(sigma_y()),
        }
    }
}

impl Default for OperatorCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// |happy, happy⟩⟨happy, happy|, the reference "both happy" state.
pub fn reference_state() -> CMatrix {
    let mut rho = Array2::zeros((4, 4));
    rho[[0, 0]] = c(1.0);
    rho
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{adjoint, hermiticity_deviation, max_abs_diff, trace};
    use approx::assert_relative_eq;

    #[test]
    fn test_catalog_shapes() {
        let ops = OperatorCatalog::new();
        for m in [
            &ops.x_a,
            &ops.z_a,
            &ops.lower_a,
            &ops.x_b,
            &ops.z_b,
            &ops.lower_b,
            &ops.zz,
            &ops.lower_lower,
            &ops.y_a,
            &ops.y_b,
        ] {
            assert_eq!(m.dim(), (4, 4));
        }
    }

    #[test]
    fn test_zz_is_product_of_embedded_phases() {
        let ops = OperatorCatalog::new();
        assert!(max_abs_diff(&ops.zz, &ops.z_a.dot(&ops.z_b)) < 1e-15);
        assert!(max_abs_diff(&ops.lower_lower, &ops.lower_a.dot(&ops.lower_b)) < 1e-15);
    }

    #[test]
    fn test_reference_state_is_happy_for_both() {
        let ops = OperatorCatalog::new();
        let rho = reference_state();
        assert_relative_eq!(trace(&ops.z_a.dot(&rho)).re, 1.0);
        assert_relative_eq!(trace(&ops.z_b.dot(&rho)).re, 1.0);
    }

    #[test]
    fn test_lowering_maps_happy_to_unhappy() {
        let ops = OperatorCatalog::new();
        // σ⁻_A |00⟩ = |10⟩ (joint index 2)
        let out = ops.lower_a.dot(&reference_state());
        assert_eq!(out[[2, 0]], c(1.0));
        // σ⁻_B |00⟩ = |01⟩ (joint index 1)
        let out = ops.lower_b.dot(&reference_state());
        assert_eq!(out[[1, 0]], c(1.0));
    }

    #[test]
    fn test_paulis_hermitian_lowering_not() {
        let ops = OperatorCatalog::new();
        assert!(hermiticity_deviation(&ops.y_a) < 1e-15);
        assert!(hermiticity_deviation(&ops.x_b) < 1e-15);
        assert!(max_abs_diff(&ops.lower_a, &adjoint(&ops.lower_a)) > 0.5);
    }
}
