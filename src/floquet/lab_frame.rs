// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Floquet basis ↔ lab frame.
//!
//!   ρ_lab(t) = Σ_ij ρ_F,ij |u_i(t mod T)⟩⟨u_j(t mod T)| = U_t ρ_F U_t†
//!
//! with the modes as the columns of U_t.

use super::modes::FloquetModeTable;
use crate::error::Result;
use crate::linalg::{adjoint, CMatrix};

/// Maps states between the Floquet basis and the lab frame using one mode
/// table. Lookups always go through [`FloquetModeTable::modes_at`], which
/// wraps time into the first period.
#[derive(Debug, Clone, Copy)]
pub struct LabFrameTransformer<'a> {
    table: &'a FloquetModeTable,
}

impl<'a> LabFrameTransformer<'a> {
    pub fn new(table: &'a FloquetModeTable) -> Self {
        Self { table }
    }

    /// Floquet-basis ρ at lab time `t` → lab-frame ρ.
    pub fn to_lab(&self, rho_floquet: &CMatrix, t: f64) -> Result<CMatrix> {
        let modes = self.table.modes_at(t)?;
        Ok(modes.dot(rho_floquet).dot(&adjoint(&modes)))
    }

    /// Lab-frame ρ at t = 0 → Floquet basis: ρ_F = Φ† ρ Φ.
    pub fn to_floquet(&self, rho_lab: &CMatrix) -> CMatrix {
        let modes = self.table.modes_at_zero();
        adjoint(modes).dot(rho_lab).dot(modes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floquet::{reference_state, DrivenHamiltonian, FloquetModeSolver, OperatorCatalog};
    use crate::linalg::{max_abs_diff, trace};
    use crate::params::SimulationParameters;
    use approx::assert_relative_eq;

    fn table() -> FloquetModeTable {
        let h = DrivenHamiltonian::new(&SimulationParameters::default(), &OperatorCatalog::new()).unwrap();
        FloquetModeSolver::new(&h, 200, 4).solve().unwrap()
    }

    #[test]
    fn test_round_trip_at_zero_is_identity() {
        let table = table();
        let frame = LabFrameTransformer::new(&table);
        let rho0 = reference_state();
        let back = frame.to_lab(&frame.to_floquet(&rho0), 0.0).unwrap();
        assert!(max_abs_diff(&back, &rho0) < 1e-12);
    }

    #[test]
    fn test_transform_preserves_trace() {
        let table = table();
        let frame = LabFrameTransformer::new(&table);
        let rho_f = frame.to_floquet(&reference_state());
        assert_relative_eq!(trace(&rho_f).re, 1.0, epsilon = 1e-12);
        let lab = frame.to_lab(&rho_f, 3.3).unwrap();
        assert_relative_eq!(trace(&lab).re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_uses_time_modulo_period() {
        let table = table();
        let frame = LabFrameTransformer::new(&table);
        let rho_f = frame.to_floquet(&reference_state());
        let t = 0.61 * table.period();
        let a = frame.to_lab(&rho_f, t).unwrap();
        let b = frame.to_lab(&rho_f, t + 4.0 * table.period()).unwrap();
        assert!(max_abs_diff(&a, &b) < 1e-9);
    }
}
