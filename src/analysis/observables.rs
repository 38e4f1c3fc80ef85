// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-partner "happiness" trajectories ⟨Z_A⟩(t), ⟨Z_B⟩(t).

use serde::Serialize;

use crate::floquet::OperatorCatalog;
use crate::linalg::CMatrix;
use crate::lindblad::expectation;

/// Two index-aligned expectation series over the lab-frame time grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservableSeries {
    pub times: Vec<f64>,
    pub data_a: Vec<f64>,
    pub data_b: Vec<f64>,
}

impl ObservableSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Reads Tr(Z ρ) for each partner; +1 is "happy", −1 "unhappy".
#[derive(Debug, Clone)]
pub struct ObservableExtractor {
    z_a: CMatrix,
    z_b: CMatrix,
}

impl ObservableExtractor {
    pub fn new(ops: &OperatorCatalog) -> Self {
        Self {
            z_a: ops.z_a.clone(),
            z_b: ops.z_b.clone(),
        }
    }

    /// One (A, B) pair per lab-frame state.
    pub fn happiness(&self, rho_lab: &CMatrix) -> (f64, f64) {
        (expectation(&self.z_a, rho_lab), expectation(&self.z_b, rho_lab))
    }

    pub fn extract(&self, times: &[f64], lab_states: &[CMatrix]) -> ObservableSeries {
        let (data_a, data_b) = lab_states.iter().map(|rho| self.happiness(rho)).unzip();
        ObservableSeries {
            times: times.to_vec(),
            data_a,
            data_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floquet::reference_state;
    use crate::linalg::{c, DIM};
    use approx::assert_relative_eq;
    use ndarray::Array2;

    #[test]
    fn test_reference_state_is_fully_happy() {
        let ex = ObservableExtractor::new(&OperatorCatalog::new());
        let (a, b) = ex.happiness(&reference_state());
        assert_relative_eq!(a, 1.0);
        assert_relative_eq!(b, 1.0);
    }

    #[test]
    fn test_mixed_split_state() {
        // |10⟩: A unhappy, B happy.
        let mut rho = Array2::zeros((DIM, DIM));
        rho[[2, 2]] = c(1.0);
        let ex = ObservableExtractor::new(&OperatorCatalog::new());
        let (a, b) = ex.happiness(&rho);
        assert_relative_eq!(a, -1.0);
        assert_relative_eq!(b, 1.0);

        let mixed = Array2::from_diag_elem(DIM, c(0.25));
        let (a, b) = ex.happiness(&mixed);
        assert_relative_eq!(a, 0.0);
        assert_relative_eq!(b, 0.0);
    }

    #[test]
    fn test_extract_aligns_with_times() {
        let ex = ObservableExtractor::new(&OperatorCatalog::new());
        let states = vec![reference_state(); 3];
        let series = ex.extract(&[0.0, 1.0, 2.0], &states);
        assert_eq!(series.len(), 3);
        assert_eq!(series.data_a, vec![1.0; 3]);
        assert_eq!(series.data_b.len(), series.times.len());
    }
}
