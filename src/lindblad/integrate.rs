// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Floquet-basis master-equation propagator.
//!
//! In the Floquet basis the secular Floquet-Markov generator is time
//! independent:
//!
//!   dρ/dt = −i[diag(ε), ρ] + Σ_{ab} A_{ab} D[|b⟩⟨a|](ρ)
//!
//! so each grid interval is propagated exactly with exp(𝓛 Δt) acting on
//! vec(ρ). Every stored state is checked for trace and positivity drift.
//!
//! Ref: Breuer & Petruccione (2002), §3.2.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use super::dissipator::liouvillian;
use super::rates::RateMatrix;
use super::types::CollapseOperator;
use crate::error::{NumericalError, Result, ValidationError};
use crate::linalg::{adjoint, c, hermitian_eigenvalues, matrix_exp, trace, unvectorize, vectorize, CMatrix};

/// Tolerances applied to every stored state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateTolerances {
    /// Allowed |Tr ρ − 1|.
    pub trace: f64,
    /// Allowed negative eigenvalue magnitude.
    pub positivity: f64,
}

impl Default for StateTolerances {
    fn default() -> Self {
        Self {
            trace: 1e-6,
            positivity: 1e-8,
        }
    }
}

/// Floquet-basis states, one per grid time.
#[derive(Debug, Clone)]
pub struct FloquetTrajectory {
    pub times: Vec<f64>,
    pub states: Vec<CMatrix>,
}

impl FloquetTrajectory {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Time-independent Floquet-Markov master equation in the Floquet basis.
#[derive(Debug, Clone)]
pub struct FloquetMarkovPropagator {
    generator: CMatrix,
    jump_count: usize,
    tolerances: StateTolerances,
}

impl FloquetMarkovPropagator {
    /// Build 𝓛 from the quasi-energies and the rate matrix.
    pub fn new(quasi_energies: &[f64], rates: &RateMatrix, tolerances: StateTolerances) -> Self {
        let h_floquet = floquet_hamiltonian(quasi_energies);
        let jumps: Vec<CollapseOperator> = rates.jump_operators();
        Self {
            generator: liouvillian(&h_floquet, &jumps),
            jump_count: jumps.len(),
            tolerances,
        }
    }

    /// The d²×d² generator acting on column-major vec(ρ).
    pub fn generator(&self) -> &CMatrix {
        &self.generator
    }

    /// Evolve `initial` across `times` (strictly increasing, starting at the
    /// time of `initial`). The first stored state is `initial` itself.
    pub fn evolve(&self, initial: &CMatrix, times: &[f64]) -> Result<FloquetTrajectory> {
        if times.is_empty() {
            return Err(ValidationError::invalid("times", "time grid is empty").into());
        }
        if times.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(ValidationError::invalid("times", "time grid must be strictly increasing").into());
        }

        let d = initial.nrows();
        let mut states = Vec::with_capacity(times.len());
        check_state(initial, times[0], self.tolerances)?;
        states.push(initial.clone());

        let mut cached: Option<(f64, CMatrix)> = None;
        let mut vec_rho = vectorize(initial);

        for w in times.windows(2) {
            let dt = w[1] - w[0];
            let step = match cached.take() {
                Some((cached_dt, p)) if (cached_dt - dt).abs() <= 1e-12 * dt.abs() => p,
                _ => matrix_exp(&(&self.generator * c(dt)))?,
            };
            vec_rho = step.dot(&vec_rho);
            cached = Some((dt, step));

            let rho = unvectorize(&vec_rho, d);
            check_state(&rho, w[1], self.tolerances)?;
            states.push(rho);
        }

        debug!(
            steps = times.len() - 1,
            jumps = self.jump_count,
            final_trace = trace_real(&states[states.len() - 1]),
            "Floquet-basis master equation integrated"
        );

        Ok(FloquetTrajectory {
            times: times.to_vec(),
            states,
        })
    }
}

/// H_F = diag(ε).
pub fn floquet_hamiltonian(quasi_energies: &[f64]) -> CMatrix {
    let n = quasi_energies.len();
    let mut h = Array2::zeros((n, n));
    for (i, &e) in quasi_energies.iter().enumerate() {
        h[[i, i]] = c(e);
    }
    h
}

/// `num_samples` equally spaced times on [0, periods·T], both ends included.
pub fn time_grid(period: f64, periods: usize, num_samples: usize) -> Vec<f64> {
    let end = period * periods as f64;
    match num_samples {
        0 => Vec::new(),
        1 => vec![0.0],
        n => (0..n).map(|i| end * i as f64 / (n - 1) as f64).collect(),
    }
}

/// Trace and positivity check; never clamps.
fn check_state(rho: &CMatrix, time: f64, tol: StateTolerances) -> Result<()> {
    let tr = trace_real(rho);
    if !tr.is_finite() || (tr - 1.0).abs() > tol.trace {
        return Err(NumericalError::TraceDrift {
            time,
            trace: tr,
            tolerance: tol.trace,
        }
        .into());
    }

    let hermitian = (rho + &adjoint(rho)) * c(0.5);
    let min_eigenvalue = hermitian_eigenvalues(&hermitian)?
        .first()
        .copied()
        .unwrap_or(0.0);
    if min_eigenvalue < -tol.positivity {
        return Err(NumericalError::NotPositive {
            time,
            min_eigenvalue,
            tolerance: tol.positivity,
        }
        .into());
    }
    Ok(())
}

/// Re Tr ρ.
pub fn trace_real(rho: &CMatrix) -> f64 {
    trace(rho).re
}

/// Purity Tr(ρ²).
pub fn purity(rho: &CMatrix) -> f64 {
    trace_real(&rho.dot(rho))
}

/// F = Tr(ρ_target · ρ); equals ⟨ψ|ρ|ψ⟩ for a pure target |ψ⟩⟨ψ|.
pub fn state_fidelity(rho: &CMatrix, target_rho: &CMatrix) -> f64 {
    trace_real(&target_rho.dot(rho))
}

/// Expectation value Re Tr(O ρ).
pub fn expectation(op: &CMatrix, rho: &CMatrix) -> f64 {
    let product: Array2<Complex64> = op.dot(rho);
    trace_real(&product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::linalg::DIM;
    use approx::assert_relative_eq;

    fn basis_state(i: usize) -> CMatrix {
        let mut m = Array2::zeros((DIM, DIM));
        m[[i, i]] = c(1.0);
        m
    }

    fn uniform_superposition() -> CMatrix {
        Array2::from_elem((DIM, DIM), c(0.25))
    }

    fn rate_matrix(entries: &[((usize, usize), f64)]) -> RateMatrix {
        let mut rates = Array2::zeros((DIM, DIM));
        for &((a, b), r) in entries {
            rates[[a, b]] = r;
        }
        RateMatrix::from_array(rates)
    }

    const QUASI: [f64; 4] = [-0.3, -0.1, 0.1, 0.3];

    #[test]
    fn test_time_grid_inclusive() {
        let grid = time_grid(2.0, 10, 200);
        assert_eq!(grid.len(), 200);
        assert_eq!(grid[0], 0.0);
        assert_relative_eq!(grid[199], 20.0, epsilon = 1e-12);
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_coherent_evolution_preserves_purity() {
        let prop = FloquetMarkovPropagator::new(&QUASI, &rate_matrix(&[]), StateTolerances::default());
        let traj = prop.evolve(&uniform_superposition(), &time_grid(1.0, 5, 50)).unwrap();
        assert_eq!(traj.len(), 50);
        for rho in &traj.states {
            assert_relative_eq!(purity(rho), 1.0, epsilon = 1e-10);
        }
        // Coherence phase e^{−i(ε₀−ε₃)t}.
        let t = traj.times[10];
        let expected = Complex64::from_polar(0.25, -(QUASI[0] - QUASI[3]) * t);
        assert!((traj.states[10][[0, 3]] - expected).norm() < 1e-10);
    }

    #[test]
    fn test_population_decays_exponentially() {
        let gamma = 0.4;
        let prop = FloquetMarkovPropagator::new(
            &QUASI,
            &rate_matrix(&[((3, 0), gamma)]),
            StateTolerances::default(),
        );
        let times = time_grid(1.0, 5, 26);
        let traj = prop.evolve(&basis_state(3), &times).unwrap();
        for (t, rho) in traj.times.iter().zip(&traj.states) {
            assert_relative_eq!(rho[[3, 3]].re, (-gamma * t).exp(), epsilon = 1e-10);
            assert_relative_eq!(rho[[0, 0]].re, 1.0 - (-gamma * t).exp(), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_trace_and_positivity_preserved_with_all_jumps() {
        let entries: Vec<_> = (0..DIM)
            .flat_map(|a| (0..DIM).map(move |b| ((a, b), 0.05 * (1 + a + 2 * b) as f64)))
            .collect();
        let prop = FloquetMarkovPropagator::new(&QUASI, &rate_matrix(&entries), StateTolerances::default());
        let traj = prop.evolve(&uniform_superposition(), &time_grid(3.0, 10, 200)).unwrap();
        for rho in &traj.states {
            assert_relative_eq!(trace_real(rho), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_first_state_is_initial() {
        let prop = FloquetMarkovPropagator::new(&QUASI, &rate_matrix(&[((2, 1), 1.0)]), StateTolerances::default());
        let rho0 = basis_state(2);
        let traj = prop.evolve(&rho0, &[0.0, 0.5]).unwrap();
        assert_eq!(traj.states[0], rho0);
    }

    #[test]
    fn test_trace_drift_is_reported_not_clamped() {
        let prop = FloquetMarkovPropagator::new(&QUASI, &rate_matrix(&[]), StateTolerances::default());
        let bad = basis_state(0) * c(1.1);
        let err = prop.evolve(&bad, &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::Numerical(NumericalError::TraceDrift { .. })), "got {err}");
    }

    #[test]
    fn test_negative_state_is_reported() {
        let prop = FloquetMarkovPropagator::new(&QUASI, &rate_matrix(&[]), StateTolerances::default());
        let mut bad = basis_state(0) * c(1.5);
        bad[[1, 1]] = c(-0.5);
        let err = prop.evolve(&bad, &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::Numerical(NumericalError::NotPositive { .. })), "got {err}");
    }

    #[test]
    fn test_non_increasing_grid_rejected() {
        let prop = FloquetMarkovPropagator::new(&QUASI, &rate_matrix(&[]), StateTolerances::default());
        assert!(prop.evolve(&basis_state(0), &[0.0, 1.0, 1.0]).is_err());
        assert!(prop.evolve(&basis_state(0), &[]).is_err());
    }

    #[test]
    fn test_state_fidelity_and_expectation() {
        let rho = uniform_superposition();
        assert_relative_eq!(state_fidelity(&rho, &basis_state(0)), 0.25, epsilon = 1e-15);
        assert_relative_eq!(state_fidelity(&basis_state(1), &basis_state(1)), 1.0);
        assert_relative_eq!(expectation(&basis_state(2), &rho), 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_purity_of_maximally_mixed() {
        let mixed = Array2::from_diag_elem(DIM, c(0.25));
        assert_relative_eq!(purity(&mixed), 0.25, epsilon = 1e-15);
    }
}
