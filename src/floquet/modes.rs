// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Floquet quasi-energy decomposition and the one-period mode table.
//!
//! 1. Propagate U(t, 0) across one period with exponential-midpoint steps,
//!    keeping U at M+1 equally spaced sample times.
//! 2. Diagonalize the monodromy U(T, 0): eigenvectors are the t=0 Floquet
//!    modes, eigenvalues e^{−iε T} give the quasi-energies ε ∈ (−ω_d/2, ω_d/2].
//! 3. Tabulate the periodic modes u_i(t) = e^{iε_i t} U(t, 0)|Φ_i(0)⟩, which
//!    satisfy u_i(t + T) = u_i(t).
//!
//! Ref: Shirley (1965), Phys. Rev. 138, B979.
//! Ref: Grifoni & Hänggi (1998), Phys. Rep. 304, 229.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use super::hamiltonian::DrivenHamiltonian;
use crate::error::{NumericalError, Result};
use crate::linalg::{eig_normal, identity, unitarity_deviation, CMatrix, DIM};

/// Distance to a sample, in table intervals, below which lookups return
/// the tabulated modes.
const SAMPLE_SNAP: f64 = 1e-9;

/// Builds a [`FloquetModeTable`] for one driven Hamiltonian.
#[derive(Debug, Clone)]
pub struct FloquetModeSolver<'a> {
    hamiltonian: &'a DrivenHamiltonian,
    /// Table intervals per period (M).
    samples: usize,
    /// Integration steps per table interval.
    substeps: usize,
    unitarity_tolerance: f64,
}

impl<'a> FloquetModeSolver<'a> {
    pub fn new(hamiltonian: &'a DrivenHamiltonian, samples: usize, substeps: usize) -> Self {
        Self {
            hamiltonian,
            samples: samples.max(1),
            substeps: substeps.max(1),
            unitarity_tolerance: 1e-8,
        }
    }

    pub fn with_unitarity_tolerance(mut self, tolerance: f64) -> Self {
        self.unitarity_tolerance = tolerance;
        self
    }

    /// Run the decomposition and tabulate the modes over one period.
    pub fn solve(&self) -> Result<FloquetModeTable> {
        let period = self.hamiltonian.period();
        let m = self.samples;
        let interval = period / m as f64;
        let h = interval / self.substeps as f64;

        let mut propagators = Vec::with_capacity(m + 1);
        let mut u = identity(DIM);
        propagators.push(u.clone());
        let mut worst_deviation = 0.0f64;
        for k in 0..m {
            for s in 0..self.substeps {
                let t = k as f64 * interval + s as f64 * h;
                u = self.hamiltonian.step_propagator(t, h)?.dot(&u);
            }
            let deviation = unitarity_deviation(&u);
            worst_deviation = worst_deviation.max(deviation);
            if deviation > self.unitarity_tolerance {
                return Err(NumericalError::NonUnitary {
                    deviation,
                    tolerance: self.unitarity_tolerance,
                }
                .into());
            }
            propagators.push(u.clone());
        }

        let monodromy = &propagators[m];
        let decomposition = eig_normal(monodromy)?;

        // ε = −arg(λ)/T; order modes by quasi-energy.
        let mut order: Vec<(f64, usize)> = decomposition
            .values
            .iter()
            .enumerate()
            .map(|(i, lambda)| (-lambda.arg() / period, i))
            .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        let quasi_energies: Vec<f64> = order.iter().map(|(e, _)| *e).collect();
        let modes_0 = Array2::from_shape_fn((DIM, DIM), |(row, col)| {
            decomposition.vectors[[row, order[col].1]]
        });

        let modes = propagators
            .iter()
            .enumerate()
            .map(|(k, u_k)| with_quasi_phase(u_k.dot(&modes_0), &quasi_energies, k as f64 * interval))
            .collect::<Vec<_>>();

        debug!(
            period,
            samples = m,
            substeps = self.substeps,
            max_unitarity_deviation = worst_deviation,
            quasi_energies = ?quasi_energies,
            "Floquet modes tabulated"
        );

        Ok(FloquetModeTable {
            hamiltonian: self.hamiltonian.clone(),
            period,
            interval,
            step: h,
            quasi_energies,
            propagators,
            modes,
        })
    }
}

/// Column i multiplied by e^{iε_i t}.
fn with_quasi_phase(mut modes: CMatrix, quasi_energies: &[f64], t: f64) -> CMatrix {
    for (i, mut column) in modes.columns_mut().into_iter().enumerate() {
        let phase = Complex64::from_polar(1.0, quasi_energies[i] * t);
        column.mapv_inplace(|z| z * phase);
    }
    modes
}

/// Periodic Floquet modes sampled at M+1 times spanning exactly one period.
///
/// Mode i at sample k is column i of `modes[k]`.
#[derive(Debug, Clone)]
pub struct FloquetModeTable {
    hamiltonian: DrivenHamiltonian,
    period: f64,
    interval: f64,
    /// Integration step the table was built with (interval / substeps).
    step: f64,
    quasi_energies: Vec<f64>,
    propagators: Vec<CMatrix>,
    modes: Vec<CMatrix>,
}

impl FloquetModeTable {
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Drive angular frequency 2π/T.
    pub fn drive_freq(&self) -> f64 {
        self.hamiltonian.drive_freq()
    }

    /// Quasi-energies in ascending order, principal branch.
    pub fn quasi_energies(&self) -> &[f64] {
        &self.quasi_energies
    }

    /// Number of table intervals M (the table holds M+1 samples).
    pub fn samples(&self) -> usize {
        self.modes.len() - 1
    }

    /// Sample times t_k = k·T/M, k = 0..=M.
    pub fn sample_times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.modes.len()).map(move |k| k as f64 * self.interval)
    }

    /// Tabulated modes at sample k.
    pub fn sample(&self, k: usize) -> &CMatrix {
        &self.modes[k]
    }

    /// The t=0 Floquet modes (columns).
    pub fn modes_at_zero(&self) -> &CMatrix {
        &self.modes[0]
    }

    /// Modes at an arbitrary time.
    ///
    /// Time is wrapped into [0, T) first. A wrapped time within
    /// `SAMPLE_SNAP` intervals of a sample returns that sample (the last
    /// sample folds onto sample 0). Otherwise the sample below is advanced
    /// across the residual with midpoint steps no longer than the table's
    /// own step. Raw `t` is never used beyond the first period.
    pub fn modes_at(&self, t: f64) -> Result<CMatrix> {
        let wrapped = wrap_time(t, self.period);
        let position = wrapped / self.interval;
        let nearest = position.round();
        if (position - nearest).abs() <= SAMPLE_SNAP {
            let k = nearest as usize % self.samples();
            return Ok(self.modes[k].clone());
        }

        let idx = (position.floor() as usize).min(self.samples() - 1);
        let t_idx = idx as f64 * self.interval;
        let residual = wrapped - t_idx;
        let steps = ((residual / self.step - SAMPLE_SNAP).ceil() as usize).max(1);
        let h = residual / steps as f64;

        let mut u = self.propagators[idx].clone();
        for s in 0..steps {
            u = self
                .hamiltonian
                .step_propagator(t_idx + s as f64 * h, h)?
                .dot(&u);
        }
        Ok(with_quasi_phase(
            u.dot(self.modes_at_zero()),
            &self.quasi_energies,
            wrapped,
        ))
    }
}

/// t mod T in [0, T).
pub fn wrap_time(t: f64, period: f64) -> f64 {
    let wrapped = t.rem_euclid(period);
    if wrapped >= period {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floquet::OperatorCatalog;
    use crate::linalg::{adjoint, max_abs_diff};
    use crate::params::SimulationParameters;
    use approx::assert_relative_eq;

    fn table_for(params: &SimulationParameters, samples: usize) -> FloquetModeTable {
        let h = DrivenHamiltonian::new(params, &OperatorCatalog::new()).unwrap();
        FloquetModeSolver::new(&h, samples, 4).solve().unwrap()
    }

    #[test]
    fn test_modes_orthonormal_at_every_sample() {
        let table = table_for(&SimulationParameters::default(), 200);
        assert_eq!(table.samples(), 200);
        for k in 0..=table.samples() {
            let m = table.sample(k);
            assert!(
                unitarity_deviation(m) < 1e-9,
                "modes drift from orthonormality at sample {k}"
            );
        }
    }

    #[test]
    fn test_quasi_energies_in_principal_branch() {
        let params = SimulationParameters::default();
        let table = table_for(&params, 200);
        let half = params.drive_freq / 2.0;
        assert_eq!(table.quasi_energies().len(), DIM);
        for e in table.quasi_energies() {
            assert!(*e > -half - 1e-12 && *e <= half + 1e-12, "ε = {e}");
        }
        let sorted = table.quasi_energies().windows(2).all(|w| w[0] <= w[1]);
        assert!(sorted);
    }

    #[test]
    fn test_table_is_periodic() {
        let table = table_for(&SimulationParameters::default(), 200);
        let first = table.sample(0);
        let last = table.sample(table.samples());
        assert!(max_abs_diff(first, last) < 1e-8);
    }

    #[test]
    fn test_undriven_quasi_energies_fold_static_spectrum() {
        // No drive and no couplings: H = ω_A Z_A + ω_B Z_B, diagonal.
        let params = SimulationParameters {
            omega_a: 0.2,
            omega_b: 0.1,
            j_empathy: 0.0,
            j_compatibility: 0.0,
            drive_amplitude: 0.0,
            drive_freq: 1.0,
            ..SimulationParameters::default()
        };
        let table = table_for(&params, 100);
        // Energies ±0.2 ± 0.1 all lie inside (−0.5, 0.5].
        let expected = [-0.3, -0.1, 0.1, 0.3];
        for (e, x) in table.quasi_energies().iter().zip(expected) {
            assert_relative_eq!(*e, x, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_lookup_wraps_modulo_period() {
        let table = table_for(&SimulationParameters::default(), 300);
        let t = 0.37 * table.period();
        let a = table.modes_at(t).unwrap();
        let b = table.modes_at(t + 7.0 * table.period()).unwrap();
        assert!(max_abs_diff(&a, &b) < 1e-9);
    }

    #[test]
    fn test_lookup_at_sample_times_returns_table() {
        let table = table_for(&SimulationParameters::default(), 100);
        let times: Vec<f64> = table.sample_times().collect();
        let m = table.modes_at(times[40]).unwrap();
        assert!(max_abs_diff(&m, table.sample(40)) < 1e-10);
        let zero = table.modes_at(0.0).unwrap();
        assert_eq!(&zero, table.modes_at_zero());
    }

    #[test]
    fn test_lookup_wraps_on_sample_time() {
        // 0.37·T is sample 185 of 500; +7T lands a few ulps off it.
        let table = table_for(&SimulationParameters::default(), 500);
        let t = 0.37 * table.period();
        let a = table.modes_at(t).unwrap();
        let b = table.modes_at(t + 7.0 * table.period()).unwrap();
        assert!(max_abs_diff(&a, &b) < 1e-12);
        assert!(max_abs_diff(&a, table.sample(185)) < 1e-12);
    }

    #[test]
    fn test_lookup_just_below_sample_snaps() {
        let table = table_for(&SimulationParameters::default(), 100);
        let t_k = table.sample_times().nth(40).unwrap();
        let m = table.modes_at(t_k - 1e-14).unwrap();
        assert_eq!(&m, table.sample(40));

        let near_end = table.modes_at(table.period() - 1e-14).unwrap();
        assert_eq!(&near_end, table.modes_at_zero());
    }

    #[test]
    fn test_lookup_between_samples_uses_table_step() {
        // M intervals × 4 substeps and 2M intervals × 2 substeps share one
        // step grid, so a half-interval lookup in the first must reproduce
        // an odd sample of the second.
        let params = SimulationParameters::default();
        let h = DrivenHamiltonian::new(&params, &OperatorCatalog::new()).unwrap();
        let coarse = FloquetModeSolver::new(&h, 60, 4).solve().unwrap();
        let fine = FloquetModeSolver::new(&h, 120, 2).solve().unwrap();

        let t = fine.sample_times().nth(37).unwrap();
        let a = coarse.modes_at(t).unwrap();
        let b = fine.sample(37);
        for i in 0..DIM {
            let pa = a.column(i).to_owned().into_shape((DIM, 1)).unwrap();
            let pb = b.column(i).to_owned().into_shape((DIM, 1)).unwrap();
            let proj_a = pa.dot(&adjoint(&pa));
            let proj_b = pb.dot(&adjoint(&pb));
            assert!(max_abs_diff(&proj_a, &proj_b) < 1e-9);
        }
    }

    #[test]
    fn test_lookup_between_samples_matches_finer_table() {
        let params = SimulationParameters::default();
        let coarse = table_for(&params, 50);
        let fine = table_for(&params, 500);
        // A time that is a fine sample but not a coarse one.
        let t = 123.0 * fine.period() / 500.0;
        let a = coarse.modes_at(t).unwrap();
        let b = fine.modes_at(t).unwrap();
        // Compare projectors to stay independent of eigenvector phases.
        for i in 0..DIM {
            let pa = a.column(i).to_owned().into_shape((DIM, 1)).unwrap();
            let pb = b.column(i).to_owned().into_shape((DIM, 1)).unwrap();
            let proj_a = pa.dot(&adjoint(&pa));
            let proj_b = pb.dot(&adjoint(&pb));
            assert!(max_abs_diff(&proj_a, &proj_b) < 1e-4);
        }
    }

    #[test]
    fn test_wrap_time() {
        assert_relative_eq!(wrap_time(7.5, 2.0), 1.5);
        assert_relative_eq!(wrap_time(-0.5, 2.0), 1.5);
        assert_eq!(wrap_time(4.0, 2.0), 0.0);
    }
}
