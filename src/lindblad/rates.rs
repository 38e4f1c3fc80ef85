// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Floquet-Markov transition rates.
//!
//! For channel c, modes (a, b) and sideband k:
//!
//!   X^c_{ab,k} = (1/T) ∫₀ᵀ ⟨u_a(t)|c|u_b(t)⟩ e^{−ikω_d t} dt
//!   Δ_{ab,k}   = ε_a − ε_b + kω_d
//!   Γ^c_{ab,k} = 2π Θ(Δ_{ab,k}) S_c(Δ_{ab,k}) |X^c_{ab,k}|²
//!
//! and A_{ab} = Σ_c Σ_k Γ^c_{ab,k} is the rate of a → b. The integral is the
//! rectangle rule over the M table samples of one period.
//!
//! Ref: Grifoni & Hänggi (1998), Phys. Rep. 304, 229, §5.

use std::f64::consts::PI;

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use super::types::{CollapseOperator, DissipationChannel};
use crate::floquet::FloquetModeTable;
use crate::linalg::{adjoint, c, CMatrix, DIM};

/// A_{ab}: total rate of transitions from Floquet mode a to mode b.
#[derive(Debug, Clone, PartialEq)]
pub struct RateMatrix {
    rates: Array2<f64>,
}

impl RateMatrix {
    /// Wrap a precomputed DIM×DIM matrix of non-negative rates.
    pub fn from_array(rates: Array2<f64>) -> Self {
        Self { rates }
    }

    /// Rate a → b.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.rates[[from, to]]
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.rates
    }

    /// Σ_b A_{ab}.
    pub fn total_out(&self, from: usize) -> f64 {
        self.rates.row(from).sum()
    }

    /// Jump operators |b⟩⟨a| with rate A_{ab}, Floquet basis.
    ///
    /// A unit-norm operator with rate A is the same generator as √A |b⟩⟨a|.
    /// Pairs with zero rate are skipped; a = b is kept (pure dephasing in the
    /// Floquet basis, from sidebands k > 0).
    pub fn jump_operators(&self) -> Vec<CollapseOperator> {
        let mut ops = Vec::new();
        for ((from, to), &rate) in self.rates.indexed_iter() {
            if rate <= 0.0 {
                continue;
            }
            let mut matrix = Array2::zeros((DIM, DIM));
            matrix[[to, from]] = c(1.0);
            ops.push(CollapseOperator {
                matrix,
                rate,
                label: format!("{from}->{to}"),
            });
        }
        ops
    }
}

/// Compute the rate matrix over sidebands k ∈ [−k_max, k_max].
///
/// Every channel contributes; channels with a zero spectrum add nothing.
pub fn floquet_markov_rates(
    table: &FloquetModeTable,
    channels: &[DissipationChannel],
    sideband_cutoff: usize,
) -> RateMatrix {
    let omega_d = table.drive_freq();
    let quasi = table.quasi_energies();
    let m = table.samples();
    let kmax = sideband_cutoff as i64;
    let sidebands: Vec<i64> = (-kmax..=kmax).collect();

    // e^{−ikω_d t_s} for every sample s and sideband k.
    let phases: Vec<Vec<Complex64>> = table
        .sample_times()
        .take(m)
        .map(|t| {
            sidebands
                .iter()
                .map(|&k| Complex64::from_polar(1.0, -(k as f64) * omega_d * t))
                .collect()
        })
        .collect();

    let mut rates = Array2::<f64>::zeros((DIM, DIM));

    for channel in channels {
        let mut fourier = vec![Array2::<Complex64>::zeros((DIM, DIM)); sidebands.len()];
        for (s, phase_row) in phases.iter().enumerate() {
            let elements = mode_matrix_elements(table.sample(s), &channel.operator);
            for (coeffs, &phase) in fourier.iter_mut().zip(phase_row) {
                coeffs.zip_mut_with(&elements, |acc, &x| *acc += x * phase);
            }
        }

        let mut channel_total = 0.0;
        for (coeffs, &k) in fourier.iter().zip(&sidebands) {
            for a in 0..DIM {
                for b in 0..DIM {
                    let delta = quasi[a] - quasi[b] + k as f64 * omega_d;
                    if delta <= 0.0 {
                        continue;
                    }
                    let x = coeffs[[a, b]] / m as f64;
                    let gamma = 2.0 * PI * channel.spectrum.power(delta) * x.norm_sqr();
                    rates[[a, b]] += gamma;
                    channel_total += gamma;
                }
            }
        }
        debug!(channel = channel.label, total_rate = channel_total, "Floquet-Markov channel rates");
    }

    RateMatrix { rates }
}

/// ⟨u_a|op|u_b⟩ for all (a, b): U† op U with modes as columns of U.
fn mode_matrix_elements(modes: &CMatrix, op: &CMatrix) -> CMatrix {
    adjoint(modes).dot(op).dot(modes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floquet::{DrivenHamiltonian, FloquetModeSolver, OperatorCatalog};
    use crate::params::SimulationParameters;
    use approx::assert_relative_eq;

    fn quiet_params() -> SimulationParameters {
        SimulationParameters {
            rate_bit_flip_a: 0.0,
            rate_dephase_a: 0.0,
            rate_decay_a: 0.0,
            rate_bit_flip_b: 0.0,
            rate_dephase_b: 0.0,
            rate_decay_b: 0.0,
            rate_anti_corr: 0.0,
            rate_coll_decay: 0.0,
            ..SimulationParameters::default()
        }
    }

    fn rates_for(params: &SimulationParameters, samples: usize) -> RateMatrix {
        let ops = OperatorCatalog::new();
        let h = DrivenHamiltonian::new(params, &ops).unwrap();
        let table = FloquetModeSolver::new(&h, samples, 4).solve().unwrap();
        let channels = DissipationChannel::from_params(params, &ops).unwrap();
        floquet_markov_rates(&table, &channels, 5)
    }

    fn undriven(params: SimulationParameters) -> SimulationParameters {
        SimulationParameters {
            omega_a: 0.2,
            omega_b: 0.1,
            j_empathy: 0.0,
            j_compatibility: 0.0,
            drive_amplitude: 0.0,
            drive_freq: 1.0,
            ..params
        }
    }

    #[test]
    fn test_undriven_bit_flip_reduces_to_bare_rate() {
        // Diagonal H: ε sorted ascending gives modes |11⟩, |10⟩, |01⟩, |00⟩.
        let params = undriven(SimulationParameters {
            rate_bit_flip_a: 0.5,
            ..quiet_params()
        });
        let rates = rates_for(&params, 100);

        // X_A: |00⟩ → |10⟩ (mode 3 → 1) and |01⟩ → |11⟩ (mode 2 → 0).
        assert_relative_eq!(rates.get(3, 1), 0.5, epsilon = 1e-10);
        assert_relative_eq!(rates.get(2, 0), 0.5, epsilon = 1e-10);
        let total: f64 = rates.as_array().sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_temperature_forbids_upward_transitions() {
        let params = undriven(SimulationParameters {
            rate_bit_flip_a: 0.5,
            ..quiet_params()
        });
        let rates = rates_for(&params, 100);
        assert!(rates.get(1, 3) < 1e-20);
        assert!(rates.get(0, 2) < 1e-20);
    }

    #[test]
    fn test_undriven_dephasing_has_no_secular_rate() {
        // Z_A is diagonal in the mode basis: only Δ = 0 terms, which Θ excludes.
        let params = undriven(SimulationParameters {
            rate_dephase_a: 0.8,
            ..quiet_params()
        });
        let rates = rates_for(&params, 100);
        assert!(rates.as_array().iter().all(|&r| r < 1e-20));
    }

    #[test]
    fn test_no_noise_no_jumps() {
        let rates = rates_for(&quiet_params(), 100);
        assert!(rates.as_array().iter().all(|&r| r == 0.0));
        assert!(rates.jump_operators().is_empty());
    }

    #[test]
    fn test_driven_rates_are_finite_and_non_negative() {
        let rates = rates_for(&SimulationParameters::default(), 200);
        assert!(rates.as_array().iter().all(|r| r.is_finite() && *r >= 0.0));
        assert!((0..DIM).map(|a| rates.total_out(a)).sum::<f64>() > 0.0);
    }

    #[test]
    fn test_jump_operator_layout() {
        let mut rates = Array2::zeros((DIM, DIM));
        rates[[2, 1]] = 0.7;
        rates[[3, 3]] = 0.1;
        let ops = RateMatrix { rates }.jump_operators();
        assert_eq!(ops.len(), 2);
        let hop = ops.iter().find(|op| op.label == "2->1").unwrap();
        assert_eq!(hop.matrix[[1, 2]], c(1.0));
        assert_relative_eq!(hop.rate, 0.7);
        assert!(ops.iter().any(|op| op.label == "3->3"));
    }
}
