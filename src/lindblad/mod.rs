// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Open-system dynamics in the Floquet basis.
//!
//! Implements the secular Floquet-Markov form of the GKSL master equation:
//!
//!   dρ/dt = −i[diag(ε), ρ] + Σ_{ab} A_{ab} (L_{ab} ρ L_{ab}† − ½{L_{ab}†L_{ab}, ρ}),
//!   L_{ab} = |b⟩⟨a|
//!
//! This module provides:
//! - Dissipation channels (operator + noise spectrum) built from the rates
//! - Floquet-Markov rate matrix A_{ab} with drive sidebands
//! - Exact superoperator-exponential propagation with trace/positivity checks
//!
//! # References
//!
//! - Lindblad, G. (1976). Commun. Math. Phys. 48, 119.
//!   DOI: 10.1007/BF01608499
//! - Grifoni, M. & Hänggi, P. (1998). Phys. Rep. 304, 229.
//!   DOI: 10.1016/S0370-1573(98)00022-2
//! - Breuer, H.-P. & Petruccione, F. (2002). "The Theory of Open Quantum Systems." Oxford.

pub mod dissipator;
pub mod integrate;
pub mod rates;
pub mod types;

pub use integrate::{
    expectation, purity, state_fidelity, time_grid, trace_real, FloquetMarkovPropagator,
    FloquetTrajectory, StateTolerances,
};
pub use rates::{floquet_markov_rates, RateMatrix};
pub use types::{CollapseOperator, DissipationChannel, NoiseSpectrum, WhiteNoise};
