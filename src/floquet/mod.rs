// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Closed-system Floquet structure of the driven two-partner model.
//!
//! - [`operators`]: fixed 4×4 operator catalog
//! - [`hamiltonian`]: H(t) = H₀ + A (X_A + X_B) sin(ω_d t)
//! - [`modes`]: quasi-energies and the one-period mode table
//! - [`lab_frame`]: Floquet basis ↔ lab frame

pub mod hamiltonian;
pub mod lab_frame;
pub mod modes;
pub mod operators;

pub use hamiltonian::DrivenHamiltonian;
pub use lab_frame::LabFrameTransformer;
pub use modes::{wrap_time, FloquetModeSolver, FloquetModeTable};
pub use operators::{reference_state, OperatorCatalog};
