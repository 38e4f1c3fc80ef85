// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Periodically driven two-partner Hamiltonian.
//!
//!   H(t) = H₀ + A (X_A + X_B) sin(ω_d t)
//!   H₀   = ω_A Z_A + ω_B Z_B + J_e (X_A X_B + Y_A Y_B) + J_c Z_A Z_B

use std::f64::consts::PI;

use super::operators::OperatorCatalog;
use crate::error::{Result, ValidationError};
use crate::linalg::{c, matrix_exp, CMatrix};
use crate::params::SimulationParameters;

/// Static part plus single-harmonic drive.
#[derive(Debug, Clone)]
pub struct DrivenHamiltonian {
    static_part: CMatrix,
    drive_operator: CMatrix,
    drive_freq: f64,
}

impl DrivenHamiltonian {
    /// Assemble H(t) from the six coupling parameters.
    ///
    /// Fails with `InvalidParameter` when the drive frequency is not a
    /// positive finite number, since the period would be undefined.
    pub fn new(params: &SimulationParameters, ops: &OperatorCatalog) -> Result<Self> {
        if !(params.drive_freq.is_finite() && params.drive_freq > 0.0) {
            return Err(ValidationError::invalid(
                "drive_freq",
                format!("must be > 0, got {}", params.drive_freq),
            )
            .into());
        }

        let flip_flop = ops.x_a.dot(&ops.x_b) + ops.y_a.dot(&ops.y_b);
        let static_part = &ops.z_a * c(params.omega_a)
            + &ops.z_b * c(params.omega_b)
            + flip_flop * c(params.j_empathy)
            + &ops.zz * c(params.j_compatibility);
        let drive_operator = (&ops.x_a + &ops.x_b) * c(params.drive_amplitude);

        Ok(Self {
            static_part,
            drive_operator,
            drive_freq: params.drive_freq,
        })
    }

    /// Drive angular frequency ω_d.
    pub fn drive_freq(&self) -> f64 {
        self.drive_freq
    }

    /// Drive period T = 2π/ω_d.
    pub fn period(&self) -> f64 {
        2.0 * PI / self.drive_freq
    }

    /// H(t).
    pub fn at(&self, t: f64) -> CMatrix {
        &self.static_part + &(&self.drive_operator * c((self.drive_freq * t).sin()))
    }

    /// Short-time propagator exp(−i H(t + dt/2) dt) (exponential midpoint).
    pub fn step_propagator(&self, t: f64, dt: f64) -> Result<CMatrix> {
        let h_mid = self.at(t + 0.5 * dt);
        matrix_exp(&(h_mid * num_complex::Complex64::new(0.0, -dt)))
    }
}
