// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dissipation channels and Lindblad jump operators.
//!
//! Ref: Lindblad (1976), Commun. Math. Phys. 48, 119.
//! Ref: Grifoni & Hänggi (1998), Phys. Rep. 304, 229 (Floquet-Markov).

use std::f64::consts::PI;
use std::fmt;

use crate::error::{Result, ValidationError};
use crate::floquet::OperatorCatalog;
use crate::linalg::CMatrix;
use crate::params::SimulationParameters;

/// Power spectral density of the bath coupled to one channel.
///
/// Evaluated at quasi-energy differences (plus drive sidebands) when the
/// Floquet-Markov rates are computed.
pub trait NoiseSpectrum: fmt::Debug + Send + Sync {
    fn power(&self, omega: f64) -> f64;
}

/// Frequency-independent spectrum S(ω) = rate / 2π.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhiteNoise {
    pub rate: f64,
}

impl NoiseSpectrum for WhiteNoise {
    fn power(&self, _omega: f64) -> f64 {
        self.rate / (2.0 * PI)
    }
}

/// A system operator coupled to a bath with the given spectrum.
#[derive(Debug)]
pub struct DissipationChannel {
    pub label: &'static str,
    pub operator: CMatrix,
    pub spectrum: Box<dyn NoiseSpectrum>,
}

impl DissipationChannel {
    /// Build the eight relationship channels from the rate parameters.
    ///
    /// Order: flip A, dephase A, decay A, flip B, dephase B, decay B,
    /// anti-correlated dephasing, collective decay.
    pub fn from_params(params: &SimulationParameters, ops: &OperatorCatalog) -> Result<Vec<Self>> {
        let operators = [
            &ops.x_a,
            &ops.z_a,
            &ops.lower_a,
            &ops.x_b,
            &ops.z_b,
            &ops.lower_b,
            &ops.zz,
            &ops.lower_lower,
        ];

        params
            .rates()
            .into_iter()
            .zip(operators)
            .map(|((label, rate), operator)| {
                if !rate.is_finite() || rate < 0.0 {
                    return Err(ValidationError::invalid(
                        label,
                        format!("rate must be >= 0, got {rate}"),
                    )
                    .into());
                }
                Ok(Self {
                    label,
                    operator: operator.clone(),
                    spectrum: Box::new(WhiteNoise { rate }),
                })
            })
            .collect()
    }
}

/// A Lindblad collapse (jump) operator with its rate.
///
///   D[L](ρ) = γ (L ρ L† − ½{L†L, ρ})
#[derive(Debug, Clone)]
pub struct CollapseOperator {
    /// Operator matrix (d × d).
    pub matrix: CMatrix,
    /// Rate γ.
    pub rate: f64,
    /// Human-readable label, e.g. "2->0".
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;

    #[test]
    fn test_white_noise_is_flat() {
        let s = WhiteNoise { rate: 0.9 };
        assert_relative_eq!(s.power(0.0), 0.9 / (2.0 * PI));
        assert_relative_eq!(s.power(-3.0), s.power(17.5));
    }

    #[test]
    fn test_eight_channels_in_order() {
        let ops = OperatorCatalog::new();
        let channels =
            DissipationChannel::from_params(&SimulationParameters::default(), &ops).unwrap();
        assert_eq!(channels.len(), 8);
        assert_eq!(channels[0].label, "rate_bit_flip_a");
        assert_eq!(channels[6].label, "rate_anti_corr");
        assert_eq!(channels[6].operator, ops.zz);
        assert_relative_eq!(channels[6].spectrum.power(1.0), 0.9 / (2.0 * PI));
        assert_eq!(channels[7].operator, ops.lower_lower);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut params = SimulationParameters::default();
        params.rate_coll_decay = -0.5;
        let err = DissipationChannel::from_params(&params, &OperatorCatalog::new()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("rate_coll_decay"));
    }

    #[test]
    fn test_zero_rate_allowed() {
        let mut params = SimulationParameters::default();
        params.rate_bit_flip_b = 0.0;
        let channels =
            DissipationChannel::from_params(&params, &OperatorCatalog::new()).unwrap();
        assert_eq!(channels[3].spectrum.power(2.0), 0.0);
    }
}
