// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Simulation parameters and the 14-field request contract.
//!
//! Requests carry slider-style values in [0, 100]. Each is divided by 100
//! before use, except `mutualSync`, which is inverted to (100 − v)/100 so
//! that a well-synced couple gets a *low* anti-correlation rate. Missing or
//! unparseable values count as 0.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};

/// The 14 scalars driving one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Partner A level splitting ("temperament").
    pub omega_a: f64,
    /// Partner B level splitting.
    pub omega_b: f64,
    /// Flip-flop (XX + YY) coupling.
    pub j_empathy: f64,
    /// ZZ coupling.
    pub j_compatibility: f64,
    /// Drive amplitude on X_A + X_B.
    pub drive_amplitude: f64,
    /// Drive angular frequency; must be > 0.
    pub drive_freq: f64,
    pub rate_bit_flip_a: f64,
    pub rate_dephase_a: f64,
    pub rate_decay_a: f64,
    pub rate_bit_flip_b: f64,
    pub rate_dephase_b: f64,
    pub rate_decay_b: f64,
    /// Anti-correlated dephasing (Z_A Z_B).
    pub rate_anti_corr: f64,
    /// Collective decay (σ⁻_A σ⁻_B).
    pub rate_coll_decay: f64,
}

impl Default for SimulationParameters {
    /// Demo couple used by the CLI when no request is given.
    fn default() -> Self {
        Self {
            omega_a: 1.0,
            omega_b: 1.4,
            j_empathy: 0.1,
            j_compatibility: 0.05,
            drive_amplitude: 1.5,
            drive_freq: 1.0,
            rate_bit_flip_a: 0.05,
            rate_dephase_a: 0.2,
            rate_decay_a: 0.01,
            rate_bit_flip_b: 0.01,
            rate_dephase_b: 0.05,
            rate_decay_b: 0.1,
            rate_anti_corr: 0.9,
            rate_coll_decay: 0.02,
        }
    }
}

impl SimulationParameters {
    /// Map a raw request object onto parameters (no validation).
    pub fn from_request(raw: &Map<String, Value>) -> Self {
        let unit = |key: &str| to_unit(raw.get(key));
        Self {
            omega_a: unit(fields::PERSON_A_TEMPERAMENT),
            omega_b: unit(fields::PERSON_B_TEMPERAMENT),
            j_empathy: unit(fields::MUTUAL_EMPATHY),
            j_compatibility: unit(fields::MUTUAL_COMPATIBILITY),
            drive_amplitude: unit(fields::MUTUAL_STRENGTH),
            drive_freq: unit(fields::MUTUAL_FREQUENCY),
            rate_bit_flip_a: unit(fields::PERSON_A_HOT_COLD),
            rate_dephase_a: unit(fields::PERSON_A_DISTANT),
            rate_decay_a: unit(fields::PERSON_A_BURNED_OUT),
            rate_bit_flip_b: unit(fields::PERSON_B_HOT_COLD),
            rate_dephase_b: unit(fields::PERSON_B_DISTANT),
            rate_decay_b: unit(fields::PERSON_B_BURNED_OUT),
            rate_anti_corr: (100.0 - raw_value(raw.get(fields::MUTUAL_SYNC))) / 100.0,
            rate_coll_decay: unit(fields::MUTUAL_CODEPENDENCE),
        }
    }

    /// The eight dissipation rates in channel order.
    pub fn rates(&self) -> [(&'static str, f64); 8] {
        [
            ("rate_bit_flip_a", self.rate_bit_flip_a),
            ("rate_dephase_a", self.rate_dephase_a),
            ("rate_decay_a", self.rate_decay_a),
            ("rate_bit_flip_b", self.rate_bit_flip_b),
            ("rate_dephase_b", self.rate_dephase_b),
            ("rate_decay_b", self.rate_decay_b),
            ("rate_anti_corr", self.rate_anti_corr),
            ("rate_coll_decay", self.rate_coll_decay),
        ]
    }

    /// Check the domain invariants: every value finite, drive frequency
    /// positive, every rate non-negative.
    pub fn validate(&self) -> Result<()> {
        let couplings = [
            ("omega_a", self.omega_a),
            ("omega_b", self.omega_b),
            ("j_empathy", self.j_empathy),
            ("j_compatibility", self.j_compatibility),
            ("drive_amplitude", self.drive_amplitude),
            ("drive_freq", self.drive_freq),
        ];
        for (field, value) in couplings.into_iter().chain(self.rates()) {
            if !value.is_finite() {
                return Err(ValidationError::invalid(field, format!("must be finite, got {value}")).into());
            }
        }

        if self.drive_freq <= 0.0 {
            return Err(ValidationError::invalid(
                "drive_freq",
                format!("must be > 0, got {}", self.drive_freq),
            )
            .into());
        }

        for (field, rate) in self.rates() {
            if rate < 0.0 {
                return Err(
                    ValidationError::invalid(field, format!("rate must be >= 0, got {rate}")).into(),
                );
            }
        }
        Ok(())
    }
}

/// Request field names, spelled exactly as the frontend sends them.
pub mod fields {
    pub const PERSON_A_TEMPERAMENT: &str = "personATemperarment";
    pub const PERSON_B_TEMPERAMENT: &str = "personBTemperarment";
    pub const MUTUAL_EMPATHY: &str = "mutualEmpathy";
    pub const MUTUAL_COMPATIBILITY: &str = "mutualCompatability";
    pub const MUTUAL_STRENGTH: &str = "mutualStrength";
    pub const MUTUAL_FREQUENCY: &str = "mutualFrequency";
    pub const PERSON_A_HOT_COLD: &str = "personAHotCold";
    pub const PERSON_A_DISTANT: &str = "personADistant";
    pub const PERSON_A_BURNED_OUT: &str = "personABurnedOut";
    pub const PERSON_B_HOT_COLD: &str = "personBHotCold";
    pub const PERSON_B_DISTANT: &str = "personBDistant";
    pub const PERSON_B_BURNED_OUT: &str = "personBBurnedOut";
    pub const MUTUAL_SYNC: &str = "mutualSync";
    pub const MUTUAL_CODEPENDENCE: &str = "mutualCodependence";

    pub const ALL: [&str; 14] = [
        PERSON_A_TEMPERAMENT,
        PERSON_B_TEMPERAMENT,
        MUTUAL_EMPATHY,
        MUTUAL_COMPATIBILITY,
        MUTUAL_STRENGTH,
        MUTUAL_FREQUENCY,
        PERSON_A_HOT_COLD,
        PERSON_A_DISTANT,
        PERSON_A_BURNED_OUT,
        PERSON_B_HOT_COLD,
        PERSON_B_DISTANT,
        PERSON_B_BURNED_OUT,
        MUTUAL_SYNC,
        MUTUAL_CODEPENDENCE,
    ];
}

/// Raw slider value: numbers as-is, numeric strings parsed, anything else 0.
fn raw_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

fn to_unit(value: Option<&Value>) -> f64 {
    raw_value(value) / 100.0
}
