// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities.

use ndarray::Array2;
use num_complex::Complex64;
use serde_json::{json, Map, Value};

use crate::analyzer::{AnalyzerError, AnalyzerOutput, ConversationAnalyzer};
use crate::linalg::CMatrix;
use crate::params::fields;

/// Element-wise comparison within `tol`.
pub fn assert_matrix_close(a: &CMatrix, b: &CMatrix, tol: f64) {
    assert_eq!(a.shape(), b.shape());
    for ((i, j), val) in a.indexed_iter() {
        let diff = (val - b[[i, j]]).norm();
        assert!(
            diff < tol,
            "Mismatch at ({}, {}): {:?} vs {:?} (diff={})",
            i,
            j,
            val,
            b[[i, j]],
            diff
        );
    }
}

/// Deterministic pseudo-random Hermitian matrix (xorshift64, entries in [−1, 1]).
pub fn random_hermitian(n: usize, seed: u64) -> CMatrix {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    };

    let mut m = Array2::zeros((n, n));
    for i in 0..n {
        m[[i, i]] = Complex64::new(next(), 0.0);
        for j in (i + 1)..n {
            let z = Complex64::new(next(), next());
            m[[i, j]] = z;
            m[[j, i]] = z.conj();
        }
    }
    m
}

/// Analyzer returning a fixed inference, or a fixed failure.
pub struct MockAnalyzer {
    result: Result<Map<String, Value>, String>,
}

impl MockAnalyzer {
    /// Every field at 50.
    pub fn midpoint() -> Self {
        Self::with_params(fields::ALL.iter().map(|k| (k.to_string(), json!(50))).collect())
    }

    pub fn with_params(params: Map<String, Value>) -> Self {
        Self { result: Ok(params) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

impl ConversationAnalyzer for MockAnalyzer {
    fn analyze(&self, upload: &[u8]) -> Result<AnalyzerOutput, AnalyzerError> {
        let params = self.result.clone().map_err(AnalyzerError)?;
        let message_count = String::from_utf8_lossy(upload)
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count();
        Ok(AnalyzerOutput {
            params,
            debug: json!({ "source": "mock", "bytes": upload.len() }),
            message_count,
        })
    }
}
