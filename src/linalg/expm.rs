// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Matrix exponential via scaling-and-squaring with Padé(13) approximation.
//!
//!   Higham (2005), "The Scaling and Squaring Method for the Matrix
//!   Exponential Revisited", SIAM J. Matrix Anal. Appl. 26(4), 1179.
//!
//! Two sizes matter here: 4×4 step propagators exp(−iH dt) over one drive
//! period, and the 16×16 Liouvillian propagator exp(𝓛 Δt) between output
//! samples. The latter can have a large norm for long grid spacings, which
//! the squaring phase absorbs.

use ndarray::{s, Array2};
use num_complex::Complex64;

use super::{c, identity, CMatrix};
use crate::error::{NumericalError, Result};

/// θ₁₃ from Higham (2005), Table 2.3.
const THETA_13: f64 = 5.371_920_351_148_152;

/// Padé(13,13) coefficients b₀..b₁₃.
const PADE_COEFFS: [f64; 14] = [
    64_764_752_532_480_000.0,
    32_382_376_266_240_000.0,
    7_771_770_303_897_600.0,
    1_187_353_796_428_800.0,
    129_060_195_264_000.0,
    10_559_470_521_600.0,
    670_442_572_800.0,
    33_522_128_640.0,
    1_323_241_920.0,
    40_840_800.0,
    960_960.0,
    16_380.0,
    182.0,
    1.0,
];

/// Compute exp(A) for a square complex matrix.
///
/// Fails only if the Padé denominator is numerically singular, which for
/// the scaled argument (‖A/2ˢ‖₁ ≤ θ₁₃) indicates non-finite input.
pub fn matrix_exp(a: &CMatrix) -> Result<CMatrix> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(NumericalError::NoConvergence(format!(
            "matrix_exp requires a square matrix, got {} × {}",
            n,
            a.ncols()
        ))
        .into());
    }
    if n == 0 {
        return Ok(Array2::zeros((0, 0)));
    }
    if n == 1 {
        let mut out = Array2::zeros((1, 1));
        out[[0, 0]] = a[[0, 0]].exp();
        return Ok(out);
    }

    let norm = one_norm(a);
    if !norm.is_finite() {
        return Err(NumericalError::NoConvergence("matrix_exp: non-finite input".into()).into());
    }

    let squarings = if norm > THETA_13 {
        (norm / THETA_13).log2().ceil() as i32
    } else {
        0
    };
    let scaled = a * c(0.5f64.powi(squarings));

    let mut result = pade13(&scaled)?;
    for _ in 0..squarings {
        result = result.dot(&result);
    }
    Ok(result)
}

/// Padé(13,13) approximant r₁₃(A) = (V − U)⁻¹ (V + U).
fn pade13(a: &CMatrix) -> Result<CMatrix> {
    let n = a.nrows();
    let b = |k: usize| c(PADE_COEFFS[k]);
    let eye = identity(n);

    let a2 = a.dot(a);
    let a4 = a2.dot(&a2);
    let a6 = a2.dot(&a4);

    let u_inner = &a6 * b(13) + &a4 * b(11) + &a2 * b(9);
    let u = a.dot(
        &(a6.dot(&u_inner) + &a6 * b(7) + &a4 * b(5) + &a2 * b(3) + &eye * b(1)),
    );

    let v_inner = &a6 * b(12) + &a4 * b(10) + &a2 * b(8);
    let v = a6.dot(&v_inner) + &a6 * b(6) + &a4 * b(4) + &a2 * b(2) + &eye * b(0);

    solve_linear(&v - &u, &v + &u)
}

/// Solve A·X = B by Gaussian elimination with partial pivoting.
fn solve_linear(a: CMatrix, b: CMatrix) -> Result<CMatrix> {
    let n = a.nrows();
    let m = b.ncols();

    let mut aug: Array2<Complex64> = Array2::zeros((n, n + m));
    aug.slice_mut(s![.., ..n]).assign(&a);
    aug.slice_mut(s![.., n..]).assign(&b);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&x, &y| aug[[x, col]].norm().total_cmp(&aug[[y, col]].norm()))
            .unwrap_or(col);
        if pivot_row != col {
            for j in 0..(n + m) {
                aug.swap([col, j], [pivot_row, j]);
            }
        }

        let pivot = aug[[col, col]];
        if pivot.norm() < 1e-300 || !pivot.norm().is_finite() {
            return Err(NumericalError::NoConvergence(
                "matrix_exp: singular Padé denominator".into(),
            )
            .into());
        }

        for row in (col + 1)..n {
            let factor = aug[[row, col]] / pivot;
            if factor == Complex64::new(0.0, 0.0) {
                continue;
            }
            for j in col..(n + m) {
                let val = aug[[col, j]];
                aug[[row, j]] -= factor * val;
            }
        }
    }

    let mut x = Array2::<Complex64>::zeros((n, m));
    for row in (0..n).rev() {
        let pivot = aug[[row, row]];
        for j in 0..m {
            let mut sum = aug[[row, n + j]];
            for k in (row + 1)..n {
                sum -= aug[[row, k]] * x[[k, j]];
            }
            x[[row, j]] = sum / pivot;
        }
    }
    Ok(x)
}

/// Max column sum of absolute values.
fn one_norm(a: &CMatrix) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|z| z.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}
