// Copyright 2026 Qupid Contributors
// SPDX-License-Identifier: Apache-2.0

//! Eigendecomposition of normal matrices.
//!
//! Householder reduction to upper Hessenberg form followed by explicitly
//! shifted QR iteration with Givens rotations (Wilkinson shifts, with an
//! exceptional shift when a window stalls). For a normal matrix the
//! converged Schur form is diagonal, so the accumulated unitary holds an
//! orthonormal set of eigenvectors even for degenerate spectra.
//!
//! Ref: Golub & Van Loan, "Matrix Computations" (4th ed.), §7.4–7.5.

use num_complex::Complex64;

use super::{c, identity, CMatrix};
use crate::error::{NumericalError, Result};

const MAX_SWEEPS_PER_EIGENVALUE: usize = 60;
const DEFLATION_EPS: f64 = 1e-15;
/// Largest tolerated strictly-upper Schur entry, relative to ‖A‖.
const NORMALITY_TOL: f64 = 1e-8;

/// Eigenvalues with eigenvectors stored as the columns of `vectors`.
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    pub values: Vec<Complex64>,
    pub vectors: CMatrix,
}

/// Diagonalize a normal matrix (unitary, Hermitian, ...).
///
/// Returns `NumericalError::NoConvergence` if QR iteration stalls or if the
/// Schur form is not diagonal, i.e. the input was not normal to working
/// precision.
pub fn eig_normal(a: &CMatrix) -> Result<EigenDecomposition> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(NumericalError::NoConvergence(format!(
            "eigendecomposition requires a square matrix, got {} × {}",
            n,
            a.ncols()
        ))
        .into());
    }
    if a.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(NumericalError::NoConvergence("eigendecomposition: non-finite input".into()).into());
    }

    let scale = a.iter().fold(0.0f64, |acc, z| acc.max(z.norm()));
    let mut h = a.clone();
    let mut z = identity(n);
    if n == 0 || scale == 0.0 {
        return Ok(EigenDecomposition {
            values: vec![c(0.0); n],
            vectors: z,
        });
    }

    reduce_to_hessenberg(&mut h, &mut z);
    schur_qr(&mut h, &mut z)?;

    let off_diagonal = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .fold(0.0f64, |acc, (i, j)| acc.max(h[[i, j]].norm()));
    if off_diagonal > NORMALITY_TOL * scale.max(1.0) {
        return Err(NumericalError::NoConvergence(format!(
            "Schur form not diagonal (max off-diagonal {off_diagonal:.3e}); matrix is not normal"
        ))
        .into());
    }

    Ok(EigenDecomposition {
        values: (0..n).map(|i| h[[i, i]]).collect(),
        vectors: z,
    })
}

/// Real eigenvalues of a Hermitian matrix, ascending.
pub fn hermitian_eigenvalues(m: &CMatrix) -> Result<Vec<f64>> {
    let mut values: Vec<f64> = eig_normal(m)?.values.into_iter().map(|v| v.re).collect();
    values.sort_by(f64::total_cmp);
    Ok(values)
}

/// H ← Q† H Q in upper Hessenberg form, Z ← Z Q.
fn reduce_to_hessenberg(h: &mut CMatrix, z: &mut CMatrix) {
    let n = h.nrows();
    for k in 0..n.saturating_sub(2) {
        let norm = ((k + 1)..n).map(|i| h[[i, k]].norm_sqr()).sum::<f64>().sqrt();
        if norm == 0.0 {
            continue;
        }
        let x0 = h[[k + 1, k]];
        let phase = if x0.norm() == 0.0 { c(1.0) } else { x0 / x0.norm() };
        let alpha = -phase * norm;

        let mut v = vec![c(0.0); n];
        v[k + 1] = x0 - alpha;
        for i in (k + 2)..n {
            v[i] = h[[i, k]];
        }
        let v_norm = v.iter().map(|x| x.norm_sqr()).sum::<f64>().sqrt();
        if v_norm == 0.0 {
            continue;
        }
        for x in v.iter_mut() {
            *x /= v_norm;
        }

        // P = I − 2vv†, applied on both sides.
        for j in 0..n {
            let s: Complex64 = (0..n).map(|i| v[i].conj() * h[[i, j]]).sum();
            for i in 0..n {
                h[[i, j]] -= c(2.0) * v[i] * s;
            }
        }
        for m in [&mut *h, &mut *z] {
            for i in 0..n {
                let s: Complex64 = (0..n).map(|j| m[[i, j]] * v[j]).sum();
                for j in 0..n {
                    m[[i, j]] -= c(2.0) * s * v[j].conj();
                }
            }
        }
        for i in (k + 2)..n {
            h[[i, k]] = c(0.0);
        }
    }
}

/// Drive a Hessenberg matrix to (numerically) upper-triangular form.
fn schur_qr(h: &mut CMatrix, z: &mut CMatrix) -> Result<()> {
    let n = h.nrows();
    let mut hi = n - 1;
    let mut sweeps = 0usize;

    while hi > 0 {
        // Find the start of the active unreduced window.
        let mut lo = hi;
        while lo > 0 {
            let s = h[[lo - 1, lo - 1]].norm() + h[[lo, lo]].norm();
            let sub = h[[lo, lo - 1]].norm();
            if sub <= DEFLATION_EPS * s || sub < f64::MIN_POSITIVE {
                h[[lo, lo - 1]] = c(0.0);
                break;
            }
            lo -= 1;
        }

        if lo == hi {
            hi -= 1;
            sweeps = 0;
            continue;
        }

        sweeps += 1;
        if sweeps > MAX_SWEEPS_PER_EIGENVALUE {
            return Err(NumericalError::NoConvergence(format!(
                "shifted QR did not converge for eigenvalue {hi}"
            ))
            .into());
        }

        let mut shift = wilkinson_shift(
            h[[hi - 1, hi - 1]],
            h[[hi - 1, hi]],
            h[[hi, hi - 1]],
            h[[hi, hi]],
        );
        if sweeps % 11 == 0 {
            shift += c(0.75 * h[[hi, hi - 1]].norm());
        }
        qr_sweep(h, z, lo, hi, shift);
    }
    Ok(())
}

/// Eigenvalue of [[a, b], [c, d]] closest to d.
fn wilkinson_shift(a: Complex64, b: Complex64, cc: Complex64, d: Complex64) -> Complex64 {
    let half_tr = (a + d) * 0.5;
    let disc = ((a - d) * (a - d) * 0.25 + b * cc).sqrt();
    let mu1 = half_tr + disc;
    let mu2 = half_tr - disc;
    if (mu1 - d).norm() <= (mu2 - d).norm() {
        mu1
    } else {
        mu2
    }
}

/// One explicit shifted QR step on the window `lo..=hi`, applied as a
/// similarity transform to the whole matrix.
fn qr_sweep(h: &mut CMatrix, z: &mut CMatrix, lo: usize, hi: usize, shift: Complex64) {
    let n = h.nrows();
    for i in lo..=hi {
        h[[i, i]] -= shift;
    }

    let mut rotations = Vec::with_capacity(hi - lo);
    for k in lo..hi {
        let (cs, sn) = givens(h[[k, k]], h[[k + 1, k]]);
        for j in k..n {
            let x = h[[k, j]];
            let y = h[[k + 1, j]];
            h[[k, j]] = cs.conj() * x + sn.conj() * y;
            h[[k + 1, j]] = -sn * x + cs * y;
        }
        rotations.push((k, cs, sn));
    }

    for &(k, cs, sn) in &rotations {
        let rows = (k + 2).min(hi + 1);
        for i in 0..rows {
            let x = h[[i, k]];
            let y = h[[i, k + 1]];
            h[[i, k]] = x * cs + y * sn;
            h[[i, k + 1]] = -x * sn.conj() + y * cs.conj();
        }
        for i in 0..n {
            let x = z[[i, k]];
            let y = z[[i, k + 1]];
            z[[i, k]] = x * cs + y * sn;
            z[[i, k + 1]] = -x * sn.conj() + y * cs.conj();
        }
    }

    for i in lo..=hi {
        h[[i, i]] += shift;
    }
}

/// Rotation (c, s) with [[c̄, s̄], [−s, c]] · [a, b]ᵀ = [r, 0]ᵀ.
fn givens(a: Complex64, b: Complex64) -> (Complex64, Complex64) {
    let r = (a.norm_sqr() + b.norm_sqr()).sqrt();
    if r == 0.0 {
        (c(1.0), c(0.0))
    } else {
        (a / r, b / r)
    }
}
