// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics.


use ndarray::prelude::*;

use crate::c64;

/// Complex exponential. The argument is assumed to be purely imaginary.
///
/// This function doesn't actually use complex numbers; it just returns the real
/// and imag components from Euler's formula (i.e. e^{ix} = cos{x} + i sin{x}).
///
/// # Examples
///
/// `assert_abs_diff_eq!(cexp(PI), c64::new(-1.0, 0.0));`
#[inline]
pub(crate) fn cexp(x: f64) -> c64 {
    let (im, re) = x.sin_cos();
    c64::new(re, im)
}

/// A least-squares polynomial fit. The abscissae are mapped onto [-1, 1]
/// before fitting; evaluating does the same mapping, so callers only ever deal
/// in their own units (e.g. Hz).
#[derive(Debug, Clone)]
pub(crate) struct Polynomial {
    /// Coefficients in increasing order of power, in the mapped domain.
    coeffs: Vec<f64>,
    offset: f64,
    scale: f64,
}

impl Polynomial {
    /// Fit a polynomial of degree `deg` to `(x, y)`. If there are too few
    /// points to constrain the requested degree, the degree is lowered to
    /// `x.len() - 1` (which interpolates the points exactly).
    ///
    /// Returns `None` if there are no points or the fit is degenerate (e.g.
    /// duplicated abscissae).
    pub(crate) fn fit(x: &[f64], y: &[f64], deg: usize) -> Option<Polynomial> {
        assert_eq!(x.len(), y.len());
        let num_points = x.len();
        if num_points == 0 {
            return None;
        }
        let num_coeffs = (deg + 1).min(num_points);

        let (min, max) = x
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &x| {
                (min.min(x), max.max(x))
            });
        let offset = (max + min) / 2.0;
        let scale = if max > min { (max - min) / 2.0 } else { 1.0 };

        // Vandermonde matrix in the mapped domain.
        let mut a = Array2::zeros((num_points, num_coeffs));
        for (mut row, &x) in a.outer_iter_mut().zip(x) {
            let t = (x - offset) / scale;
            let mut power = 1.0;
            for elem in row.iter_mut() {
                *elem = power;
                power *= t;
            }
        }
        let coeffs = lstsq(a, Array1::from_vec(y.to_vec()))?;

        Some(Polynomial {
            coeffs,
            offset,
            scale,
        })
    }

    /// Evaluate the polynomial at `x`.
    pub(crate) fn eval(&self, x: f64) -> f64 {
        let t = (x - self.offset) / self.scale;
        // Horner's method.
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }
}

/// Solve the overdetermined (or square) system `a x = b` in the least-squares
/// sense with Householder QR. `a` must have at least as many rows as columns.
fn lstsq(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Vec<f64>> {
    let (m, n) = a.dim();
    assert!(m >= n);
    let max_abs = a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));

    for k in 0..n {
        let norm = a.slice(s![k.., k]).iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm <= f64::EPSILON * max_abs * m as f64 {
            return None;
        }
        let alpha = if a[(k, k)] > 0.0 { -norm } else { norm };
        let mut v = a.slice(s![k.., k]).to_owned();
        v[0] -= alpha;
        let v_norm_sq = v.iter().map(|v| v * v).sum::<f64>();

        for j in k..n {
            let proj = v.dot(&a.slice(s![k.., j])) * 2.0 / v_norm_sq;
            a.slice_mut(s![k.., j]).scaled_add(-proj, &v);
        }
        let proj = v.dot(&b.slice(s![k..])) * 2.0 / v_norm_sq;
        b.slice_mut(s![k..]).scaled_add(-proj, &v);
    }

    // Back substitution on the upper-triangular R.
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for (j, x) in x.iter().enumerate().skip(i + 1) {
            sum -= a[(i, j)] * x;
        }
        x[i] = sum / a[(i, i)];
    }
    Some(x)
}

/// One-dimensional linear interpolation with numpy `interp` semantics; `xp`
/// must be increasing, and values of `x` outside `xp` are clamped to the end
/// values of `fp`. A NaN `x` gives NaN.
pub(crate) fn interp_linear(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let n = xp.len();
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    // The first index with xp > x; guaranteed to be in 1..n.
    let hi = xp.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let t = (x - xp[lo]) / (xp[hi] - xp[lo]);
    fp[lo] + t * (fp[hi] - fp[lo])
}

/// A natural cubic spline through `(x, y)`.
#[derive(Debug, Clone)]
pub(crate) struct CubicSpline<'a> {
    x: &'a [f64],
    y: Vec<f64>,
    /// Second derivatives at each knot.
    d2: Vec<f64>,
}

impl<'a> CubicSpline<'a> {
    /// `x` must be strictly increasing and the same length as `y`.
    pub(crate) fn new(x: &'a [f64], y: Vec<f64>) -> CubicSpline<'a> {
        assert_eq!(x.len(), y.len());
        let n = x.len();
        let mut d2 = vec![0.0; n];
        if n > 2 {
            // Tridiagonal system for the interior second derivatives, solved
            // with the Thomas algorithm. The natural boundary conditions pin
            // the end second derivatives to zero.
            let m = n - 2;
            let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
            let mut c_prime = vec![0.0; m];
            let mut d_prime = vec![0.0; m];
            for i in 0..m {
                let sub = if i > 0 { h[i] } else { 0.0 };
                let diag = 2.0 * (h[i] + h[i + 1]);
                let sup = if i + 1 < m { h[i + 1] } else { 0.0 };
                let rhs =
                    6.0 * ((y[i + 2] - y[i + 1]) / h[i + 1] - (y[i + 1] - y[i]) / h[i]);
                let (prev_c, prev_d) = if i > 0 {
                    (c_prime[i - 1], d_prime[i - 1])
                } else {
                    (0.0, 0.0)
                };
                let w = diag - sub * prev_c;
                c_prime[i] = sup / w;
                d_prime[i] = (rhs - sub * prev_d) / w;
            }
            d2[m] = d_prime[m - 1];
            for i in (0..m - 1).rev() {
                d2[i + 1] = d_prime[i] - c_prime[i] * d2[i + 2];
            }
        }

        CubicSpline { x, y, d2 }
    }

    /// Evaluate the spline at `x`. Outside the knots, the first or last cubic
    /// piece is extrapolated.
    pub(crate) fn eval(&self, x: f64) -> f64 {
        let n = self.x.len();
        if n == 1 {
            return self.y[0];
        }
        let hi = self.x.partition_point(|&v| v <= x).clamp(1, n - 1);
        let lo = hi - 1;
        let h = self.x[hi] - self.x[lo];
        let a = (self.x[hi] - x) / h;
        let b = (x - self.x[lo]) / h;
        a * self.y[lo]
            + b * self.y[hi]
            + ((a * a * a - a) * self.d2[lo] + (b * b * b - b) * self.d2[hi]) * h * h / 6.0
    }
}
