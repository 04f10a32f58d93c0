// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Algorithms to resample a complex spectrum from one frequency grid to
//! another.
//!
//! All algorithms treat the real and imaginary parts independently. The
//! supported algorithms are:
//!
//! * `polyfit`: a least-squares polynomial fit to each sub-band (the default);
//! * `interp`: linear interpolation, clamped at the band edges;
//! * `cubicspl`: a natural cubic spline over the whole band.

mod error;

pub use error::InterpError;

use std::ops::Range;

use itertools::Itertools;
use log::debug;
use ndarray::prelude::*;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    c64,
    constants::DEFAULT_POLYDEG,
    math::{interp_linear, CubicSpline, Polynomial},
};

lazy_static::lazy_static! {
    pub(crate) static ref INTERP_ALGORITHMS: String = InterpAlgorithm::iter().join(", ");
}

/// The names of the available interpolation algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
pub enum InterpAlgorithm {
    #[default]
    #[strum(serialize = "polyfit")]
    PolyFit,

    #[strum(serialize = "interp")]
    Linear,

    #[strum(serialize = "cubicspl")]
    CubicSpline,
}

/// Fit polynomials to the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialInterpolator {
    /// The starting channels of any sub-bands requiring separate fits. If this
    /// is `None` (or empty), the whole band is fit at once. Channel 0 and the
    /// number of source channels are added as the outer edges if they're
    /// missing.
    pub edges: Option<Vec<usize>>,

    /// The degree of the fitted polynomials.
    pub polydeg: usize,
}

impl Default for PolynomialInterpolator {
    fn default() -> Self {
        PolynomialInterpolator {
            edges: None,
            polydeg: DEFAULT_POLYDEG,
        }
    }
}

impl PolynomialInterpolator {
    pub fn with_edges(mut self, edges: Vec<usize>) -> Self {
        self.edges = Some(edges);
        self
    }

    pub fn with_polydeg(mut self, polydeg: usize) -> Self {
        self.polydeg = polydeg;
        self
    }

    /// Get the sub-band edges for a band of `num_chans` source channels,
    /// always starting with 0 and ending with `num_chans`.
    pub fn normalised_edges(&self, num_chans: usize) -> Result<Vec<usize>, InterpError> {
        let mut edges = match self.edges.as_deref() {
            None | Some([]) => vec![0, num_chans],
            Some(e) => e.to_vec(),
        };
        // Include the channels before the first discontinuity and after the
        // last.
        if edges[0] > 0 {
            edges.insert(0, 0);
        }
        if edges[edges.len() - 1] < num_chans {
            edges.push(num_chans);
        }

        let increasing = edges.windows(2).all(|w| w[0] < w[1]);
        if !increasing || edges[edges.len() - 1] > num_chans {
            return Err(InterpError::BadEdges { edges, num_chans });
        }
        debug!("Sub-band edges: {edges:?}");
        Ok(edges)
    }
}

/// An algorithm to resample a single complex spectrum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpolator {
    Polynomial(PolynomialInterpolator),
    Linear,
    CubicSpline,
}

impl Default for Interpolator {
    fn default() -> Self {
        Interpolator::Polynomial(PolynomialInterpolator::default())
    }
}

impl Interpolator {
    /// Select an interpolator by algorithm. `edges` and `polydeg` only affect
    /// the polynomial algorithm and are ignored otherwise.
    pub fn new(
        algorithm: InterpAlgorithm,
        edges: Option<Vec<usize>>,
        polydeg: Option<usize>,
    ) -> Interpolator {
        match algorithm {
            InterpAlgorithm::PolyFit => Interpolator::Polynomial(PolynomialInterpolator {
                edges,
                polydeg: polydeg.unwrap_or(DEFAULT_POLYDEG),
            }),
            InterpAlgorithm::Linear => Interpolator::Linear,
            InterpAlgorithm::CubicSpline => Interpolator::CubicSpline,
        }
    }

    pub fn algorithm(&self) -> InterpAlgorithm {
        match self {
            Interpolator::Polynomial(_) => InterpAlgorithm::PolyFit,
            Interpolator::Linear => InterpAlgorithm::Linear,
            Interpolator::CubicSpline => InterpAlgorithm::CubicSpline,
        }
    }

    /// Resample the complex sequence `values`, sampled at `f_in`, onto `f_out`.
    ///
    /// With the polynomial algorithm, any output frequencies that don't fall
    /// within half a source channel of a sub-band are NaN.
    pub fn interp(
        &self,
        f_out: &[f64],
        f_in: &[f64],
        values: ArrayView1<c64>,
    ) -> Result<Array1<c64>, InterpError> {
        if values.len() != f_in.len() {
            return Err(InterpError::ValueCount {
                expected: f_in.len(),
                got: values.len(),
            });
        }
        let plan = self.plan(f_out, f_in)?;
        let mut out = Array1::zeros(f_out.len());
        plan.interp_into(f_out, f_in, values, out.view_mut());
        Ok(out)
    }

    /// Check the frequencies against this algorithm and work out everything
    /// that doesn't depend on the values being interpolated. The resulting
    /// plan can then be run over many spectra.
    pub(crate) fn plan(&self, f_out: &[f64], f_in: &[f64]) -> Result<InterpPlan, InterpError> {
        if f_in.is_empty() {
            return Err(InterpError::NoSourceChannels);
        }
        if let Some(chan) = f_in
            .windows(2)
            .position(|w| w[1] <= w[0] || w[0].is_nan() || w[1].is_nan())
        {
            return Err(InterpError::NotIncreasing {
                chan: chan + 1,
                freq: f_in[chan + 1],
            });
        }

        let plan = match self {
            Interpolator::Polynomial(poly) => {
                if f_in.len() < 2 {
                    return Err(InterpError::TooFewChannels {
                        algorithm: "polyfit",
                        need: 2,
                        got: f_in.len(),
                    });
                }
                let edges = poly.normalised_edges(f_in.len())?;
                // The source channels are assumed to be evenly spaced.
                let df_in = f_in[1] - f_in[0];
                let subbands = edges
                    .windows(2)
                    .map(|w| {
                        let (start, end) = (w[0], w[1]);
                        let low = f_in[start] - df_in / 2.0;
                        let high = f_in[end - 1] + df_in / 2.0;
                        SubBand {
                            chans_in: start..end,
                            chans_out: f_out
                                .iter()
                                .enumerate()
                                .filter(|&(_, &f)| f >= low && f < high)
                                .map(|(i, _)| i)
                                .collect(),
                        }
                    })
                    .collect();
                InterpPlan::Polynomial {
                    polydeg: poly.polydeg,
                    subbands,
                }
            }
            Interpolator::Linear => InterpPlan::Linear,
            Interpolator::CubicSpline => InterpPlan::CubicSpline,
        };
        Ok(plan)
    }
}

/// A sub-band to be fit separately by the polynomial interpolator.
#[derive(Debug, Clone)]
pub(crate) struct SubBand {
    /// The source channels in this sub-band.
    chans_in: Range<usize>,

    /// The output channels evaluated from this sub-band's fit.
    chans_out: Vec<usize>,
}

#[derive(Debug, Clone)]
pub(crate) enum InterpPlan {
    Polynomial { polydeg: usize, subbands: Vec<SubBand> },
    Linear,
    CubicSpline,
}

impl InterpPlan {
    /// Interpolate `values` into `out`. `f_in`, `f_out` and the lengths of
    /// `values` and `out` must match those used to make this plan.
    pub(crate) fn interp_into(
        &self,
        f_out: &[f64],
        f_in: &[f64],
        values: ArrayView1<c64>,
        mut out: ArrayViewMut1<c64>,
    ) {
        let (re, im): (Vec<f64>, Vec<f64>) = values.iter().map(|v| (v.re, v.im)).unzip();

        match self {
            InterpPlan::Polynomial { polydeg, subbands } => {
                out.fill(c64::new(f64::NAN, f64::NAN));
                for SubBand {
                    chans_in,
                    chans_out,
                } in subbands
                {
                    let x = &f_in[chans_in.clone()];
                    let fits = (
                        Polynomial::fit(x, &re[chans_in.clone()], *polydeg),
                        Polynomial::fit(x, &im[chans_in.clone()], *polydeg),
                    );
                    // A degenerate fit leaves NaNs.
                    if let (Some(fit_re), Some(fit_im)) = fits {
                        for &i_out in chans_out {
                            let f = f_out[i_out];
                            out[i_out] = c64::new(fit_re.eval(f), fit_im.eval(f));
                        }
                    }
                }
            }

            InterpPlan::Linear => {
                for (out, &f) in out.iter_mut().zip(f_out) {
                    *out = c64::new(interp_linear(f, f_in, &re), interp_linear(f, f_in, &im));
                }
            }

            InterpPlan::CubicSpline => {
                let spline_re = CubicSpline::new(f_in, re);
                let spline_im = CubicSpline::new(f_in, im);
                for (out, &f) in out.iter_mut().zip(f_out) {
                    *out = c64::new(spline_re.eval(f), spline_im.eval(f));
                }
            }
        }
    }
}
