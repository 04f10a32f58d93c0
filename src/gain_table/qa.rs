// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Quality assessment of gain tables, for diagnostics.

use std::fmt;

use super::GainTable;

/// Summary statistics of a [`GainTable`]'s gain amplitudes and residuals.
#[derive(Debug, Clone, PartialEq)]
pub struct GainTableQa {
    pub context: String,
    pub shape: Vec<usize>,
    pub max_abs: f64,
    pub min_abs: f64,
    pub rms: f64,
    pub median_abs: f64,
    pub residual_rms: f64,
}

impl GainTable {
    /// Assess the quality of this gain table. `context` is carried through to
    /// the summary (e.g. "Jones matrix T, iteration 2").
    pub fn qa(&self, context: &str) -> GainTableQa {
        let mut amps: Vec<f64> = self.gain.iter().map(|g| g.norm()).collect();
        amps.sort_unstable_by(f64::total_cmp);
        let n = amps.len();

        let rms = (amps.iter().map(|a| a * a).sum::<f64>() / n as f64).sqrt();
        let median_abs = match n {
            0 => f64::NAN,
            n if n % 2 == 0 => (amps[n / 2 - 1] + amps[n / 2]) / 2.0,
            n => amps[n / 2],
        };
        let residual_rms = (self.residual.iter().map(|r| r * r).sum::<f64>()
            / self.residual.len() as f64)
            .sqrt();

        GainTableQa {
            context: context.to_string(),
            shape: self.gain.shape().to_vec(),
            max_abs: amps.last().copied().unwrap_or(f64::NAN),
            min_abs: amps.first().copied().unwrap_or(f64::NAN),
            rms,
            median_abs,
            residual_rms,
        }
    }
}

impl fmt::Display for GainTableQa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: shape {:?}, max abs {:.6}, min abs {:.6}, rms {:.6}, median abs {:.6}, residual rms {:.6}",
            self.context,
            self.shape,
            self.max_abs,
            self.min_abs,
            self.rms,
            self.median_abs,
            self.residual_rms
        )
    }
}
