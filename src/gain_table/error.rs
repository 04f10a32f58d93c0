// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with constructing gain tables.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GainTableError {
    #[error("Based on the dimensions of the gains, expected {thing} to have {expected} elements, but it had {actual} instead!")]
    BadShape {
        /// What was it that wasn't sensible? Frequency length, weight shape,
        /// etc.
        thing: &'static str,
        expected: String,
        actual: String,
    },

    #[error("Receptor frame {frame} has {num_receptors} receptors, but receptor axis {axis} of the gains has length {len}")]
    ReceptorMismatch {
        frame: String,
        num_receptors: usize,
        axis: usize,
        len: usize,
    },

    #[error("Delay (K) gain tables must have exactly one frequency, but this one has {0}")]
    DelayFrequencies(usize),
}
