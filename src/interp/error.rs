// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with interpolating spectra.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterpError {
    #[error("Cannot interpolate from zero source channels")]
    NoSourceChannels,

    #[error("The {algorithm} interpolator needs at least {need} source channels, but only {got} were given")]
    TooFewChannels {
        algorithm: &'static str,
        need: usize,
        got: usize,
    },

    #[error("Source frequencies must be strictly increasing, but channel {chan} ({freq} Hz) is not greater than the channel before it")]
    NotIncreasing { chan: usize, freq: f64 },

    #[error("Expected {expected} source values (one per source frequency), but got {got}")]
    ValueCount { expected: usize, got: usize },

    #[error("Sub-band edges {edges:?} must be strictly increasing channel indices no greater than the number of source channels ({num_chans})")]
    BadEdges { edges: Vec<usize>, num_chans: usize },
}
