// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with rechannelising and combining gain tables.

use thiserror::Error;

use crate::{gain_table::GainTableError, interp::InterpError, JonesType};

#[derive(Error, Debug)]
pub enum BeamformerError {
    #[error("Unknown resampler '{name}'. Valid algorithms are: {valid}")]
    UnknownAlgorithm { name: String, valid: String },

    #[error("Unknown array '{name}'. Valid arrays are: {valid}")]
    UnknownArray { name: String, valid: String },

    #[error("Wrong Jones type: {got} != {expected}")]
    WrongJonesType { expected: JonesType, got: JonesType },

    #[error("Expected a single frequency, but the gain table has {0}")]
    ExpectSingleFrequency(usize),

    #[error("No output frequencies were given")]
    NoFrequencies,

    #[error("The gain table has {gains} channels of gains but {freqs} frequencies; cannot resample")]
    ChannelMismatch { gains: usize, freqs: usize },

    #[error("Cannot multiply delays. Use expand_delay_phase first")]
    CannotMultiplyDelays,

    #[error("Gain tables have different {axis} axes: {left} != {right}")]
    ShapeMismatch {
        axis: &'static str,
        left: usize,
        right: usize,
    },

    #[error("Matrices not compatible for multiplication: the left-hand matrices have {left_cols} columns, but the right-hand matrices have {right_rows} rows")]
    NotConformable { left_cols: usize, right_rows: usize },

    #[error(transparent)]
    Interp(#[from] InterpError),

    #[error(transparent)]
    GainTable(#[from] GainTableError),
}
