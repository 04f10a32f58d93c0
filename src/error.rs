// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all gainchain-related errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GainChainError {
    #[error("{0}")]
    GainTable(#[from] crate::gain_table::GainTableError),

    #[error("{0}")]
    Interp(#[from] crate::interp::InterpError),

    #[error("{0}")]
    Beamformer(#[from] crate::beamformer::BeamformerError),

    #[error("{0}")]
    Chain(#[from] crate::chain::ChainError),

    #[error("{0}")]
    Controls(#[from] crate::chain::ControlsError),
}
