// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with chain calibration and its controls.

use std::path::PathBuf;

use thiserror::Error;

use crate::JonesType;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Calibration context '{context}' contains '{letter}', which is not a Jones type")]
    UnknownJonesType { letter: char, context: String },

    #[error("No calibration controls for Jones matrix {0}")]
    MissingControls(JonesType),

    #[error("Calibration backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ControlsError {
    #[error("Calibration controls file {file:?} doesn't have a recognised file extension! Valid extensions are: {valid}")]
    UnrecognisedExtension { file: PathBuf, valid: String },

    #[error("Couldn't decode {file_type} structure from {file:?}:\n{err}")]
    Decode {
        file: PathBuf,
        file_type: &'static str,
        err: String,
    },

    #[error("'{0}' is not a Jones type")]
    UnknownJonesType(String),

    #[error("Bad timeslice '{0}'; expected 'auto' or a positive number of seconds")]
    BadTimeslice(String),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
