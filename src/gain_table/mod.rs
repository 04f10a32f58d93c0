// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gain tables: calibration Jones matrices for an interferometer, indexed by
//! time, antenna, frequency channel and receptor pair.
//!
//! Every transformation in this crate (multiplication, resampling, delay
//! expansion) produces a *new* [`GainTable`] from a "primary" input with
//! [`GainTable::derive_from`]; tables are never mutated in place.

mod error;
mod qa;

pub use error::GainTableError;
pub use qa::GainTableQa;

use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use vec1::Vec1;

use crate::c64;

/// The physical effect described by a gain table. This also determines the
/// shape convention of its Jones matrices.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum JonesType {
    /// Atmospheric phase.
    T,

    /// Electronic gains.
    G,

    /// Polarisation.
    P,

    /// Bandpass. Also used for any product of different Jones types.
    B,

    /// Ionosphere.
    I,

    /// Delays, stored as a phase at a single reference frequency.
    K,

    /// Polarisation leakage.
    D,
}

/// The physical meaning of a receptor axis of a gain table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum ReceptorFrame {
    /// X and Y dipoles.
    #[strum(serialize = "linear")]
    Linear,

    /// Right- and left-hand circular feeds.
    #[strum(serialize = "circular")]
    Circular,

    /// A single Stokes I receptor.
    #[strum(serialize = "stokesI")]
    StokesI,
}

impl ReceptorFrame {
    /// The names of the receptors in this frame.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            ReceptorFrame::Linear => &["X", "Y"],
            ReceptorFrame::Circular => &["R", "L"],
            ReceptorFrame::StokesI => &["I"],
        }
    }

    pub fn num_receptors(self) -> usize {
        self.names().len()
    }
}

/// The array (telescope) a gain table belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    /// e.g. "LOWBD2" or "MID". The prefix is used to pick hardware-specific
    /// frequency policies.
    pub name: String,
}

impl Configuration {
    pub fn new<S: Into<String>>(name: S) -> Configuration {
        Configuration { name: name.into() }
    }
}

/// A pointing direction \[radians\].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RADec {
    pub ra: f64,
    pub dec: f64,
}

impl RADec {
    pub fn from_degrees(ra: f64, dec: f64) -> RADec {
        RADec {
            ra: ra.to_radians(),
            dec: dec.to_radians(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GainTable {
    /// The Jones matrices. The dimensions are (time, antenna, channel,
    /// receptor1, receptor2). A channel axis of length 1 means the matrices
    /// are constant in frequency.
    pub gain: Array5<c64>,

    /// Solution weights. Same shape as `gain`.
    pub weight: Array5<f64>,

    /// Solution residuals. The dimensions are (time, channel, receptor1,
    /// receptor2).
    pub residual: Array4<f64>,

    /// Channel centre frequencies \[Hz\].
    pub frequency: Vec1<f64>,

    /// The centroid of each solution interval \[seconds\].
    pub time: Vec1<f64>,

    /// The length of each solution interval \[seconds\].
    pub interval: Vec1<f64>,

    pub jones_type: JonesType,

    /// The meaning of the receptor1 axis (rows of each Jones matrix).
    pub receptor_frame1: ReceptorFrame,

    /// The meaning of the receptor2 axis (columns of each Jones matrix).
    pub receptor_frame2: ReceptorFrame,

    pub phasecentre: RADec,

    pub configuration: Configuration,
}

/// The fields of a [`GainTable`] that a transformation recomputes. Everything
/// else is copied from the primary input by [`GainTable::derive_from`].
#[derive(Debug)]
pub struct GainTableUpdate {
    pub gain: Array5<c64>,
    pub weight: Array5<f64>,
    pub residual: Array4<f64>,
    pub frequency: Vec1<f64>,
    pub jones_type: JonesType,

    /// If set, replaces the primary's (receptor1, receptor2) frames, e.g. for
    /// the product of matrices with different frames.
    pub receptor_frames: Option<(ReceptorFrame, ReceptorFrame)>,
}

impl GainTable {
    /// Create a new gain table. Weights are set to one, residuals to zero, both
    /// receptor axes use `receptor_frame` and the phase centre is (0, 0); use
    /// the `with_*` methods to change these. Tables with rectangular Jones
    /// matrices can be made by filling in the struct and calling
    /// [`GainTable::validate`].
    pub fn new(
        gain: Array5<c64>,
        frequency: Vec1<f64>,
        time: Vec1<f64>,
        interval: Vec1<f64>,
        jones_type: JonesType,
        receptor_frame: ReceptorFrame,
        configuration: Configuration,
    ) -> Result<GainTable, GainTableError> {
        let dim = gain.dim();
        let gt = GainTable {
            weight: Array5::ones(dim),
            residual: Array4::zeros((dim.0, dim.2, dim.3, dim.4)),
            gain,
            frequency,
            time,
            interval,
            jones_type,
            receptor_frame1: receptor_frame,
            receptor_frame2: receptor_frame,
            phasecentre: RADec::default(),
            configuration,
        };
        gt.validate()?;
        Ok(gt)
    }

    pub fn with_weight(mut self, weight: Array5<f64>) -> Result<GainTable, GainTableError> {
        self.weight = weight;
        self.validate()?;
        Ok(self)
    }

    pub fn with_residual(mut self, residual: Array4<f64>) -> Result<GainTable, GainTableError> {
        self.residual = residual;
        self.validate()?;
        Ok(self)
    }

    pub fn with_phasecentre(mut self, phasecentre: RADec) -> GainTable {
        self.phasecentre = phasecentre;
        self
    }

    /// Make a new gain table from `primary`, replacing only the fields in
    /// `update`. `primary` is untouched.
    pub fn derive_from(
        primary: &GainTable,
        update: GainTableUpdate,
    ) -> Result<GainTable, GainTableError> {
        let GainTableUpdate {
            gain,
            weight,
            residual,
            frequency,
            jones_type,
            receptor_frames,
        } = update;
        let (receptor_frame1, receptor_frame2) =
            receptor_frames.unwrap_or((primary.receptor_frame1, primary.receptor_frame2));

        let gt = GainTable {
            gain,
            weight,
            residual,
            frequency,
            time: primary.time.clone(),
            interval: primary.interval.clone(),
            jones_type,
            receptor_frame1,
            receptor_frame2,
            phasecentre: primary.phasecentre,
            configuration: primary.configuration.clone(),
        };
        gt.validate()?;
        Ok(gt)
    }

    /// Check that all of the members of this gain table agree with the
    /// dimensions of the gains.
    pub fn validate(&self) -> Result<(), GainTableError> {
        let (num_times, _, num_chans, num_rec1, num_rec2) = self.gain.dim();

        let check_len = |thing, actual: usize| {
            if actual == num_times {
                Ok(())
            } else {
                Err(GainTableError::BadShape {
                    thing,
                    expected: num_times.to_string(),
                    actual: actual.to_string(),
                })
            }
        };
        check_len("time", self.time.len())?;
        check_len("interval", self.interval.len())?;

        // A single channel of gains is constant across all frequencies.
        if num_chans != self.frequency.len() && num_chans != 1 {
            return Err(GainTableError::BadShape {
                thing: "frequency",
                expected: num_chans.to_string(),
                actual: self.frequency.len().to_string(),
            });
        }
        if self.weight.dim() != self.gain.dim() {
            return Err(GainTableError::BadShape {
                thing: "weight",
                expected: format!("{:?}", self.gain.shape()),
                actual: format!("{:?}", self.weight.shape()),
            });
        }
        if self.residual.dim() != (num_times, num_chans, num_rec1, num_rec2) {
            return Err(GainTableError::BadShape {
                thing: "residual",
                expected: format!("{:?}", [num_times, num_chans, num_rec1, num_rec2]),
                actual: format!("{:?}", self.residual.shape()),
            });
        }

        for (axis, frame, len) in [
            (3, self.receptor_frame1, num_rec1),
            (4, self.receptor_frame2, num_rec2),
        ] {
            if frame.num_receptors() != len {
                return Err(GainTableError::ReceptorMismatch {
                    frame: frame.to_string(),
                    num_receptors: frame.num_receptors(),
                    axis,
                    len,
                });
            }
        }

        if self.jones_type == JonesType::K && self.frequency.len() != 1 {
            return Err(GainTableError::DelayFrequencies(self.frequency.len()));
        }

        Ok(())
    }

    pub fn num_times(&self) -> usize {
        self.gain.len_of(Axis(0))
    }

    pub fn num_antennas(&self) -> usize {
        self.gain.len_of(Axis(1))
    }

    pub fn num_chans(&self) -> usize {
        self.gain.len_of(Axis(2))
    }

    /// The frequency range covered by this table \[Hz\].
    pub fn freq_range(&self) -> (f64, f64) {
        (*self.frequency.first(), *self.frequency.last())
    }
}
