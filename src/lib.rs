// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Jones-matrix algebra and chain calibration for radio-interferometer gain
tables.

Gain tables can be multiplied, have their delays expanded into bandpasses and
be rechannelised onto the frequencies of SKA-Low and SKA-Mid CBF beamformers.
Chains of calibration terms (e.g. "TGB") are solved for and applied over
self-calibration iterations with a user-supplied [`CalibrationBackend`].
 */

pub mod beamformer;
pub mod chain;
pub mod constants;
mod error;
pub mod gain_table;
pub mod interp;
pub(crate) mod math;

#[cfg(test)]
mod tests;

// Re-exports.
pub use beamformer::{
    beamformer_frequencies, expand_delay_phase, multiply_gaintable_jones, resample_bandpass,
    resample_gaintable, set_beamformer_frequencies, ArrayType, BeamformerError,
};
pub use chain::{
    apply_calibration_chain, calibrate_chain, solve_calibrate_chain, CalibrationBackend,
    CalibrationControls, ChainError, GainTables, JonesControls, JonesShape, SolveOptions,
    Timeslice,
};
pub use error::GainChainError;
pub use gain_table::{
    Configuration, GainTable, GainTableError, GainTableQa, GainTableUpdate, JonesType, RADec,
    ReceptorFrame,
};
pub use interp::{InterpAlgorithm, InterpError, Interpolator, PolynomialInterpolator};

#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex64;
