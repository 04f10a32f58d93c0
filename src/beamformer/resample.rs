// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Re-channelising the spectra of gain tables.

use log::debug;
use ndarray::{prelude::*, Zip};
use vec1::Vec1;

use super::BeamformerError;
use crate::{
    c64,
    gain_table::GainTableUpdate,
    interp::{InterpAlgorithm, Interpolator, INTERP_ALGORITHMS},
    GainTable,
};

/// Re-channelise each spectrum of gain or leakage terms in `gain_table` onto
/// `f_out` \[Hz\].
///
/// `algorithm` is one of "polyfit" (the default in the original tooling),
/// "interp" or "cubicspl". `edges` and `polydeg` are only used by "polyfit".
///
/// Returns the new gains, with dimensions (time, antenna, `f_out.len()`,
/// receptor1, receptor2).
pub fn resample_bandpass(
    f_out: &[f64],
    gain_table: &GainTable,
    algorithm: &str,
    edges: Option<Vec<usize>>,
    polydeg: Option<usize>,
) -> Result<Array5<c64>, BeamformerError> {
    let algorithm: InterpAlgorithm =
        algorithm
            .parse()
            .map_err(|_| BeamformerError::UnknownAlgorithm {
                name: algorithm.to_string(),
                valid: INTERP_ALGORITHMS.clone(),
            })?;
    let interpolator = Interpolator::new(algorithm, edges, polydeg);
    resample_bandpass_with(f_out, gain_table, &interpolator)
}

/// Re-channelise each spectrum of `gain_table` onto `f_out` with
/// `interpolator`. Every (time, antenna, receptor1, receptor2) spectrum is
/// independent, so they're done in parallel.
pub fn resample_bandpass_with(
    f_out: &[f64],
    gain_table: &GainTable,
    interpolator: &Interpolator,
) -> Result<Array5<c64>, BeamformerError> {
    let f_in: &[f64] = &gain_table.frequency;
    let (num_times, num_ants, num_chans, num_rec1, num_rec2) = gain_table.gain.dim();
    if num_chans != f_in.len() {
        return Err(BeamformerError::ChannelMismatch {
            gains: num_chans,
            freqs: f_in.len(),
        });
    }

    let plan = interpolator.plan(f_out, f_in)?;
    debug!(
        "Resampling {} spectra from {num_chans} to {} channels with {}",
        num_times * num_ants * num_rec1 * num_rec2,
        f_out.len(),
        interpolator.algorithm()
    );

    let mut gain_out = Array5::zeros((num_times, num_ants, f_out.len(), num_rec1, num_rec2));
    Zip::from(gain_out.lanes_mut(Axis(2)))
        .and(gain_table.gain.lanes(Axis(2)))
        .par_for_each(|out, spectrum| plan.interp_into(f_out, f_in, spectrum, out));

    Ok(gain_out)
}

/// Re-channelise a whole gain table onto `f_out`. The new table has the same
/// Jones type; its weights are one and its residuals zero, as no quality
/// information survives the interpolation.
pub fn resample_gaintable(
    f_out: &[f64],
    gain_table: &GainTable,
    interpolator: &Interpolator,
) -> Result<GainTable, BeamformerError> {
    let frequency = Vec1::try_from_vec(f_out.to_vec()).map_err(|_| BeamformerError::NoFrequencies)?;
    let gain = resample_bandpass_with(f_out, gain_table, interpolator)?;
    let (num_times, _, num_chans, num_rec1, num_rec2) = gain.dim();

    let gt = GainTable::derive_from(
        gain_table,
        GainTableUpdate {
            weight: Array5::ones(gain.dim()),
            residual: Array4::zeros((num_times, num_chans, num_rec1, num_rec2)),
            gain,
            frequency,
            jones_type: gain_table.jones_type,
            receptor_frames: None,
        },
    )?;
    Ok(gt)
}
