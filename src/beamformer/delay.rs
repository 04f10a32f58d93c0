// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Expanding delay solutions into bandpass solutions.

use log::debug;
use ndarray::prelude::*;
use vec1::Vec1;

use super::BeamformerError;
use crate::{gain_table::GainTableUpdate, math::cexp, GainTable, JonesType};

/// Delay calibration tables (type K) are stored as phase shifts at a single
/// reference frequency. Expand these to the frequencies `frequency` \[Hz\],
/// assuming the phase is proportional to frequency.
///
/// This only works if the delay is less than half a wavelength at the
/// reference frequency; this is not checked.
///
/// If `reference_to_centre` is true (usually what you want), the phases are
/// shifted such that the phase at the reference frequency is zero. CASA does
/// this when delay solutions are given as prior calibration terms, so it also
/// needs to be done when combining delays with any subsequent calibration
/// solutions.
///
/// The returned gain table has Jones type B, unit weights and zero residuals.
pub fn expand_delay_phase(
    gain_table: &GainTable,
    frequency: &[f64],
    reference_to_centre: bool,
) -> Result<GainTable, BeamformerError> {
    if gain_table.jones_type != JonesType::K {
        return Err(BeamformerError::WrongJonesType {
            expected: JonesType::K,
            got: gain_table.jones_type,
        });
    }
    if gain_table.frequency.len() != 1 || gain_table.num_chans() != 1 {
        return Err(BeamformerError::ExpectSingleFrequency(
            gain_table.frequency.len().max(gain_table.num_chans()),
        ));
    }
    let out_freqs =
        Vec1::try_from_vec(frequency.to_vec()).map_err(|_| BeamformerError::NoFrequencies)?;
    let freq0 = *gain_table.frequency.first();
    debug!(
        "Expanding delays at {:.3} MHz to {} channels",
        freq0 / 1e6,
        frequency.len()
    );

    let phase0 = gain_table.gain.index_axis(Axis(2), 0).mapv(|g| g.arg());
    let (num_times, num_ants, _, num_rec1, num_rec2) = gain_table.gain.dim();
    let shape = (num_times, num_ants, frequency.len(), num_rec1, num_rec2);
    let gain = Array5::from_shape_fn(shape, |(i_time, i_ant, i_chan, i_rec1, i_rec2)| {
        let freq = if reference_to_centre {
            frequency[i_chan] - freq0
        } else {
            frequency[i_chan]
        };
        cexp(freq / freq0 * phase0[(i_time, i_ant, i_rec1, i_rec2)])
    });

    let gt = GainTable::derive_from(
        gain_table,
        GainTableUpdate {
            weight: Array5::ones(shape),
            residual: Array4::zeros((num_times, frequency.len(), num_rec1, num_rec2)),
            gain,
            frequency: out_freqs,
            jones_type: JonesType::B,
            receptor_frames: None,
        },
    )?;
    Ok(gt)
}
