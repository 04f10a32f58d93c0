// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Utilities to support rechannelisation of bandpass and delay solutions for
//! CBF beamformer calibration.
//!
//! SKA-Low beamformer:
//!  - Needs Jones matrices for 384, 304 or 152 channels, per antenna, per beam
//!  - Station channels/beams are centred on integer multiples of 781.25 kHz
//!    (400 MHz / 512 channels)
//!  - Station channels run from 50 MHz (64 * df) to 350 MHz (448 * df)
//!  - No padding is done if the input band is narrower than the beamformer
//!    band
//!
//! SKA-Mid beamformer:
//!  - Needs Jones matrices for 4096 channels, per antenna, per beam
//!  - Search beam bandwidth is 300 MHz (73.2421875 kHz channels)
//!  - The first beamformer channel is centred on the first input channel

mod delay;
mod error;
mod multiply;
mod resample;

pub use delay::expand_delay_phase;
pub use error::BeamformerError;
pub use multiply::multiply_gaintable_jones;
pub use resample::{resample_bandpass, resample_bandpass_with, resample_gaintable};

use itertools::Itertools;
use log::{debug, info, warn};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    constants::{LOW_BEAMFORMER_CHANNEL_WIDTH_HZ, MID_BEAMFORMER_CHANNEL_WIDTH_HZ},
    GainTable,
};

lazy_static::lazy_static! {
    pub(crate) static ref ARRAY_TYPES: String = ArrayType::iter().join(", ");
}

/// The beamformer hardware whose channelisation is targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum ArrayType {
    #[strum(serialize = "LOW")]
    Low,

    #[strum(serialize = "MID")]
    Mid,
}

impl ArrayType {
    /// Infer the array from a configuration name, e.g. "LOWBD2" is SKA-Low.
    pub fn from_configuration_name(name: &str) -> Option<ArrayType> {
        if name.starts_with("LOW") {
            Some(ArrayType::Low)
        } else if name.starts_with("MID") {
            Some(ArrayType::Mid)
        } else {
            None
        }
    }

    /// Parse an array name, failing with a list of the valid names.
    pub fn parse(name: &str) -> Result<ArrayType, BeamformerError> {
        name.parse().map_err(|_| BeamformerError::UnknownArray {
            name: name.to_string(),
            valid: ARRAY_TYPES.clone(),
        })
    }

    /// The beamformer channel width \[Hz\].
    pub fn channel_width(self) -> f64 {
        match self {
            ArrayType::Low => LOW_BEAMFORMER_CHANNEL_WIDTH_HZ,
            ArrayType::Mid => MID_BEAMFORMER_CHANNEL_WIDTH_HZ,
        }
    }

    /// The centre of the first beamformer channel for a band starting at
    /// `min_freq` \[Hz\].
    fn starting_freq(self, min_freq: f64) -> f64 {
        match self {
            ArrayType::Low => {
                let df = self.channel_width();
                df * (min_freq / df).round()
            }
            ArrayType::Mid => min_freq,
        }
    }
}

/// Generate the CBF beamformer frequencies for a gain table.
///
/// `array` explicitly sets the array. By default, it is inferred from the gain
/// table's configuration name. If there are fewer than two input channels or
/// the array can't be determined, the gain table's frequencies are returned
/// unchanged.
pub fn set_beamformer_frequencies(gain_table: &GainTable, array: Option<ArrayType>) -> Vec<f64> {
    beamformer_frequencies(&gain_table.frequency, &gain_table.configuration.name, array)
}

/// Generate the CBF beamformer frequencies for the input frequencies `freqs`
/// \[Hz\]. See [`set_beamformer_frequencies`].
pub fn beamformer_frequencies(
    freqs: &[f64],
    configuration_name: &str,
    array: Option<ArrayType>,
) -> Vec<f64> {
    if freqs.len() <= 1 {
        warn!("Cannot rechannelise {} channel[s]", freqs.len());
        return freqs.to_vec();
    }

    let array = match array.or_else(|| ArrayType::from_configuration_name(configuration_name)) {
        Some(a) => a,
        None => {
            warn!("Unknown array: {configuration_name}. Frequencies unchanged");
            return freqs.to_vec();
        }
    };
    debug!("Setting SKA-{array} CBF beamformer frequencies");

    let (min_freq, max_freq) = freqs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &f| {
            (min.min(f), max.max(f))
        });
    let df_bf = array.channel_width();
    let start = array.starting_freq(min_freq);
    // Everything from the start up to (but not including) the maximum input
    // frequency.
    let num_chans = ((max_freq - start) / df_bf).ceil().max(0.0) as usize;
    let freqs_bf: Vec<f64> = (0..num_chans).map(|i| start + i as f64 * df_bf).collect();

    if freqs_bf.is_empty() {
        warn!(
            "No {array} beamformer channels fit between {:.2} and {:.2} MHz. Frequencies unchanged",
            start / 1e6,
            max_freq / 1e6
        );
        return freqs.to_vec();
    }

    info!("Setting bandpass calibration frequencies for {array} CBF");
    info!(" - {} input frequency channels", freqs.len());
    info!(
        " - input channel width: {:.2} kHz, starting at {:.2} MHz",
        (freqs[1] - freqs[0]) / 1e3,
        freqs[0] / 1e6
    );
    info!(" - {} output frequency channels", freqs_bf.len());
    info!(
        " - output channel width: {:.2} kHz, starting at {:.2} MHz",
        df_bf / 1e3,
        freqs_bf[0] / 1e6
    );

    freqs_bf
}
