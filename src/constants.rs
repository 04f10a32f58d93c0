// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Frequencies are in Hz and times are
in seconds.
 */

/// The SKA-Low station channel width \[Hz\]. Station channels are centred on
/// integer multiples of this value (400 MHz / 512 channels).
pub const LOW_BEAMFORMER_CHANNEL_WIDTH_HZ: f64 = 781.25e3;

/// The SKA-Mid search-beam bandwidth \[Hz\].
pub const MID_BEAMFORMER_BANDWIDTH_HZ: f64 = 300.0e6;

/// The number of SKA-Mid beamformer channels.
pub const MID_BEAMFORMER_NUM_CHANNELS: usize = 4096;

/// The SKA-Mid beamformer channel width \[Hz\].
pub const MID_BEAMFORMER_CHANNEL_WIDTH_HZ: f64 =
    MID_BEAMFORMER_BANDWIDTH_HZ / MID_BEAMFORMER_NUM_CHANNELS as f64;

/// The degree of the polynomial fit to each sub-band if one isn't specified.
pub const DEFAULT_POLYDEG: usize = 3;

/// Solving stops when the fractional change in the gain solution is below
/// this value.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// The default timeslice of electronic gain (G) solutions \[seconds\].
pub const DEFAULT_G_TIMESLICE: f64 = 60.0;

/// The default timeslice of bandpass (B) solutions \[seconds\].
pub const DEFAULT_B_TIMESLICE: f64 = 1e5;
