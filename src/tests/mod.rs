// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpful functions for tests.

use ndarray::prelude::*;
use vec1::Vec1;

use crate::{c64, Configuration, GainTable, JonesType, RADec, ReceptorFrame};

/// Make a gain table whose gains are given by `f(time, ant, chan, rec1,
/// rec2)`. Time steps are 10 s apart.
pub(crate) fn make_gaintable<F>(
    jones_type: JonesType,
    num_times: usize,
    num_ants: usize,
    freqs: &[f64],
    frame: ReceptorFrame,
    f: F,
) -> GainTable
where
    F: Fn((usize, usize, usize, usize, usize)) -> c64,
{
    let nrec = frame.num_receptors();
    let gain = Array5::from_shape_fn((num_times, num_ants, freqs.len(), nrec, nrec), f);
    let time = Vec1::try_from_vec((0..num_times).map(|t| t as f64 * 10.0).collect()).unwrap();
    let interval = Vec1::try_from_vec(vec![10.0; num_times]).unwrap();
    GainTable::new(
        gain,
        Vec1::try_from_vec(freqs.to_vec()).unwrap(),
        time,
        interval,
        jones_type,
        frame,
        Configuration::new("LOWBD2"),
    )
    .unwrap()
    .with_phasecentre(RADec::from_degrees(0.0, -27.0))
}

/// A gain table full of identity Jones matrices.
pub(crate) fn identity_gaintable(
    jones_type: JonesType,
    num_times: usize,
    num_ants: usize,
    freqs: &[f64],
    frame: ReceptorFrame,
) -> GainTable {
    make_gaintable(jones_type, num_times, num_ants, freqs, frame, |(_, _, _, r1, r2)| {
        if r1 == r2 {
            c64::new(1.0, 0.0)
        } else {
            c64::new(0.0, 0.0)
        }
    })
}

/// Evenly spaced frequencies \[Hz\].
pub(crate) fn linspace_freqs(start: f64, step: f64, num: usize) -> Vec<f64> {
    (0..num).map(|i| start + i as f64 * step).collect()
}
