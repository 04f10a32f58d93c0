// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod chain;
mod rechannelise;

use ndarray::prelude::*;
use vec1::Vec1;

use gainchain::{c64, Configuration, GainTable, JonesType, RADec, ReceptorFrame};

/// Make a gain table over `freqs` with gains given by `f(time, antenna,
/// channel, receptor1, receptor2)`.
fn make_gaintable<F>(
    jones_type: JonesType,
    num_times: usize,
    num_ants: usize,
    freqs: &[f64],
    configuration: &str,
    f: F,
) -> GainTable
where
    F: Fn((usize, usize, usize, usize, usize)) -> c64,
{
    let gain = Array5::from_shape_fn((num_times, num_ants, freqs.len(), 2, 2), f);
    GainTable::new(
        gain,
        Vec1::try_from_vec(freqs.to_vec()).unwrap(),
        Vec1::try_from_vec((0..num_times).map(|t| t as f64 * 60.0).collect()).unwrap(),
        Vec1::try_from_vec(vec![60.0; num_times]).unwrap(),
        jones_type,
        ReceptorFrame::Linear,
        Configuration::new(configuration),
    )
    .unwrap()
    .with_phasecentre(RADec::from_degrees(15.0, -45.0))
}
