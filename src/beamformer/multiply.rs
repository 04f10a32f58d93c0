// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Combining the Jones matrices of two gain tables.

use log::{debug, trace};
use ndarray::{linalg::general_mat_mul, prelude::*, Zip};
use num_traits::{One, Zero};
use rayon::prelude::*;

use super::BeamformerError;
use crate::{c64, gain_table::GainTableUpdate, GainTable, JonesType};

/// Multiply the Jones matrices of `gain_table1` and `gain_table2` for each
/// time, antenna and frequency channel.
///
/// If either table has a single channel, its matrices are used for every
/// channel of the other table. With `elementwise`, the matrices are multiplied
/// element by element, otherwise `gain_table1`'s matrix is the left operand of
/// a matrix product.
///
/// The result has `gain_table1`'s times, phase centre and configuration. Its
/// frequencies, weights and residuals come from whichever table has more than
/// one channel (`gain_table1` if both do). If the two Jones types agree, the
/// result keeps it, otherwise it is a [`JonesType::B`] table.
pub fn multiply_gaintable_jones(
    gain_table1: &GainTable,
    gain_table2: &GainTable,
    elementwise: bool,
) -> Result<GainTable, BeamformerError> {
    if gain_table1.jones_type == JonesType::K || gain_table2.jones_type == JonesType::K {
        return Err(BeamformerError::CannotMultiplyDelays);
    }
    let shape = product_shape(&gain_table1.gain, &gain_table2.gain, elementwise)?;
    debug!(
        "Multiplying {} and {} gain tables ({}), output shape {shape:?}",
        gain_table1.jones_type,
        gain_table2.jones_type,
        if elementwise { "elementwise" } else { "matrix" }
    );

    // Broadcast single-channel tables across all output channels.
    let num_chans1 = gain_table1.num_chans();
    let num_chans2 = gain_table2.num_chans();
    let broadcast = |i_chan: usize, num_chans: usize| if num_chans == 1 { 0 } else { i_chan };

    let mut gain = Array5::zeros(shape);
    gain.outer_iter_mut()
        .into_par_iter()
        .enumerate()
        .for_each(|(i_time, mut gain)| {
            for i_ant in 0..shape.1 {
                for i_chan in 0..shape.2 {
                    let j1 = gain_table1.gain.slice(s![
                        i_time,
                        i_ant,
                        broadcast(i_chan, num_chans1),
                        ..,
                        ..
                    ]);
                    let j2 = gain_table2.gain.slice(s![
                        i_time,
                        i_ant,
                        broadcast(i_chan, num_chans2),
                        ..,
                        ..
                    ]);
                    let mut jones = gain.slice_mut(s![i_ant, i_chan, .., ..]);
                    if elementwise {
                        Zip::from(&mut jones)
                            .and(&j1)
                            .and(&j2)
                            .for_each(|j, &a, &b| *j = a * b);
                    } else {
                        general_mat_mul(c64::one(), &j1, &j2, c64::zero(), &mut jones);
                    }
                }
            }
        });

    let metadata_source = if num_chans1 > 1 {
        gain_table1
    } else {
        gain_table2
    };
    trace!(
        "Frequencies, weights and residuals are from the {} table",
        metadata_source.jones_type
    );
    let weight = if metadata_source.weight.dim() == shape {
        metadata_source.weight.clone()
    } else {
        Array5::ones(shape)
    };
    let residual_shape = (shape.0, shape.2, shape.3, shape.4);
    let residual = if metadata_source.residual.dim() == residual_shape {
        metadata_source.residual.clone()
    } else {
        Array4::zeros(residual_shape)
    };
    let jones_type = if gain_table1.jones_type == gain_table2.jones_type {
        gain_table1.jones_type
    } else {
        JonesType::B
    };

    let gt = GainTable::derive_from(
        gain_table1,
        GainTableUpdate {
            gain,
            weight,
            residual,
            frequency: metadata_source.frequency.clone(),
            jones_type,
            receptor_frames: Some((gain_table1.receptor_frame1, gain_table2.receptor_frame2)),
        },
    )?;
    Ok(gt)
}

/// The shape of the product of two gain arrays, or an error if they're
/// incompatible.
fn product_shape(
    gain1: &Array5<c64>,
    gain2: &Array5<c64>,
    elementwise: bool,
) -> Result<(usize, usize, usize, usize, usize), BeamformerError> {
    let (num_times1, num_ants1, num_chans1, num_rows1, num_cols1) = gain1.dim();
    let (num_times2, num_ants2, num_chans2, num_rows2, num_cols2) = gain2.dim();

    let check = |axis: &'static str, left: usize, right: usize| {
        if left == right {
            Ok(())
        } else {
            Err(BeamformerError::ShapeMismatch { axis, left, right })
        }
    };
    check("time", num_times1, num_times2)?;
    check("antenna", num_ants1, num_ants2)?;
    if num_chans1 != 1 && num_chans2 != 1 {
        check("frequency", num_chans1, num_chans2)?;
    }
    if elementwise {
        check("receptor1", num_rows1, num_rows2)?;
        check("receptor2", num_cols1, num_cols2)?;
    } else if num_cols1 != num_rows2 {
        return Err(BeamformerError::NotConformable {
            left_cols: num_cols1,
            right_rows: num_rows2,
        });
    }

    Ok((
        num_times1,
        num_ants1,
        num_chans1.max(num_chans2),
        num_rows1,
        num_cols2,
    ))
}
