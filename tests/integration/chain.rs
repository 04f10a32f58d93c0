// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Chain calibration of a toy array with one visibility per antenna.

use std::convert::Infallible;

use approx::assert_abs_diff_eq;
use ndarray::prelude::*;
use vec1::vec1;

use gainchain::{
    apply_calibration_chain, c64, calibrate_chain, solve_calibrate_chain, CalibrationBackend,
    CalibrationControls, Configuration, GainTable, GainTables, JonesType, ReceptorFrame,
    SolveOptions, Timeslice,
};

/// Each antenna "sees" the model multiplied by its own gain.
struct ToyBackend;

impl CalibrationBackend for ToyBackend {
    type Vis = Array1<c64>;
    type Error = Infallible;

    fn create_gaintable(
        &self,
        vis: &Array1<c64>,
        _timeslice: Timeslice,
        jones_type: JonesType,
    ) -> Result<GainTable, Infallible> {
        let gt = GainTable::new(
            Array5::from_elem((1, vis.len(), 1, 1, 1), c64::new(1.0, 0.0)),
            vec1![150e6],
            vec1![0.0],
            vec1![60.0],
            jones_type,
            ReceptorFrame::StokesI,
            Configuration::new("LOWBD2"),
        )
        .unwrap();
        Ok(gt)
    }

    fn solve_gaintable(
        &self,
        vis: &Array1<c64>,
        model_vis: Option<&Array1<c64>>,
        gain_table: &GainTable,
        options: &SolveOptions,
    ) -> Result<GainTable, Infallible> {
        let mut solved = gain_table.clone();
        for (i_ant, g) in solved.gain.iter_mut().enumerate() {
            let model = model_vis.map_or(c64::new(1.0, 0.0), |m| m[i_ant]);
            *g = vis[i_ant] / model;
            if options.phase_only {
                let norm = g.norm();
                *g /= norm;
            }
        }
        Ok(solved)
    }

    fn apply_gaintable(
        &self,
        vis: &Array1<c64>,
        gain_table: &GainTable,
        inverse: bool,
    ) -> Result<Array1<c64>, Infallible> {
        let gains = gain_table.gain.slice(s![0, .., 0, 0, 0]);
        Ok(if inverse {
            vis / &gains
        } else {
            vis * &gains
        })
    }

    fn max_abs_flagged_weight(&self, _vis: &Array1<c64>) -> f64 {
        1.0
    }

    fn max_abs_vis(&self, vis: &Array1<c64>) -> f64 {
        vis.iter().map(|v| v.norm()).fold(0.0, f64::max)
    }
}

fn true_gains() -> (Array1<c64>, Array1<c64>) {
    let phases = Array1::from_shape_fn(5, |a| c64::from_polar(1.0, 0.2 * a as f64 - 0.3));
    let amps = Array1::from_shape_fn(5, |a| c64::new(1.0 + 0.1 * a as f64, 0.0));
    (phases, amps)
}

#[test]
fn test_tg_chain_recovers_gains() {
    let (phases, amps) = true_gains();
    let model = Array1::from_elem(5, c64::new(2.0, 0.0));
    let observed = &model * &phases * &amps;
    let controls = CalibrationControls::default();

    let mut gaintables = GainTables::new();
    let corrected = calibrate_chain(
        &ToyBackend,
        &observed,
        Some(&model),
        &mut gaintables,
        "TG",
        &controls,
        0,
        gainchain::constants::DEFAULT_TOLERANCE,
    )
    .unwrap();

    assert_abs_diff_eq!(corrected, model, epsilon = 1e-12);
    let t = gaintables[&JonesType::T].gain.slice(s![0, .., 0, 0, 0]).to_owned();
    let g = gaintables[&JonesType::G].gain.slice(s![0, .., 0, 0, 0]).to_owned();
    assert_abs_diff_eq!(t, phases, epsilon = 1e-12);
    assert_abs_diff_eq!(g, amps, epsilon = 1e-12);

    // Applying the solved chain to the model reproduces the observation.
    let predicted =
        apply_calibration_chain(&ToyBackend, &model, &gaintables, "TG", &controls, 0).unwrap();
    assert_abs_diff_eq!(predicted, observed, epsilon = 1e-12);
}

#[test]
fn test_selfcal_iterations() {
    let (phases, amps) = true_gains();
    let model = Array1::from_elem(5, c64::new(1.0, 0.0));
    let observed = &model * &phases * &amps;
    let mut controls = CalibrationControls::default();
    controls.get_mut(JonesType::G).unwrap().first_selfcal = 1;

    // Iteration 0: only the phases are solved for, so the amplitudes remain.
    let mut gaintables = GainTables::new();
    let corrected = calibrate_chain(
        &ToyBackend,
        &observed,
        Some(&model),
        &mut gaintables,
        "TG",
        &controls,
        0,
        1e-6,
    )
    .unwrap();
    assert_abs_diff_eq!(corrected, amps, epsilon = 1e-12);
    assert!(!gaintables.contains_key(&JonesType::G));

    // Iteration 1: both.
    let corrected = calibrate_chain(
        &ToyBackend,
        &observed,
        Some(&model),
        &mut gaintables,
        "TG",
        &controls,
        1,
        1e-6,
    )
    .unwrap();
    assert_abs_diff_eq!(corrected, model, epsilon = 1e-12);
    assert_eq!(gaintables.len(), 2);

    // Solving without applying sees the uncorrected data for every term, so
    // the (not phase-only) G term absorbs everything.
    let mut solved = GainTables::new();
    solve_calibrate_chain(
        &ToyBackend,
        &observed,
        Some(&model),
        &mut solved,
        "TG",
        &controls,
        1,
        1e-6,
    )
    .unwrap();
    let g = solved[&JonesType::G].gain.slice(s![0, .., 0, 0, 0]).to_owned();
    assert_abs_diff_eq!(g, observed, epsilon = 1e-12);
}
