// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Solving for and applying chains of antenna gain tables.
//!
//! A calibration context such as "TGB" lists Jones types in the order they
//! are solved for and applied (here atmospheric phase, then electronic gains,
//! then bandpass). Each self-calibration iteration, a Jones type only takes
//! part if the iteration is at least its
//! [`first_selfcal`](JonesControls::first_selfcal).
//!
//! The gain tables accumulated across iterations are owned by the caller and
//! updated in place by each call. Visibilities and the solver itself are
//! provided by a [`CalibrationBackend`].

mod controls;
mod error;

pub use controls::{CalibrationControls, JonesControls, JonesShape, Timeslice};
pub use error::{ChainError, ControlsError};

use std::str::FromStr;

use indexmap::{map::Entry, IndexMap};
use log::{debug, info, trace};

use crate::{GainTable, JonesType};

/// Gain tables keyed by their Jones type, in the order they were created.
pub type GainTables = IndexMap<JonesType, GainTable>;

/// Options passed to [`CalibrationBackend::solve_gaintable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// Only solve for phases.
    pub phase_only: bool,

    /// Solve for the cross-polarisation terms too.
    pub crosspol: bool,

    pub timeslice: Timeslice,

    /// Stop iterating when the fractional change in the gains is below this.
    pub tolerance: f64,
}

/// Everything chain calibration needs from the rest of a calibration system:
/// visibilities, making gain tables for them, solving and applying.
pub trait CalibrationBackend {
    type Vis: Clone;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Make a new (default) gain table for `vis`.
    fn create_gaintable(
        &self,
        vis: &Self::Vis,
        timeslice: Timeslice,
        jones_type: JonesType,
    ) -> Result<GainTable, Self::Error>;

    /// Solve for new gains from `vis` and (if given) the model visibilities,
    /// starting from `gain_table`.
    fn solve_gaintable(
        &self,
        vis: &Self::Vis,
        model_vis: Option<&Self::Vis>,
        gain_table: &GainTable,
        options: &SolveOptions,
    ) -> Result<GainTable, Self::Error>;

    /// Apply the gains in `gain_table` to `vis`, or their inverse if `inverse`
    /// is true (i.e. correct the visibilities).
    fn apply_gaintable(
        &self,
        vis: &Self::Vis,
        gain_table: &GainTable,
        inverse: bool,
    ) -> Result<Self::Vis, Self::Error>;

    /// The largest absolute flagged weight of `vis`. Zero means there is no
    /// usable data.
    fn max_abs_flagged_weight(&self, vis: &Self::Vis) -> f64;

    /// The largest absolute visibility of `vis`.
    fn max_abs_vis(&self, vis: &Self::Vis) -> f64;

    /// A one-line quality summary of `gain_table` for logging.
    fn qa_gaintable(&self, gain_table: &GainTable, context: &str) -> String {
        gain_table.qa(context).to_string()
    }
}

fn backend_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> ChainError {
    ChainError::Backend(Box::new(e))
}

/// Parse a calibration context (e.g. "TGB") into Jones types.
pub fn parse_context(calibration_context: &str) -> Result<Vec<JonesType>, ChainError> {
    calibration_context
        .chars()
        .map(|letter| {
            JonesType::from_str(letter.encode_utf8(&mut [0; 4])).map_err(|_| {
                ChainError::UnknownJonesType {
                    letter,
                    context: calibration_context.to_string(),
                }
            })
        })
        .collect()
}

/// Parse the calibration context and get the controls for each of its Jones
/// types. Nothing is done unless every Jones type has controls.
fn controls_for_context<'a>(
    calibration_context: &str,
    controls: &'a CalibrationControls,
) -> Result<Vec<(JonesType, &'a JonesControls)>, ChainError> {
    parse_context(calibration_context)?
        .into_iter()
        .map(|jones_type| {
            controls
                .get(jones_type)
                .map(|c| (jones_type, c))
                .ok_or(ChainError::MissingControls(jones_type))
        })
        .collect()
}

/// Apply the gain tables of `calibration_context` to `vis`, one after the
/// other. Jones types without a gain table, or whose `first_selfcal` is
/// after `iteration`, are skipped. If nothing is applied, a copy of `vis` is
/// returned.
pub fn apply_calibration_chain<B: CalibrationBackend>(
    backend: &B,
    vis: &B::Vis,
    gaintables: &GainTables,
    calibration_context: &str,
    controls: &CalibrationControls,
    iteration: usize,
) -> Result<B::Vis, ChainError> {
    let chain = controls_for_context(calibration_context, controls)?;

    let mut corrected = vis.clone();
    for (jones_type, jones_controls) in chain {
        if !jones_controls.is_active(iteration) {
            trace!("apply_calibration_chain: Jones matrix {jones_type} not applied, iteration {iteration}");
            continue;
        }
        if let Some(gain_table) = gaintables.get(&jones_type) {
            debug!("apply_calibration_chain: applying Jones matrix {jones_type}, iteration {iteration}");
            corrected = backend
                .apply_gaintable(&corrected, gain_table, false)
                .map_err(backend_error)?;
        }
    }

    Ok(corrected)
}

/// Solve for and apply the gain tables of `calibration_context` in turn.
///
/// Each Jones type taking part in `iteration` is solved for using the
/// visibilities corrected by all of the Jones types before it, and its
/// inverse gains are then applied. Gain tables are created as needed. Returns
/// the corrected visibilities; Jones types that don't take part keep their old
/// gain tables (if any).
///
/// A gain table in `gaintables` is only replaced once its new solution has
/// been applied, so if the backend fails, every table not yet re-solved is
/// left as it was.
#[allow(clippy::too_many_arguments)]
pub fn calibrate_chain<B: CalibrationBackend>(
    backend: &B,
    vis: &B::Vis,
    model_vis: Option<&B::Vis>,
    gaintables: &mut GainTables,
    calibration_context: &str,
    controls: &CalibrationControls,
    iteration: usize,
    tolerance: f64,
) -> Result<B::Vis, ChainError> {
    let chain = controls_for_context(calibration_context, controls)?;
    if !chain.iter().any(|(_, c)| c.is_active(iteration)) {
        debug!("calibrate_chain: nothing to do for context {calibration_context}, iteration {iteration}");
        return Ok(vis.clone());
    }

    let mut corrected = vis.clone();
    for (jones_type, jones_controls) in chain {
        if !jones_controls.is_active(iteration) {
            debug!("calibrate_chain: Jones matrix {jones_type} not solved, iteration {iteration}");
            continue;
        }

        let options = jones_controls.solve_options(tolerance);
        let solved = match gaintables.get(&jones_type) {
            Some(gain_table) => backend.solve_gaintable(&corrected, model_vis, gain_table, &options),
            None => {
                info!("Creating new {jones_type} gain table");
                let gain_table = backend
                    .create_gaintable(&corrected, jones_controls.timeslice, jones_type)
                    .map_err(backend_error)?;
                backend.solve_gaintable(&corrected, model_vis, &gain_table, &options)
            }
        }
        .map_err(backend_error)?;
        debug!("calibrate_chain: Jones matrix {jones_type}, iteration {iteration}");
        debug!(
            "{}",
            backend.qa_gaintable(
                &solved,
                &format!("Jones matrix {jones_type}, iteration {iteration}")
            )
        );

        corrected = backend
            .apply_gaintable(&corrected, &solved, true)
            .map_err(backend_error)?;
        // An existing key keeps its position.
        gaintables.insert(jones_type, solved);
    }

    Ok(corrected)
}

/// Solve for the gain tables of `calibration_context` without applying them.
///
/// A gain table is made for every Jones type of the context if it doesn't
/// already exist, so every Jones type has one on return. Solving only happens
/// for Jones types taking part in `iteration`, and only if `vis` has some
/// non-zero weights and the model (if any) is not all zeros; otherwise the
/// existing gain table is kept. A failed solve leaves its gain table as it was.
#[allow(clippy::too_many_arguments)]
pub fn solve_calibrate_chain<B: CalibrationBackend>(
    backend: &B,
    vis: &B::Vis,
    model_vis: Option<&B::Vis>,
    gaintables: &mut GainTables,
    calibration_context: &str,
    controls: &CalibrationControls,
    iteration: usize,
    tolerance: f64,
) -> Result<(), ChainError> {
    let chain = controls_for_context(calibration_context, controls)?;

    for (jones_type, jones_controls) in chain {
        let gain_table = match gaintables.entry(jones_type) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("Creating new {jones_type} gain table");
                entry.insert(
                    backend
                        .create_gaintable(vis, jones_controls.timeslice, jones_type)
                        .map_err(backend_error)?,
                )
            }
        };
        let (fmin, fmax) = gain_table.freq_range();
        let freq_desc = format!("frequency {:.3} - {:.3} MHz", fmin / 1e6, fmax / 1e6);

        if !jones_controls.is_active(iteration) {
            info!("Not solving for Jones matrix {jones_type} this iteration: iteration {iteration}, {freq_desc}");
            continue;
        }

        let have_data = backend.max_abs_flagged_weight(vis) > 0.0
            && model_vis.map_or(true, |m| backend.max_abs_vis(m) > 0.0);
        if !have_data {
            info!("No model data: cannot solve for Jones matrix {jones_type}, iteration {iteration}, {freq_desc}");
            continue;
        }

        let solved = backend
            .solve_gaintable(
                vis,
                model_vis,
                &*gain_table,
                &jones_controls.solve_options(tolerance),
            )
            .map_err(backend_error)?;
        let qa = backend.qa_gaintable(
            &solved,
            &format!(
                "Model is non-zero: solving for Jones matrix {jones_type}, iteration {iteration}, {freq_desc}"
            ),
        );
        info!("solve_calibrate_chain: {qa}");
        *gain_table = solved;
    }

    Ok(())
}
