// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-Jones-type calibration controls.
//!
//! Controls can be made in code (starting from [`CalibrationControls::default`])
//! or read from a toml or json file, e.g.
//!
//! ```toml
//! [T]
//! shape = "scalar"
//! timeslice = "auto"
//! phase_only = true
//! first_selfcal = 1
//!
//! [B]
//! shape = "vector"
//! timeslice = 1e5
//! phase_only = false
//! first_selfcal = 4
//! ```

use std::{
    fmt,
    fs::File,
    io::Read,
    path::Path,
    str::FromStr,
};

use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{ControlsError, SolveOptions};
use crate::{
    constants::{DEFAULT_B_TIMESLICE, DEFAULT_G_TIMESLICE},
    JonesType,
};

lazy_static::lazy_static! {
    static ref CONTROLS_FILE_TYPES: String = ControlsFileType::iter().join(", ");
}

#[derive(Debug, Display, EnumIter, EnumString)]
enum ControlsFileType {
    #[strum(serialize = "toml")]
    Toml,

    #[strum(serialize = "json")]
    Json,
}

/// The form of the Jones matrices being solved for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JonesShape {
    /// A single value for all receptors.
    Scalar,

    /// Diagonal Jones matrices.
    Vector,

    /// Full Jones matrices. Cross-polarisation terms are solved for.
    Matrix,
}

/// The length of each solution interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimesliceRepr", into = "TimesliceRepr")]
pub enum Timeslice {
    /// Let the solver decide (usually one solution per time step).
    Auto,

    /// Solution interval \[seconds\].
    Seconds(f64),
}

impl fmt::Display for Timeslice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeslice::Auto => write!(f, "auto"),
            Timeslice::Seconds(s) => write!(f, "{s} s"),
        }
    }
}

impl FromStr for Timeslice {
    type Err = ControlsError;

    fn from_str(s: &str) -> Result<Timeslice, ControlsError> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Timeslice::Auto);
        }
        match s.trim().parse() {
            Ok(seconds) => Timeslice::from_seconds(seconds),
            Err(_) => Err(ControlsError::BadTimeslice(s.to_string())),
        }
    }
}

impl Timeslice {
    fn from_seconds(seconds: f64) -> Result<Timeslice, ControlsError> {
        if seconds.is_finite() && seconds > 0.0 {
            Ok(Timeslice::Seconds(seconds))
        } else {
            Err(ControlsError::BadTimeslice(seconds.to_string()))
        }
    }
}

/// How a [`Timeslice`] looks in a controls file: "auto" or a number.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TimesliceRepr {
    Seconds(f64),
    Name(String),
}

impl TryFrom<TimesliceRepr> for Timeslice {
    type Error = ControlsError;

    fn try_from(repr: TimesliceRepr) -> Result<Timeslice, ControlsError> {
        match repr {
            TimesliceRepr::Seconds(s) => Timeslice::from_seconds(s),
            TimesliceRepr::Name(n) => n.parse(),
        }
    }
}

impl From<Timeslice> for TimesliceRepr {
    fn from(t: Timeslice) -> TimesliceRepr {
        match t {
            Timeslice::Auto => TimesliceRepr::Name("auto".to_string()),
            Timeslice::Seconds(s) => TimesliceRepr::Seconds(s),
        }
    }
}

/// How to solve for one Jones type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JonesControls {
    pub shape: JonesShape,

    pub timeslice: Timeslice,

    /// Only solve for the phases of the gains.
    pub phase_only: bool,

    /// The first self-calibration iteration in which this Jones type is
    /// solved for or applied.
    pub first_selfcal: usize,
}

impl JonesControls {
    /// Whether this Jones type takes part in `iteration`.
    pub fn is_active(&self, iteration: usize) -> bool {
        iteration >= self.first_selfcal
    }

    /// The solver options for these controls.
    pub fn solve_options(&self, tolerance: f64) -> SolveOptions {
        SolveOptions {
            phase_only: self.phase_only,
            crosspol: self.shape == JonesShape::Matrix,
            timeslice: self.timeslice,
            tolerance,
        }
    }
}

/// Controls for each Jones type of a calibration chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "IndexMap<String, JonesControls>",
    into = "IndexMap<String, JonesControls>"
)]
pub struct CalibrationControls(IndexMap<JonesType, JonesControls>);

impl Default for CalibrationControls {
    /// Atmospheric phase (T), electronic gains (G) and bandpass (B).
    fn default() -> CalibrationControls {
        let mut controls = IndexMap::new();
        controls.insert(
            JonesType::T,
            JonesControls {
                shape: JonesShape::Scalar,
                timeslice: Timeslice::Auto,
                phase_only: true,
                first_selfcal: 0,
            },
        );
        controls.insert(
            JonesType::G,
            JonesControls {
                shape: JonesShape::Vector,
                timeslice: Timeslice::Seconds(DEFAULT_G_TIMESLICE),
                phase_only: false,
                first_selfcal: 0,
            },
        );
        controls.insert(
            JonesType::B,
            JonesControls {
                shape: JonesShape::Vector,
                timeslice: Timeslice::Seconds(DEFAULT_B_TIMESLICE),
                phase_only: false,
                first_selfcal: 0,
            },
        );
        CalibrationControls(controls)
    }
}

impl CalibrationControls {
    /// Controls with no Jones types.
    pub fn empty() -> CalibrationControls {
        CalibrationControls(IndexMap::new())
    }

    pub fn get(&self, jones_type: JonesType) -> Option<&JonesControls> {
        self.0.get(&jones_type)
    }

    pub fn get_mut(&mut self, jones_type: JonesType) -> Option<&mut JonesControls> {
        self.0.get_mut(&jones_type)
    }

    /// Set the controls for a Jones type, returning the old ones.
    pub fn insert(
        &mut self,
        jones_type: JonesType,
        controls: JonesControls,
    ) -> Option<JonesControls> {
        self.0.insert(jones_type, controls)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&JonesType, &JonesControls)> {
        self.0.iter()
    }

    /// Read controls from a toml or json file. The file type is determined by
    /// the extension.
    pub fn read_from_file<P: AsRef<Path>>(file: P) -> Result<CalibrationControls, ControlsError> {
        let file = file.as_ref();
        debug!("Attempting to parse calibration controls file {}", file.display());

        let file_type = file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ControlsFileType::from_str(&e).ok());
        let mut contents = String::new();
        match file_type {
            Some(ControlsFileType::Toml) => {
                debug!("Parsing toml file...");
                File::open(file)?.read_to_string(&mut contents)?;
                toml::from_str(&contents).map_err(|err| ControlsError::Decode {
                    file: file.to_path_buf(),
                    file_type: "toml",
                    err: err.to_string(),
                })
            }
            Some(ControlsFileType::Json) => {
                debug!("Parsing json file...");
                File::open(file)?.read_to_string(&mut contents)?;
                serde_json::from_str(&contents).map_err(|err| ControlsError::Decode {
                    file: file.to_path_buf(),
                    file_type: "json",
                    err: err.to_string(),
                })
            }
            None => Err(ControlsError::UnrecognisedExtension {
                file: file.to_path_buf(),
                valid: CONTROLS_FILE_TYPES.clone(),
            }),
        }
    }
}

impl TryFrom<IndexMap<String, JonesControls>> for CalibrationControls {
    type Error = ControlsError;

    fn try_from(
        map: IndexMap<String, JonesControls>,
    ) -> Result<CalibrationControls, ControlsError> {
        map.into_iter()
            .map(|(name, controls)| {
                JonesType::from_str(&name)
                    .map(|jones_type| (jones_type, controls))
                    .map_err(|_| ControlsError::UnknownJonesType(name))
            })
            .collect::<Result<IndexMap<_, _>, _>>()
            .map(CalibrationControls)
    }
}

impl From<CalibrationControls> for IndexMap<String, JonesControls> {
    fn from(controls: CalibrationControls) -> IndexMap<String, JonesControls> {
        controls
            .0
            .into_iter()
            .map(|(jones_type, controls)| (jones_type.to_string(), controls))
            .collect()
    }
}
