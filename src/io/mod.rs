// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! File stuff (reading/writing) for gain solutions, plain-text spectra and
//! flag reports.

mod error;
mod gains;
mod report;
mod spectrum;

pub use error::{GainsReadError, GainsWriteError, ReportReadError, SpectrumReadError};
pub use gains::{AntennaGains, GainSolutions, Pol};
pub use report::{AntennaFlags, FlagReport, PolFlags};
pub use spectrum::{
    read_spectrum, read_spectrum_file, write_spectrum, write_spectrum_file, Spectrum,
};
