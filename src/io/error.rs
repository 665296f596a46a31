// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading or writing gains, spectra and flag reports.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GainsReadError {
    #[error("Based on the number of frequencies, expected antenna '{antenna}' {thing} to have {expected} elements, but it had {actual} instead!")]
    BadShape {
        antenna: String,
        /// Which array was the wrong length, e.g. "gain_pol0_imag".
        thing: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("The gains file doesn't list any frequencies")]
    NoFreqs,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ReportReadError {
    #[error("Couldn't parse the flag report: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum GainsWriteError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SpectrumReadError {
    #[error("Line {line_num}: couldn't parse '{value}' as a float")]
    ParseFloat { line_num: usize, value: String },

    #[error("Line {line_num}: expected 1 or 2 columns, but found {num_cols}")]
    BadNumColumns { line_num: usize, num_cols: usize },

    #[error("Line {line_num}: expected {expected} columns like the first channel, but found {actual}")]
    InconsistentColumns {
        line_num: usize,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
