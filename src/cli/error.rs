// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all bandflag-related errors. This should be the *only*
//! error enum that is publicly visible from the CLI.

use thiserror::Error;

use super::{
    common::FlaggingArgsError, flag_gains::FlagGainsArgsError,
    flag_spectrum::FlagSpectrumArgsError,
};
use crate::{
    flagging::FlagError,
    io::{GainsReadError, GainsWriteError, SpectrumReadError},
    params::{FlagGainsError, FlagSpectrumError},
};

/// The *only* publicly visible error from the bandflag binary.
#[derive(Error, Debug)]
pub enum BandflagError {
    /// An error related to flag-gains.
    #[error("{0}")]
    FlagGains(String),

    /// An error related to flag-spectrum.
    #[error("{0}")]
    FlagSpectrum(String),

    /// An error from the flagging settings, e.g. an even window size.
    #[error("{0}\n\nThe window size must be odd and at least 3, and no bigger than the number of channels. The threshold must be positive.")]
    Flagging(String),

    /// Generic error surrounding gains or flag reports.
    #[error("{0}\n\nGains are expected as JSON with 'freqs_hz' and per-antenna 'gain_pol0_real', 'gain_pol0_imag', 'gain_pol1_real' and 'gain_pol1_imag' arrays.")]
    Gains(String),

    /// Generic error surrounding plain-text spectra.
    #[error("{0}\n\nSpectra are expected with one channel per line, as either 1 (real) or 2 (real, imaginary) columns.")]
    Spectrum(String),

    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

// Binary sub-command errors.

impl From<FlagGainsArgsError> for BandflagError {
    fn from(e: FlagGainsArgsError) -> Self {
        Self::FlagGains(e.to_string())
    }
}

impl From<FlagSpectrumArgsError> for BandflagError {
    fn from(e: FlagSpectrumArgsError) -> Self {
        Self::FlagSpectrum(e.to_string())
    }
}

impl From<FlaggingArgsError> for BandflagError {
    fn from(e: FlaggingArgsError) -> Self {
        Self::Flagging(e.to_string())
    }
}

// Library code errors.

impl From<FlagError> for BandflagError {
    fn from(e: FlagError) -> Self {
        match e {
            FlagError::Config(_) => Self::Flagging(e.to_string()),
            FlagError::EmptyInput => Self::Spectrum(e.to_string()),
        }
    }
}

impl From<FlagGainsError> for BandflagError {
    fn from(e: FlagGainsError) -> Self {
        match e {
            FlagGainsError::Write(e) => Self::from(e),
        }
    }
}

impl From<FlagSpectrumError> for BandflagError {
    fn from(e: FlagSpectrumError) -> Self {
        match e {
            FlagSpectrumError::Flag(e) => Self::from(e),
            FlagSpectrumError::IO(e) => Self::from(e),
        }
    }
}

impl From<GainsReadError> for BandflagError {
    fn from(e: GainsReadError) -> Self {
        match e {
            GainsReadError::BadShape { .. }
            | GainsReadError::NoFreqs
            | GainsReadError::Json(_) => Self::Gains(e.to_string()),
            GainsReadError::IO(e) => Self::from(e),
        }
    }
}

impl From<GainsWriteError> for BandflagError {
    fn from(e: GainsWriteError) -> Self {
        match e {
            GainsWriteError::Json(_) => Self::Gains(e.to_string()),
            GainsWriteError::IO(e) => Self::from(e),
        }
    }
}

impl From<SpectrumReadError> for BandflagError {
    fn from(e: SpectrumReadError) -> Self {
        match e {
            SpectrumReadError::ParseFloat { .. }
            | SpectrumReadError::BadNumColumns { .. }
            | SpectrumReadError::InconsistentColumns { .. } => Self::Spectrum(e.to_string()),
            SpectrumReadError::IO(e) => Self::from(e),
        }
    }
}

impl From<std::io::Error> for BandflagError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
