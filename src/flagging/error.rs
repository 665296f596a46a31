// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with sliding-median flagging.

use thiserror::Error;

use crate::constants::MIN_WINDOW_SIZE;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlagError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("The input spectrum is empty; there is nothing to flag")]
    EmptyInput,
}

/// Error type describing invalid flagging configuration. These are always
/// detected before any work is done.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("The window size ({0}) must be odd")]
    EvenWindow(usize),

    #[error("The window size ({0}) must be at least {MIN_WINDOW_SIZE}")]
    WindowTooSmall(usize),

    #[error("The window size ({window_size}) is larger than the number of channels ({num_chans})")]
    WindowTooLarge {
        window_size: usize,
        num_chans: usize,
    },

    #[error("The flagging threshold ({0}) must be a positive, finite number")]
    BadThreshold(f64),

    #[error("The spectrum has {spectrum} channels, but the bandpass model has {model}")]
    LengthMismatch { spectrum: usize, model: usize },
}

impl FlagError {
    /// Is this error due to bad configuration (as opposed to bad input data)?
    pub fn is_config_error(&self) -> bool {
        matches!(self, FlagError::Config(_))
    }
}
