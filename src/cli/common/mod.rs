// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Common arguments for command-line interfaces. e.g. the `flag-gains` and
//! `flag-spectrum` subcommands both need sliding-median flagging settings, so
//! the same flagging arguments are shared between them.

mod printers;
#[cfg(test)]
mod tests;

pub(crate) use printers::{display_warnings, InfoPrinter, Warn};

use std::str::FromStr;

use clap::Parser;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    constants::{DEFAULT_THRESHOLD, DEFAULT_WINDOW_SIZE, MIN_WINDOW_SIZE},
    flagging::{ComplexStatistic, EdgePolicy, FillPolicy, SlidingFlagConfig},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    static ref WINDOW_SIZE_HELP: String =
        format!("The number of channels in the sliding-median window. Must be odd and at least {MIN_WINDOW_SIZE}. Default: {DEFAULT_WINDOW_SIZE}");

    static ref THRESHOLD_HELP: String =
        format!("Channels whose residuals from the bandpass model exceed this many scaled MADs are flagged. Default: {DEFAULT_THRESHOLD}");

    static ref EDGE_POLICY_HELP: String =
        format!("How the window is filled near the band edges. Valid policies: {}. Default: {}", EdgePolicy::iter().join(", "), EdgePolicy::default());

    static ref FILL_POLICY_HELP: String =
        format!("What replaces flagged channels in the cleaned output. Valid policies: {}. Default: {}", FillPolicy::iter().join(", "), FillPolicy::default());

    static ref STATISTIC_HELP: String =
        format!("How complex spectra are summarised when estimating the bandpass. Valid statistics: {}. Default: {}", ComplexStatistic::iter().join(", "), ComplexStatistic::default());
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(BandflagError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(BandflagError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(BandflagError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Sliding-median flagging settings shared by all subcommands.
#[derive(Parser, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(super) struct FlaggingArgs {
    #[clap(short, long, help = WINDOW_SIZE_HELP.as_str(), help_heading = "FLAGGING")]
    pub(super) window_size: Option<usize>,

    #[clap(short, long, help = THRESHOLD_HELP.as_str(), help_heading = "FLAGGING")]
    pub(super) threshold: Option<f64>,

    #[clap(long, help = EDGE_POLICY_HELP.as_str(), help_heading = "FLAGGING")]
    pub(super) edge_policy: Option<String>,

    #[clap(long, help = FILL_POLICY_HELP.as_str(), help_heading = "FLAGGING")]
    pub(super) fill_policy: Option<String>,

    #[clap(long, help = STATISTIC_HELP.as_str(), help_heading = "FLAGGING")]
    pub(super) statistic: Option<String>,

    /// Measure residuals from their median rather than from zero before
    /// comparing them against the threshold.
    #[clap(long, help_heading = "FLAGGING")]
    #[serde(default)]
    pub(super) centre_residuals: bool,
}

impl FlaggingArgs {
    /// Merge these arguments with those from an arguments file, preferring
    /// these.
    pub(super) fn merge(self, other: Self) -> Self {
        Self {
            window_size: self.window_size.or(other.window_size),
            threshold: self.threshold.or(other.threshold),
            edge_policy: self.edge_policy.or(other.edge_policy),
            fill_policy: self.fill_policy.or(other.fill_policy),
            statistic: self.statistic.or(other.statistic),
            centre_residuals: self.centre_residuals || other.centre_residuals,
        }
    }

    /// Turn the arguments into a config. Only the policy names are checked
    /// here; the rest is checked against the spectrum length later.
    pub(super) fn parse(self) -> Result<SlidingFlagConfig, FlaggingArgsError> {
        let Self {
            window_size,
            threshold,
            edge_policy,
            fill_policy,
            statistic,
            centre_residuals,
        } = self;

        let edge_policy = match edge_policy {
            None => EdgePolicy::default(),
            Some(s) => EdgePolicy::from_str(&s.to_lowercase()).map_err(|_| {
                FlaggingArgsError::InvalidEdgePolicy {
                    got: s,
                    valid: EdgePolicy::iter().join(", "),
                }
            })?,
        };
        let fill_policy = match fill_policy {
            None => FillPolicy::default(),
            Some(s) => FillPolicy::from_str(&s.to_lowercase()).map_err(|_| {
                FlaggingArgsError::InvalidFillPolicy {
                    got: s,
                    valid: FillPolicy::iter().join(", "),
                }
            })?,
        };
        let statistic = match statistic {
            None => ComplexStatistic::default(),
            Some(s) => ComplexStatistic::from_str(&s.to_lowercase()).map_err(|_| {
                FlaggingArgsError::InvalidStatistic {
                    got: s,
                    valid: ComplexStatistic::iter().join(", "),
                }
            })?,
        };

        let config = SlidingFlagConfig {
            window_size: window_size.unwrap_or(DEFAULT_WINDOW_SIZE),
            threshold: threshold.unwrap_or(DEFAULT_THRESHOLD),
            edge_policy,
            fill_policy,
            statistic,
            centre_residuals,
        };
        debug!("Flagging config: {config:?}");
        Ok(config)
    }
}

#[derive(Error, Debug)]
pub(super) enum FlaggingArgsError {
    #[error("Unrecognised edge policy '{got}'. Valid policies: {valid}")]
    InvalidEdgePolicy { got: String, valid: String },

    #[error("Unrecognised fill policy '{got}'. Valid policies: {valid}")]
    InvalidFillPolicy { got: String, valid: String },

    #[error("Unrecognised complex statistic '{got}'. Valid statistics: {valid}")]
    InvalidStatistic { got: String, valid: String },
}
