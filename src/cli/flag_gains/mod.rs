// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Given a gains file, flag the RFI-affected channels of every antenna and
//! polarisation, and write out a flag report and/or cleaned gains.


use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::{
    cli::common::{display_warnings, FlaggingArgs, InfoPrinter, Warn, ARG_FILE_HELP},
    flagging::FillPolicy,
    io::GainSolutions,
    params::FlagGainsParams,
    BandflagError,
};

#[derive(Parser, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct FlagGainsArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    /// Path to the JSON gains file to be flagged.
    #[clap(short, long, help_heading = "INPUT FILES")]
    pub(super) gains: Option<PathBuf>,

    /// Path to write a JSON report of the flagged channels of each antenna
    /// and polarisation.
    #[clap(short = 'o', long, help_heading = "OUTPUT FILES")]
    pub(super) output_report: Option<PathBuf>,

    /// Path to write the cleaned gains, in the same format as the input.
    /// Can't be used with the "drop" fill policy.
    #[clap(long, help_heading = "OUTPUT FILES")]
    pub(super) output_gains: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "flagging")]
    #[serde(default)]
    pub(super) flagging_args: FlaggingArgs,
}

impl FlagGainsArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(crate) fn merge(self) -> Result<FlagGainsArgs, BandflagError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let FlagGainsArgs {
                args_file: _,
                gains,
                output_report,
                output_gains,
                flagging_args,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(FlagGainsArgs {
                args_file: None,
                gains: cli_args.gains.or(gains),
                output_report: cli_args.output_report.or(output_report),
                output_gains: cli_args.output_gains.or(output_gains),
                flagging_args: cli_args.flagging_args.merge(flagging_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<FlagGainsParams, BandflagError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            gains,
            output_report,
            output_gains,
            flagging_args,
        } = self;

        let gains_file = gains.ok_or(FlagGainsArgsError::NoGains)?;
        let config = flagging_args.parse()?;
        if output_gains.is_some() && config.fill_policy == FillPolicy::Drop {
            return Err(FlagGainsArgsError::DroppedChannelsInGains.into());
        }
        if output_report.is_none() && output_gains.is_none() {
            "No outputs were specified; flags will only be summarised".warn();
        }

        let gains = GainSolutions::read_file(&gains_file)?;
        config.validate(gains.num_chans())?;

        let mut printer = InfoPrinter::new("Input gains".into());
        printer.push_line(format!("File: {}", gains_file.display()).into());
        printer.push_block(vec![
            format!("{} antennas", gains.num_antennas()).into(),
            format!(
                "{} channels, {:.3} MHz to {:.3} MHz",
                gains.num_chans(),
                gains.freqs_hz.first().copied().unwrap_or_default() / 1e6,
                gains.freqs_hz.last().copied().unwrap_or_default() / 1e6
            )
            .into(),
        ]);
        printer.display();
        display_warnings();

        Ok(FlagGainsParams {
            gains,
            config,
            output_report,
            output_gains,
        })
    }

    pub(crate) fn run(self, dry_run: bool) -> Result<(), BandflagError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum FlagGainsArgsError {
    #[error("No gains file was supplied")]
    NoGains,

    #[error("Cleaned gains can't be written when flagged channels are dropped; use another fill policy")]
    DroppedChannelsInGains,
}
