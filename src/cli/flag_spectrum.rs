// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Flag a single plain-text spectrum and print the flagged channels.

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::{
    cli::common::{display_warnings, FlaggingArgs, InfoPrinter, ARG_FILE_HELP},
    io::read_spectrum_file,
    params::FlagSpectrumParams,
    BandflagError,
};

#[derive(Parser, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct FlagSpectrumArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    args_file: Option<PathBuf>,

    /// Path to the spectrum to be flagged. One channel per line, with either
    /// one column (real) or two columns (real and imaginary parts).
    #[clap(short, long, help_heading = "INPUT FILES")]
    spectrum: Option<PathBuf>,

    /// Path to write the cleaned spectrum.
    #[clap(short = 'o', long, help_heading = "OUTPUT FILES")]
    output: Option<PathBuf>,

    /// Path to write the bandpass model.
    #[clap(long, help_heading = "OUTPUT FILES")]
    output_model: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "flagging")]
    #[serde(default)]
    flagging_args: FlaggingArgs,
}

impl FlagSpectrumArgs {
    /// Consolidate the command-line arguments with those in the arguments file
    /// (if any), preferring the command line.
    pub(crate) fn merge(self) -> Result<FlagSpectrumArgs, BandflagError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            let FlagSpectrumArgs {
                args_file: _,
                spectrum,
                output,
                output_model,
                flagging_args,
            } = unpack_arg_file!(arg_file);

            Ok(FlagSpectrumArgs {
                args_file: None,
                spectrum: cli_args.spectrum.or(spectrum),
                output: cli_args.output.or(output),
                output_model: cli_args.output_model.or(output_model),
                flagging_args: cli_args.flagging_args.merge(flagging_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    fn parse(self) -> Result<FlagSpectrumParams, BandflagError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            spectrum,
            output,
            output_model,
            flagging_args,
        } = self;

        let spectrum_file = spectrum.ok_or(FlagSpectrumArgsError::NoSpectrum)?;
        let config = flagging_args.parse()?;
        let spectrum = read_spectrum_file(&spectrum_file)?;
        config.validate(spectrum.len())?;

        let mut printer = InfoPrinter::new("Input spectrum".into());
        printer.push_line(format!("File: {}", spectrum_file.display()).into());
        printer.display();
        display_warnings();

        Ok(FlagSpectrumParams {
            spectrum,
            config,
            output,
            output_model,
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
pub(crate) enum FlagSpectrumArgsError {
    #[error("No spectrum file was supplied")]
    NoSpectrum,
}
