// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use itertools::Itertools;
use log::info;
use thiserror::Error;

use crate::{
    cli::InfoPrinter,
    flagging::{sliding_rfi_flag, sliding_rfi_flag_complex, FlagError, SlidingFlagConfig},
    io::{write_spectrum_file, Spectrum},
};

pub(crate) struct FlagSpectrumParams {
    pub(crate) spectrum: Spectrum,
    pub(crate) config: SlidingFlagConfig,

    /// Where to write the cleaned spectrum.
    pub(crate) output: Option<PathBuf>,

    /// Where to write the bandpass model.
    pub(crate) output_model: Option<PathBuf>,
}

impl FlagSpectrumParams {
    /// Flag the spectrum and print the flagged channel indices (space
    /// separated, on a single line) to stdout. The indices are also returned.
    pub(crate) fn run(&self) -> Result<Vec<usize>, FlagSpectrumError> {
        let Self {
            spectrum,
            config,
            output,
            output_model,
        } = self;

        let (cleaned, model, mask, scaled_mad) = match spectrum {
            Spectrum::Real(s) => {
                let o = sliding_rfi_flag(s, config)?;
                (
                    Spectrum::Real(o.cleaned),
                    Spectrum::Real(o.model),
                    o.mask,
                    o.scaled_mad,
                )
            }
            Spectrum::Complex(s) => {
                let o = sliding_rfi_flag_complex(s, config)?;
                (
                    Spectrum::Complex(o.cleaned),
                    Spectrum::Complex(o.model),
                    o.mask,
                    o.scaled_mad,
                )
            }
        };
        let flagged = mask.flagged_channels();

        let mut printer = InfoPrinter::new("Flagging summary".into());
        printer.push_block(vec![
            format!(
                "{} {} channels",
                spectrum.len(),
                if spectrum.is_complex() {
                    "complex"
                } else {
                    "real"
                }
            )
            .into(),
            format!(
                "Window size: {}, threshold: {} scaled MADs, edge policy: {}",
                config.window_size, config.threshold, config.edge_policy
            )
            .into(),
        ]);
        printer.push_line(format!("Scaled MAD of residuals: {scaled_mad:e}").into());
        printer.push_line(format!("{} channels flagged", flagged.len()).into());
        printer.display();

        println!("{}", flagged.iter().join(" "));

        if let Some(file) = output {
            write_spectrum_file(file, &cleaned)?;
            info!("Cleaned spectrum written to {}", file.display());
        }
        if let Some(file) = output_model {
            write_spectrum_file(file, &model)?;
            info!("Bandpass model written to {}", file.display());
        }

        Ok(flagged)
    }
}

#[derive(Error, Debug)]
pub(crate) enum FlagSpectrumError {
    #[error(transparent)]
    Flag(#[from] FlagError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
