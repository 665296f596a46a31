// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    c64,
    cli::{display_warnings, InfoPrinter, Warn},
    flagging::{sliding_rfi_flag_complex, FlagError, FlagOutcome, SlidingFlagConfig},
    io::{AntennaFlags, FlagReport, GainSolutions, GainsWriteError, Pol, PolFlags},
    PROGRESS_BARS,
};

pub(crate) struct FlagGainsParams {
    pub(crate) gains: GainSolutions,
    pub(crate) config: SlidingFlagConfig,

    /// Where to write the JSON flag report.
    pub(crate) output_report: Option<PathBuf>,

    /// Where to write the cleaned gains. Never set if the fill policy drops
    /// channels.
    pub(crate) output_gains: Option<PathBuf>,
}

impl FlagGainsParams {
    /// Flag every antenna's gains, one (antenna, polarisation) spectrum at a
    /// time. A spectrum that can't be flagged is warned about and left out of
    /// the report; the others carry on.
    pub(crate) fn run(&self) -> Result<FlagReport, FlagGainsError> {
        let Self {
            gains,
            config,
            output_report,
            output_gains,
        } = self;

        let spectra = gains.spectra().collect::<Vec<_>>();
        let pb = ProgressBar::with_draw_target(
            Some(spectra.len() as _),
            if PROGRESS_BARS.load() {
                ProgressDrawTarget::stdout()
            } else {
                ProgressDrawTarget::hidden()
            },
        )
        .with_style(
            ProgressStyle::default_bar()
                .template("{msg:17}: [{wide_bar:.blue}] {pos:2}/{len:2} spectra ({elapsed_precise}<{eta_precise})").unwrap()
                .progress_chars("=> "),
        )
        .with_position(0)
        .with_message("Flagging");

        info!("Flagging {} spectra", spectra.len());
        let outcomes: Vec<(&str, Pol, Result<FlagOutcome<c64>, FlagError>)> = spectra
            .into_par_iter()
            .map(|(antenna, pol, spectrum)| {
                let outcome = sliding_rfi_flag_complex(&spectrum, config);
                pb.inc(1);
                (antenna, pol, outcome)
            })
            .collect();
        pb.finish_with_message("Finished flagging");

        let mut report = FlagReport::new(*config, gains.num_chans());
        let mut cleaned_gains = output_gains.as_ref().map(|_| gains.clone());
        let mut num_failed = 0;
        for (antenna, pol, outcome) in outcomes {
            let antenna_flags = report
                .antennas
                .entry(antenna.to_string())
                .or_insert_with(AntennaFlags::default);
            match outcome {
                Ok(outcome) => {
                    debug!(
                        "{antenna} {pol}: {} channels flagged",
                        outcome.mask.num_flagged()
                    );
                    antenna_flags.set(
                        pol,
                        PolFlags::new(
                            outcome.mask.flagged_channels(),
                            &gains.freqs_hz,
                            outcome.scaled_mad,
                        ),
                    );
                    if let Some(cleaned_gains) = cleaned_gains.as_mut() {
                        if let Some(g) = cleaned_gains.gains.get_mut(antenna) {
                            g.set_pol(pol, &outcome.cleaned);
                        }
                    }
                }
                Err(e) => {
                    num_failed += 1;
                    format!("Couldn't flag {antenna} {pol}; skipping it: {e}").warn();
                }
            }
        }

        let mut printer = InfoPrinter::new("Flagging summary".into());
        printer.push_block(vec![
            format!(
                "Window size: {}, threshold: {} scaled MADs",
                config.window_size, config.threshold
            )
            .into(),
            format!(
                "Edge policy: {}, fill policy: {}, complex statistic: {}",
                config.edge_policy, config.fill_policy, config.statistic
            )
            .into(),
        ]);
        printer.push_line(
            format!(
                "{} channels flagged across {} antennas ({num_failed} spectra skipped)",
                report.total_flagged(),
                report.antennas.len()
            )
            .into(),
        );
        let flagged_antennas = report
            .antennas
            .iter()
            .filter(|(_, f)| f.num_flagged() > 0)
            .map(|(antenna, f)| format!("{antenna}: {}", f.num_flagged()))
            .collect::<Vec<_>>();
        if !flagged_antennas.is_empty() {
            printer.push_line(format!("Per antenna: {}", flagged_antennas.iter().join(", ")).into());
        }
        printer.display();
        display_warnings();

        if let Some(file) = output_report {
            report.write_file(file)?;
            info!("Flag report written to {}", file.display());
        }
        if let (Some(file), Some(cleaned_gains)) = (output_gains, cleaned_gains) {
            cleaned_gains.write_file(file)?;
            info!("Cleaned gains written to {}", file.display());
        }

        Ok(report)
    }
}

#[derive(Error, Debug)]
pub(crate) enum FlagGainsError {
    #[error(transparent)]
    Write(#[from] GainsWriteError),
}
