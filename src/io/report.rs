// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A JSON summary of which channels were flagged for each antenna.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{GainsWriteError, Pol, ReportReadError};
use crate::flagging::SlidingFlagConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolFlags {
    pub flagged_channels: Vec<usize>,
    pub flagged_freqs_hz: Vec<f64>,
    pub scaled_mad: f64,
}

impl PolFlags {
    /// Look up the frequencies of the flagged channels.
    pub fn new(flagged_channels: Vec<usize>, freqs_hz: &[f64], scaled_mad: f64) -> PolFlags {
        let flagged_freqs_hz = flagged_channels.iter().map(|&i| freqs_hz[i]).collect();
        PolFlags {
            flagged_channels,
            flagged_freqs_hz,
            scaled_mad,
        }
    }
}

/// A polarisation is `None` if its spectrum couldn't be flagged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AntennaFlags {
    #[serde(default)]
    pub pol0: Option<PolFlags>,

    #[serde(default)]
    pub pol1: Option<PolFlags>,
}

impl AntennaFlags {
    pub fn get(&self, pol: Pol) -> Option<&PolFlags> {
        match pol {
            Pol::Pol0 => self.pol0.as_ref(),
            Pol::Pol1 => self.pol1.as_ref(),
        }
    }

    pub fn set(&mut self, pol: Pol, flags: PolFlags) {
        match pol {
            Pol::Pol0 => self.pol0 = Some(flags),
            Pol::Pol1 => self.pol1 = Some(flags),
        }
    }

    pub fn num_flagged(&self) -> usize {
        [&self.pol0, &self.pol1]
            .into_iter()
            .flatten()
            .map(|f| f.flagged_channels.len())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagReport {
    /// The settings used to produce the flags.
    pub config: SlidingFlagConfig,

    pub num_chans: usize,

    pub antennas: IndexMap<String, AntennaFlags>,
}

impl FlagReport {
    pub fn new(config: SlidingFlagConfig, num_chans: usize) -> FlagReport {
        FlagReport {
            config,
            num_chans,
            antennas: IndexMap::new(),
        }
    }

    pub fn total_flagged(&self) -> usize {
        self.antennas.values().map(|a| a.num_flagged()).sum()
    }

    pub fn read_file<P: AsRef<Path>>(file: P) -> Result<FlagReport, ReportReadError> {
        let mut buf = BufReader::new(File::open(file)?);
        Self::from_json(&mut buf)
    }

    pub fn from_json<T: BufRead>(buf: &mut T) -> Result<FlagReport, ReportReadError> {
        Ok(serde_json::from_reader(buf)?)
    }

    pub fn write_file<P: AsRef<Path>>(&self, file: P) -> Result<(), GainsWriteError> {
        let file = file.as_ref();
        debug!("Writing flag report to {}", file.display());
        let mut buf = BufWriter::new(File::create(file)?);
        serde_json::to_writer_pretty(&mut buf, self)?;
        buf.flush()?;
        Ok(())
    }
}
