// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Per-antenna, per-polarisation complex gains as a function of frequency.
//!
//! On disk these are JSON:
//!
//! ```json
//! {
//!   "freqs_hz": [1.0e9, 1.1e9],
//!   "gains": {
//!     "ea01": {
//!       "gain_pol0_real": [1.0, 1.0],
//!       "gain_pol0_imag": [0.0, 0.0],
//!       "gain_pol1_real": [1.0, 1.0],
//!       "gain_pol1_imag": [0.0, 0.0]
//!     }
//!   }
//! }
//! ```
//!
//! Antennas keep the order in which they appear in the file.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use super::{GainsReadError, GainsWriteError};
use crate::c64;

/// An instrumental polarisation of an antenna's gains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Pol {
    #[strum(serialize = "pol0")]
    Pol0,

    #[strum(serialize = "pol1")]
    Pol1,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AntennaGains {
    pub gain_pol0_real: Vec<f64>,
    pub gain_pol0_imag: Vec<f64>,
    pub gain_pol1_real: Vec<f64>,
    pub gain_pol1_imag: Vec<f64>,
}

impl AntennaGains {
    pub fn new(pol0: &[c64], pol1: &[c64]) -> AntennaGains {
        AntennaGains {
            gain_pol0_real: pol0.iter().map(|g| g.re).collect(),
            gain_pol0_imag: pol0.iter().map(|g| g.im).collect(),
            gain_pol1_real: pol1.iter().map(|g| g.re).collect(),
            gain_pol1_imag: pol1.iter().map(|g| g.im).collect(),
        }
    }

    /// The complex gains of a single polarisation.
    pub fn pol(&self, pol: Pol) -> Vec<c64> {
        let (re, im) = self.parts(pol);
        re.iter().zip(im).map(|(&re, &im)| c64::new(re, im)).collect()
    }

    /// Overwrite the gains of a single polarisation.
    pub fn set_pol(&mut self, pol: Pol, gains: &[c64]) {
        let (re, im) = match pol {
            Pol::Pol0 => (&mut self.gain_pol0_real, &mut self.gain_pol0_imag),
            Pol::Pol1 => (&mut self.gain_pol1_real, &mut self.gain_pol1_imag),
        };
        *re = gains.iter().map(|g| g.re).collect();
        *im = gains.iter().map(|g| g.im).collect();
    }

    fn parts(&self, pol: Pol) -> (&[f64], &[f64]) {
        match pol {
            Pol::Pol0 => (&self.gain_pol0_real, &self.gain_pol0_imag),
            Pol::Pol1 => (&self.gain_pol1_real, &self.gain_pol1_imag),
        }
    }

    fn check_shape(&self, antenna: &str, num_chans: usize) -> Result<(), GainsReadError> {
        for (thing, values) in [
            ("gain_pol0_real", &self.gain_pol0_real),
            ("gain_pol0_imag", &self.gain_pol0_imag),
            ("gain_pol1_real", &self.gain_pol1_real),
            ("gain_pol1_imag", &self.gain_pol1_imag),
        ] {
            if values.len() != num_chans {
                return Err(GainsReadError::BadShape {
                    antenna: antenna.to_string(),
                    thing,
                    expected: num_chans,
                    actual: values.len(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GainSolutions {
    /// The centre frequency of each channel [Hz].
    pub freqs_hz: Vec<f64>,

    /// Gains keyed by antenna name.
    pub gains: IndexMap<String, AntennaGains>,
}

impl GainSolutions {
    pub fn read_file<P: AsRef<Path>>(file: P) -> Result<GainSolutions, GainsReadError> {
        let file = file.as_ref();
        debug!("Reading gains from {}", file.display());
        let mut buf = BufReader::new(File::open(file)?);
        Self::from_json(&mut buf)
    }

    /// Read gains from JSON, complaining if any antenna's arrays don't match
    /// the number of frequencies.
    pub fn from_json<T: BufRead>(buf: &mut T) -> Result<GainSolutions, GainsReadError> {
        let sols: GainSolutions = serde_json::from_reader(buf)?;
        if sols.freqs_hz.is_empty() {
            return Err(GainsReadError::NoFreqs);
        }
        for (antenna, gains) in &sols.gains {
            gains.check_shape(antenna, sols.freqs_hz.len())?;
        }
        Ok(sols)
    }

    pub fn write_file<P: AsRef<Path>>(&self, file: P) -> Result<(), GainsWriteError> {
        let file = file.as_ref();
        debug!("Writing gains to {}", file.display());
        let mut buf = BufWriter::new(File::create(file)?);
        serde_json::to_writer_pretty(&mut buf, self)?;
        buf.flush()?;
        Ok(())
    }

    pub fn num_chans(&self) -> usize {
        self.freqs_hz.len()
    }

    pub fn num_antennas(&self) -> usize {
        self.gains.len()
    }

    /// Every (antenna, polarisation) spectrum, in file order.
    pub fn spectra(&self) -> impl Iterator<Item = (&str, Pol, Vec<c64>)> + '_ {
        self.gains.iter().flat_map(|(antenna, gains)| {
            [Pol::Pol0, Pol::Pol1]
                .into_iter()
                .map(move |pol| (antenna.as_str(), pol, gains.pol(pol)))
        })
    }
}
