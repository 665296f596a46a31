// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plain-text spectra: one channel per line, either a single real column or
//! two columns (real and imaginary parts). Anything after a `#` is ignored, as
//! are blank lines.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use log::debug;

use super::SpectrumReadError;
use crate::c64;

#[derive(Debug, Clone, PartialEq)]
pub enum Spectrum {
    Real(Vec<f64>),
    Complex(Vec<c64>),
}

impl Spectrum {
    pub fn len(&self) -> usize {
        match self {
            Spectrum::Real(s) => s.len(),
            Spectrum::Complex(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Spectrum::Complex(_))
    }
}

pub fn read_spectrum_file<P: AsRef<Path>>(file: P) -> Result<Spectrum, SpectrumReadError> {
    let file = file.as_ref();
    debug!("Reading spectrum from {}", file.display());
    read_spectrum(BufReader::new(File::open(file)?))
}

/// Parse a spectrum. The number of columns on the first channel line decides
/// whether the spectrum is real or complex; every other line must match.
pub fn read_spectrum<T: BufRead>(buf: T) -> Result<Spectrum, SpectrumReadError> {
    let mut num_cols = None;
    let mut values = vec![];
    for (i_line, line) in buf.lines().enumerate() {
        let line = line?;
        let line_num = i_line + 1;
        let data = match line.split_once('#') {
            Some((data, _comment)) => data,
            None => line.as_str(),
        };
        let cols = data.split_whitespace().collect::<Vec<_>>();
        if cols.is_empty() {
            continue;
        }

        match num_cols {
            None if cols.len() > 2 => {
                return Err(SpectrumReadError::BadNumColumns {
                    line_num,
                    num_cols: cols.len(),
                })
            }
            None => num_cols = Some(cols.len()),
            Some(expected) if expected != cols.len() => {
                return Err(SpectrumReadError::InconsistentColumns {
                    line_num,
                    expected,
                    actual: cols.len(),
                })
            }
            Some(_) => (),
        }

        for col in cols {
            let value = col
                .parse::<f64>()
                .map_err(|_| SpectrumReadError::ParseFloat {
                    line_num,
                    value: col.to_string(),
                })?;
            values.push(value);
        }
    }

    let spectrum = match num_cols {
        Some(2) => Spectrum::Complex(
            values
                .chunks_exact(2)
                .map(|pair| c64::new(pair[0], pair[1]))
                .collect(),
        ),
        _ => Spectrum::Real(values),
    };
    Ok(spectrum)
}

/// Write a spectrum in the same format that [`read_spectrum`] reads.
pub fn write_spectrum<T: Write>(buf: &mut T, spectrum: &Spectrum) -> Result<(), std::io::Error> {
    match spectrum {
        Spectrum::Real(s) => {
            for v in s {
                writeln!(buf, "{v:e}")?;
            }
        }
        Spectrum::Complex(s) => {
            for v in s {
                writeln!(buf, "{:e} {:e}", v.re, v.im)?;
            }
        }
    }
    Ok(())
}

pub fn write_spectrum_file<P: AsRef<Path>>(
    file: P,
    spectrum: &Spectrum,
) -> Result<(), std::io::Error> {
    let file = file.as_ref();
    debug!("Writing spectrum to {}", file.display());
    let mut buf = BufWriter::new(File::create(file)?);
    write_spectrum(&mut buf, spectrum)?;
    buf.flush()
}
