// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Flag many spectra sharing the same channels at once, e.g. every
//! polarisation of a time-averaged baseline.

use ndarray::prelude::*;
use rayon::prelude::*;

use super::{sliding_rfi_flag_complex, FlagError, SlidingFlagConfig};
use crate::c64;

pub struct BatchFlagOutcome {
    /// The bandpass model of each spectrum. Dimensions are (channel, spectrum).
    pub model: Array2<c64>,

    /// Flags with dimensions of (channel, spectrum).
    pub mask: Array2<bool>,

    /// The scaled MAD of each spectrum's residuals.
    pub scaled_mads: Vec<f64>,
}

impl BatchFlagOutcome {
    /// The flagged channels of a single spectrum.
    pub fn flagged_channels(&self, i_spectrum: usize) -> Vec<usize> {
        self.mask
            .column(i_spectrum)
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect()
    }
}

/// Flag each column of `spectra` (dimensions (channel, spectrum))
/// independently and in parallel. The config is validated once up front; any
/// spectrum failing aborts the whole batch.
pub fn flag_spectra(
    spectra: ArrayView2<c64>,
    config: &SlidingFlagConfig,
) -> Result<BatchFlagOutcome, FlagError> {
    let (num_chans, num_spectra) = spectra.dim();
    config.validate(num_chans)?;

    let outcomes = spectra
        .axis_iter(Axis(1))
        .into_par_iter()
        .map(|spectrum| sliding_rfi_flag_complex(&spectrum.to_vec(), config))
        .collect::<Result<Vec<_>, _>>()?;

    let mut model = Array2::from_elem(spectra.raw_dim(), c64::default());
    let mut mask = Array2::from_elem(spectra.raw_dim(), false);
    let mut scaled_mads = Vec::with_capacity(num_spectra);
    for ((outcome, mut model_column), mut mask_column) in outcomes
        .into_iter()
        .zip(model.axis_iter_mut(Axis(1)))
        .zip(mask.axis_iter_mut(Axis(1)))
    {
        model_column.assign(&ArrayView1::from(outcome.model.as_slice()));
        mask_column.assign(&ArrayView1::from(&*outcome.mask));
        scaled_mads.push(outcome.scaled_mad);
    }

    Ok(BatchFlagOutcome {
        model,
        mask,
        scaled_mads,
    })
}
