// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Narrowband RFI flagging against a sliding-median bandpass model.
//!
//! Every function here is pure: inputs are never modified and all outputs are
//! freshly allocated, so independent spectra (e.g. one per antenna and
//! polarisation) can be flagged concurrently by the caller without any
//! locking.

mod batch;
mod error;
mod median;
mod sliding;

pub use batch::{flag_spectra, BatchFlagOutcome};
pub use error::{ConfigError, FlagError};
pub use sliding::{
    estimate_bandpass, estimate_bandpass_complex, flag, flag_complex, magnitudes,
    sliding_rfi_flag, sliding_rfi_flag_complex, ComplexStatistic, EdgePolicy, FillPolicy,
    FlagOutcome, ResidualMask, SlidingFlagConfig,
};
