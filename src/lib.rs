// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Sliding-median bandpass estimation and narrowband RFI flagging for
radio-interferometer calibration products.

The core is in [`flagging`]; it is pure and works on real or complex spectra.
[`io`] reads and writes gains, spectra and flag reports. The `bandflag` binary
ties these together.
 */

pub mod constants;
pub mod flagging;
pub mod io;

mod cli;
mod params;

pub use cli::{Bandflag, BandflagError};

use crossbeam_utils::atomic::AtomicCell;

/// A double-precision complex number.
#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex64;

/// Should progress bars be drawn? This is only set by the binary.
pub(crate) static PROGRESS_BARS: AtomicCell<bool> = AtomicCell::new(false);
