// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. `bandflag` should do as many
calculations as possible in double precision before converting to a lower
precision, if it is ever required.
 */

/// The factor that converts a median absolute deviation into an estimate of
/// the standard deviation of normally-distributed data (1 / Φ⁻¹(3/4)).
pub const MAD_TO_SIGMA: f64 = 1.4826;

/// The default number of channels in the sliding median window.
pub const DEFAULT_WINDOW_SIZE: usize = 9;

/// The default flagging threshold, in units of the scaled median absolute
/// deviation of the residuals.
pub const DEFAULT_THRESHOLD: f64 = 3.0;

/// The smallest permitted sliding window.
pub const MIN_WINDOW_SIZE: usize = 3;
