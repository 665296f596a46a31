// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sliding-median bandpass estimation and narrowband RFI flagging.
//!
//! A smooth bandpass model is made by taking the median of a window of
//! channels centred on each channel. Residuals against that model are compared
//! against a robust noise estimate (the scaled median absolute deviation of all
//! residuals); channels with residuals above `threshold` times that estimate
//! are flagged.

use std::ops::Deref;

use log::trace;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::{
    error::{ConfigError, FlagError},
    median::{median, median_abs_deviation, RollingMedian},
};
use crate::{
    constants::{DEFAULT_THRESHOLD, DEFAULT_WINDOW_SIZE, MAD_TO_SIGMA, MIN_WINDOW_SIZE},
    c64,
};

/// How the sliding window behaves when it runs past either end of the band.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Use only the in-bounds part of the window; edge channels get a smaller
    /// window.
    #[default]
    #[strum(serialize = "shrink")]
    Shrink,

    /// Mirror out-of-bounds channels back into the band about the edge channel
    /// (which itself is not repeated).
    #[strum(serialize = "reflect")]
    Reflect,

    /// Pad with the nearest in-bounds channel.
    #[strum(serialize = "constant")]
    Constant,
}

/// What to put in place of flagged channels in a cleaned spectrum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    /// The bandpass model value.
    #[default]
    #[strum(serialize = "model")]
    Model,

    /// NaN.
    #[strum(serialize = "nan")]
    Nan,

    /// Zero.
    #[strum(serialize = "zero")]
    Zero,

    /// Remove flagged channels entirely; the cleaned spectrum is shorter than
    /// the input.
    #[strum(serialize = "drop")]
    Drop,
}

/// The scalar that medians are taken over for complex spectra.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ComplexStatistic {
    /// Medians of the sample magnitudes. The bandpass model is real.
    #[default]
    #[strum(serialize = "magnitude")]
    Magnitude,

    /// Independent medians of the real and imaginary parts.
    #[strum(serialize = "components")]
    Components,
}

/// Everything needed for a single flagging invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlidingFlagConfig {
    /// The number of channels in the sliding window. Must be odd and at least
    /// 3.
    pub window_size: usize,

    /// Channels with residuals larger than this many scaled MADs are flagged.
    pub threshold: f64,

    pub edge_policy: EdgePolicy,

    pub fill_policy: FillPolicy,

    /// Only used for complex spectra.
    pub statistic: ComplexStatistic,

    /// Measure residuals from their median rather than from zero.
    pub centre_residuals: bool,
}

impl Default for SlidingFlagConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            threshold: DEFAULT_THRESHOLD,
            edge_policy: EdgePolicy::default(),
            fill_policy: FillPolicy::default(),
            statistic: ComplexStatistic::default(),
            centre_residuals: false,
        }
    }
}

impl SlidingFlagConfig {
    /// Check this config against a spectrum with `num_chans` channels.
    pub fn validate(&self, num_chans: usize) -> Result<(), FlagError> {
        check_window_size(self.window_size)?;
        check_threshold(self.threshold)?;
        check_spectrum_len(num_chans, self.window_size)
    }
}

/// Flags for each channel of a spectrum; `true` means flagged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResidualMask(Vec<bool>);

impl ResidualMask {
    /// The number of flagged channels.
    pub fn num_flagged(&self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }

    /// The (zero-indexed) flagged channels, in ascending order.
    pub fn flagged_channels(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect()
    }

    pub fn into_vec(self) -> Vec<bool> {
        self.0
    }
}

impl Deref for ResidualMask {
    type Target = [bool];

    fn deref(&self) -> &[bool] {
        &self.0
    }
}

impl FromIterator<bool> for ResidualMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        ResidualMask(iter.into_iter().collect())
    }
}

/// The products of [`sliding_rfi_flag`] and [`sliding_rfi_flag_complex`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlagOutcome<T> {
    /// The input spectrum with flagged channels handled according to the
    /// [`FillPolicy`].
    pub cleaned: Vec<T>,

    pub mask: ResidualMask,

    /// The bandpass model. For complex spectra flagged with
    /// [`ComplexStatistic::Magnitude`], every value is real.
    pub model: Vec<T>,

    /// The scaled median absolute deviation of the residuals, i.e. the noise
    /// estimate the threshold was applied against.
    pub scaled_mad: f64,
}

fn check_window_size(window_size: usize) -> Result<(), ConfigError> {
    if window_size % 2 == 0 {
        return Err(ConfigError::EvenWindow(window_size));
    }
    if window_size < MIN_WINDOW_SIZE {
        return Err(ConfigError::WindowTooSmall(window_size));
    }
    Ok(())
}

fn check_threshold(threshold: f64) -> Result<(), ConfigError> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::BadThreshold(threshold))
    }
}

fn check_spectrum_len(num_chans: usize, window_size: usize) -> Result<(), FlagError> {
    if num_chans == 0 {
        return Err(FlagError::EmptyInput);
    }
    if window_size > num_chans {
        return Err(ConfigError::WindowTooLarge {
            window_size,
            num_chans,
        }
        .into());
    }
    Ok(())
}

fn check_flag_inputs(num_chans: usize, model_len: usize, threshold: f64) -> Result<(), FlagError> {
    check_threshold(threshold)?;
    if num_chans == 0 {
        return Err(FlagError::EmptyInput);
    }
    if num_chans != model_len {
        return Err(ConfigError::LengthMismatch {
            spectrum: num_chans,
            model: model_len,
        }
        .into());
    }
    Ok(())
}

/// Map a (possibly out-of-bounds) channel index into the band. Only valid for
/// indices less than a window half-width outside the band, which always holds
/// for validated windows.
#[inline]
fn edge_index(j: isize, num_chans: usize, edge_policy: EdgePolicy) -> usize {
    let last = num_chans as isize - 1;
    let j = match edge_policy {
        EdgePolicy::Reflect if j < 0 => -j,
        EdgePolicy::Reflect if j > last => 2 * last - j,
        _ => j.clamp(0, last),
    };
    j as usize
}

/// The sliding median of `values`. The inputs must already be validated.
fn sliding_median(values: &[f64], window_size: usize, edge_policy: EdgePolicy) -> Vec<f64> {
    let num_chans = values.len();
    let half = window_size / 2;

    // A window as wide as the band covers the band for every channel.
    if window_size == num_chans && edge_policy != EdgePolicy::Reflect {
        return vec![median(values); num_chans];
    }

    let mut model = Vec::with_capacity(num_chans);
    let mut window = RollingMedian::with_capacity(window_size);
    match edge_policy {
        EdgePolicy::Shrink => {
            let mut hi = 0;
            for i in 0..num_chans {
                let window_end = (i + half + 1).min(num_chans);
                while hi < window_end {
                    window.insert(values[hi]);
                    hi += 1;
                }
                if i > half {
                    let removed = window.remove(values[i - half - 1]);
                    debug_assert!(removed);
                }
                model.push(window.median());
            }
        }

        EdgePolicy::Reflect | EdgePolicy::Constant => {
            let half = half as isize;
            let padded = |j: isize| values[edge_index(j, num_chans, edge_policy)];
            for j in -half..half {
                window.insert(padded(j));
            }
            for i in 0..num_chans as isize {
                window.insert(padded(i + half));
                model.push(window.median());
                let removed = window.remove(padded(i - half));
                debug_assert!(removed);
            }
        }
    }

    model
}

/// Compare residuals against `threshold` scaled MADs. Returns the mask and the
/// scaled MAD.
///
/// The comparison is strict, so when the MAD is zero only residuals that are
/// exactly non-zero (or differ from the residual median, if centring) are
/// flagged; a flat spectrum is never flagged.
pub(super) fn flag_residuals(residuals: &[f64], threshold: f64, centre_residuals: bool) -> (ResidualMask, f64) {
    let (centre, mad) = median_abs_deviation(residuals);
    let scaled_mad = MAD_TO_SIGMA * mad;
    let offset = if centre_residuals { centre } else { 0.0 };
    let limit = threshold * scaled_mad;
    let mask = residuals
        .iter()
        .map(|&r| (r - offset).abs() > limit)
        .collect();
    (mask, scaled_mad)
}

fn replace_flagged<T: Copy>(
    spectrum: &[T],
    mask: &ResidualMask,
    fill_policy: FillPolicy,
    nan: T,
    zero: T,
    model_value: impl Fn(usize) -> T,
) -> Vec<T> {
    let pairs = spectrum.iter().copied().zip(mask.iter().copied());
    match fill_policy {
        FillPolicy::Drop => pairs.filter(|&(_, f)| !f).map(|(s, _)| s).collect(),
        FillPolicy::Model => pairs
            .enumerate()
            .map(|(i, (s, f))| if f { model_value(i) } else { s })
            .collect(),
        FillPolicy::Nan => pairs.map(|(s, f)| if f { nan } else { s }).collect(),
        FillPolicy::Zero => pairs.map(|(s, f)| if f { zero } else { s }).collect(),
    }
}

/// The magnitude of each complex sample.
pub fn magnitudes(spectrum: &[c64]) -> Vec<f64> {
    spectrum.iter().map(|s| s.norm()).collect()
}

/// Make a bandpass model of a real spectrum with a sliding median.
///
/// `window_size` must be odd, at least 3 and no larger than the spectrum.
pub fn estimate_bandpass(
    spectrum: &[f64],
    window_size: usize,
    edge_policy: EdgePolicy,
) -> Result<Vec<f64>, FlagError> {
    check_window_size(window_size)?;
    check_spectrum_len(spectrum.len(), window_size)?;
    Ok(sliding_median(spectrum, window_size, edge_policy))
}

/// Make a bandpass model of a complex spectrum. With
/// [`ComplexStatistic::Magnitude`], the model is the sliding median of the
/// magnitudes (with zero imaginary parts); with
/// [`ComplexStatistic::Components`], the real and imaginary parts are modelled
/// independently.
pub fn estimate_bandpass_complex(
    spectrum: &[c64],
    window_size: usize,
    edge_policy: EdgePolicy,
    statistic: ComplexStatistic,
) -> Result<Vec<c64>, FlagError> {
    check_window_size(window_size)?;
    check_spectrum_len(spectrum.len(), window_size)?;
    Ok(complex_model(spectrum, window_size, edge_policy, statistic))
}

fn complex_model(
    spectrum: &[c64],
    window_size: usize,
    edge_policy: EdgePolicy,
    statistic: ComplexStatistic,
) -> Vec<c64> {
    match statistic {
        ComplexStatistic::Magnitude => {
            sliding_median(&magnitudes(spectrum), window_size, edge_policy)
                .into_iter()
                .map(|m| c64::new(m, 0.0))
                .collect()
        }

        ComplexStatistic::Components => {
            let (re, im): (Vec<f64>, Vec<f64>) = spectrum.iter().map(|s| (s.re, s.im)).unzip();
            let re = sliding_median(&re, window_size, edge_policy);
            let im = sliding_median(&im, window_size, edge_policy);
            re.into_iter()
                .zip(im)
                .map(|(re, im)| c64::new(re, im))
                .collect()
        }
    }
}

/// Flag channels of a real spectrum whose residuals against `model` exceed
/// `threshold` scaled MADs.
pub fn flag(spectrum: &[f64], model: &[f64], threshold: f64) -> Result<ResidualMask, FlagError> {
    check_flag_inputs(spectrum.len(), model.len(), threshold)?;
    let residuals: Vec<f64> = spectrum.iter().zip(model).map(|(s, m)| s - m).collect();
    Ok(flag_residuals(&residuals, threshold, false).0)
}

/// The residuals of a complex spectrum against a model made with `statistic`.
fn complex_residuals(spectrum: &[c64], model: &[c64], statistic: ComplexStatistic) -> Vec<f64> {
    let pairs = spectrum.iter().zip(model);
    match statistic {
        // The model is real; only the real part carries the magnitude.
        ComplexStatistic::Magnitude => pairs.map(|(s, m)| s.norm() - m.re).collect(),
        ComplexStatistic::Components => pairs.map(|(s, m)| (s - m).norm()).collect(),
    }
}

/// Flag channels of a complex spectrum against a model from
/// [`estimate_bandpass_complex`]. `statistic` must be the one the model was
/// made with: for [`ComplexStatistic::Magnitude`], residuals are the
/// differences between sample magnitudes and the (real) model; for
/// [`ComplexStatistic::Components`], they are the magnitudes of the complex
/// differences.
pub fn flag_complex(
    spectrum: &[c64],
    model: &[c64],
    threshold: f64,
    statistic: ComplexStatistic,
) -> Result<ResidualMask, FlagError> {
    check_flag_inputs(spectrum.len(), model.len(), threshold)?;
    let residuals = complex_residuals(spectrum, model, statistic);
    Ok(flag_residuals(&residuals, threshold, false).0)
}

/// Model the bandpass of a real spectrum, flag RFI against it and produce a
/// cleaned spectrum. The config is validated before anything is computed.
pub fn sliding_rfi_flag(
    spectrum: &[f64],
    config: &SlidingFlagConfig,
) -> Result<FlagOutcome<f64>, FlagError> {
    config.validate(spectrum.len())?;

    let model = sliding_median(spectrum, config.window_size, config.edge_policy);
    let residuals: Vec<f64> = spectrum.iter().zip(&model).map(|(s, m)| s - m).collect();
    let (mask, scaled_mad) = flag_residuals(&residuals, config.threshold, config.centre_residuals);
    trace!(
        "Flagged {} of {} channels (scaled MAD {scaled_mad:e})",
        mask.num_flagged(),
        spectrum.len()
    );

    let cleaned = replace_flagged(spectrum, &mask, config.fill_policy, f64::NAN, 0.0, |i| {
        model[i]
    });
    Ok(FlagOutcome {
        cleaned,
        mask,
        model,
        scaled_mad,
    })
}

/// Model the bandpass of a complex spectrum, flag RFI against it and produce a
/// cleaned spectrum.
///
/// With [`ComplexStatistic::Magnitude`], residuals are signed differences of
/// magnitudes, and filling with the model rescales a flagged sample to the
/// model magnitude while keeping its phase. With
/// [`ComplexStatistic::Components`], residuals are magnitudes of complex
/// differences, and filling with the model uses the complex model value.
pub fn sliding_rfi_flag_complex(
    spectrum: &[c64],
    config: &SlidingFlagConfig,
) -> Result<FlagOutcome<c64>, FlagError> {
    config.validate(spectrum.len())?;

    let model = complex_model(
        spectrum,
        config.window_size,
        config.edge_policy,
        config.statistic,
    );
    let residuals = complex_residuals(spectrum, &model, config.statistic);
    let (mask, scaled_mad) = flag_residuals(&residuals, config.threshold, config.centre_residuals);
    trace!(
        "Flagged {} of {} channels (scaled MAD {scaled_mad:e})",
        mask.num_flagged(),
        spectrum.len()
    );

    let nan = c64::new(f64::NAN, f64::NAN);
    let zero = c64::new(0.0, 0.0);
    let cleaned = match config.statistic {
        ComplexStatistic::Magnitude => {
            replace_flagged(spectrum, &mask, config.fill_policy, nan, zero, |i| {
                let s = spectrum[i];
                let m = model[i].re;
                let amp = s.norm();
                if amp > 0.0 {
                    s * (m / amp)
                } else {
                    c64::new(m, 0.0)
                }
            })
        }
        ComplexStatistic::Components => {
            replace_flagged(spectrum, &mask, config.fill_policy, nan, zero, |i| {
                model[i]
            })
        }
    };
    Ok(FlagOutcome {
        cleaned,
        mask,
        model,
        scaled_mad,
    })
}
