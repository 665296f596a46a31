// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Order statistics over spectral windows.
//!
//! All orderings use [`f64::total_cmp`], so NaNs are sorted (positive NaNs
//! above +∞) rather than poisoning comparisons. Every median in this crate
//! goes through [`median_of_sorted`], which is what makes the rolling median
//! bit-identical to sorting each window from scratch.

use std::cmp::Ordering;

/// The median of already-sorted values. For an even number of values, the
/// two central order statistics are averaged.
///
/// # Panics
///
/// Panics if `sorted` is empty.
#[inline]
pub(crate) fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// The median of arbitrarily-ordered values. The input is copied.
///
/// # Panics
///
/// Panics if `values` is empty.
pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    median_of_sorted(&sorted)
}

/// The (unscaled) median absolute deviation of `values` about their median.
/// Returns the median alongside the MAD.
pub(crate) fn median_abs_deviation(values: &[f64]) -> (f64, f64) {
    let centre = median(values);
    let mut deviations: Vec<f64> = values.iter().map(|&v| (v - centre).abs()).collect();
    deviations.sort_unstable_by(f64::total_cmp);
    (centre, median_of_sorted(&deviations))
}

/// A multiset of window values kept in sorted order. Values enter and leave
/// as the window slides along a spectrum; the median is available at any
/// time without re-sorting.
#[derive(Debug, Clone, Default)]
pub(crate) struct RollingMedian {
    sorted: Vec<f64>,
}

impl RollingMedian {
    pub(crate) fn with_capacity(capacity: usize) -> RollingMedian {
        RollingMedian {
            sorted: Vec::with_capacity(capacity),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sorted.len()
    }

    pub(crate) fn insert(&mut self, value: f64) {
        let pos = self
            .sorted
            .partition_point(|v| v.total_cmp(&value) == Ordering::Less);
        self.sorted.insert(pos, value);
    }

    /// Remove one copy of `value`. Returns `false` if it wasn't present.
    pub(crate) fn remove(&mut self, value: f64) -> bool {
        match self.sorted.binary_search_by(|v| v.total_cmp(&value)) {
            Ok(pos) => {
                self.sorted.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// The median of the current window.
    ///
    /// # Panics
    ///
    /// Panics if the window is empty.
    pub(crate) fn median(&self) -> f64 {
        median_of_sorted(&self.sorted)
    }
}
