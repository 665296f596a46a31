// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod flag_gains;
mod flag_spectrum;
mod no_stderr;

use std::{
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};
use indexmap::IndexMap;

use bandflag::{
    c64,
    io::{AntennaGains, GainSolutions},
};

fn bandflag() -> Command {
    Command::cargo_bin("bandflag").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// A gently-rippling bandpass with a little deterministic noise.
fn get_bandpass(num_chans: usize, phase_offset: f64) -> Vec<c64> {
    (0..num_chans)
        .map(|i| {
            let hash = (i as u64 * 2_654_435_761) % (1 << 32);
            let noise = 0.01 * hash as f64 / (1_u64 << 32) as f64;
            let amp = 1.0 + 0.02 * (i as f64 / 20.0).sin() + noise;
            c64::from_polar(amp, phase_offset + 0.02 * i as f64)
        })
        .collect()
}

/// Write a gains file with 3 antennas and 128 channels. "ea02" pol0 has RFI at
/// channels 40 and 41, "ea03" pol1 has RFI at channel 100.
fn get_gains_file(tmp_dir: &Path) -> PathBuf {
    let num_chans = 128;
    let freqs_hz = (0..num_chans).map(|i| 1.0e9 + i as f64 * 1.0e6).collect();

    let mut gains = IndexMap::new();
    let clean = get_bandpass(num_chans, 0.0);
    gains.insert("ea01".to_string(), AntennaGains::new(&clean, &clean));

    let mut rfi = get_bandpass(num_chans, 0.3);
    rfi[40] *= 8.0;
    rfi[41] *= 6.0;
    gains.insert(
        "ea02".to_string(),
        AntennaGains::new(&rfi, &get_bandpass(num_chans, 0.3)),
    );

    let mut rfi = get_bandpass(num_chans, -0.7);
    rfi[100] *= 12.0;
    gains.insert(
        "ea03".to_string(),
        AntennaGains::new(&get_bandpass(num_chans, -0.7), &rfi),
    );

    let file = tmp_dir.join("gains.json");
    GainSolutions { freqs_hz, gains }.write_file(&file).unwrap();
    file
}

/// Write a real spectrum with a spike at channel 5.
fn get_spectrum_file(tmp_dir: &Path) -> PathBuf {
    let file = tmp_dir.join("spectrum.txt");
    std::fs::write(
        &file,
        "# a flat spectrum with one spike\n0\n0\n0\n0\n0\n10\n0\n0\n0\n0\n0\n",
    )
    .unwrap();
    file
}
