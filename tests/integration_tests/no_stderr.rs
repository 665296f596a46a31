// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests to ensure there is no stderr output for successful commands.

use tempfile::TempDir;

use crate::{bandflag, get_cmd_output, get_gains_file, get_spectrum_file};

#[test]
fn test_flag_gains_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let gains = get_gains_file(tmp_dir.path());
    let report = tmp_dir.path().join("report.json");

    #[rustfmt::skip]
    let cmd = bandflag()
        .args([
            "flag-gains",
            "--gains", &format!("{}", gains.display()),
            "--output-report", &format!("{}", report.display()),
        ])
        .ok();
    assert!(
        cmd.is_ok(),
        "flag-gains failed on simple test data: {}",
        cmd.err().unwrap()
    );
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}

#[test]
fn test_flag_spectrum_no_stderr() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let spectrum = get_spectrum_file(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = bandflag()
        .args([
            "flag-spectrum",
            "--spectrum", &format!("{}", spectrum.display()),
            "--window-size", "5",
        ])
        .ok();
    assert!(
        cmd.is_ok(),
        "flag-spectrum failed on simple test data: {}",
        cmd.err().unwrap()
    );
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
}
