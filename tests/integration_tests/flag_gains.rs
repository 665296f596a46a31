// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use tempfile::TempDir;

use bandflag::io::{FlagReport, GainSolutions, Pol};

use crate::{bandflag, get_cmd_output, get_gains_file};

#[test]
fn test_flag_gains_report() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let gains = get_gains_file(tmp_dir.path());
    let report = tmp_dir.path().join("report.json");
    let cleaned = tmp_dir.path().join("cleaned.json");

    #[rustfmt::skip]
    let cmd = bandflag()
        .args([
            "flag-gains",
            "--gains", &format!("{}", gains.display()),
            "--output-report", &format!("{}", report.display()),
            "--output-gains", &format!("{}", cleaned.display()),
            "--no-progress-bars",
        ])
        .ok();
    assert!(cmd.is_ok(), "flag-gains failed: {:?}", get_cmd_output(cmd));

    let report = FlagReport::read_file(&report).unwrap();
    assert_eq!(report.num_chans, 128);
    assert_eq!(
        report.antennas.keys().collect::<Vec<_>>(),
        ["ea01", "ea02", "ea03"]
    );
    assert_eq!(report.antennas["ea01"].num_flagged(), 0);
    let ea02 = report.antennas["ea02"].get(Pol::Pol0).unwrap();
    assert_eq!(ea02.flagged_channels, [40, 41]);
    assert_abs_diff_eq!(ea02.flagged_freqs_hz[1], 1.041e9);
    assert!(report.antennas["ea02"]
        .get(Pol::Pol1)
        .unwrap()
        .flagged_channels
        .is_empty());
    assert_eq!(
        report.antennas["ea03"].get(Pol::Pol1).unwrap().flagged_channels,
        [100]
    );

    // RFI is gone from the cleaned gains.
    let cleaned = GainSolutions::read_file(&cleaned).unwrap();
    let ea03 = cleaned.gains["ea03"].pol(Pol::Pol1);
    assert!(ea03[100].norm() < 1.5, "{}", ea03[100]);
}

#[test]
fn test_flag_gains_arg_file() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let gains = get_gains_file(tmp_dir.path());
    let report = tmp_dir.path().join("report.json");
    let arg_file = tmp_dir.path().join("args.toml");
    std::fs::write(
        &arg_file,
        format!(
            "gains = {:?}\noutput_report = {:?}\n\n[flagging]\nwindow_size = 15\nedge_policy = \"reflect\"\n",
            gains.display().to_string(),
            report.display().to_string(),
        ),
    )
    .unwrap();
    let saved = tmp_dir.path().join("saved.toml");

    #[rustfmt::skip]
    let cmd = bandflag()
        .args([
            "flag-gains",
            &format!("{}", arg_file.display()),
            "--threshold", "4",
            "--save-toml", &format!("{}", saved.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "flag-gains failed: {:?}", get_cmd_output(cmd));

    let report = FlagReport::read_file(&report).unwrap();
    assert_eq!(report.config.window_size, 15);
    assert_abs_diff_eq!(report.config.threshold, 4.0);
    assert_eq!(report.config.edge_policy.to_string(), "reflect");

    let saved = std::fs::read_to_string(saved).unwrap();
    assert!(saved.contains("window_size = 15"), "{saved}");
    assert!(saved.contains("threshold = 4.0"), "{saved}");
}

#[test]
fn test_flag_gains_bad_window() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let gains = get_gains_file(tmp_dir.path());

    #[rustfmt::skip]
    let cmd = bandflag()
        .args([
            "flag-gains",
            "--gains", &format!("{}", gains.display()),
            "--window-size", "4",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("must be odd"), "{stderr}");
}

#[test]
fn test_flag_gains_missing_gains() {
    let cmd = bandflag().args(["flag-gains", "--dry-run"]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No gains file"), "{stderr}");
}
