// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tempfile::TempDir;

use bandflag::io::{read_spectrum_file, Spectrum};

use crate::{bandflag, get_cmd_output, get_spectrum_file};

#[test]
fn test_flag_spectrum_prints_flagged_channels() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let spectrum = get_spectrum_file(tmp_dir.path());
    let output = tmp_dir.path().join("cleaned.txt");

    #[rustfmt::skip]
    let cmd = bandflag()
        .args([
            "flag-spectrum",
            "--spectrum", &format!("{}", spectrum.display()),
            "--window-size", "5",
            "--fill-policy", "zero",
            "--output", &format!("{}", output.display()),
        ])
        .ok();
    assert!(cmd.is_ok(), "flag-spectrum failed: {:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.lines().any(|l| l == "5"), "{stdout}");

    assert_eq!(
        read_spectrum_file(&output).unwrap(),
        Spectrum::Real(vec![0.0; 11])
    );
}

#[test]
fn test_flag_complex_spectrum() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let spectrum = tmp_dir.path().join("complex.txt");
    let mut text = String::new();
    for i in 0..21 {
        if i == 3 || i == 17 {
            text.push_str("30.0 40.0\n");
        } else {
            text.push_str("0.6 0.8\n");
        }
    }
    std::fs::write(&spectrum, text).unwrap();

    #[rustfmt::skip]
    let cmd = bandflag()
        .args([
            "flag-spectrum",
            "--spectrum", &format!("{}", spectrum.display()),
            "--window-size", "7",
        ])
        .ok();
    assert!(cmd.is_ok(), "flag-spectrum failed: {:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.lines().any(|l| l == "3 17"), "{stdout}");
}

#[test]
fn test_flag_spectrum_errors() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let spectrum = get_spectrum_file(tmp_dir.path());

    // The spectrum only has 11 channels.
    #[rustfmt::skip]
    let cmd = bandflag()
        .args([
            "flag-spectrum",
            "--spectrum", &format!("{}", spectrum.display()),
            "--window-size", "13",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("larger than the number of channels"), "{stderr}");

    #[rustfmt::skip]
    let cmd = bandflag()
        .args([
            "flag-spectrum",
            "--spectrum", &format!("{}", spectrum.display()),
            "--edge-policy", "wrap",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Unrecognised edge policy 'wrap'"), "{stderr}");

    let empty = tmp_dir.path().join("empty.txt");
    std::fs::write(&empty, "# nothing\n").unwrap();
    #[rustfmt::skip]
    let cmd = bandflag()
        .args([
            "flag-spectrum",
            "--spectrum", &format!("{}", empty.display()),
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("empty"), "{stderr}");
}
