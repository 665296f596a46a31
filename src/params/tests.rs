// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use indexmap::IndexMap;
use tempfile::TempDir;

use super::*;
use crate::{
    c64,
    flagging::{FillPolicy, FlagError, SlidingFlagConfig},
    io::{read_spectrum_file, AntennaGains, FlagReport, GainSolutions, Pol, Spectrum},
};

/// A slightly noisy bandpass with an RFI spike in pol0 of "ea02" at channel
/// 20.
fn get_gains(num_chans: usize) -> GainSolutions {
    let freqs_hz = (0..num_chans).map(|i| 1e9 + i as f64 * 1e6).collect();
    let smooth = (0..num_chans)
        .map(|i| {
            let noise = 0.01 * ((i * 7919) % 13) as f64 / 13.0;
            c64::from_polar(1.0 + noise, 0.01 * i as f64)
        })
        .collect::<Vec<_>>();
    let mut spiky = smooth.clone();
    spiky[20] *= 10.0;

    let mut gains = IndexMap::new();
    gains.insert("ea01".to_string(), AntennaGains::new(&smooth, &smooth));
    gains.insert("ea02".to_string(), AntennaGains::new(&spiky, &smooth));
    GainSolutions { freqs_hz, gains }
}

#[test]
fn test_flag_gains_finds_spike() {
    let tmp_dir = TempDir::new().unwrap();
    let report_file = tmp_dir.path().join("report.json");
    let gains_file = tmp_dir.path().join("cleaned.json");
    let params = FlagGainsParams {
        gains: get_gains(64),
        config: SlidingFlagConfig::default(),
        output_report: Some(report_file.clone()),
        output_gains: Some(gains_file.clone()),
    };
    let report = params.run().unwrap();

    assert_eq!(report.num_chans, 64);
    assert_eq!(report.antennas.len(), 2);
    let ea02 = report.antennas["ea02"].get(Pol::Pol0).unwrap();
    assert_eq!(ea02.flagged_channels, [20]);
    assert_abs_diff_eq!(ea02.flagged_freqs_hz[0], 1.02e9);
    assert!(report.antennas["ea02"]
        .get(Pol::Pol1)
        .unwrap()
        .flagged_channels
        .is_empty());
    assert_eq!(report.antennas["ea01"].num_flagged(), 0);

    let read_report = FlagReport::read_file(&report_file).unwrap();
    assert_eq!(read_report.config, report.config);
    assert_eq!(
        read_report.antennas["ea02"].get(Pol::Pol0).unwrap().flagged_channels,
        [20]
    );
    assert_abs_diff_eq!(
        read_report.antennas["ea01"].get(Pol::Pol1).unwrap().scaled_mad,
        report.antennas["ea01"].get(Pol::Pol1).unwrap().scaled_mad,
        epsilon = 1e-12
    );

    // The spike is replaced by the model, which has the original magnitude and
    // the spike's phase.
    let cleaned = GainSolutions::read_file(&gains_file).unwrap();
    let original = get_gains(64);
    let cleaned_pol0 = cleaned.gains["ea02"].pol(Pol::Pol0);
    let original_pol0 = original.gains["ea02"].pol(Pol::Pol0);
    assert!(cleaned_pol0[20].norm() < 2.0);
    assert_abs_diff_eq!(cleaned_pol0[20].arg(), original_pol0[20].arg(), epsilon = 1e-9);
    assert_abs_diff_eq!(cleaned_pol0[19].re, original_pol0[19].re, epsilon = 1e-12);
    assert_abs_diff_eq!(cleaned_pol0[19].im, original_pol0[19].im, epsilon = 1e-12);
    for (c, o) in cleaned.gains["ea01"]
        .pol(Pol::Pol1)
        .into_iter()
        .zip(original.gains["ea01"].pol(Pol::Pol1))
    {
        assert_abs_diff_eq!(c.re, o.re, epsilon = 1e-12);
        assert_abs_diff_eq!(c.im, o.im, epsilon = 1e-12);
    }
}

#[test]
fn test_flag_gains_skips_bad_spectra() {
    let params = FlagGainsParams {
        gains: get_gains(24),
        config: SlidingFlagConfig {
            window_size: 25,
            ..Default::default()
        },
        output_report: None,
        output_gains: None,
    };
    let report = params.run().unwrap();
    // Every antenna is still listed, but nothing could be flagged.
    assert_eq!(report.antennas.len(), 2);
    for flags in report.antennas.values() {
        assert!(flags.pol0.is_none());
        assert!(flags.pol1.is_none());
    }
    assert_eq!(report.total_flagged(), 0);
}

#[test]
fn test_flag_spectrum_writes_outputs() {
    let tmp_dir = TempDir::new().unwrap();
    let output = tmp_dir.path().join("cleaned.txt");
    let output_model = tmp_dir.path().join("model.txt");
    let params = FlagSpectrumParams {
        spectrum: Spectrum::Real(vec![0.0, 0.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
        config: SlidingFlagConfig {
            window_size: 5,
            fill_policy: FillPolicy::Drop,
            ..Default::default()
        },
        output: Some(output.clone()),
        output_model: Some(output_model.clone()),
    };
    let flagged = params.run().unwrap();
    assert_eq!(flagged, [5]);

    assert_eq!(
        read_spectrum_file(&output).unwrap(),
        Spectrum::Real(vec![0.0; 10])
    );
    assert_eq!(
        read_spectrum_file(&output_model).unwrap(),
        Spectrum::Real(vec![0.0; 11])
    );
}

#[test]
fn test_flag_spectrum_complex() {
    let mut spectrum = vec![c64::new(1.0, 1.0); 15];
    spectrum[7] = c64::new(-30.0, 40.0);
    let params = FlagSpectrumParams {
        spectrum: Spectrum::Complex(spectrum),
        config: SlidingFlagConfig {
            window_size: 5,
            ..Default::default()
        },
        output: None,
        output_model: None,
    };
    assert_eq!(params.run().unwrap(), [7]);
}

#[test]
fn test_flag_spectrum_errors() {
    let params = FlagSpectrumParams {
        spectrum: Spectrum::Real(vec![]),
        config: SlidingFlagConfig::default(),
        output: None,
        output_model: None,
    };
    assert!(matches!(
        params.run(),
        Err(FlagSpectrumError::Flag(FlagError::EmptyInput))
    ));
}
