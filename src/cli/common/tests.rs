// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the flagging arguments shared by all subcommands.

use approx::assert_abs_diff_eq;

use super::*;

#[test]
fn default_flagging_args_give_default_config() {
    let config = FlaggingArgs::default().parse().unwrap();
    assert_eq!(config, SlidingFlagConfig::default());
}

#[test]
fn flagging_args_parse_policies() {
    let config = FlaggingArgs {
        window_size: Some(15),
        threshold: Some(4.5),
        edge_policy: Some("Reflect".to_string()),
        fill_policy: Some("nan".to_string()),
        statistic: Some("components".to_string()),
        centre_residuals: true,
    }
    .parse()
    .unwrap();
    assert_eq!(config.window_size, 15);
    assert_abs_diff_eq!(config.threshold, 4.5);
    assert_eq!(config.edge_policy, EdgePolicy::Reflect);
    assert_eq!(config.fill_policy, FillPolicy::Nan);
    assert_eq!(config.statistic, ComplexStatistic::Components);
    assert!(config.centre_residuals);
}

#[test]
fn flagging_args_reject_unknown_policies() {
    let result = FlaggingArgs {
        edge_policy: Some("wrap".to_string()),
        ..Default::default()
    }
    .parse();
    match result {
        Err(FlaggingArgsError::InvalidEdgePolicy { got, valid }) => {
            assert_eq!(got, "wrap");
            assert_eq!(valid, "shrink, reflect, constant");
        }
        _ => panic!("expected an edge policy error"),
    }

    let result = FlaggingArgs {
        fill_policy: Some("interpolate".to_string()),
        ..Default::default()
    }
    .parse();
    assert!(matches!(
        result,
        Err(FlaggingArgsError::InvalidFillPolicy { .. })
    ));

    let result = FlaggingArgs {
        statistic: Some("phase".to_string()),
        ..Default::default()
    }
    .parse();
    assert!(matches!(
        result,
        Err(FlaggingArgsError::InvalidStatistic { .. })
    ));
}

#[test]
fn flagging_args_merge_prefers_first() {
    let cli = FlaggingArgs {
        window_size: Some(5),
        ..Default::default()
    };
    let file = FlaggingArgs {
        window_size: Some(21),
        threshold: Some(6.0),
        centre_residuals: true,
        ..Default::default()
    };
    let merged = cli.merge(file);
    assert_eq!(merged.window_size, Some(5));
    assert_eq!(merged.threshold, Some(6.0));
    assert!(merged.centre_residuals);
    assert!(merged.edge_policy.is_none());
}

#[test]
fn arg_file_types_from_extensions() {
    assert!(matches!(ArgFileTypes::from_str("toml"), Ok(ArgFileTypes::Toml)));
    assert!(matches!(ArgFileTypes::from_str("json"), Ok(ArgFileTypes::Json)));
    assert!(ArgFileTypes::from_str("yaml").is_err());
    assert_eq!(*ARG_FILE_TYPES_COMMA_SEPARATED, "toml, json");
}
