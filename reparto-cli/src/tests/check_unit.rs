//! Unit tests for the `check` subcommand.

use super::helpers::{StopsFile, TableResolverBuilder, equator_resolver, output};
use super::*;
use crate::check::{CheckArgs, CheckConfig, config_from_layers_for_test, run_check_with};
use ortho_config::MergeComposer;
use reparto_session::DEFAULT_DEBOUNCE;
use rstest::rstest;
use serde_json::json;
use std::time::Duration;

fn immediate(start: Option<&str>, end: Option<&str>) -> CheckArgs {
    CheckArgs {
        start: start.map(str::to_owned),
        end: end.map(str::to_owned),
        debounce_ms: Some(0),
        ..CheckArgs::default()
    }
}

#[rstest]
fn converting_without_any_field_errors() {
    let err = CheckConfig::try_from(CheckArgs::default()).expect_err("nothing to check");
    match err {
        CliError::NothingToCheck => {}
        other => panic!("expected NothingToCheck, found {other:?}"),
    }
}

#[rstest]
#[case(None, DEFAULT_DEBOUNCE)]
#[case(Some(0), Duration::ZERO)]
#[case(Some(150), Duration::from_millis(150))]
fn converting_maps_debounce(#[case] debounce_ms: Option<u64>, #[case] expected: Duration) {
    let check_args = CheckArgs {
        start: Some("A".to_owned()),
        debounce_ms,
        ..CheckArgs::default()
    };
    let config = CheckConfig::try_from(check_args).expect("config should build");
    assert_eq!(config.debounce, expected);
}

#[rstest]
fn merge_layers_prefers_environment_over_file() {
    let mut composer = MergeComposer::new();
    composer.push_file(json!({ "start": "Depot", "debounce_ms": 100 }), None);
    composer.push_environment(json!({ "debounce_ms": 250 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.start.as_deref(), Some("Depot"));
    assert_eq!(config.debounce, Duration::from_millis(250));
}

#[rstest]
fn every_resolving_field_reports_valid() {
    let stops = StopsFile::new("B\n\nD\n");
    let builder = TableResolverBuilder::new(equator_resolver());
    let mut stdout = Vec::new();
    let check_args = CheckArgs {
        stops_file: Some(stops.path()),
        ..immediate(Some("A"), Some("C"))
    };

    run_check_with(check_args, &builder, &mut stdout).expect("check should succeed");

    assert_eq!(
        output(stdout),
        "start: valid (0.000000, 0.000000) A\n\
         stop 1: valid (0.000000, 0.010000) B\n\
         stop 3: valid (0.000000, 0.018000) D\n\
         end: valid (0.000000, 0.050000) C\n"
    );
    assert_eq!(builder.requests(), 4);
}

#[rstest]
fn unresolved_fields_are_reported_and_fail_the_command() {
    let builder = TableResolverBuilder::new(equator_resolver());
    let mut stdout = Vec::new();

    let err = run_check_with(immediate(Some("A"), Some("Atlantis")), &builder, &mut stdout)
        .expect_err("check should fail");

    match err {
        CliError::UnresolvedAddresses { count } => assert_eq!(count, 1),
        other => panic!("expected UnresolvedAddresses, found {other:?}"),
    }
    assert_eq!(
        output(stdout),
        "start: valid (0.000000, 0.000000) A\n\
         end: invalid Atlantis (no match for \"Atlantis\")\n"
    );
}
