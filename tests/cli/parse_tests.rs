// CLI parsing tests - scenario names, aliases and option defaults

use clap::Parser;
use clap::error::ErrorKind;
use foundry_cli::{Cli, Scenario};
use foundry_core::config::Browser;
use std::time::Duration;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("foundry-demos").chain(args.iter().copied()))
}

#[test]
fn accepts_canonical_scenario_names() {
    let cases = [
        ("filesystem", Scenario::Filesystem),
        ("web-automation", Scenario::WebAutomation),
        ("source-control", Scenario::SourceControl),
        ("structured-reasoning", Scenario::StructuredReasoning),
        ("http-fetch", Scenario::HttpFetch),
        ("combined", Scenario::Combined),
        ("tool-inspection", Scenario::ToolInspection),
        ("interactive", Scenario::Interactive),
        ("help", Scenario::Help),
    ];

    for (name, expected) in cases {
        let cli = parse(&[name]).unwrap_or_else(|err| panic!("{name}: {err}"));
        assert_eq!(cli.scenario, Some(expected), "{name}");
    }
}

#[test]
fn accepts_short_aliases() {
    let cases = [
        ("playwright", Scenario::WebAutomation),
        ("github", Scenario::SourceControl),
        ("thinking", Scenario::StructuredReasoning),
        ("fetch", Scenario::HttpFetch),
        ("tools", Scenario::ToolInspection),
    ];

    for (alias, expected) in cases {
        let cli = parse(&[alias]).unwrap_or_else(|err| panic!("{alias}: {err}"));
        assert_eq!(cli.scenario, Some(expected), "{alias}");
    }
}

#[test]
fn rejects_unknown_scenario() {
    let err = parse(&["teleport"]).expect_err("unknown scenario");
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[test]
fn scenario_is_optional() {
    let cli = parse(&[]).expect("no arguments");
    assert_eq!(cli.scenario, None);
}

#[test]
fn defaults_are_headless_chromium_in_sample_files() {
    let cli = parse(&["filesystem"]).expect("parse");
    let launch = cli.launch_options();

    assert!(launch.headless);
    assert_eq!(launch.browser, Browser::Chromium);
    assert!(launch.samples_dir.ends_with("sample_files"));
    assert_eq!(cli.handshake_timeout(), Duration::from_secs(60));
    assert_eq!(cli.max_turns, 10);
    assert!(cli.env_file.is_none());
}

#[test]
fn verbosity_counts_repeated_flags() {
    let cli = parse(&["-vv", "combined"]).expect("parse");
    assert_eq!(cli.verbose, 2);
}

#[test]
fn rejects_unknown_browser() {
    let err = parse(&["playwright", "--browser", "netscape"]).expect_err("unknown browser");
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}
