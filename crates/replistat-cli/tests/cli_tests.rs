//! Argument-surface tests. The long option spellings are a compatibility
//! contract with external tooling, so they are pinned here.

use clap::Parser;
use replistat_cli::cli::Cli;

#[test]
fn defaults() {
    let cli = Cli::try_parse_from(["replistat"]).unwrap();
    assert!(!cli.all);
    assert!(!cli.localhost);
    assert!(cli.site.is_none());
    assert!(!cli.print_landscape_tree);
    assert!(!cli.machine_mode());
    assert!(!cli.omit_secondary_active_status);
}

#[test]
fn short_flags() {
    let cli = Cli::try_parse_from(["replistat", "-a", "-l", "-s", "SiteB", "-t"]).unwrap();
    assert!(cli.all);
    assert!(cli.localhost);
    assert_eq!(cli.site.as_deref(), Some("SiteB"));
    assert!(cli.print_landscape_tree);
}

#[test]
fn long_flags_keep_historical_spellings() {
    let cli = Cli::try_parse_from([
        "replistat",
        "--all",
        "--localhost",
        "--site=SiteB",
        "--printLandscapeTree",
        "--omitSecondaryActiveStatus",
    ])
    .unwrap();
    assert!(cli.all);
    assert!(cli.localhost);
    assert_eq!(cli.site.as_deref(), Some("SiteB"));
    assert!(cli.print_landscape_tree);
    assert!(cli.omit_secondary_active_status);
}

#[test]
fn sapcontrol_engages_only_on_exactly_one() {
    let cli = Cli::try_parse_from(["replistat", "--sapcontrol=1"]).unwrap();
    assert!(cli.machine_mode());

    let cli = Cli::try_parse_from(["replistat", "--sapcontrol=0"]).unwrap();
    assert!(!cli.machine_mode());

    let cli = Cli::try_parse_from(["replistat"]).unwrap();
    assert!(!cli.machine_mode());
}

#[test]
fn unknown_flag_is_a_usage_error() {
    assert!(Cli::try_parse_from(["replistat", "--bogus"]).is_err());
}
