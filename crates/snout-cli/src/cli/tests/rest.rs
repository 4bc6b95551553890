//! Tests for check-file, completions, man and argument errors.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

#[test]
fn cli_parse_check_file() {
    match parse(&["snout", "check-file", "/tmp/cat.webp"]) {
        CliCommand::CheckFile { path } => {
            assert_eq!(path, std::path::PathBuf::from("/tmp/cat.webp"));
        }
        _ => panic!("expected CheckFile"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["snout", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
    assert!(Cli::try_parse_from(["snout", "completions", "cmd"]).is_err());
}

#[test]
fn cli_parse_man() {
    assert!(matches!(parse(&["snout", "man"]), CliCommand::Man));
}

#[test]
fn cli_unknown_subcommand_fails() {
    assert!(Cli::try_parse_from(["snout", "classify-everything"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
