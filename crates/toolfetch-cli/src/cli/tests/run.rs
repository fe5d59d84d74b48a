//! Tests for the run subcommand.

use clap::Parser;
use super::parse;
use crate::cli::{CliCommand, CollisionArg};
use std::path::Path;

#[test]
fn cli_parse_run_defaults() {
    match parse(&["toolfetch", "run"]) {
        CliCommand::Run {
            source,
            log,
            jobs,
            collision,
            json,
        } => {
            assert!(source.config.is_none());
            assert!(source.tools.is_empty());
            assert!(source.dest.is_none());
            assert!(log.is_none());
            assert!(jobs.is_none());
            assert!(collision.is_none());
            assert!(!json);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_overrides() {
    match parse(&[
        "toolfetch",
        "run",
        "--config",
        "/etc/toolfetch.toml",
        "--dest",
        "bin/backup",
        "--log",
        "errors.log",
        "--jobs",
        "1",
        "--collision",
        "fail",
        "--json",
    ]) {
        CliCommand::Run {
            source,
            log,
            jobs,
            collision,
            json,
        } => {
            assert_eq!(source.config.as_deref(), Some(Path::new("/etc/toolfetch.toml")));
            assert_eq!(source.dest.as_deref(), Some(Path::new("bin/backup")));
            assert_eq!(log.as_deref(), Some(Path::new("errors.log")));
            assert_eq!(jobs, Some(1));
            assert_eq!(collision, Some(CollisionArg::Fail));
            assert!(json);
        }
        _ => panic!("expected Run with overrides"),
    }
}

#[test]
fn cli_parse_run_repeated_tools() {
    match parse(&[
        "toolfetch",
        "run",
        "--tool",
        "rg=https://example.com/rg.tgz",
        "--tool",
        "fd=https://example.com/fd.tgz",
    ]) {
        CliCommand::Run { source, .. } => {
            assert_eq!(
                source.tools,
                vec![
                    "rg=https://example.com/rg.tgz".to_string(),
                    "fd=https://example.com/fd.tgz".to_string()
                ]
            );
        }
        _ => panic!("expected Run with tools"),
    }
}

#[test]
fn cli_parse_job_is_an_alias_for_tool() {
    match parse(&[
        "toolfetch",
        "run",
        "--job",
        "rg=https://example.com/rg.tgz",
        "--tool",
        "fd=https://example.com/fd.tgz",
    ]) {
        CliCommand::Run { source, .. } => assert_eq!(
            source.tools,
            vec![
                "rg=https://example.com/rg.tgz".to_string(),
                "fd=https://example.com/fd.tgz".to_string()
            ]
        ),
        _ => panic!("expected Run with tools"),
    }
    match parse(&["toolfetch", "plan", "--job", "rg=https://example.com/rg.tgz"]) {
        CliCommand::Plan { source, .. } => {
            assert_eq!(source.tools, vec!["rg=https://example.com/rg.tgz".to_string()])
        }
        _ => panic!("expected Plan with tools"),
    }
}

#[test]
fn cli_parse_run_rejects_unknown_collision_policy() {
    assert!(crate::cli::Cli::try_parse_from(["toolfetch", "run", "--collision", "overwrite"]).is_err());
}
