//! CLI argument parsing
//!
//! Subcommands:
//! - analyze: classify failures in a run's raw output
//! - diff: compare two persisted run-result files
//! - categories: list the failure taxonomy

use clap::{ArgAction, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::ColourMode;

/// Parsed CLI arguments
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "cypher-tck",
    version,
    about = "Cypher TCK harness: failure triage and run-to-run diffs"
)]
pub struct Args {
    /// Config file (overrides $CYPHER_TCK_CONFIG and ./cypher-tck.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug); RUST_LOG wins when set
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Colour report output
    #[arg(long, global = true, value_enum, value_name = "WHEN")]
    pub colour: Option<ColourMode>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Parse a run's output, classify failures and print a report
    Analyze(AnalyzeArgs),

    /// Show regressions and fixes between two run-result files
    Diff(DiffArgs),

    /// List every failure category
    Categories,
}

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub struct AnalyzeArgs {
    /// Saved runner output; `-` or nothing reads stdin
    #[arg(value_name = "INPUT", conflicts_with = "exec")]
    pub input: Option<PathBuf>,

    /// Write the captured raw output here (with --exec)
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Run this step-runner command and analyze its stdout and stderr
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "CMD")]
    pub exec: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub struct DiffArgs {
    /// BASELINE and CURRENT result files; picked from the results directory
    /// when omitted
    #[arg(num_args = 0..=2, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Directory to auto-select result files from
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Exit with status 3 when any regression is found
    #[arg(long)]
    pub fail_on_regression: bool,
}

/// Parse CLI arguments
///
/// Help and version requests also come back as `Err`; the caller tells them
/// apart with [`clap::Error::use_stderr`].
pub fn parse_args<I, T>(args: I) -> std::result::Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        parse_args(std::iter::once("cypher-tck").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_analyze_file() {
        let args = parse(&["analyze", "run.txt"]).unwrap();
        assert_eq!(
            args.command,
            Command::Analyze(AnalyzeArgs {
                input: Some(PathBuf::from("run.txt")),
                save: None,
                exec: Vec::new(),
            })
        );
        assert_eq!(args.verbose, 0);
        assert_eq!(args.colour, None);
    }

    #[test]
    fn test_parse_analyze_exec_keeps_hyphen_args() {
        let args = parse(&["analyze", "--save", "raw.txt", "--exec", "behave", "features/", "--no-capture"])
            .unwrap();
        let Command::Analyze(analyze) = args.command else {
            panic!("expected analyze");
        };
        assert_eq!(analyze.exec, vec!["behave", "features/", "--no-capture"]);
        assert_eq!(analyze.save, Some(PathBuf::from("raw.txt")));
    }

    #[test]
    fn test_parse_diff_variants() {
        let args = parse(&["diff"]).unwrap();
        let Command::Diff(diff) = args.command else {
            panic!("expected diff");
        };
        assert!(diff.files.is_empty());
        assert!(!diff.fail_on_regression);

        let args = parse(&["diff", "a.json", "b.json", "--fail-on-regression"]).unwrap();
        let Command::Diff(diff) = args.command else {
            panic!("expected diff");
        };
        assert_eq!(diff.files.len(), 2);
        assert!(diff.fail_on_regression);

        assert!(parse(&["diff", "a.json", "b.json", "c.json"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["categories", "-vv", "--colour", "never"]).unwrap();
        assert_eq!(args.command, Command::Categories);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.colour, Some(ColourMode::Never));
    }

    #[test]
    fn test_help_is_not_a_usage_error() {
        let err = parse(&["--help"]).unwrap_err();
        assert!(!err.use_stderr());

        let err = parse(&["frobnicate"]).unwrap_err();
        assert!(err.use_stderr());
    }
}
