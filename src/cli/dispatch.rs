//! CLI subcommand dispatch
//!
//! - analyze: read or capture runner output, print the failure report
//! - diff: compare two run-result files, optionally failing on regressions
//! - categories: print the failure taxonomy

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};

use crate::cli::{
    AnalyzeArgs, Args, Command, DiffArgs, Error, Result, EXIT_FAILURE, EXIT_REGRESSION,
    EXIT_SUCCESS,
};
use crate::config::HarnessConfig;
use crate::history::{diff_runs, load_statuses, select_result_files, ResultPair};
use crate::outcome::{parse_run_output, render_report, Category, FailureBreakdown};

/// Exit code wrapper for CLI operations
pub type ExitCode = i32;

/// Resolve configuration, run the subcommand and map the outcome to an
/// exit code. Errors are reported on stderr.
pub fn run_cli(args: Args) -> ExitCode {
    let mut config = match HarnessConfig::resolve(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_FAILURE;
        }
    };
    if let Some(colour) = args.colour {
        config.colour = colour;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run_command(args.command, &config, &mut out) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Run one subcommand, writing its report to `out`
pub fn run_command<W: Write>(command: Command, config: &HarnessConfig, out: &mut W) -> Result<ExitCode> {
    match command {
        Command::Analyze(args) => run_analyze(args, config, out),
        Command::Diff(args) => run_diff(args, config, out),
        Command::Categories => {
            for category in Category::all() {
                writeln!(out, "{}", category.label())?;
            }
            Ok(EXIT_SUCCESS)
        }
    }
}

fn run_analyze<W: Write>(args: AnalyzeArgs, config: &HarnessConfig, out: &mut W) -> Result<ExitCode> {
    if args.save.is_some() && args.exec.is_empty() {
        return Err(Error::InvalidArgs("--save requires --exec".to_string()));
    }

    let raw = if args.exec.is_empty() {
        read_input(args.input.as_deref())?
    } else {
        let raw = capture_command(&args.exec)?;
        if let Some(path) = &args.save {
            std::fs::write(path, &raw)?;
            eprintln!("Raw output saved to {}", path.display());
        }
        raw
    };

    let run = parse_run_output(&raw);
    let breakdown = FailureBreakdown::from_scenarios(&run.scenarios);
    info!(
        scenarios = run.scenarios.len(),
        failing = breakdown.failing_scenarios(),
        "analysis complete"
    );

    out.write_all(render_report(&run, &breakdown, &config.report_options()).as_bytes())?;
    Ok(EXIT_SUCCESS)
}

/// Saved output from a file, or stdin for `-` / no path
fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            eprintln!("Reading saved output from {}...", path.display());
            std::fs::read_to_string(path).map_err(|source| Error::Input {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .map_err(|source| Error::Input {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(raw)
        }
    }
}

/// Run the step-runner and return its stdout followed by its stderr
///
/// A non-zero exit status is expected whenever scenarios fail, so it is
/// logged rather than treated as an error.
fn capture_command(command: &[String]) -> Result<String> {
    let Some((program, rest)) = command.split_first() else {
        return Err(Error::InvalidArgs("--exec needs a command".to_string()));
    };
    let command_line = command.join(" ");
    eprintln!("Running {}...", command_line);

    let output = process::Command::new(program)
        .args(rest)
        .output()
        .map_err(|source| Error::Exec {
            command: command_line.clone(),
            source,
        })?;
    debug!(command = %command_line, status = %output.status, "step-runner finished");

    let mut raw = String::from_utf8_lossy(&output.stdout).into_owned();
    raw.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(raw)
}

fn run_diff<W: Write>(args: DiffArgs, config: &HarnessConfig, out: &mut W) -> Result<ExitCode> {
    let pair = match args.files.as_slice() {
        [baseline, current] => ResultPair {
            baseline: baseline.clone(),
            current: current.clone(),
        },
        [] => {
            let dir = args.results_dir.as_deref().unwrap_or(config.results_dir.as_path());
            select_result_files(dir, &config.golden_file)?
        }
        _ => {
            return Err(Error::InvalidArgs(
                "diff takes no files or both BASELINE and CURRENT".to_string(),
            ))
        }
    };

    writeln!(out, "Baseline: {}", file_name(&pair.baseline))?;
    writeln!(out, "Current:  {}", file_name(&pair.current))?;
    writeln!(out)?;

    let baseline = load_statuses(&pair.baseline)?;
    let current = load_statuses(&pair.current)?;
    let diff = diff_runs(&baseline, &current);
    out.write_all(diff.render().as_bytes())?;

    if args.fail_on_regression && diff.has_regressions() {
        return Ok(EXIT_REGRESSION);
    }
    Ok(EXIT_SUCCESS)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
