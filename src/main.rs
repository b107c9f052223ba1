//! cypher-tck command-line entry point

use anyhow::Context;
use std::io::Write;

use cypher_tck::cli::{parse_args, run_cli, EXIT_FAILURE, EXIT_SUCCESS};
use cypher_tck::logging::init_tracing;

fn main() -> anyhow::Result<()> {
    let args = match parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            // help and version land here too
            let _ = e.print();
            std::process::exit(if e.use_stderr() { EXIT_FAILURE } else { EXIT_SUCCESS });
        }
    };

    init_tracing(args.verbose);
    let code = run_cli(args);

    std::io::stdout()
        .flush()
        .context("failed to flush report output")?;
    std::process::exit(code)
}
