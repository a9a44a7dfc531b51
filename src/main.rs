/*!
 * hello_handoff - Main Entry Point
 *
 * Starts N threads that take turns printing "hello" (even index) and
 * "world" (odd index).
 *
 * Usage:
 *   hello_handoff                 # One thread per CPU
 *   hello_handoff 8               # Eight threads
 *   hello_handoff 8 --strategy condvar --wait-timeout-ms 500
 */

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, info};

use handoff_lab::cli::HandoffArgs;
use handoff_lab::handoff::{HandoffBarrier, RunReport, StdoutSink};
use handoff_lab::{init_tracing, HandoffResult};

fn run(args: HandoffArgs) -> HandoffResult<RunReport> {
    let config = args.into_config()?;
    info!(
        workers = config.worker_count,
        strategy = %config.sync.strategy,
        "hello_handoff starting"
    );
    HandoffBarrier::new(config).run(&StdoutSink)
}

fn main() -> ExitCode {
    // Initialize structured tracing (stderr only)
    init_tracing();

    let args = HandoffArgs::parse();

    match run(args) {
        Ok(report) => {
            info!(
                run_id = %report.run_id,
                lines = report.lines_written,
                strategy = report.strategy,
                elapsed_us = report.elapsed.as_micros() as u64,
                "hello_handoff finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = %e, "hello_handoff failed");
            let code = e.exit_code();
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::from(code)
        }
    }
}
