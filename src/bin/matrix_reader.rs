//! # matrix_reader - read a character matrix and print it back
//!
//! Usage:
//!   matrix_reader grid.txt        # Read from a file
//!   matrix_reader < grid.txt      # Read from standard input
//!
//! Input: `ROWS COLS` followed by one token per row.

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;
use tracing::debug;

use handoff_lab::cli::MatrixArgs;
use handoff_lab::matrix::{read_matrix, CharMatrix};
use handoff_lab::{init_tracing, MatrixError, MatrixResult};

fn load(args: &MatrixArgs) -> MatrixResult<CharMatrix> {
    match &args.path {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| MatrixError::Io(format!("{}: {}", path.display(), e)))?;
            read_matrix(BufReader::new(file))
        }
        None => read_matrix(io::stdin().lock()),
    }
}

fn print(matrix: &CharMatrix) -> MatrixResult<()> {
    let mut out = io::stdout().lock();
    matrix.write_to(&mut out)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let args = MatrixArgs::parse();

    let result = load(&args).and_then(|matrix| {
        print(&matrix)?;
        let released = matrix.destroy();
        debug!(rows = released, "matrix destroyed");
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = %e, "matrix_reader failed");
            let code = e.exit_code();
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::from(code)
        }
    }
}
