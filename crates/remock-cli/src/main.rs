//! CLI entrypoint for `remock`.
//!
//! The binary delegates to [`remock_cli::run`], which loads configuration,
//! parses the directory argument, and rewrites every candidate file below it.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    remock_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
