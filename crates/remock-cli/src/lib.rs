//! Command-line runtime for `remock`.
//!
//! The runtime splits configuration flags from the run arguments, loads
//! layered configuration, installs logging, and rewrites every candidate
//! file below the requested directory. Output streams and the configuration
//! loader are injected so tests can drive the runtime without a process.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use remock_config::Config;
use tracing::{debug, info};

mod batch;
mod cli;
mod config;
mod errors;
mod telemetry;

use batch::{BatchOptions, process_directory};
use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
use errors::AppError;

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: keep in sync with the fields of `remock_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--extensions",
];

/// Bundles the output streams handed to the runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

/// Runs the CLI using the provided arguments and output streams.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let arguments: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&arguments);

    let result = Cli::try_parse_from(&split.cli_arguments)
        .map_err(AppError::CliUsage)
        .and_then(|cli| {
            loader
                .load(&split.config_arguments)
                .map(|config| (cli, config))
        })
        .and_then(|(cli, config)| execute(cli, &config, io));

    match result {
        Ok(exit_code) => exit_code,
        Err(AppError::CliUsage(error))
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            report(io.stdout, &error.render().to_string());
            ExitCode::SUCCESS
        }
        Err(error) => {
            report(io.stderr, &error.to_string());
            ExitCode::FAILURE
        }
    }
}

fn execute<W, E>(
    cli: Cli,
    config: &Config,
    io: &mut IoStreams<'_, W, E>,
) -> Result<ExitCode, AppError>
where
    W: Write,
    E: Write,
{
    telemetry::initialise(config)?;
    let directory = cli.directory.ok_or(AppError::MissingDirectory)?;
    let options = BatchOptions {
        dry_run: cli.dry_run,
        extensions: config.extensions(),
    };

    let summary = process_directory(&directory, &options, &mut *io.stdout)?;
    info!(
        converted = summary.converted,
        unchanged = summary.unchanged,
        skipped = summary.skipped,
        "run complete"
    );
    Ok(ExitCode::SUCCESS)
}

fn report<S: Write>(stream: &mut S, message: &str) {
    if let Err(error) = writeln!(stream, "{}", message.trim_end()) {
        debug!(%error, "failed to write to output stream");
    }
}
