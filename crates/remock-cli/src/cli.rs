//! Command-line argument definitions.

use camino::Utf8PathBuf;
use clap::Parser;

/// Command-line interface for the `remock` rewriter.
#[derive(Parser, Debug)]
#[command(
    name = "remock",
    about = "Rewrites Mocha mocks in Ruby test files into RSpec mocks"
)]
pub(crate) struct Cli {
    /// Reports what would change without writing any file.
    #[arg(long)]
    pub(crate) dry_run: bool,
    /// Directory searched recursively for Ruby files.
    #[arg(value_name = "DIRECTORY", env = "DIRECTORY")]
    pub(crate) directory: Option<Utf8PathBuf>,
}
