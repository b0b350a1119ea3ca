//! Error types for the CLI runtime.

use std::sync::Arc;

use thiserror::Error;

use crate::batch::BatchError;
use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("a directory must be provided as an argument or via DIRECTORY")]
    MissingDirectory,
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Batch(#[from] BatchError),
}
