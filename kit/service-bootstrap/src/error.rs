//! Error types for process bootstrap

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while bootstrapping a service process
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Failed to read environment file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse command line options: {0}")]
    Options(#[from] clap::Error),

    #[error("Failed to install default logger: {0}")]
    InstallLogger(#[from] tracing::dispatcher::SetGlobalDefaultError),

    #[error("Failed to register signal handler: {0}")]
    Signals(#[from] std::io::Error),
}

/// Result type for bootstrap operations
pub type BootstrapResult<T> = Result<T, BootstrapError>;
