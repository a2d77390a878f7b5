//! One-call process bootstrap for service binaries

use clap::Parser;
use tracing::{dispatcher, Dispatch};

use crate::context::ServiceContext;
use crate::env::load_env_file;
use crate::error::BootstrapResult;
use crate::logging::{new_logger, LoggingConfig};
use crate::signals::{cancel_on_signals, ShutdownHandle, DEFAULT_SHUTDOWN_SIGNALS};

/// Standard setup for a service binary
///
/// Applies `.env` overrides, parses command line options, installs the
/// default logger, and returns a context that carries the logger and is
/// cancelled by the first SIGINT or SIGTERM. A second signal terminates the
/// process. Must be called from within a tokio runtime.
///
/// Any stage failure aborts the sequence; overrides applied by an earlier
/// stage are not rolled back.
pub fn bootstrap<O: Parser>() -> BootstrapResult<(ServiceContext, Dispatch, O)> {
    load_env_file()?;

    let options = O::try_parse()?;

    let logger = install_default_logger();

    let ctx = ServiceContext::background().with_logger(logger.clone());
    let (ctx, _shutdown) = cancel_on_signals(&ctx, DEFAULT_SHUTDOWN_SIGNALS)?;

    Ok((ctx, logger, options))
}

/// Same as [`bootstrap`] but without option parsing
///
/// The shutdown handle is handed back for callers that need manual
/// cancellation control in addition to the signal path.
pub fn bootstrap_with_shutdown() -> BootstrapResult<(ServiceContext, Dispatch, ShutdownHandle)> {
    load_env_file()?;

    let logger = install_default_logger();

    let ctx = ServiceContext::background().with_logger(logger.clone());
    let (ctx, shutdown) = cancel_on_signals(&ctx, DEFAULT_SHUTDOWN_SIGNALS)?;

    Ok((ctx, logger, shutdown))
}

/// Build the default logger and install it process-wide
fn install_default_logger() -> Dispatch {
    let logger = new_logger(&LoggingConfig::default());
    // First install wins; a repeated bootstrap keeps the existing default
    let _ = dispatcher::set_global_default(logger.clone());
    logger
}
