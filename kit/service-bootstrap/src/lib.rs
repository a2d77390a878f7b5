//! Service Bootstrap Library
//!
//! This library provides the process startup glue shared by small network
//! services: environment overrides from a local file, a structured logger
//! carried through an explicit service context, signal-driven cancellation
//! with single-shot handler retirement, and request logging for unary
//! handlers.

pub mod bootstrap;
pub mod context;
pub mod env;
pub mod error;
pub mod interceptor;
pub mod logging;
pub mod signals;

pub use bootstrap::{bootstrap, bootstrap_with_shutdown};
pub use context::ServiceContext;
pub use env::{load_env_file, load_env_file_from, ENV_OVERRIDE_FILE};
pub use error::{BootstrapError, BootstrapResult};
pub use interceptor::{CallInfo, LoggingInterceptor};
pub use logging::{install_global, new_logger, LoggingConfig};
pub use signals::{cancel_on_signals, ShutdownHandle, DEFAULT_SHUTDOWN_SIGNALS};
