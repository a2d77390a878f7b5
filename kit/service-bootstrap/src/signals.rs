//! Signal-triggered cancellation with single-shot graceful handlers

use std::os::raw::c_int;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::low_level;
use signal_hook::{flag, SigId};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::context::ServiceContext;
use crate::error::BootstrapResult;

/// Signals that cancel a bootstrapped context by default
pub const DEFAULT_SHUTDOWN_SIGNALS: &[c_int] = &[SIGINT, SIGTERM];

/// How often the watcher task checks the signal flag
const SIGNAL_POLL_INTERVAL_MS: u64 = 100;

/// Conventional exit status base for death-by-signal
const SIGNAL_EXIT_BASE: c_int = 128;

struct HandlerState {
    /// Set by the first signal delivery or by an explicit cancel
    triggered: Arc<AtomicBool>,
    /// Graceful registrations, retired on first trigger; empty afterwards
    graceful_ids: Mutex<Vec<SigId>>,
}

impl HandlerState {
    fn retire(&self) {
        self.triggered.store(true, Ordering::SeqCst);
        let ids = {
            let mut guard =
                self.graceful_ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::take(&mut *guard)
        };
        for id in ids {
            low_level::unregister(id);
        }
    }
}

/// Cancels the derived context and retires its graceful signal handlers
///
/// Clones share the underlying state. `cancel` is idempotent, and dropping
/// the handle leaves the handlers armed.
#[derive(Clone)]
pub struct ShutdownHandle {
    cancel: CancellationToken,
    state: Arc<HandlerState>,
}

impl ShutdownHandle {
    /// Cancel the derived context and retire the graceful handlers
    ///
    /// Repeat calls, or calls after a signal already cancelled the context,
    /// are no-ops.
    pub fn cancel(&self) {
        self.cancel.cancel();
        self.state.retire();
    }
}

/// Derive a context from `parent` that is cancelled by any of `signals`
///
/// The first delivery cancels the returned context and retires the graceful
/// handlers, so any later delivery terminates the process with the
/// conventional `128 + signal` status, as the default disposition would.
/// The returned handle cancels the same context explicitly. Must be called
/// from within a tokio runtime; the flag watcher runs as a background task.
pub fn cancel_on_signals(
    parent: &ServiceContext,
    signals: &[c_int],
) -> BootstrapResult<(ServiceContext, ShutdownHandle)> {
    let triggered = Arc::new(AtomicBool::new(false));
    let mut graceful_ids = Vec::with_capacity(signals.len());

    for &signal in signals {
        // Registration order matters: actions run oldest-first, so the
        // conditional shutdown observes the flag before the graceful action
        // sets it. First delivery survives, later ones terminate.
        flag::register_conditional_shutdown(
            signal,
            SIGNAL_EXIT_BASE + signal,
            triggered.clone(),
        )?;
        graceful_ids.push(flag::register(signal, triggered.clone())?);
    }

    let ctx = parent.child();
    let token = ctx.cancellation_token().clone();
    let state = Arc::new(HandlerState { triggered, graceful_ids: Mutex::new(graceful_ids) });

    let watcher_token = token.clone();
    let watcher_state = state.clone();
    tokio::spawn(async move {
        loop {
            if watcher_state.triggered.load(Ordering::Relaxed) {
                if !watcher_token.is_cancelled() {
                    info!("Shutdown signal received");
                }
                watcher_token.cancel();
                watcher_state.retire();
                break;
            }
            tokio::select! {
                _ = watcher_token.cancelled() => {
                    watcher_state.retire();
                    break;
                }
                _ = tokio::time::sleep(Duration::from_millis(SIGNAL_POLL_INTERVAL_MS)) => {}
            }
        }
    });

    Ok((ctx, ShutdownHandle { cancel: token, state }))
}
