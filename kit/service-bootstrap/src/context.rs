//! Per-service context carrying the logger and cancellation state

use tokio_util::sync::CancellationToken;
use tracing::{dispatcher, Dispatch};

/// Context bundle threaded through request handlers and background tasks
///
/// Clones are cheap and share the same cancellation state. The logger is an
/// explicit field rather than an untyped context value, so misuse fails at
/// compile time instead of at lookup time.
#[derive(Debug, Clone, Default)]
pub struct ServiceContext {
    logger: Option<Dispatch>,
    cancel: CancellationToken,
}

impl ServiceContext {
    /// Root context with no attached logger and fresh cancellation state
    pub fn background() -> Self {
        Self::default()
    }

    /// Attach a logger handle, returning the derived context
    pub fn with_logger(&self, logger: Dispatch) -> Self {
        Self { logger: Some(logger), cancel: self.cancel.clone() }
    }

    /// The attached logger, or the process default when none was attached
    pub fn logger(&self) -> Dispatch {
        match &self.logger {
            Some(logger) => logger.clone(),
            None => dispatcher::get_default(|default| default.clone()),
        }
    }

    /// The cancellation token shared by this context and its clones
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether this context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Completes once this context is cancelled
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }

    /// Derive a child context: parent cancellation reaches the child,
    /// child cancellation leaves the parent untouched
    pub fn child(&self) -> Self {
        Self { logger: self.logger.clone(), cancel: self.cancel.child_token() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSubscriber {
        events: Arc<AtomicUsize>,
    }

    impl tracing::Subscriber for CountingSubscriber {
        fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _attrs: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }

        fn record(&self, _id: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

        fn record_follows_from(&self, _id: &tracing::span::Id, _follows: &tracing::span::Id) {}

        fn event(&self, _event: &tracing::Event<'_>) {
            self.events.fetch_add(1, Ordering::SeqCst);
        }

        fn enter(&self, _id: &tracing::span::Id) {}

        fn exit(&self, _id: &tracing::span::Id) {}
    }

    #[test]
    fn test_attached_logger_is_returned_and_receives_events() {
        let events = Arc::new(AtomicUsize::new(0));
        let logger = Dispatch::new(CountingSubscriber { events: events.clone() });

        let ctx = ServiceContext::background().with_logger(logger);
        let retrieved = ctx.logger();
        assert!(retrieved.is::<CountingSubscriber>());

        dispatcher::with_default(&retrieved, || {
            tracing::info!("hello");
        });
        assert_eq!(events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_logger_falls_back_to_process_default() {
        let ctx = ServiceContext::background();
        // Never absent: the fallback dispatcher must be usable as-is
        dispatcher::with_default(&ctx.logger(), || {
            tracing::info!("fallback");
        });
    }

    #[test]
    fn test_attachment_survives_child_derivation() {
        let events = Arc::new(AtomicUsize::new(0));
        let logger = Dispatch::new(CountingSubscriber { events });

        let ctx = ServiceContext::background().with_logger(logger);
        assert!(ctx.child().logger().is::<CountingSubscriber>());
    }

    #[test]
    fn test_child_cancellation_is_one_way() {
        let parent = ServiceContext::background();
        let child = parent.child();

        child.cancellation_token().cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[test]
    fn test_parent_cancellation_reaches_child() {
        let parent = ServiceContext::background();
        let child = parent.child();

        parent.cancellation_token().cancel();
        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_completes_after_cancel() {
        let ctx = ServiceContext::background();
        ctx.cancellation_token().cancel();
        ctx.cancelled().await;
        assert!(ctx.is_cancelled());
    }
}
