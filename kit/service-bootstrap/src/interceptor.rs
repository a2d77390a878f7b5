//! Request logging for unary handlers

use std::fmt;
use std::future::Future;
use std::time::Instant;

use tracing::{dispatcher, info, warn, Dispatch};

use crate::context::ServiceContext;

/// Metadata describing an intercepted call
#[derive(Debug, Clone, Copy)]
pub struct CallInfo<'a> {
    /// Full method name of the request being handled
    pub method: &'a str,
}

/// Logs every request before and after its handler runs
///
/// Results pass through unchanged. The logger handle is injected at
/// construction, so the interceptor never touches process-wide state.
#[derive(Clone)]
pub struct LoggingInterceptor {
    logger: Dispatch,
}

impl LoggingInterceptor {
    /// Create an interceptor emitting through the given logger
    pub fn new(logger: Dispatch) -> Self {
        Self { logger }
    }

    /// Run `handler` on the request, logging entry, outcome and duration
    ///
    /// The handler receives a clone of `ctx` (sharing its cancellation state
    /// and logger) and runs on the calling task. A failure is logged at warn
    /// level with the handler's error and returned as-is.
    pub async fn call<Req, Resp, E, H, Fut>(
        &self,
        ctx: &ServiceContext,
        info: CallInfo<'_>,
        request: Req,
        handler: H,
    ) -> Result<Resp, E>
    where
        Req: fmt::Debug,
        Resp: fmt::Debug,
        E: fmt::Display,
        H: FnOnce(ServiceContext, Req) -> Fut,
        Fut: Future<Output = Result<Resp, E>>,
    {
        let method = info.method;
        // Rendered once; the handler consumes the request itself
        let request_repr = format!("{:?}", request);

        dispatcher::with_default(&self.logger, || {
            info!(method, request = %request_repr, "handling request");
        });

        let started = Instant::now();
        let result = handler(ctx.clone(), request).await;

        match &result {
            Ok(response) => {
                let duration = started.elapsed();
                dispatcher::with_default(&self.logger, || {
                    info!(
                        method,
                        request = %request_repr,
                        response = ?response,
                        duration = ?duration,
                        "request succeeded"
                    );
                });
            }
            Err(error) => {
                dispatcher::with_default(&self.logger, || {
                    warn!(method, request = %request_repr, error = %error, "request failed");
                });
            }
        }

        result
    }
}
