//! Demo service wired through the bootstrap kit
//!
//! Speaks line-delimited JSON over TCP: one request envelope per line, one
//! response envelope back. The first Ctrl+C drains connections gracefully,
//! a second one terminates the process.

mod handlers;
mod messages;

use anyhow::{Context, Result};
use clap::Parser;
use service_bootstrap::{bootstrap, CallInfo, LoggingInterceptor, ServiceContext};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};

use crate::messages::{ErrorBody, Request, Response};

#[derive(Parser, Debug)]
#[command(name = "bootstrap-demo")]
#[command(about = "Line-delimited JSON RPC demo service")]
#[command(version)]
struct DemoOptions {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:4000")]
    listen: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let (ctx, logger, options) = bootstrap::<DemoOptions>().context("Bootstrap failed")?;

    info!("Starting bootstrap-demo v{}", env!("CARGO_PKG_VERSION"));

    let listener = TcpListener::bind(&options.listen)
        .await
        .with_context(|| format!("Failed to bind {}", options.listen))?;
    info!("Listening on {}. Press Ctrl+C to shutdown gracefully.", options.listen);

    let interceptor = LoggingInterceptor::new(logger);

    loop {
        tokio::select! {
            _ = ctx.cancelled() => {
                info!("Shutdown requested, closing listener");
                break;
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        info!("Accepted connection from {}", peer);
                        let conn_ctx = ctx.child();
                        let interceptor = interceptor.clone();
                        tokio::spawn(async move {
                            if let Err(e) = serve_connection(conn_ctx, interceptor, stream).await {
                                warn!("Connection closed with error: {}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                }
            }
        }
    }

    info!("bootstrap-demo shutdown complete");
    Ok(())
}

/// Serve one connection until it closes or the context is cancelled
async fn serve_connection(
    ctx: ServiceContext,
    interceptor: LoggingInterceptor,
    stream: TcpStream,
) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    loop {
        tokio::select! {
            _ = ctx.cancelled() => break,
            line = lines.next_line() => {
                let line = match line? {
                    Some(line) => line,
                    None => break,
                };
                if line.trim().is_empty() {
                    continue;
                }

                let response = handle_line(&ctx, &interceptor, &line).await;
                let mut payload = serde_json::to_vec(&response)?;
                payload.push(b'\n');
                write_half.write_all(&payload).await?;
            }
        }
    }

    Ok(())
}

/// Decode one request line, run it through the interceptor, build the reply
async fn handle_line(
    ctx: &ServiceContext,
    interceptor: &LoggingInterceptor,
    line: &str,
) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            return Response::failure(
                None,
                ErrorBody::invalid_request(format!("Malformed request: {}", e)),
            );
        }
    };

    let id = request.id.clone();
    let method = request.method.clone();

    let outcome = interceptor
        .call(ctx, CallInfo { method: &method }, request, |cx, request| async move {
            handlers::dispatch(&cx, request).await
        })
        .await;

    match outcome {
        Ok(result) => Response::success(id, result),
        Err(e) => Response::failure(id, ErrorBody::from(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_listen_address() {
        let options = DemoOptions::try_parse_from(["bootstrap-demo"]).unwrap();
        assert_eq!(options.listen, "127.0.0.1:4000");
    }

    #[test]
    fn test_options_custom_listen_address() {
        let options =
            DemoOptions::try_parse_from(["bootstrap-demo", "--listen", "0.0.0.0:9000"]).unwrap();
        assert_eq!(options.listen, "0.0.0.0:9000");
    }

    #[tokio::test]
    async fn test_handle_line_rejects_malformed_json() {
        let ctx = ServiceContext::background();
        let interceptor = LoggingInterceptor::new(ctx.logger());

        let response = handle_line(&ctx, &interceptor, "not json").await;
        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, 400);
    }

    #[tokio::test]
    async fn test_handle_line_answers_echo() {
        let ctx = ServiceContext::background();
        let interceptor = LoggingInterceptor::new(ctx.logger());

        let response = handle_line(
            &ctx,
            &interceptor,
            r#"{"id":"42","method":"echo","params":{"text":"hi"}}"#,
        )
        .await;
        assert_eq!(response.id.as_deref(), Some("42"));
        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap()["text"], "hi");
    }

    #[tokio::test]
    async fn test_handle_line_reports_unknown_method() {
        let ctx = ServiceContext::background();
        let interceptor = LoggingInterceptor::new(ctx.logger());

        let response = handle_line(&ctx, &interceptor, r#"{"method":"nope"}"#).await;
        assert_eq!(response.error.unwrap().code, 404);
    }
}
