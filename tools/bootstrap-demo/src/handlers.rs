//! Method dispatch for the demo service

use serde::Deserialize;
use serde_json::{json, Value};
use service_bootstrap::ServiceContext;
use thiserror::Error;

use crate::messages::{ErrorBody, Request};

/// Errors produced by demo request handlers
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),
}

impl From<&HandlerError> for ErrorBody {
    fn from(err: &HandlerError) -> Self {
        let code = match err {
            HandlerError::UnknownMethod(_) => 404,
            HandlerError::InvalidParams(_) => 400,
        };
        ErrorBody { code, message: err.to_string() }
    }
}

/// Route a request to its handler by method name
pub async fn dispatch(ctx: &ServiceContext, request: Request) -> Result<Value, HandlerError> {
    match request.method.as_str() {
        "echo" => echo(request.params),
        "reverse" => reverse(request.params),
        "status" => status(ctx),
        other => Err(HandlerError::UnknownMethod(other.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct TextParams {
    text: String,
}

fn parse_params<T: for<'de> Deserialize<'de>>(params: Option<Value>) -> Result<T, HandlerError> {
    serde_json::from_value(params.unwrap_or(Value::Null))
        .map_err(|e| HandlerError::InvalidParams(e.to_string()))
}

fn echo(params: Option<Value>) -> Result<Value, HandlerError> {
    let params: TextParams = parse_params(params)?;
    Ok(json!({ "text": params.text }))
}

fn reverse(params: Option<Value>) -> Result<Value, HandlerError> {
    let params: TextParams = parse_params(params)?;
    let reversed: String = params.text.chars().rev().collect();
    Ok(json!({ "text": reversed }))
}

fn status(ctx: &ServiceContext) -> Result<Value, HandlerError> {
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "shutting_down": ctx.is_cancelled(),
    }))
}
