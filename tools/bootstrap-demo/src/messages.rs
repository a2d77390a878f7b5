//! Message envelopes for the demo wire protocol

use serde::{Deserialize, Serialize};

/// Incoming request envelope, one per line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Request ID for request/response correlation
    pub id: Option<String>,

    /// Method to invoke
    pub method: String,

    /// Method parameters
    pub params: Option<serde_json::Value>,
}

/// Outgoing response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// ID of the request this answers
    pub id: Option<String>,

    /// Result payload (for successful responses)
    pub result: Option<serde_json::Value>,

    /// Error (for failed responses)
    pub error: Option<ErrorBody>,
}

/// Error payload carried by failed responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Numeric error code
    pub code: u32,

    /// Human readable error message
    pub message: String,
}

impl Response {
    pub fn success(id: Option<String>, result: serde_json::Value) -> Self {
        Self { id, result: Some(result), error: None }
    }

    pub fn failure(id: Option<String>, error: ErrorBody) -> Self {
        Self { id, result: None, error: Some(error) }
    }
}

impl ErrorBody {
    pub fn invalid_request(message: String) -> Self {
        Self { code: 400, message }
    }
}
