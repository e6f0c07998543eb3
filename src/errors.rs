//! Harness error types.
//!
//! All errors implement `std::error::Error` via `thiserror`. Every variant is
//! contained at the scenario boundary — the runner converts an `Err` into a
//! failed verdict and keeps going, so none of these can abort the run.

use thiserror::Error;

/// Errors that can occur while exercising the endpoint.
#[derive(Debug, Error)]
pub enum CheckError {
    /// TCP/HTTP connection to the service endpoint failed.
    #[error("connection failed to {endpoint}: {reason}")]
    Connection {
        endpoint: String,
        reason: String,
    },

    /// Non-2xx HTTP response from the service.
    #[error("HTTP {status}: {body}")]
    Http {
        status: u16,
        body: String,
    },

    /// SSE stream read or chunk-level parse error.
    #[error("stream error: {reason}")]
    Stream {
        reason: String,
    },

    /// A completed response violated the expected data shape, e.g. an empty
    /// `choices` array or a `tool_calls` finish with no tool calls attached.
    #[error("response shape error: {reason}")]
    Shape {
        reason: String,
    },
}

impl CheckError {
    /// Whether this error came from the transport layer rather than from the
    /// shape of an otherwise-delivered response.
    pub fn is_transport(&self) -> bool {
        matches!(self, CheckError::Connection { .. } | CheckError::Http { .. })
    }
}
